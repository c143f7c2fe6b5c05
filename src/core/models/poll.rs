use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user comment attached to one choice of a question.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Poll {
    pub id: i32,
    pub choice_id: i32,
    pub comment: String,
    pub created_by: i32,
}

#[derive(Debug)]
pub struct Insert {
    pub choice_id: i32,
    pub comment: String,
    pub created_by: i32,
}

#[derive(Debug)]
pub struct Update {
    pub choice_id: i32,
    pub comment: String,
}

#[derive(Debug, Default)]
pub struct Query {
    pub question_id_eq: Option<i32>,
}

/// Raw form fields as posted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submit {
    #[serde(default)]
    pub choice: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}
