use crate::core::models::{choice::Choice, poll::Poll};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// A question is visible to end users once its publication time has passed.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now
    }
}

#[derive(Debug, Default)]
pub struct Query {
    pub id_eq: Option<i32>,
    pub pub_date_lte: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub choices: Vec<Choice>,
    pub polls: Vec<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
