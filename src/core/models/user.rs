use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub is_staff: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub username: String,
    pub email: String,
    pub password: String,
    pub salt: String,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAddress {
    pub id: i32,
    pub user_id: i32,
    pub email: String,
    pub verified: bool,
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct EmailAddressInsert {
    pub user_id: i32,
    pub email: String,
    pub verified: bool,
    pub is_primary: bool,
}

#[derive(Debug, Default)]
pub struct Patch {
    pub password: Option<String>,
    pub salt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Register {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordChange {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password1: String,
    #[serde(default)]
    pub new_password2: String,
}
