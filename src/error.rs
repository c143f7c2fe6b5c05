use crate::core::forms::FieldErrors;
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("jwt error: {0}")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("invalid config: {0}")]
    ConfigError(String),

    #[error("not found")]
    NotFound,

    #[error("invalid form: {0:?}")]
    Validation(FieldErrors),

    #[error("authentication required")]
    AuthenticationRequired(String),

    #[error("permission denied")]
    Forbidden,

    #[error("invalid username or password")]
    InvalidCredentials,
}

pub const LOGIN_URL: &str = "/login/";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::AuthenticationRequired(_) => StatusCode::FOUND,
            Error::Forbidden | Error::InvalidCredentials => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Validation(errors) => HttpResponse::build(self.status_code()).json(json!({ "errors": errors })),
            Error::AuthenticationRequired(next) => HttpResponse::build(self.status_code())
                .insert_header((header::LOCATION, format!("{}?next={}", LOGIN_URL, next)))
                .finish(),
            Error::NotFound | Error::Forbidden | Error::InvalidCredentials => HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() })),
            _ => {
                log::error!("{}", self);
                HttpResponse::build(self.status_code()).json(json!({ "error": "internal server error" }))
            }
        }
    }
}
