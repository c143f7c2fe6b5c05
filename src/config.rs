use crate::error::Error;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub max_connections: u32,
    pub token_ttl_days: i64,
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, Error> {
    match lookup(key) {
        Some(value) => value.parse().map_err(|_| Error::ConfigError(format!("{} has invalid value {:?}", key, value))),
        None => Ok(default),
    }
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| dotenv::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| Error::ConfigError("environment variable DATABASE_URL not been set".into()))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| Error::ConfigError("environment variable JWT_SECRET not been set".into()))?;
        Ok(Self {
            database_url,
            jwt_secret,
            bind_host: lookup("BIND_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            bind_port: parse_or(&lookup, "BIND_PORT", 8000)?,
            max_connections: parse_or(&lookup, "MAX_CONNECTIONS", 5)?,
            token_ttl_days: parse_or(&lookup, "TOKEN_TTL_DAYS", 30)?,
        })
    }
}
