use crate::core::models::user::User;
use crate::core::password::session_hash;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// HS256 signer. Keys are derived once from the secret.
pub struct JWT {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JWT {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn gen_token(&self, payload: &P) -> Result<String, Error> {
        Ok(encode(&Header::new(Algorithm::HS256), payload, &self.encoding)?)
    }

    fn verify_token(&self, token: &str) -> Result<P, Error> {
        let data = decode::<P>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub ver: String,
    pub exp: i64,
}

impl Claim {
    pub fn new(user: &User, ttl_days: i64) -> Self {
        Self {
            user: user.id.to_string(),
            ver: session_hash(&user.password, &user.salt),
            exp: (Utc::now() + Duration::days(ttl_days)).timestamp(),
        }
    }
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }

    fn version(&self) -> &str {
        &self.ver
    }
}
