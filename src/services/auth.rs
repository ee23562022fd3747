use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::{
    error::AppResult,
    models::{auth::Claims, parent::Parent},
};

pub struct AuthService;

impl AuthService {
    pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
        Ok(bcrypt::hash(password, cost)?)
    }

    /// A malformed stored hash is treated the same as a wrong password.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    pub fn generate_session_token(
        parent: &Parent,
        secret: &str,
        ttl_days: u64,
    ) -> AppResult<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: parent.id.to_string(),
            email: parent.email.clone(),
            family_code: parent.family_code.clone(),
            iat: now,
            exp: now + (ttl_days * 86400) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }
}
