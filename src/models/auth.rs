use serde::{Deserialize, Serialize};

/// Claims embedded in a parent session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // parent id
    pub email: String,
    pub family_code: String,
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from a validated session token, available via Axum extractors
#[derive(Debug, Clone)]
pub struct AuthenticatedParent {
    pub parent_id: i64,
    pub email: String,
    pub family_code: String,
}
