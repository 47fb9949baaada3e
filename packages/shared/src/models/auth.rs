use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id the token was issued for.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
