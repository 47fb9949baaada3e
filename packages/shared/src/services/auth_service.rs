use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::TokenClaims;
use crate::services::errors::auth_service_errors::AuthServiceError;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait AuthServiceTrait: Send + Sync {
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError>;
    fn extract_user_id_from_token(&self, token: &str) -> Result<String, AuthServiceError>;
    fn generate_token(&self, user_id: &str) -> Result<String, AuthServiceError>;
}

pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new() -> Self {
        let jwt_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET environment variable must be set");
        AuthService { jwt_secret }
    }

    pub fn with_jwt_secret(jwt_secret: String) -> Self {
        AuthService { jwt_secret }
    }
}

impl AuthServiceTrait for AuthService {
    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let validation = Validation::default();

        match decode::<TokenClaims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                if token_data.claims.exp < Utc::now().timestamp() {
                    Err(AuthServiceError::ExpiredToken)
                } else {
                    Ok(token_data.claims)
                }
            }
            Err(err) => match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(AuthServiceError::ExpiredToken)
                }
                _ => Err(AuthServiceError::InvalidToken),
            },
        }
    }

    fn extract_user_id_from_token(&self, token: &str) -> Result<String, AuthServiceError> {
        let claims = self.verify_token(token)?;
        Ok(claims.sub)
    }

    fn generate_token(&self, user_id: &str) -> Result<String, AuthServiceError> {
        if user_id.is_empty() {
            return Err(AuthServiceError::ValidationError(
                "User id cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(24)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AuthServiceError::JwtError(format!("{:#?}", e)))
    }
}
