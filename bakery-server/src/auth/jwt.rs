//! JWT token service
//!
//! HS256 bearer tokens carrying the customer identity and role.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Customer, Role};
use thiserror::Error;

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub customer_id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    /// Issue a token for `customer`, valid from `now`
    pub fn generate_token(
        &self,
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> Result<(String, i64), JwtError> {
        let exp = (now + self.expiry).timestamp();
        let claims = Claims {
            customer_id: customer.id,
            email: customer.email.clone(),
            name: customer.name.clone(),
            role: customer.role.as_db().to_string(),
            exp,
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok((token, exp))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Authenticated caller, inserted into request extensions by [`require_auth`](super::require_auth)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCustomer {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentCustomer {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for CurrentCustomer {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.customer_id,
            email: claims.email,
            name: claims.name,
            role: Role::from_db(&claims.role).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(role: Role) -> Customer {
        Customer {
            id: 7,
            email: "ana@example.com".into(),
            password_hash: String::new(),
            name: "Ana".into(),
            address: None,
            role,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let jwt = JwtService::new("test-secret", 24);
        let (token, exp) = jwt.generate_token(&customer(Role::Admin), Utc::now()).unwrap();
        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.exp, exp);

        let who = CurrentCustomer::from(claims);
        assert_eq!(who.id, 7);
        assert!(who.is_admin());
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new("test-secret", 1);
        let issued = Utc::now() - Duration::hours(3);
        let (token, _) = jwt.generate_token(&customer(Role::Customer), issued).unwrap();
        assert!(matches!(jwt.validate_token(&token), Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let ours = JwtService::new("ours", 24);
        let theirs = JwtService::new("theirs", 24);
        let (token, _) = theirs.generate_token(&customer(Role::Admin), Utc::now()).unwrap();
        assert!(matches!(ours.validate_token(&token), Err(JwtError::InvalidSignature)));
        assert!(ours.validate_token("not.a.token").is_err());
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
