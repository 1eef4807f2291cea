//! Admin sessions with JWT bearer tokens.
//!
//! A correct admin password is exchanged for a short-lived HS256 token that
//! the admin endpoints accept in the `authorization` header.

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Subject recorded in every admin token
const ADMIN_SUBJECT: &str = "admin";

/// Admin authentication error
#[derive(Debug, Error)]
pub enum AdminError {
    /// JWT encoding failed
    #[error("Failed to encode JWT: {0}")]
    JwtEncode(#[from] jsonwebtoken::errors::Error),

    /// Password did not match
    #[error("Invalid admin password")]
    WrongPassword,

    /// No bearer token on the request
    #[error("Missing bearer token")]
    MissingToken,

    /// Token expired
    #[error("Admin token expired")]
    TokenExpired,

    /// Invalid token
    #[error("Invalid admin token")]
    InvalidToken,
}

/// JWT claims for admin tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always "admin"
    pub sub: String,

    /// Token expiration timestamp (Unix epoch)
    pub exp: u64,

    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
}

/// Issued token and its expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminToken {
    /// Signed JWT
    pub token: String,
    /// Expiration timestamp (Unix epoch)
    pub expires_at: u64,
}

/// Issues and checks admin tokens
pub struct AdminAuth {
    password: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: u64,
}

impl AdminAuth {
    /// Create an authenticator for `password`, signing with `jwt_secret`
    pub fn new(password: &str, jwt_secret: &str, token_expiry_secs: u64) -> Self {
        Self {
            password: password.to_string(),
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry_secs,
        }
    }

    /// Exchange the admin password for a token
    pub fn login(&self, password: &str) -> Result<AdminToken, AdminError> {
        if password != self.password {
            return Err(AdminError::WrongPassword);
        }

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            exp: now.saturating_add(self.token_expiry_secs),
            iat: now,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(AdminToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate a token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<AdminClaims, AdminError> {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        let token_data = decode::<AdminClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AdminError::TokenExpired,
                _ => AdminError::InvalidToken,
            })?;

        Ok(token_data.claims)
    }

    /// Validate the bearer token carried in `headers`
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AdminClaims, AdminError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AdminError::MissingToken)?;

        self.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn auth() -> AdminAuth {
        AdminAuth::new("letmein", "test-secret", 3600)
    }

    #[test]
    fn test_login_and_validate_token() {
        let auth = auth();
        let issued = auth.login("letmein").unwrap();

        let claims = auth.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_huge_expiry_saturates() {
        let auth = AdminAuth::new("letmein", "test-secret", u64::MAX);
        let issued = auth.login("letmein").unwrap();
        assert_eq!(issued.expires_at, u64::MAX);
    }

    #[test]
    fn test_wrong_password() {
        assert!(matches!(auth().login("guess"), Err(AdminError::WrongPassword)));
    }

    #[test]
    fn test_expired_token() {
        let auth = auth();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();

        let claims = AdminClaims {
            sub: "admin".to_string(),
            exp: now - 100,
            iat: now - 200,
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert!(matches!(auth.validate_token(&token), Err(AdminError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let other = AdminAuth::new("letmein", "another-secret", 3600);
        let issued = other.login("letmein").unwrap();

        assert!(matches!(auth().validate_token(&issued.token), Err(AdminError::InvalidToken)));
    }

    #[test]
    fn test_authorize_reads_bearer_header() {
        let auth = auth();
        let issued = auth.login("letmein").unwrap();

        let mut headers = HeaderMap::new();
        assert!(matches!(auth.authorize(&headers), Err(AdminError::MissingToken)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(auth.authorize(&headers), Err(AdminError::MissingToken)));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", issued.token)).unwrap(),
        );
        assert!(auth.authorize(&headers).is_ok());
    }
}
