//! Session token signing and verification.
//!
//! Sessions are HS256 JWTs carried in httpOnly cookies. Two token realms
//! exist: `user` for ordinary accounts and `admin` for the back-office. Each
//! realm is signed with its own secret and a token from one realm never
//! validates in the other.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Realm a session token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRealm {
    User,
    Admin,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user id for the user realm, admin username for the admin realm.
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Realm discriminator, checked on every validation.
    pub realm: TokenRealm,
}

/// Signs and validates session tokens for one realm.
#[derive(Clone)]
pub struct SessionKeys {
    realm: TokenRealm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Token lifetime in seconds.
    pub expiry_secs: i64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("realm", &self.realm)
            .field("expiry_secs", &self.expiry_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SessionKeys {
    /// Creates keys for the given realm from a shared secret.
    pub fn new(realm: TokenRealm, secret: &str, expiry_secs: i64) -> Self {
        Self {
            realm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
        }
    }

    /// Issues a token for the given subject.
    pub fn issue(&self, subject: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
            iat: now.timestamp(),
            realm: self.realm,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::EncodingError(e.to_string()))
    }

    /// Validates a token and returns its claims.
    ///
    /// Fails if the signature is wrong, the token expired, or the realm claim
    /// does not match this key set's realm.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            }
        })?;

        if data.claims.realm != self.realm {
            return Err(SessionError::InvalidToken);
        }

        Ok(data.claims)
    }
}

/// Extracts a user id from validated user-realm claims.
pub fn subject_user_id(claims: &SessionClaims) -> Result<Uuid, SessionError> {
    Uuid::parse_str(&claims.sub).map_err(|_| SessionError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_keys() -> SessionKeys {
        SessionKeys::new(TokenRealm::User, "user_secret_for_tests", 3600)
    }

    fn admin_keys() -> SessionKeys {
        SessionKeys::new(TokenRealm::Admin, "admin_secret_for_tests", 3600)
    }

    #[test]
    fn test_issue_and_validate() {
        let keys = user_keys();
        let user_id = Uuid::new_v4();

        let token = keys.issue(&user_id.to_string()).unwrap();
        let claims = keys.validate(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.realm, TokenRealm::User);
        assert_eq!(subject_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_realms_are_not_interchangeable() {
        let user_id = Uuid::new_v4().to_string();

        // Different secrets: signature fails outright
        let token = user_keys().issue(&user_id).unwrap();
        assert!(matches!(
            admin_keys().validate(&token),
            Err(SessionError::InvalidToken)
        ));

        // Same secret, wrong realm claim: still rejected
        let admin_with_user_secret =
            SessionKeys::new(TokenRealm::Admin, "user_secret_for_tests", 3600);
        assert!(matches!(
            admin_with_user_secret.validate(&token),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative expiry puts exp in the past beyond the 30s leeway
        let keys = SessionKeys::new(TokenRealm::User, "user_secret_for_tests", -3600);
        let token = keys.issue("someone").unwrap();

        assert!(matches!(
            keys.validate(&token),
            Err(SessionError::TokenExpired)
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(user_keys().validate("not.a.jwt").is_err());
        assert!(user_keys().validate("").is_err());
    }

    #[test]
    fn test_claims_timestamps() {
        let keys = user_keys();
        let token = keys.issue("subject").unwrap();
        let claims = keys.validate(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, keys.expiry_secs);
    }

    #[test]
    fn test_subject_user_id_rejects_non_uuid() {
        let keys = admin_keys();
        let token = keys.issue("chefe").unwrap();
        let claims = keys.validate(&token).unwrap();

        assert!(subject_user_id(&claims).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", user_keys());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("user_secret_for_tests"));
    }
}
