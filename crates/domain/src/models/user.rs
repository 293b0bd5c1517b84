//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered account.
///
/// Emails are unique case-insensitively; `email` always holds the lowercased
/// form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User fields safe to show to other members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Request payload for signup.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
}

/// Request payload for signin.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_valid() {
        let req = SignUpRequest {
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            name: "Alice Johnson".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let req = SignUpRequest {
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
            name: "Alice".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_request_rejects_bad_email() {
        let req = SignUpRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            name: "Alice".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_request_accepts_generated_identities() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        for _ in 0..20 {
            let req = SignUpRequest {
                email: SafeEmail().fake(),
                password: "password123".to_string(),
                name: Name().fake(),
            };
            assert!(req.validate().is_ok(), "rejected {:?}", req.email);
        }
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
    }
}
