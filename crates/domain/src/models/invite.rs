//! Group invite domain model and lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Invites default to expiring seven days after creation.
pub const INVITE_TTL_DAYS: i64 = 7;

/// Invite lifecycle status.
///
/// PENDING transitions to exactly one of ACCEPTED, DECLINED or EXPIRED.
/// The terminal states are immutable; EXPIRED is only ever derived lazily
/// from a PENDING invite whose expiration has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "PENDING",
            InviteStatus::Accepted => "ACCEPTED",
            InviteStatus::Declined => "DECLINED",
            InviteStatus::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InviteStatus::Pending)
    }
}

impl FromStr for InviteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(InviteStatus::Pending),
            "ACCEPTED" => Ok(InviteStatus::Accepted),
            "DECLINED" => Ok(InviteStatus::Declined),
            "EXPIRED" => Ok(InviteStatus::Expired),
            _ => Err(format!("Invalid invite status: {}", s)),
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derives the status an invite should report right now.
///
/// A PENDING invite past its expiration reads as EXPIRED; everything else is
/// reported as stored. Idempotent: resolving an already-EXPIRED invite
/// changes nothing.
pub fn effective_status(
    stored: InviteStatus,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> InviteStatus {
    if stored == InviteStatus::Pending && expires_at < now {
        InviteStatus::Expired
    } else {
        stored
    }
}

/// Default expiration timestamp for an invite created now.
pub fn default_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(INVITE_TTL_DAYS)
}

/// A group invitation, addressed either to a known user or to an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInvite {
    pub id: Uuid,
    pub group_id: Uuid,
    pub inviter_id: Uuid,
    /// Set for in-app invites; mutually exclusive with `invitee_email`.
    pub invitee_id: Option<Uuid>,
    /// Set for email invites, always lowercased.
    pub invitee_email: Option<String>,
    pub token: String,
    pub status: InviteStatus,
    pub expires_at: DateTime<Utc>,
    /// When the addressee first saw the invite in their inbox.
    pub seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an invite.
///
/// Exactly one of `invitee_id` / `invitee_email` must be set; handlers call
/// [`CreateInviteRequest::target`] to enforce that.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteRequest {
    pub invitee_id: Option<Uuid>,

    #[validate(email(message = "Invalid email address"))]
    pub invitee_email: Option<String>,
}

/// The addressing mode of an invite being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteTarget {
    UserId(Uuid),
    Email(String),
}

impl CreateInviteRequest {
    /// Resolves the addressing mode, rejecting none-or-both.
    pub fn target(&self) -> Result<InviteTarget, &'static str> {
        match (self.invitee_id, self.invitee_email.as_deref()) {
            (Some(id), None) => Ok(InviteTarget::UserId(id)),
            (None, Some(email)) if !email.trim().is_empty() => {
                Ok(InviteTarget::Email(email.trim().to_lowercase()))
            }
            (Some(_), Some(_)) => Err("Specify either a user or an email, not both"),
            _ => Err("An invitee user or email is required"),
        }
    }
}

/// Request payload for accepting or declining an invite.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondToInviteRequest {
    pub accept: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            InviteStatus::Pending,
            InviteStatus::Accepted,
            InviteStatus::Declined,
            InviteStatus::Expired,
        ] {
            assert_eq!(InviteStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!InviteStatus::Pending.is_terminal());
        assert!(InviteStatus::Accepted.is_terminal());
        assert!(InviteStatus::Declined.is_terminal());
        assert!(InviteStatus::Expired.is_terminal());
    }

    #[test]
    fn test_effective_status_expires_pending() {
        let now = Utc::now();
        let past = now - Duration::hours(1);
        let future = now + Duration::hours(1);

        assert_eq!(
            effective_status(InviteStatus::Pending, past, now),
            InviteStatus::Expired
        );
        assert_eq!(
            effective_status(InviteStatus::Pending, future, now),
            InviteStatus::Pending
        );
    }

    #[test]
    fn test_effective_status_leaves_terminal_states_alone() {
        let now = Utc::now();
        let past = now - Duration::hours(1);

        // Expiry never rewrites a terminal outcome
        assert_eq!(
            effective_status(InviteStatus::Accepted, past, now),
            InviteStatus::Accepted
        );
        assert_eq!(
            effective_status(InviteStatus::Declined, past, now),
            InviteStatus::Declined
        );
        assert_eq!(
            effective_status(InviteStatus::Expired, past, now),
            InviteStatus::Expired
        );
    }

    #[test]
    fn test_default_expiry_is_seven_days_out() {
        let now = Utc::now();
        assert_eq!(default_expiry(now) - now, Duration::days(7));
    }

    #[test]
    fn test_target_requires_exactly_one_addressing_mode() {
        let both = CreateInviteRequest {
            invitee_id: Some(Uuid::new_v4()),
            invitee_email: Some("x@example.com".to_string()),
        };
        assert!(both.target().is_err());

        let neither = CreateInviteRequest {
            invitee_id: None,
            invitee_email: None,
        };
        assert!(neither.target().is_err());
    }

    #[test]
    fn test_target_lowercases_email() {
        let req = CreateInviteRequest {
            invitee_id: None,
            invitee_email: Some("X@Example.COM".to_string()),
        };
        assert_eq!(
            req.target().unwrap(),
            InviteTarget::Email("x@example.com".to_string())
        );
    }

    #[test]
    fn test_target_by_user_id() {
        let id = Uuid::new_v4();
        let req = CreateInviteRequest {
            invitee_id: Some(id),
            invitee_email: None,
        };
        assert_eq!(req.target().unwrap(), InviteTarget::UserId(id));
    }
}
