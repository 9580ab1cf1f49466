use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::types::error::FieldError;

pub const EMAIL_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 50;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^(?i)[\w+\-.]+@[a-z\d\-]+(\.[a-z]+)*\.[a-z]+$").expect("email regex")
    })
}

/// A user row as the store hands it back. Digest columns hold argon2 PHC
/// strings; the matching plaintext tokens are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_digest: String,
    pub activated: bool,
    pub activated_at: Option<DateTime<Utc>>,
    pub activation_digest: Option<String>,
    pub reset_digest: Option<String>,
    pub reset_sent_at: Option<DateTime<Utc>>,
    pub remember_digest: Option<String>,
    pub authentication_token: String,
    pub admin: bool,
    pub partially_registered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration candidate as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
}

impl RegisterUser {
    /// Field-level validation, Rails-style: every violation is collected
    /// rather than stopping at the first.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let email = self.email.trim();

        if email.is_empty() {
            errors.push(FieldError::new("email", "can't be blank"));
        } else {
            if email.len() > EMAIL_MAX_LEN {
                errors.push(FieldError::new(
                    "email",
                    format!("is too long (maximum is {EMAIL_MAX_LEN} characters)"),
                ));
            }
            if !email_re().is_match(email) {
                errors.push(FieldError::new("email", "is invalid"));
            }
        }

        if self.password.len() < PASSWORD_MIN_LEN {
            errors.push(FieldError::new(
                "password",
                format!("is too short (minimum is {PASSWORD_MIN_LEN} characters)"),
            ));
        } else if self.password.len() > PASSWORD_MAX_LEN {
            errors.push(FieldError::new(
                "password",
                format!("is too long (maximum is {PASSWORD_MAX_LEN} characters)"),
            ));
        }

        errors
    }

    /// Emails are stored lowercase so the unique index is effectively
    /// case-insensitive.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Everything the store needs to insert a fresh user row.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_digest: String,
    pub activation_digest: String,
    pub authentication_token: String,
    pub partially_registered: bool,
}

/// One transactional update against a user row. `None` leaves the column
/// untouched; the inner `Option` on nullable columns distinguishes "set"
/// from "clear".
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password_digest: Option<String>,
    pub activated: Option<bool>,
    pub activated_at: Option<Option<DateTime<Utc>>>,
    pub activation_digest: Option<Option<String>>,
    pub reset_digest: Option<Option<String>>,
    pub reset_sent_at: Option<Option<DateTime<Utc>>>,
    pub remember_digest: Option<Option<String>>,
    pub partially_registered: Option<bool>,
}

/// Outcome of a successful registration. The plaintext activation token is
/// returned exactly once; only its digest survives in the store.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: UserRecord,
    pub activation_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_candidates() {
        assert!(candidate("user@example.com", "longenough").validate().is_empty());
        assert!(candidate("first.last+tag@sub.example.co", "longenough")
            .validate()
            .is_empty());
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "plainaddress", "@missing-local.org", "user@", "a b@x.com"] {
            let errors = candidate(bad, "longenough").validate();
            assert!(
                errors.iter().any(|e| e.field == "email"),
                "expected email error for {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_passwords() {
        let errors = candidate("user@example.com", "short").validate();
        assert!(errors.iter().any(|e| e.field == "password"));

        let errors = candidate("user@example.com", &"x".repeat(51)).validate();
        assert!(errors.iter().any(|e| e.field == "password"));

        assert!(candidate("user@example.com", &"x".repeat(50))
            .validate()
            .is_empty());
    }

    #[test]
    fn normalizes_email_case() {
        assert_eq!(
            candidate(" User@Example.COM ", "longenough").normalized_email(),
            "user@example.com"
        );
    }
}
