use serde::Serialize;
use thiserror::Error;

/// Which unique column a store insert collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    AuthToken,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Email => write!(f, "email"),
            UniqueField::AuthToken => write!(f, "authentication_token"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violation on {0}")]
    Conflict(UniqueField),
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// A single field-level validation failure, surfaced to the caller so the
/// user can correct their input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    // recoverable, caller corrects and retries
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error("not found")]
    NotFound,

    // infra things
    #[error("token generation exhausted retries")]
    TokenCollisionExhausted,
    #[error(transparent)]
    Store(StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Expired => "EXPIRED",
            Self::NotFound => "NOT_FOUND",
            Self::TokenCollisionExhausted => "TOKEN_COLLISION_EXHAUSTED",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AuthError::NotFound,
            // Email conflicts surface as a field error; token conflicts are
            // consumed by the retry loop before they reach this conversion.
            StoreError::Conflict(UniqueField::Email) => {
                AuthError::validation("email", "has already been taken")
            }
            other => AuthError::Store(other),
        }
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}
