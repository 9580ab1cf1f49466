use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What the notification is about. Delivery templates live with whatever
/// dispatcher implementation picks these up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Activation,
    InviteNew,
    InviteExisting,
    PasswordReset,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Activation => write!(f, "activation"),
            EventKind::InviteNew => write!(f, "invite_new"),
            EventKind::InviteExisting => write!(f, "invite_existing"),
            EventKind::PasswordReset => write!(f, "password_reset"),
        }
    }
}

/// A credential event handed to the dispatcher. Carries the plaintext token
/// when the recipient needs it (activation link, reset link); the token is
/// never written to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: EventKind,
    pub user_id: Uuid,
    pub email: String,
    pub token: Option<String>,
}
