//! Pure authorization decisions over (actor, resource) pairs.
//!
//! Every function here is total: a missing entity or an anonymous actor
//! resolves to a denial, never an error.

pub mod team;
pub mod user;

pub use team::{can_create_membership, can_edit_team, can_see_team};
pub use user::{can_edit_user, can_see_user};

use uuid::Uuid;

use crate::types::user::UserRecord;

/// Who is asking. Built from the authenticated user (or lack of one) by the
/// calling layer; guardians never touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User { id: Uuid, admin: bool },
}

impl Actor {
    pub fn from_user(user: &UserRecord) -> Self {
        Actor::User {
            id: user.id,
            admin: user.admin,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::User { admin: true, .. })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::User { id, .. } => Some(*id),
            Actor::Anonymous => None,
        }
    }
}
