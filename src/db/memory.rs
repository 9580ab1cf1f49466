use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::store::UserStore;
use crate::types::error::{StoreError, UniqueField};
use crate::types::user::{NewUserRecord, UserPatch, UserRecord};

/// In-memory user store. Backs the test suites and any embedded use; the
/// mutex makes insert-if-absent atomic the same way the database's unique
/// indexes do.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pre-existing row, e.g. a partially registered user created by
    /// a team invite.
    pub fn seed(&self, user: UserRecord) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_auth_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| u.authentication_token == token)
            .cloned())
    }

    async fn insert_unique(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let mut users = self.users.lock().unwrap();

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict(UniqueField::Email));
        }
        if users
            .values()
            .any(|u| u.authentication_token == user.authentication_token)
        {
            return Err(StoreError::Conflict(UniqueField::AuthToken));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: user.id,
            email: user.email,
            password_digest: user.password_digest,
            activated: false,
            activated_at: None,
            activation_digest: Some(user.activation_digest),
            reset_digest: None,
            reset_sent_at: None,
            remember_digest: None,
            authentication_token: user.authentication_token,
            admin: false,
            partially_registered: user.partially_registered,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord, StoreError> {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(v) = patch.password_digest {
            user.password_digest = v;
        }
        if let Some(v) = patch.activated {
            user.activated = v;
        }
        if let Some(v) = patch.activated_at {
            user.activated_at = v;
        }
        if let Some(v) = patch.activation_digest {
            user.activation_digest = v;
        }
        if let Some(v) = patch.reset_digest {
            user.reset_digest = v;
        }
        if let Some(v) = patch.reset_sent_at {
            user.reset_sent_at = v;
        }
        if let Some(v) = patch.remember_digest {
            user.remember_digest = v;
        }
        if let Some(v) = patch.partially_registered {
            user.partially_registered = v;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}
