use async_trait::async_trait;
use uuid::Uuid;

use crate::types::error::StoreError;
use crate::types::user::{NewUserRecord, UserPatch, UserRecord};

/// The user-record store the lifecycle runs against. Each call is
/// transactional on its own; `insert_unique` must detect conflicts
/// atomically rather than trusting a prior read.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Lookup by the unique API authentication token.
    async fn find_by_auth_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert-if-absent. Reports which unique column collided via
    /// [`StoreError::Conflict`] so token collisions can be retried and
    /// email collisions surfaced as validation failures.
    async fn insert_unique(&self, user: NewUserRecord) -> Result<UserRecord, StoreError>;

    /// Apply a patch as a single transactional update, so paired columns
    /// (digest + timestamp) are never observable half-written.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord, StoreError>;
}
