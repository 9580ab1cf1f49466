use async_trait::async_trait;
use chrono::Utc;
use entity::user::{ActiveModel as UserActive, Column, Entity as User, Model as UserModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::db::postgres_service::PostgresService;
use crate::db::store::UserStore;
use crate::types::error::{StoreError, UniqueField};
use crate::types::user::{NewUserRecord, UserPatch, UserRecord};

fn to_record(m: UserModel) -> UserRecord {
    UserRecord {
        id: m.id,
        email: m.email,
        password_digest: m.password_digest,
        activated: m.activated,
        activated_at: m.activated_at,
        activation_digest: m.activation_digest,
        reset_digest: m.reset_digest,
        reset_sent_at: m.reset_sent_at,
        remember_digest: m.remember_digest,
        authentication_token: m.authentication_token,
        admin: m.admin,
        partially_registered: m.partially_registered,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Translate a unique-index violation into the column it hit. Constraint
/// names carry the column name on every schema we deploy.
fn conflict_field(err: &DbErr) -> Option<UniqueField> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            if msg.contains("email") {
                Some(UniqueField::Email)
            } else {
                Some(UniqueField::AuthToken)
            }
        }
        _ => None,
    }
}

#[async_trait]
impl UserStore for PostgresService {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(User::find()
            .filter(Column::Email.eq(email))
            .one(&self.database_connection)
            .await
            .map_err(StoreError::Db)?
            .map(to_record))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(User::find_by_id(id)
            .one(&self.database_connection)
            .await
            .map_err(StoreError::Db)?
            .map(to_record))
    }

    async fn find_by_auth_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(User::find()
            .filter(Column::AuthenticationToken.eq(token))
            .one(&self.database_connection)
            .await
            .map_err(StoreError::Db)?
            .map(to_record))
    }

    async fn insert_unique(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let now = Utc::now();
        let active = UserActive {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_digest: Set(user.password_digest.clone()),
            activated: Set(false),
            activated_at: Set(None),
            activation_digest: Set(Some(user.activation_digest.clone())),
            reset_digest: Set(None),
            reset_sent_at: Set(None),
            remember_digest: Set(None),
            authentication_token: Set(user.authentication_token.clone()),
            admin: Set(false),
            partially_registered: Set(user.partially_registered),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match User::insert(active).exec(&self.database_connection).await {
            Ok(_) => Ok(UserRecord {
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
            }),
            Err(err) => match conflict_field(&err) {
                Some(field) => Err(StoreError::Conflict(field)),
                None => Err(StoreError::Db(err)),
            },
        }
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<UserRecord, StoreError> {
        let txn = self
            .database_connection
            .begin()
            .await
            .map_err(StoreError::Db)?;

        let user = User::find_by_id(id)
            .one(&txn)
            .await
            .map_err(StoreError::Db)?
            .ok_or(StoreError::NotFound)?;

        let mut am: UserActive = user.into();
        if let Some(v) = patch.password_digest {
            am.password_digest = Set(v);
        }
        if let Some(v) = patch.activated {
            am.activated = Set(v);
        }
        if let Some(v) = patch.activated_at {
            am.activated_at = Set(v);
        }
        if let Some(v) = patch.activation_digest {
            am.activation_digest = Set(v);
        }
        if let Some(v) = patch.reset_digest {
            am.reset_digest = Set(v);
        }
        if let Some(v) = patch.reset_sent_at {
            am.reset_sent_at = Set(v);
        }
        if let Some(v) = patch.remember_digest {
            am.remember_digest = Set(v);
        }
        if let Some(v) = patch.partially_registered {
            am.partially_registered = Set(v);
        }
        am.updated_at = Set(Utc::now());

        let updated = am.update(&txn).await.map_err(StoreError::Db)?;
        txn.commit().await.map_err(StoreError::Db)?;

        Ok(to_record(updated))
    }
}
