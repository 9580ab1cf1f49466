use tracing::{info, warn};
use uuid::Uuid;

use crate::config::HashCost;
use crate::db::store::UserStore;
use crate::types::error::{AuthError, StoreError, UniqueField};
use crate::types::mail::{EventKind, Notification};
use crate::types::user::{NewUserRecord, RegisterUser, Registration, UserPatch, UserRecord};
use crate::utils::clock::Clock;
use crate::utils::mail::Notifier;
use crate::utils::token::{new_auth_token, new_token, Hasher, TokenKind, MAX_TOKEN_ATTEMPTS};

/// Account lifecycle orchestration: registration, activation, password
/// reset, remembered sessions. Generic over the store, the notification
/// dispatcher, and the clock so every flow is deterministic under test.
pub struct Accounts<S, N, C> {
    store: S,
    notifier: N,
    clock: C,
    hasher: Hasher,
}

impl<S, N, C> Accounts<S, N, C>
where
    S: UserStore,
    N: Notifier,
    C: Clock,
{
    pub fn new(store: S, notifier: N, clock: C, cost: &HashCost) -> Result<Self, AuthError> {
        let hasher = Hasher::new(cost).map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self {
            store,
            notifier,
            clock,
            hasher,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn digest(&self, secret: &str) -> Result<String, AuthError> {
        self.hasher
            .digest(secret)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Register a new account.
    ///
    /// A duplicate email fails with a field error unless the existing row is
    /// only partially registered (created by an invite, never claimed); that
    /// case completes the registration and emits `invite_existing` instead
    /// of `invite_new`.
    pub async fn register(&self, candidate: RegisterUser) -> Result<Registration, AuthError> {
        let errors = candidate.validate();
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }
        let email = candidate.normalized_email();

        if let Some(existing) = self.store.find_by_email(&email).await? {
            if !existing.partially_registered {
                return Err(AuthError::validation("email", "has already been taken"));
            }
            return self.claim_partial_registration(existing, &candidate).await;
        }

        self.create_user(email, &candidate).await
    }

    async fn create_user(
        &self,
        email: String,
        candidate: &RegisterUser,
    ) -> Result<Registration, AuthError> {
        let password_digest = self.digest(&candidate.password)?;
        // Activation digest is minted before the row exists; the plaintext
        // token only ever lives in the returned Registration and the event.
        let activation_token = new_token();
        let activation_digest = self.digest(&activation_token)?;
        let id = Uuid::new_v4();

        let mut attempts = 0;
        let user = loop {
            if attempts >= MAX_TOKEN_ATTEMPTS {
                warn!(%email, attempts, "authentication token generation exhausted retries");
                return Err(AuthError::TokenCollisionExhausted);
            }
            attempts += 1;

            // Fresh token each attempt; the insert itself is the uniqueness
            // check, a prior read proves nothing under concurrency.
            match self
                .store
                .insert_unique(NewUserRecord {
                    id,
                    email: email.clone(),
                    password_digest: password_digest.clone(),
                    activation_digest: activation_digest.clone(),
                    authentication_token: new_auth_token(),
                    partially_registered: false,
                })
                .await
            {
                Ok(user) => break user,
                Err(StoreError::Conflict(UniqueField::AuthToken)) => continue,
                Err(e) => return Err(e.into()),
            }
        };

        info!(user_id = %user.id, "registered new user");
        self.notifier.send(Notification {
            kind: EventKind::InviteNew,
            user_id: user.id,
            email: user.email.clone(),
            token: Some(activation_token.clone()),
        });

        Ok(Registration {
            user,
            activation_token,
        })
    }

    async fn claim_partial_registration(
        &self,
        existing: UserRecord,
        candidate: &RegisterUser,
    ) -> Result<Registration, AuthError> {
        let password_digest = self.digest(&candidate.password)?;
        let activation_token = new_token();
        let activation_digest = self.digest(&activation_token)?;

        let user = self
            .store
            .update(
                existing.id,
                UserPatch {
                    password_digest: Some(password_digest),
                    activation_digest: Some(Some(activation_digest)),
                    partially_registered: Some(false),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user.id, "claimed partially registered user");
        self.notifier.send(Notification {
            kind: EventKind::InviteExisting,
            user_id: user.id,
            email: user.email.clone(),
            token: Some(activation_token.clone()),
        });

        Ok(Registration {
            user,
            activation_token,
        })
    }

    /// Exchange an activation token for an activated account.
    pub async fn activate(&self, user_id: Uuid, token: &str) -> Result<UserRecord, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !self.authenticate(&user, TokenKind::Activation, token) {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .store
            .update(
                user_id,
                UserPatch {
                    activated: Some(true),
                    activated_at: Some(Some(self.clock.now())),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user.id, "account activated");
        Ok(user)
    }

    /// Re-issue the activation token for a not-yet-activated account and
    /// dispatch an activation event. The previous token stops verifying;
    /// plaintext tokens are never retained so resending means re-minting.
    pub async fn resend_activation(&self, email: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AuthError::NotFound)?;
        if user.activated {
            return Err(AuthError::validation("email", "is already activated"));
        }

        let token = new_token();
        let digest = self.digest(&token)?;
        self.store
            .update(
                user.id,
                UserPatch {
                    activation_digest: Some(Some(digest)),
                    ..Default::default()
                },
            )
            .await?;

        self.notifier.send(Notification {
            kind: EventKind::Activation,
            user_id: user.id,
            email: user.email,
            token: Some(token.clone()),
        });

        Ok(token)
    }

    /// Issue a reset token: digest and timestamp land in one update so a
    /// concurrent reader never sees the pair half-written.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AuthError::NotFound)?;

        let token = new_token();
        let digest = self.digest(&token)?;
        let sent_at = self.clock.now();

        self.store
            .update(
                user.id,
                UserPatch {
                    reset_digest: Some(Some(digest)),
                    reset_sent_at: Some(Some(sent_at)),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user.id, "password reset requested");
        self.notifier.send(Notification {
            kind: EventKind::PasswordReset,
            user_id: user.id,
            email: user.email,
            token: Some(token.clone()),
        });

        Ok(token)
    }

    /// Redeem a reset token. Expiry is checked before the digest so a
    /// correct-but-stale token reports `Expired`, not `InvalidToken`.
    /// Clearing the reset pair on success makes the token single-use.
    pub async fn reset_password(
        &self,
        user_id: Uuid,
        token: &str,
        new_password: &str,
    ) -> Result<UserRecord, AuthError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        let Some(sent_at) = user.reset_sent_at else {
            return Err(AuthError::InvalidToken);
        };
        if let Some(ttl) = TokenKind::Reset.ttl() {
            if self.clock.now() - sent_at > ttl {
                return Err(AuthError::Expired);
            }
        }
        if !self.authenticate(&user, TokenKind::Reset, token) {
            return Err(AuthError::InvalidToken);
        }

        let probe = RegisterUser {
            email: user.email.clone(),
            password: new_password.to_string(),
        };
        let errors: Vec<_> = probe
            .validate()
            .into_iter()
            .filter(|e| e.field == "password")
            .collect();
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let password_digest = self.digest(new_password)?;
        let user = self
            .store
            .update(
                user_id,
                UserPatch {
                    password_digest: Some(password_digest),
                    reset_digest: Some(None),
                    reset_sent_at: Some(None),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user.id, "password reset completed");
        Ok(user)
    }

    /// Issue a remember token for persistent sessions. No server-side
    /// expiry; the client controls its lifetime.
    pub async fn remember(&self, user_id: Uuid) -> Result<String, AuthError> {
        let token = new_token();
        let digest = self.digest(&token)?;

        self.store
            .update(
                user_id,
                UserPatch {
                    remember_digest: Some(Some(digest)),
                    ..Default::default()
                },
            )
            .await?;

        Ok(token)
    }

    /// Drop the remember digest; any outstanding remember token stops
    /// verifying.
    pub async fn forget(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.store
            .update(
                user_id,
                UserPatch {
                    remember_digest: Some(None),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Verify a presented token against whichever digest column the kind
    /// maps to. A missing digest is a plain `false`, never an error.
    pub fn authenticate(&self, user: &UserRecord, kind: TokenKind, token: &str) -> bool {
        let digest = match kind {
            TokenKind::Activation => user.activation_digest.as_deref(),
            TokenKind::Reset => user.reset_digest.as_deref(),
            TokenKind::Remember => user.remember_digest.as_deref(),
        };
        match digest {
            Some(d) => self.hasher.verify(token, d),
            None => false,
        }
    }

    /// Password check against the stored password digest.
    pub fn verify_password(&self, user: &UserRecord, password: &str) -> bool {
        self.hasher.verify(password, &user.password_digest)
    }

    /// Resolve an API authentication token to its user, if any.
    pub async fn identify(&self, auth_token: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self.store.find_by_auth_token(auth_token).await?)
    }
}
