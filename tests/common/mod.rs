#![allow(dead_code)] // not every helper is used by every test binary

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use roster_auth::accounts::Accounts;
use roster_auth::config::HashCost;
use roster_auth::db::MemoryStore;
use roster_auth::types::mail::Notification;
use roster_auth::types::user::UserRecord;
use roster_auth::utils::clock::Clock;
use roster_auth::utils::mail::Notifier;

/// Deterministic clock shared between the test and the accounts service.
#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Utc::now())))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Captures dispatched notifications instead of delivering anything.
#[derive(Clone, Default)]
pub struct CaptureNotifier(Arc<Mutex<Vec<Notification>>>);

impl CaptureNotifier {
    pub fn events(&self) -> Vec<Notification> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl Notifier for CaptureNotifier {
    fn send(&self, notification: Notification) {
        self.0.lock().unwrap().push(notification);
    }
}

pub struct TestContext {
    pub accounts: Accounts<MemoryStore, CaptureNotifier, FixedClock>,
    pub notifier: CaptureNotifier,
    pub clock: FixedClock,
}

impl TestContext {
    pub fn new() -> Self {
        let notifier = CaptureNotifier::default();
        let clock = FixedClock::new();
        let accounts = Accounts::new(
            MemoryStore::new(),
            notifier.clone(),
            clock.clone(),
            &HashCost::fast(),
        )
        .expect("accounts service");
        TestContext {
            accounts,
            notifier,
            clock,
        }
    }
}

pub mod test_data {
    use super::*;
    use roster_auth::types::user::RegisterUser;

    pub fn sample_candidate() -> RegisterUser {
        RegisterUser {
            email: "test@example.com".to_string(),
            password: "a sound password".to_string(),
        }
    }

    pub fn candidate(email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// A user row created by a team invite: no usable password yet, not
    /// activated, flagged partially registered.
    pub fn partially_registered(email: &str) -> UserRecord {
        let now = Utc::now();
        let id = Uuid::new_v4();
        UserRecord {
            id,
            email: email.to_string(),
            password_digest: String::new(),
            activated: false,
            activated_at: None,
            activation_digest: None,
            reset_digest: None,
            reset_sent_at: None,
            remember_digest: None,
            authentication_token: format!("tok_seeded_{id}"),
            admin: false,
            partially_registered: true,
            created_at: now,
            updated_at: now,
        }
    }
}
