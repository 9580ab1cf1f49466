use tracing::info;

use crate::types::mail::Notification;

/// Outbound notification dispatch, fire-and-forget. The lifecycle emits an
/// event and moves on; delivery failure is the dispatcher's problem and must
/// never roll back a credential change.
pub trait Notifier: Send + Sync {
    fn send(&self, notification: Notification);
}

/// Dispatcher that just logs the event. Stands in wherever no real mail
/// backend is wired up; the payload carries everything a template needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: Notification) {
        // do NOT log the plaintext token
        let mut logged = notification;
        if logged.token.is_some() {
            logged.token = Some("<redacted>".to_string());
        }
        let payload =
            serde_json::to_string(&logged).unwrap_or_else(|_| format!("{logged:?}"));
        info!(kind = %logged.kind, email = %logged.email, "notification: {payload}");
    }
}
