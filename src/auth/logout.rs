//! Logout observer registration.
//!
//! The sync client reports involuntary session loss (renewal refused) to
//! whoever is currently registered here. Exactly one handler is active at a
//! time; registering again replaces it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Why the session was ended without the user asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutReason {
    /// The server refused to renew the access token.
    RenewalRejected { status: u16 },
    /// A request failed authentication right after a successful renewal.
    TokenRejectedAfterRenewal,
    /// A request failed authentication and no token was available to renew.
    NoCredential,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoutReason::RenewalRejected { status } => {
                write!(f, "token renewal rejected (HTTP {})", status)
            }
            LogoutReason::TokenRejectedAfterRenewal => {
                write!(f, "renewed token was rejected")
            }
            LogoutReason::NoCredential => write!(f, "no credential to renew"),
        }
    }
}

/// Identifies one registration so a consumer can only remove itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type LogoutHandler = Arc<dyn Fn(LogoutReason) + Send + Sync>;

/// Single-subscriber logout observer owned by the composition root.
#[derive(Default)]
pub struct LogoutNotifier {
    next_id: AtomicU64,
    active: Mutex<Option<(HandlerId, LogoutHandler)>>,
}

impl LogoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`, replacing any previous one.
    pub fn register<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(LogoutReason) + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.is_some() {
            tracing::debug!("Replacing registered logout handler");
        }
        *active = Some((id, Arc::new(handler)));
        id
    }

    /// Remove the handler registered under `id`.
    ///
    /// Returns `false` if `id` has since been replaced by another
    /// registration, in which case nothing changes.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        match active.as_ref() {
            Some((current, _)) if *current == id => {
                *active = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a handler is currently registered.
    pub fn has_handler(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Invoke the active handler. Returns whether one ran.
    pub fn notify(&self, reason: LogoutReason) -> bool {
        // Clone out so the handler can re-register without deadlocking.
        let handler = self
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, h)| Arc::clone(h));

        match handler {
            Some(handler) => {
                tracing::info!(%reason, "Dispatching logout");
                handler(reason);
                true
            }
            None => {
                tracing::warn!(%reason, "Session lost with no logout handler registered");
                false
            }
        }
    }
}

impl fmt::Debug for LogoutNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoutNotifier")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(LogoutReason) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_notify_without_handler() {
        let notifier = LogoutNotifier::new();
        assert!(!notifier.has_handler());
        assert!(!notifier.notify(LogoutReason::NoCredential));
    }

    #[test]
    fn test_notify_invokes_handler() {
        let notifier = LogoutNotifier::new();
        let (count, handler) = counter();
        notifier.register(handler);

        assert!(notifier.notify(LogoutReason::RenewalRejected { status: 401 }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_replaces_previous() {
        let notifier = LogoutNotifier::new();
        let (first, h1) = counter();
        let (second, h2) = counter();
        notifier.register(h1);
        notifier.register(h2);

        notifier.notify(LogoutReason::NoCredential);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_unregister_keeps_replacement() {
        let notifier = LogoutNotifier::new();
        let (_, h1) = counter();
        let (second, h2) = counter();
        let old = notifier.register(h1);
        let new = notifier.register(h2);

        assert!(!notifier.unregister(old));
        assert!(notifier.has_handler());
        notifier.notify(LogoutReason::NoCredential);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        assert!(notifier.unregister(new));
        assert!(!notifier.has_handler());
    }

    #[test]
    fn test_handler_may_reregister() {
        let notifier = Arc::new(LogoutNotifier::new());
        let inner = Arc::clone(&notifier);
        notifier.register(move |_| {
            inner.register(|_| {});
        });
        assert!(notifier.notify(LogoutReason::NoCredential));
        assert!(notifier.has_handler());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(
            LogoutReason::RenewalRejected { status: 403 }.to_string(),
            "token renewal rejected (HTTP 403)"
        );
    }
}
