//! Single-flight coordination for token renewal.
//!
//! The first caller to hit an expired token becomes the leader and performs
//! the renewal; everyone arriving while it is in flight gets a receiver and
//! waits. The leader's result is handed to the waiters in arrival order.

use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::error::SyncError;

type RenewalResult = Result<String, SyncError>;

enum GateState {
    Idle,
    Renewing(Vec<oneshot::Sender<RenewalResult>>),
}

/// The only shared mutable state in the renewal path.
pub(crate) struct RenewalGate {
    state: Mutex<GateState>,
}

pub(crate) enum Ticket<'a> {
    Leader(RenewalLease<'a>),
    Follower(oneshot::Receiver<RenewalResult>),
}

impl RenewalGate {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Idle),
        }
    }

    /// Atomically become the leader, or join the renewal in flight.
    pub(crate) fn enter(&self) -> Ticket<'_> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *state {
            GateState::Idle => {
                *state = GateState::Renewing(Vec::new());
                Ticket::Leader(RenewalLease {
                    gate: self,
                    finished: false,
                })
            }
            GateState::Renewing(waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                tracing::debug!(queued = waiters.len(), "Queued behind in-flight renewal");
                Ticket::Follower(rx)
            }
        }
    }

    pub(crate) fn is_renewing(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(|e| e.into_inner()),
            GateState::Renewing(_)
        )
    }

    fn release(&self, result: RenewalResult) {
        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *state, GateState::Idle) {
                GateState::Renewing(waiters) => waiters,
                GateState::Idle => Vec::new(),
            }
        };
        for waiter in waiters {
            // A waiter whose caller went away is fine to skip.
            let _ = waiter.send(result.clone());
        }
    }
}

/// Held by the leader. Dropping it unfinished releases the waiters with a
/// network error so they never hang on a cancelled renewal.
pub(crate) struct RenewalLease<'a> {
    gate: &'a RenewalGate,
    finished: bool,
}

impl RenewalLease<'_> {
    pub(crate) fn finish(mut self, result: RenewalResult) {
        self.finished = true;
        self.gate.release(result);
    }
}

impl Drop for RenewalLease<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("Token renewal abandoned before completion");
            self.gate.release(Err(SyncError::Network {
                message: "token renewal was cancelled".to_string(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_enter_leads() {
        let gate = RenewalGate::new();
        assert!(!gate.is_renewing());
        let ticket = gate.enter();
        assert!(matches!(ticket, Ticket::Leader(_)));
        assert!(gate.is_renewing());
    }

    #[tokio::test]
    async fn test_followers_receive_leader_result_in_order() {
        let gate = RenewalGate::new();
        let Ticket::Leader(lease) = gate.enter() else {
            panic!("expected leader");
        };
        let mut receivers = Vec::new();
        for _ in 0..3 {
            match gate.enter() {
                Ticket::Follower(rx) => receivers.push(rx),
                Ticket::Leader(_) => panic!("second leader while renewing"),
            }
        }

        lease.finish(Ok("fresh".to_string()));
        assert!(!gate.is_renewing());

        for rx in receivers {
            assert_eq!(rx.await.unwrap(), Ok("fresh".to_string()));
        }
    }

    #[tokio::test]
    async fn test_failure_is_shared() {
        let gate = RenewalGate::new();
        let Ticket::Leader(lease) = gate.enter() else {
            panic!("expected leader");
        };
        let Ticket::Follower(rx) = gate.enter() else {
            panic!("expected follower");
        };
        lease.finish(Err(SyncError::SessionExpired));
        assert_eq!(rx.await.unwrap(), Err(SyncError::SessionExpired));
    }

    #[tokio::test]
    async fn test_dropped_lease_releases_waiters() {
        let gate = RenewalGate::new();
        let rx = {
            let Ticket::Leader(_lease) = gate.enter() else {
                panic!("expected leader");
            };
            let Ticket::Follower(rx) = gate.enter() else {
                panic!("expected follower");
            };
            rx
        };
        assert!(matches!(rx.await.unwrap(), Err(SyncError::Network { .. })));
        assert!(!gate.is_renewing());
    }

    #[test]
    fn test_gate_reusable_after_episode() {
        let gate = RenewalGate::new();
        if let Ticket::Leader(lease) = gate.enter() {
            lease.finish(Ok("a".to_string()));
        }
        assert!(matches!(gate.enter(), Ticket::Leader(_)));
    }
}
