//! Runs a [`SessionEngine`] against wall time.
//!
//! The driver owns the only scheduler for the engine's clock: one spawned
//! task that ticks it every interval and runs the submission sequence when
//! the clock forces it. User input goes through the same lock, so ticks and
//! input never interleave inside an engine call.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;

use super::engine::{SessionEngine, SessionOutcome};
use super::status::{SessionStatus, StatusCell};
use crate::error::SessionResult;
use crate::exam::ExamApi;

pub struct SessionDriver {
    engine: Arc<Mutex<SessionEngine>>,
    api: ExamApi,
    status: Arc<StatusCell>,
    outcome_tx: Arc<watch::Sender<Option<SessionOutcome>>>,
    ticker: JoinHandle<()>,
}

impl SessionDriver {
    /// Start ticking `engine` once per `tick`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(engine: SessionEngine, api: ExamApi, tick: Duration) -> Self {
        let status = engine.status_cell();
        let engine = Arc::new(Mutex::new(engine));
        let (outcome_tx, _) = watch::channel(None);
        let outcome_tx = Arc::new(outcome_tx);

        let ticker = spawn_ticker(
            Arc::clone(&engine),
            api.clone(),
            Arc::clone(&outcome_tx),
            tick,
        );

        Self {
            engine,
            api,
            status,
            outcome_tx,
            ticker,
        }
    }

    /// Status without waiting for the engine lock.
    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    /// Exclusive access to the engine for input and rendering.
    pub async fn engine(&self) -> MutexGuard<'_, SessionEngine> {
        self.engine.lock().await
    }

    /// Terminal outcome, published once.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionOutcome>> {
        self.outcome_tx.subscribe()
    }

    /// Request submission and run (or re-run) the submission sequence.
    ///
    /// Safe to call while the clock is forcing submission: only one caller
    /// moves the session out of active, and once terminal the stored
    /// outcome is returned without new calls.
    pub async fn submit(&self) -> SessionResult<SessionOutcome> {
        let mut engine = self.engine.lock().await;
        engine.request_submit();
        let outcome = engine.submit(&self.api).await?;
        drop(engine);
        publish(&self.outcome_tx, &outcome);
        Ok(outcome)
    }

    /// Wait until the session reaches a terminal state.
    pub async fn wait_for_outcome(&self) -> Option<SessionOutcome> {
        let mut rx = self.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if current.is_some() {
                return current;
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        // A submission already under way runs to its end.
        if self.status() == SessionStatus::Active {
            self.ticker.abort();
        }
    }
}

fn publish(tx: &watch::Sender<Option<SessionOutcome>>, outcome: &SessionOutcome) {
    tx.send_if_modified(|current| {
        if current.is_some() {
            return false;
        }
        *current = Some(outcome.clone());
        true
    });
}

fn spawn_ticker(
    engine: Arc<Mutex<SessionEngine>>,
    api: ExamApi,
    outcome_tx: Arc<watch::Sender<Option<SessionOutcome>>>,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Session clock started (tick: {:?})", tick);

        let mut interval = tokio::time::interval(tick);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let mut engine = engine.lock().await;
            if engine.status() != SessionStatus::Active {
                break;
            }
            if !engine.tick() {
                continue;
            }

            match engine.submit(&api).await {
                Ok(outcome) => {
                    drop(engine);
                    publish(&outcome_tx, &outcome);
                }
                Err(e) => {
                    tracing::warn!("Forced submission interrupted, waiting for retry: {}", e);
                }
            }
            break;
        }

        tracing::debug!("Session clock stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::auth::LogoutNotifier;
    use crate::exam::{AnswerOption, Question, SubjectQuestionSet};
    use crate::session::SessionClock;
    use crate::sync::SyncClient;
    use crate::traits::{HttpError, Response};
    use serde_json::json;

    const BASE: &str = "http://exam.test/api";
    const TICK: Duration = Duration::from_millis(2);

    fn api(http: &MockHttpClient) -> ExamApi {
        let client = SyncClient::new(
            Arc::new(http.clone()),
            BASE,
            Arc::new(InMemoryCredentials::new()),
            Arc::new(LogoutNotifier::new()),
        );
        client.set_token(Some("tok".to_string()));
        ExamApi::new(Arc::new(client))
    }

    fn engine(seconds: u64) -> SessionEngine {
        let questions = (1..=3)
            .map(|i| Question {
                id: format!("q{}", i),
                text: String::new(),
                points: 1,
                answers: vec![AnswerOption {
                    id: format!("q{}a", i),
                    text: "a".to_string(),
                }],
            })
            .collect();
        SessionEngine::new("a1", vec![SubjectQuestionSet::new("math", questions)], 1)
            .unwrap()
            .with_clock(SessionClock::from_seconds(seconds))
    }

    fn http_ok() -> MockHttpClient {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::json_body(200, &json!({}))));
        http
    }

    #[tokio::test]
    async fn test_clock_expiry_completes_attempt() {
        let http = http_ok();
        let mut engine = engine(3);
        engine.select_answer("q2", "q2a").unwrap();
        let driver = SessionDriver::start(engine, api(&http), TICK);

        let outcome = tokio::time::timeout(Duration::from_secs(5), driver.wait_for_outcome())
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.is_completed());
        assert_eq!(driver.status(), SessionStatus::Completed);
        assert_eq!(driver.engine().await.remaining_seconds(), 0);
        assert_eq!(http.requests_to("/submit-answer").len(), 1);
        assert_eq!(http.requests_to("/complete").len(), 1);
    }

    #[tokio::test]
    async fn test_manual_submit_racing_clock_completes_once() {
        let http = http_ok();
        let driver = SessionDriver::start(engine(1), api(&http), Duration::from_millis(1));

        let outcome = driver.submit().await.unwrap();
        assert!(outcome.is_completed());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(http.requests_to("/complete").len(), 1);
        assert_eq!(driver.wait_for_outcome().await, Some(outcome));
    }

    #[tokio::test]
    async fn test_concurrent_manual_submits_complete_once() {
        let http = http_ok();
        let driver = SessionDriver::start(engine(600), api(&http), TICK);

        let (first, second) = tokio::join!(driver.submit(), driver.submit());
        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(http.requests_to("/complete").len(), 1);
    }

    #[tokio::test]
    async fn test_forced_submit_failure_allows_manual_retry() {
        let http = http_ok();
        http.push_response(
            &format!("{}/exam-attempts/a1/complete", BASE),
            MockResponse::Error(HttpError::ConnectionFailed("offline".to_string())),
        );
        let driver = SessionDriver::start(engine(1), api(&http), TICK);

        tokio::time::timeout(Duration::from_secs(5), async {
            while http.requests_to("/complete").is_empty() {
                tokio::time::sleep(TICK).await;
            }
        })
        .await
        .unwrap();
        // Wait for the ticker to release the engine.
        let last_error = driver.engine().await.last_error().cloned();
        assert!(last_error.is_some());
        assert_eq!(driver.status(), SessionStatus::Submitting);

        let outcome = driver.submit().await.unwrap();
        assert!(outcome.is_completed());
        assert_eq!(http.requests_to("/complete").len(), 2);
    }

    #[tokio::test]
    async fn test_input_goes_through_engine_lock() {
        let http = http_ok();
        let driver = SessionDriver::start(engine(600), api(&http), TICK);

        driver.engine().await.select_answer("q1", "q1a").unwrap();
        assert_eq!(driver.engine().await.answered_count(), 1);
        assert_eq!(driver.status(), SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_drop_while_active_stops_clock() {
        let http = http_ok();
        let engine = engine(1);
        let status = engine.status_cell();
        let driver = SessionDriver::start(engine, api(&http), TICK);
        drop(driver);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(status.get(), SessionStatus::Active);
        assert!(http.get_requests().is_empty());
    }
}
