//! Common test utilities for integration tests.
//!
//! ```ignore
//! let fx = TestClient::new(MockHttpConfig::new().with_default_success().build())
//!     .with_stored_token("old");
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use prepexam::auth::{Credentials, LogoutNotifier, LogoutReason};
use prepexam::exam::{AnswerOption, ExamApi, Question, SubjectQuestionSet};
use prepexam::sync::SyncClient;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://exam.test/api";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

/// Sync client over mocks, with every logout notification recorded.
pub struct TestClient {
    pub http: MockHttpClient,
    pub store: InMemoryCredentials,
    pub client: Arc<SyncClient>,
    pub logouts: Arc<Mutex<Vec<LogoutReason>>>,
}

impl TestClient {
    pub fn new(http: MockHttpClient) -> Self {
        let store = InMemoryCredentials::new();
        let notifier = Arc::new(LogoutNotifier::new());
        let logouts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&logouts);
        notifier.register(move |reason| sink.lock().unwrap().push(reason));

        let client = Arc::new(SyncClient::new(
            Arc::new(http.clone()),
            BASE_URL,
            Arc::new(store.clone()),
            notifier,
        ));
        Self {
            http,
            store,
            client,
            logouts,
        }
    }

    /// Token both in memory and in the store.
    pub fn with_stored_token(self, token: &str) -> Self {
        self.store
            .set_credentials(Some(Credentials::new(token, None)));
        self.client.set_token(Some(token.to_string()));
        self
    }

    pub fn exam_api(&self) -> ExamApi {
        ExamApi::new(Arc::clone(&self.client))
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.lock().unwrap().len()
    }
}

/// Question `id` with four options `{id}a`..`{id}d`.
pub fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {}", id),
        points: 1,
        answers: ["a", "b", "c", "d"]
            .iter()
            .map(|opt| AnswerOption {
                id: format!("{}{}", id, opt),
                text: opt.to_uppercase(),
            })
            .collect(),
    }
}

pub fn subject(name: &str, ids: &[&str]) -> SubjectQuestionSet {
    SubjectQuestionSet::new(name, ids.iter().map(|id| question(id)).collect())
}

/// JSON for a started attempt, as the service returns it.
pub fn started_attempt_json(attempt_id: &str, subjects: &[(&str, &[&str])]) -> serde_json::Value {
    serde_json::json!({
        "attempt_id": attempt_id,
        "subjects": subjects.iter().map(|(name, ids)| serde_json::json!({
            "subject": name,
            "questions": ids.iter().map(|id| serde_json::json!({
                "id": id,
                "text": format!("Question {}", id),
                "points": 1,
                "answers": (["a", "b", "c", "d"].iter().map(|o| serde_json::json!({
                    "id": format!("{}{}", id, o),
                    "text": o.to_uppercase(),
                })).collect::<Vec<_>>()),
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
    })
}
