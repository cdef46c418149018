//! Exam attempt endpoints.

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::model::StartedAttempt;
use crate::error::SyncResult;
use crate::selection::{SessionConfig, SubjectRequest};
use crate::sync::{RequestSpec, SyncClient};

pub const ATTEMPTS_PATH: &str = "/exam-attempts";

/// Body of the completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub subjects: Vec<SubjectRequest>,
    pub duration_minutes: u32,
}

/// Typed wrapper over the attempt endpoints. All calls go through the
/// shared [`SyncClient`], so token renewal applies to each of them.
#[derive(Clone)]
pub struct ExamApi {
    client: Arc<SyncClient>,
}

impl ExamApi {
    pub fn new(client: Arc<SyncClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<SyncClient> {
        &self.client
    }

    /// Open a new attempt and fetch its questions.
    pub async fn start_attempt(&self, config: &SessionConfig) -> SyncResult<StartedAttempt> {
        let spec = RequestSpec::post(
            ATTEMPTS_PATH,
            json!({
                "category": config.category,
                "mode": config.mode,
                "duration_minutes": config.duration_minutes,
                "subjects": config.subjects,
            }),
        );
        let attempt: StartedAttempt = self.client.request_json(&spec).await?;
        tracing::info!(
            attempt_id = %attempt.attempt_id,
            subjects = attempt.subjects.len(),
            "Exam attempt started"
        );
        Ok(attempt)
    }

    /// Record one answer. Repeated calls for a question overwrite it.
    pub async fn submit_answer(
        &self,
        attempt_id: &str,
        question_id: &str,
        answer_id: &str,
    ) -> SyncResult<()> {
        let spec = RequestSpec::post(
            format!("{}/{}/submit-answer", ATTEMPTS_PATH, attempt_id),
            json!({ "question_id": question_id, "answer_id": answer_id }),
        );
        self.client.request(&spec).await.map(|_| ())
    }

    /// Finalize the attempt.
    pub async fn complete_attempt(
        &self,
        attempt_id: &str,
        report: &CompletionReport,
    ) -> SyncResult<()> {
        let spec = RequestSpec::post(
            format!("{}/{}/complete", ATTEMPTS_PATH, attempt_id),
            json!({
                "subjects": report.subjects,
                "duration_minutes": report.duration_minutes,
            }),
        );
        self.client.request(&spec).await.map(|_| ())
    }
}

impl std::fmt::Debug for ExamApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExamApi")
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::auth::LogoutNotifier;
    use crate::selection::{ExamCategory, QuestionMode};
    use crate::error::SyncError;
    use crate::traits::Response;

    const BASE: &str = "http://exam.test/api";

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

    fn config() -> SessionConfig {
        SessionConfig {
            category: ExamCategory::Combined,
            mode: QuestionMode::Random,
            duration_minutes: 45,
            subjects: vec![SubjectRequest {
                subject: "math".to_string(),
                question_count: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_start_attempt_posts_config() {
        let http = MockHttpClient::new();
        http.set_response(
            &format!("{}/exam-attempts", BASE),
            MockResponse::Success(Response::json_body(
                201,
                &json!({
                    "attempt_id": "a1",
                    "subjects": [{"subject": "math", "questions": [
                        {"id": "q1", "text": "?", "points": 1, "answers": [{"id": "x", "text": "x"}]}
                    ]}]
                }),
            )),
        );

        let attempt = api(&http).start_attempt(&config()).await.unwrap();
        assert_eq!(attempt.attempt_id, "a1");
        assert_eq!(attempt.subjects[0].len(), 1);

        let body = http.get_requests()[0].json_body().unwrap();
        assert_eq!(body["duration_minutes"], 45);
        assert_eq!(body["subjects"][0]["question_count"], 2);
    }

    #[tokio::test]
    async fn test_submit_answer_and_complete_bodies() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::json_body(200, &json!({}))));
        let api = api(&http);

        api.submit_answer("a1", "q1", "x").await.unwrap();
        api.complete_attempt(
            "a1",
            &CompletionReport {
                subjects: config().subjects,
                duration_minutes: 45,
            },
        )
        .await
        .unwrap();

        let requests = http.get_requests();
        assert_eq!(requests[0].url, format!("{}/exam-attempts/a1/submit-answer", BASE));
        assert_eq!(
            requests[0].json_body().unwrap(),
            json!({"question_id": "q1", "answer_id": "x"})
        );
        assert_eq!(requests[1].url, format!("{}/exam-attempts/a1/complete", BASE));
        assert_eq!(
            requests[1].json_body().unwrap(),
            json!({"subjects": [{"subject": "math", "question_count": 2}], "duration_minutes": 45})
        );
    }

    #[tokio::test]
    async fn test_malformed_start_response_is_server_error() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::Success(Response::json_body(
            200,
            &json!({"unexpected": true}),
        )));

        let err = api(&http).start_attempt(&config()).await.unwrap_err();
        assert!(matches!(err, SyncError::Server { .. }));
    }
}
