//! The state machine for one timed attempt.
//!
//! A [`SessionEngine`] owns the question sets, the answers, the cursor and
//! the clock of a single attempt. It accepts navigation and answers while
//! active, moves to submitting on request or when the clock runs out, and
//! drains its answers through [`ExamApi`] to reach a terminal
//! [`SessionOutcome`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::answers::AnswerMap;
use super::clock::SessionClock;
use super::cursor::SessionCursor;
use super::status::{SessionStatus, StatusCell};
use crate::error::{SessionError, SessionResult, SyncError};
use crate::exam::{CompletionReport, ExamApi, Question, StartedAttempt, SubjectQuestionSet};
use crate::selection::{SessionConfig, SubjectRequest};

/// Why an attempt ended without completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The credential was lost mid-submission. The user must sign in again.
    SessionExpired,
    /// The service refused to finalize the attempt on both tries.
    CompletionRejected(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::SessionExpired => write!(f, "session expired"),
            AbortReason::CompletionRejected(msg) => write!(f, "completion rejected: {}", msg),
        }
    }
}

/// Terminal result of an attempt, for the UI layer to turn into navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed { attempt_id: String },
    Aborted { attempt_id: String, reason: AbortReason },
}

impl SessionOutcome {
    pub fn attempt_id(&self) -> &str {
        match self {
            SessionOutcome::Completed { attempt_id } => attempt_id,
            SessionOutcome::Aborted { attempt_id, .. } => attempt_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionOutcome::Completed { .. })
    }
}

/// Answered versus total questions for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectProgress {
    pub subject: String,
    pub answered: usize,
    pub total: usize,
    pub complete: bool,
}

/// Complete-call failures retried before the attempt is aborted.
const COMPLETION_RETRIES: usize = 1;

#[derive(Debug)]
pub struct SessionEngine {
    attempt_id: String,
    subjects: Vec<SubjectQuestionSet>,
    answers: AnswerMap,
    cursor: SessionCursor,
    clock: SessionClock,
    status: Arc<StatusCell>,
    duration_minutes: u32,
    outcome: Option<SessionOutcome>,
    last_error: Option<SessionError>,
}

impl SessionEngine {
    /// Build an active session.
    ///
    /// Rejects an empty subject list, repeated subject names, subjects
    /// without questions, and a zero duration.
    pub fn new(
        attempt_id: impl Into<String>,
        subjects: Vec<SubjectQuestionSet>,
        duration_minutes: u32,
    ) -> SessionResult<Self> {
        if subjects.is_empty() {
            return Err(SessionError::configuration("attempt has no subjects"));
        }
        if duration_minutes == 0 {
            return Err(SessionError::configuration(
                "duration must be at least one minute",
            ));
        }
        let mut seen = HashSet::new();
        for set in &subjects {
            if !seen.insert(set.subject.as_str()) {
                return Err(SessionError::configuration(format!(
                    "subject {} appears more than once",
                    set.subject
                )));
            }
            if set.is_empty() {
                return Err(SessionError::configuration(format!(
                    "subject {} has no questions",
                    set.subject
                )));
            }
        }

        Ok(Self {
            attempt_id: attempt_id.into(),
            cursor: SessionCursor::new(subjects.len()),
            subjects,
            answers: AnswerMap::new(),
            clock: SessionClock::from_minutes(duration_minutes),
            status: Arc::new(StatusCell::new()),
            duration_minutes,
            outcome: None,
            last_error: None,
        })
    }

    /// Build from a freshly started attempt and the configuration that
    /// requested it.
    pub fn from_attempt(attempt: StartedAttempt, config: &SessionConfig) -> SessionResult<Self> {
        Self::new(attempt.attempt_id, attempt.subjects, config.duration_minutes)
    }

    /// Replace the clock, e.g. when resuming with time already spent.
    pub fn with_clock(mut self, clock: SessionClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    /// Shared handle to the status, readable without access to the engine.
    pub fn status_cell(&self) -> Arc<StatusCell> {
        Arc::clone(&self.status)
    }

    pub fn subjects(&self) -> &[SubjectQuestionSet] {
        &self.subjects
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.clock.remaining_seconds()
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    /// Failure that left the session in submitting, if any.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn current_subject(&self) -> &SubjectQuestionSet {
        &self.subjects[self.cursor.current_subject()]
    }

    pub fn current_index(&self) -> usize {
        self.cursor.current_index()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_subject().get(self.cursor.current_index())
    }

    pub fn selected_answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id)
    }

    // =========================================================================
    // Answers
    // =========================================================================

    /// Record `answer_id` for `question_id`, overwriting any earlier choice.
    pub fn select_answer(&mut self, question_id: &str, answer_id: &str) -> SessionResult<()> {
        self.ensure_active("select an answer")?;

        let question = self
            .find_question(question_id)
            .ok_or_else(|| SessionError::configuration(format!("unknown question {}", question_id)))?;
        if !question.has_answer(answer_id) {
            return Err(SessionError::configuration(format!(
                "answer {} is not an option for question {}",
                answer_id, question_id
            )));
        }

        self.answers.record(question_id, answer_id);
        tracing::debug!(question = %question_id, answer = %answer_id, "Answer recorded");
        Ok(())
    }

    /// Answer the current question with the option at `index`.
    pub fn select_option(&mut self, index: usize) -> SessionResult<()> {
        self.ensure_active("select an answer")?;

        let (question_id, answer_id) = {
            let question = self
                .current_question()
                .ok_or_else(|| SessionError::configuration("no current question"))?;
            let answer = question.answer_at(index).ok_or_else(|| {
                SessionError::configuration(format!(
                    "question {} has no option {}",
                    question.id,
                    index + 1
                ))
            })?;
            (question.id.clone(), answer.id.clone())
        };
        self.select_answer(&question_id, &answer_id)
    }

    // =========================================================================
    // Navigation
    // =========================================================================
    // Each call returns whether the cursor moved; ignored outside `Active`.

    pub fn next_question(&mut self) -> bool {
        let next = self.cursor.current_index() + 1;
        self.move_to(next)
    }

    pub fn previous_question(&mut self) -> bool {
        match self.cursor.current_index().checked_sub(1) {
            Some(prev) => self.move_to(prev),
            None => false,
        }
    }

    pub fn jump_to_question(&mut self, index: usize) -> bool {
        self.move_to(index)
    }

    /// Make `subject` current, keeping each subject's own position.
    /// Unknown subjects and subjects without questions are ignored.
    pub fn switch_subject(&mut self, subject: &str) -> bool {
        if self.status() != SessionStatus::Active {
            return false;
        }
        match self.subjects.iter().position(|s| s.subject == subject) {
            Some(index) if !self.subjects[index].is_empty() => self.cursor.set_subject(index),
            _ => false,
        }
    }

    fn move_to(&mut self, index: usize) -> bool {
        if self.status() != SessionStatus::Active || index >= self.current_subject().len() {
            return false;
        }
        self.cursor.set_index(index)
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// One second passes. Returns true if this call forced submission.
    pub fn tick(&mut self) -> bool {
        self.elapse(1)
    }

    /// `seconds` pass at once.
    ///
    /// Expiry is checked on the level, not the edge: any call that finds the
    /// clock at zero while active requests submission, so a caller that
    /// missed the tick reaching zero still submits. The status transition
    /// keeps it to one forced submission.
    pub fn elapse(&mut self, seconds: u64) -> bool {
        if self.status() != SessionStatus::Active {
            return false;
        }
        self.clock.advance(seconds);
        if !self.clock.is_expired() {
            return false;
        }
        let forced = self.request_submit();
        if forced {
            tracing::info!(attempt_id = %self.attempt_id, "Time is up, submitting");
        }
        forced
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Move `Active -> Submitting`. Only the first caller gets true.
    pub fn request_submit(&self) -> bool {
        let won = self
            .status
            .transition(SessionStatus::Active, SessionStatus::Submitting);
        if won {
            tracing::info!(
                attempt_id = %self.attempt_id,
                answered = self.answers.len(),
                total = self.total_questions(),
                "Submitting attempt"
            );
        } else {
            tracing::debug!(status = %self.status(), "Submit already requested");
        }
        won
    }

    /// Metadata sent with the completion call.
    pub fn completion_report(&self) -> CompletionReport {
        CompletionReport {
            subjects: self
                .subjects
                .iter()
                .map(|set| SubjectRequest {
                    subject: set.subject.clone(),
                    question_count: set.len() as u32,
                })
                .collect(),
            duration_minutes: self.duration_minutes,
        }
    }

    /// Recorded answers in subject and question order.
    pub fn recorded_answers(&self) -> Vec<(String, String)> {
        self.subjects
            .iter()
            .flat_map(|set| set.questions.iter())
            .filter_map(|q| {
                self.answers
                    .get(&q.id)
                    .map(|answer| (q.id.clone(), answer.to_string()))
            })
            .collect()
    }

    /// Run the submission sequence: one record call per answer, then the
    /// completion call.
    ///
    /// Ok means the session reached a terminal state. Err means it is still
    /// submitting and the whole sequence may be run again; answers are
    /// re-sent in full on each run. Once terminal, further calls return the
    /// same outcome without touching the network.
    pub async fn submit(&mut self, api: &ExamApi) -> SessionResult<SessionOutcome> {
        match self.status() {
            SessionStatus::Submitting => {}
            SessionStatus::Active => {
                return Err(SessionError::InvalidState {
                    action: "run submission",
                    status: SessionStatus::Active,
                })
            }
            status => {
                return self.outcome.clone().ok_or(SessionError::InvalidState {
                    action: "run submission",
                    status,
                })
            }
        }

        let answers = self.recorded_answers();
        for (question_id, answer_id) in &answers {
            match api
                .submit_answer(&self.attempt_id, question_id, answer_id)
                .await
            {
                Ok(()) => tracing::debug!(question = %question_id, "Answer submitted"),
                Err(SyncError::SessionExpired) => {
                    return Ok(self.finish_aborted(AbortReason::SessionExpired))
                }
                Err(err) => return Err(self.stay_submitting(err)),
            }
        }

        let report = self.completion_report();
        let mut failures = 0;
        loop {
            match api.complete_attempt(&self.attempt_id, &report).await {
                Ok(()) => return Ok(self.finish_completed()),
                Err(SyncError::SessionExpired) => {
                    return Ok(self.finish_aborted(AbortReason::SessionExpired))
                }
                Err(err @ SyncError::Network { .. }) => return Err(self.stay_submitting(err)),
                Err(err) if failures < COMPLETION_RETRIES => {
                    failures += 1;
                    tracing::warn!(error = %err, "Completion failed, retrying once");
                }
                Err(err) => {
                    return Ok(self.finish_aborted(AbortReason::CompletionRejected(err.to_string())))
                }
            }
        }
    }

    fn stay_submitting(&mut self, err: SyncError) -> SessionError {
        tracing::warn!(attempt_id = %self.attempt_id, error = %err, "Submission interrupted");
        let err = SessionError::from(err);
        self.last_error = Some(err.clone());
        err
    }

    fn finish_completed(&mut self) -> SessionOutcome {
        self.finish(
            SessionStatus::Completed,
            SessionOutcome::Completed {
                attempt_id: self.attempt_id.clone(),
            },
        )
    }

    fn finish_aborted(&mut self, reason: AbortReason) -> SessionOutcome {
        tracing::warn!(attempt_id = %self.attempt_id, reason = %reason, "Attempt aborted");
        self.finish(
            SessionStatus::Aborted,
            SessionOutcome::Aborted {
                attempt_id: self.attempt_id.clone(),
                reason,
            },
        )
    }

    fn finish(&mut self, to: SessionStatus, outcome: SessionOutcome) -> SessionOutcome {
        self.status.transition(SessionStatus::Submitting, to);
        self.last_error = None;
        self.outcome = Some(outcome.clone());
        tracing::info!(attempt_id = %self.attempt_id, status = %to, "Attempt finished");
        outcome
    }

    // =========================================================================
    // Progress
    // =========================================================================

    fn subject_progress(&self, set: &SubjectQuestionSet) -> SubjectProgress {
        let answered = set
            .questions
            .iter()
            .filter(|q| self.answers.contains(&q.id))
            .count();
        SubjectProgress {
            subject: set.subject.clone(),
            answered,
            total: set.len(),
            complete: answered == set.len(),
        }
    }

    pub fn progress(&self) -> Vec<SubjectProgress> {
        self.subjects
            .iter()
            .map(|set| self.subject_progress(set))
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.progress().iter().map(|p| p.answered).sum()
    }

    pub fn total_questions(&self) -> usize {
        self.subjects.iter().map(SubjectQuestionSet::len).sum()
    }

    pub fn is_subject_complete(&self, subject: &str) -> bool {
        self.subjects
            .iter()
            .find(|s| s.subject == subject)
            .map(|set| self.subject_progress(set).complete)
            .unwrap_or(false)
    }

    /// Every question of every subject has an answer.
    pub fn is_submit_ready(&self) -> bool {
        self.subjects
            .iter()
            .flat_map(|set| set.questions.iter())
            .all(|q| self.answers.contains(&q.id))
    }

    fn find_question(&self, question_id: &str) -> Option<&Question> {
        self.subjects
            .iter()
            .flat_map(|set| set.questions.iter())
            .find(|q| q.id == question_id)
    }

    fn ensure_active(&self, action: &'static str) -> SessionResult<()> {
        match self.status() {
            SessionStatus::Active => Ok(()),
            status => Err(SessionError::InvalidState { action, status }),
        }
    }
}
