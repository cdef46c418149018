//! Pre-session exam configuration.
//!
//! [`SelectionState`] is plain storage with synchronous mutators. It keeps
//! one invariant on every call: each stored question count belongs to a
//! selected subject. Range checks on the counts happen in
//! [`SelectionState::validate`], which produces the [`SessionConfig`] used to
//! start an attempt.

use serde::Serialize;
use std::collections::HashMap;

use super::category::{ExamCategory, ExamLimits, QuestionMode};
use crate::error::{SessionError, SessionResult};

/// Default attempt length for a fresh selection.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Requested question count for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectRequest {
    pub subject: String,
    pub question_count: u32,
}

/// A validated configuration, ready to start an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub category: ExamCategory,
    pub mode: QuestionMode,
    pub duration_minutes: u32,
    pub subjects: Vec<SubjectRequest>,
}

impl SessionConfig {
    pub fn subject_names(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|s| s.subject.as_str())
    }
}

/// Exam configuration chosen before a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    category: ExamCategory,
    subjects: Vec<String>,
    mode: QuestionMode,
    counts: HashMap<String, u32>,
    duration_minutes: u32,
    limits: ExamLimits,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(ExamLimits::default())
    }
}

impl SelectionState {
    pub fn new(limits: ExamLimits) -> Self {
        Self {
            category: ExamCategory::default(),
            subjects: Vec::new(),
            mode: QuestionMode::default(),
            counts: HashMap::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            limits,
        }
    }

    pub fn category(&self) -> ExamCategory {
        self.category
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn mode(&self) -> QuestionMode {
        self.mode
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn count(&self, subject: &str) -> Option<u32> {
        self.counts.get(subject).copied()
    }

    pub fn limits(&self) -> &ExamLimits {
        &self.limits
    }

    /// Subjects still addable under the current category.
    pub fn remaining_slots(&self) -> usize {
        self.limits
            .subject_cap(self.category)
            .saturating_sub(self.subjects.len())
    }

    /// Switch category. Subjects and counts are cleared even when the
    /// category does not change.
    pub fn set_category(&mut self, category: ExamCategory) {
        self.category = category;
        self.subjects.clear();
        self.counts.clear();
    }

    /// Append `subject`. Returns false when it is already selected or the
    /// category's cap is reached.
    pub fn add_subject(&mut self, subject: impl Into<String>) -> bool {
        let subject = subject.into();
        if self.subjects.contains(&subject) || self.remaining_slots() == 0 {
            return false;
        }
        self.subjects.push(subject);
        true
    }

    /// Remove `subject` and its count. Returns false if it was not selected.
    pub fn remove_subject(&mut self, subject: &str) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|s| s != subject);
        self.counts.remove(subject);
        self.subjects.len() != before
    }

    /// Store the desired question count for a selected subject.
    ///
    /// The value is not range-checked here. Counts for subjects that are not
    /// selected are dropped so the key set never outgrows the subject list.
    pub fn set_count(&mut self, subject: &str, count: u32) -> bool {
        if !self.subjects.iter().any(|s| s == subject) {
            return false;
        }
        self.counts.insert(subject.to_string(), count);
        true
    }

    pub fn set_mode(&mut self, mode: QuestionMode) {
        self.mode = mode;
    }

    pub fn set_duration_minutes(&mut self, minutes: u32) {
        self.duration_minutes = minutes;
    }

    /// Back to the empty initial configuration. Limits are kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.limits);
    }

    /// Check the selection against the category limits and build the
    /// configuration for starting an attempt.
    pub fn validate(&self) -> SessionResult<SessionConfig> {
        if self.subjects.is_empty() {
            return Err(SessionError::configuration("no subjects selected"));
        }
        if self.duration_minutes == 0 {
            return Err(SessionError::configuration(
                "duration must be at least one minute",
            ));
        }

        let max = self.limits.max_questions(self.category);
        let subjects = self
            .subjects
            .iter()
            .map(|subject| match self.counts.get(subject) {
                None => Err(SessionError::configuration(format!(
                    "no question count set for {}",
                    subject
                ))),
                Some(&count) if count == 0 || count > max => {
                    Err(SessionError::configuration(format!(
                        "question count for {} must be between 1 and {}, got {}",
                        subject, max, count
                    )))
                }
                Some(&count) => Ok(SubjectRequest {
                    subject: subject.clone(),
                    question_count: count,
                }),
            })
            .collect::<SessionResult<Vec<_>>>()?;

        Ok(SessionConfig {
            category: self.category,
            mode: self.mode,
            duration_minutes: self.duration_minutes,
            subjects,
        })
    }
}
