//! Questions as fetched for one attempt.

use serde::Deserialize;

use crate::auth::api::string_or_number;

pub type QuestionId = String;
pub type AnswerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerOption {
    #[serde(deserialize_with = "string_or_number")]
    pub id: AnswerId,
    pub text: String,
}

/// One multiple-choice question. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "string_or_number")]
    pub id: QuestionId,
    pub text: String,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default)]
    pub answers: Vec<AnswerOption>,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// Answer option at `index` in display order.
    pub fn answer_at(&self, index: usize) -> Option<&AnswerOption> {
        self.answers.get(index)
    }

    pub fn has_answer(&self, answer_id: &str) -> bool {
        self.answers.iter().any(|a| a.id == answer_id)
    }
}

/// Ordered questions for one subject in one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubjectQuestionSet {
    pub subject: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl SubjectQuestionSet {
    pub fn new(subject: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            subject: subject.into(),
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

/// Server response to starting an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedAttempt {
    #[serde(deserialize_with = "string_or_number")]
    pub attempt_id: String,
    pub subjects: Vec<SubjectQuestionSet>,
}
