//! Exam categories, question ordering modes, and their limits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of exam the user is configuring.
///
/// The category decides how many subjects one attempt may cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamCategory {
    /// Several subjects in one timed attempt.
    #[default]
    Combined,
    /// Exactly one subject.
    Single,
}

impl ExamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamCategory::Combined => "combined",
            ExamCategory::Single => "single",
        }
    }
}

impl fmt::Display for ExamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the server picks and orders questions for each subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    #[default]
    Random,
    Ordered,
}

impl QuestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionMode::Random => "random",
            QuestionMode::Ordered => "ordered",
        }
    }
}

impl std::str::FromStr for QuestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(QuestionMode::Random),
            "ordered" => Ok(QuestionMode::Ordered),
            other => Err(format!("unknown question mode '{}'", other)),
        }
    }
}

impl fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category caps on subjects and questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamLimits {
    pub combined_subject_cap: usize,
    pub single_subject_cap: usize,
    pub combined_max_questions: u32,
    pub single_max_questions: u32,
}

impl Default for ExamLimits {
    fn default() -> Self {
        Self {
            combined_subject_cap: 4,
            single_subject_cap: 1,
            combined_max_questions: 50,
            single_max_questions: 100,
        }
    }
}

impl ExamLimits {
    /// Most subjects one attempt in `category` may include.
    pub fn subject_cap(&self, category: ExamCategory) -> usize {
        match category {
            ExamCategory::Combined => self.combined_subject_cap,
            ExamCategory::Single => self.single_subject_cap,
        }
    }

    /// Largest question count allowed for one subject in `category`.
    pub fn max_questions(&self, category: ExamCategory) -> u32 {
        match category {
            ExamCategory::Combined => self.combined_max_questions,
            ExamCategory::Single => self.single_max_questions,
        }
    }
}
