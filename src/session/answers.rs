//! Selected answers for one attempt.

use std::collections::HashMap;

use crate::exam::{AnswerId, QuestionId};

/// Question id to selected answer id.
///
/// Entries are overwritten but never removed while the session lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    entries: HashMap<QuestionId, AnswerId>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `answer` for `question`, returning the previous selection.
    pub fn record(
        &mut self,
        question: impl Into<QuestionId>,
        answer: impl Into<AnswerId>,
    ) -> Option<AnswerId> {
        self.entries.insert(question.into(), answer.into())
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    pub fn contains(&self, question: &str) -> bool {
        self.entries.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(q, a)| (q.as_str(), a.as_str()))
    }
}
