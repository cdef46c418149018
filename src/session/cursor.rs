//! Navigation position across subjects.

/// Current subject plus one question index per subject.
///
/// Indices are kept per subject, so switching away and back lands on the
/// question the user left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCursor {
    current_subject: usize,
    indices: Vec<usize>,
}

impl SessionCursor {
    pub fn new(subject_count: usize) -> Self {
        Self {
            current_subject: 0,
            indices: vec![0; subject_count],
        }
    }

    pub fn current_subject(&self) -> usize {
        self.current_subject
    }

    /// Question index within the current subject.
    pub fn current_index(&self) -> usize {
        self.index_for(self.current_subject)
    }

    pub fn index_for(&self, subject: usize) -> usize {
        self.indices.get(subject).copied().unwrap_or(0)
    }

    pub(crate) fn set_subject(&mut self, subject: usize) -> bool {
        if subject >= self.indices.len() || subject == self.current_subject {
            return false;
        }
        self.current_subject = subject;
        true
    }

    pub(crate) fn set_index(&mut self, index: usize) -> bool {
        match self.indices.get_mut(self.current_subject) {
            Some(slot) if *slot != index => {
                *slot = index;
                true
            }
            _ => false,
        }
    }
}
