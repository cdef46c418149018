//! Exam selection: what the user picks before an attempt starts.
//!
//! - [`ExamCategory`] decides how many subjects fit in one attempt
//! - [`SelectionState`] stores subjects, per-subject counts, mode and duration
//! - [`SelectionState::validate`] turns a selection into a [`SessionConfig`]
//!
//! ```ignore
//! use prepexam::selection::{ExamCategory, SelectionState};
//!
//! let mut selection = SelectionState::default();
//! selection.set_category(ExamCategory::Combined);
//! selection.add_subject("math");
//! selection.set_count("math", 20);
//! let config = selection.validate()?;
//! ```

pub mod category;
pub mod state;

pub use category::{ExamCategory, ExamLimits, QuestionMode};
pub use state::{SelectionState, SessionConfig, SubjectRequest, DEFAULT_DURATION_MINUTES};
