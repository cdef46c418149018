//! Exam content and the attempt endpoints.

pub mod api;
pub mod model;

pub use api::{CompletionReport, ExamApi, ATTEMPTS_PATH};
pub use model::{AnswerId, AnswerOption, Question, QuestionId, StartedAttempt, SubjectQuestionSet};
