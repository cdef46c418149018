//! Timed exam session engine.
//!
//! # Lifecycle
//!
//! ```text
//! active ──request_submit / clock at zero──▶ submitting ──▶ completed
//!                                                 └───────▶ aborted
//! ```
//!
//! [`SessionEngine`] is the synchronous state machine plus the async
//! submission sequence. [`SessionDriver`] puts it behind a lock and ticks
//! its clock from a Tokio task.

pub mod answers;
pub mod clock;
pub mod cursor;
pub mod driver;
pub mod engine;
pub mod status;

pub use answers::AnswerMap;
pub use clock::SessionClock;
pub use cursor::SessionCursor;
pub use driver::SessionDriver;
pub use engine::{AbortReason, SessionEngine, SessionOutcome, SubjectProgress};
pub use status::{SessionStatus, StatusCell};
