//! prepexam - client core for timed multi-subject practice exams.
//!
//! - [`sync`] - authenticated requests with single-flight token renewal
//! - [`auth`] - credential store, auth session, logout observer
//! - [`selection`] - exam configuration before an attempt
//! - [`exam`] - questions and the attempt endpoints
//! - [`session`] - the timed session engine and its driver
//! - [`startup`] - configuration and wiring
//!
//! This library also exposes modules for use in integration tests.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod cli_output;
pub mod error;
pub mod exam;
pub mod selection;
pub mod session;
pub mod startup;
pub mod sync;
pub mod traits;
