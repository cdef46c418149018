//! Authentication state for the exam client.
//!
//! - Credential records and their JSON file store
//! - Account endpoint wire types
//! - [`AuthSession`], the in-memory auth-state holder
//! - [`LogoutNotifier`], the observer told about involuntary session loss

pub mod api;
pub mod credentials;
pub mod logout;
pub mod session;

pub use credentials::{CachedUser, Credentials, CredentialsManager};
pub use logout::{HandlerId, LogoutNotifier, LogoutReason};
pub use session::AuthSession;
