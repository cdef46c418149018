//! Startup: configuration, wiring, and sign-in.
//!
//! - [`config`] - [`ClientConfig`] from defaults and `PREPEXAM_*` variables
//! - [`context`] - [`AppContext`], the composition root
//! - [`auth`] - restore the stored session or prompt for a login
//!
//! ```ignore
//! use prepexam::startup::{AppContext, ClientConfig, ensure_signed_in};
//!
//! let ctx = AppContext::from_config(ClientConfig::from_env()?)?;
//! let signed_in = ensure_signed_in(&ctx.auth, &mut prompt).await?;
//! ```

pub mod auth;
pub mod config;
pub mod context;

pub use auth::{ensure_signed_in, LoginInput, LoginPrompt, SignIn, MAX_LOGIN_ATTEMPTS};
pub use config::{ClientConfig, ConfigError};
pub use context::{AppContext, StartupError};
