//! Authenticator SDK
//!
//! This crate provides the public contracts of the `authenticator` module:
//!
//! - [`Strategy`] - Plugin API trait implemented by credential verifiers
//! - [`Outcome`] - Write-once accept/reject/error surface handed to one attempt
//! - [`Session`] - Collaborator that receives the authenticated principal
//! - [`Transform`] - Auth-info transform participants
//! - [`Verdict`], [`Rejection`], [`Failure`] - Result models
//! - [`AuthenticatorError`] - Error types
//!
//! ## Usage
//!
//! Strategies report exactly one outcome per attempt:
//!
//! ```ignore
//! use authenticator_sdk::{CallOptions, Outcome, Strategy};
//!
//! #[async_trait::async_trait]
//! impl Strategy<MyCredentials> for TokenStrategy {
//!     fn name(&self) -> Option<&str> {
//!         Some("token")
//!     }
//!
//!     async fn attempt(
//!         &self,
//!         credentials: &MyCredentials,
//!         _options: &CallOptions,
//!         outcome: Outcome,
//!     ) {
//!         match self.lookup(&credentials.token).await {
//!             Ok(Some(user)) => outcome.accept(user),
//!             Ok(None) => outcome.reject(Some("invalid token".into()), None),
//!             Err(e) => outcome.error(e),
//!         }
//!     }
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;
pub mod session;
pub mod transform;

// Re-export main types at crate root
pub use api::{Credentials, Outcome, PasswordCredentials, Strategy, StrategyOutcome};
pub use error::{AuthenticatorError, BoxError};
pub use models::{
    AuthInfo, CallOptions, Challenge, DEFAULT_ASSIGN_PROPERTY, DEFAULT_FAILURE_STATUS,
    DEFAULT_USER_PROPERTY, Failure, Principal, Rejection, Verdict,
};
pub use session::{LoginOptions, Session};
pub use transform::{Transform, TransformStep};
