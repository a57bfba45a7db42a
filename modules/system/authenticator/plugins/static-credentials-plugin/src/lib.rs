#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Credentials Strategy Plugin
//!
//! Verifies username/password pairs against a table loaded from configuration.
//! Intended for development, tests, and small fixed deployments.
//!
//! ## Modes
//!
//! - **`static_users`** (default): Accepts a username/password pair that matches
//!   a configured user. The principal is `{ "username": .., ..attributes }`.
//!
//! - **`accept_all`**: Accepts any non-empty username regardless of password.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_credentials_plugin:
//!     config:
//!       name: "static-credentials"
//!       mode: static_users
//!       users:
//!         - username: "bob"
//!           password: "s3cret"
//!           attributes:
//!             authorizeSubscribe: "devices/#"
//! ```

pub mod config;
pub mod domain;
pub mod error;

pub use domain::StaticCredentialsStrategy;
pub use error::ConfigError;
