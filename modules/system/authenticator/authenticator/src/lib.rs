//! Authenticator Module
//!
//! Runs an ordered chain of registered authentication strategies against a
//! credential payload. Rejections move on to the next strategy, an acceptance
//! or an infrastructural error stops the chain. Accepted principals are
//! delivered to a [`Session`](authenticator_sdk::Session), optionally after
//! the strategy's auth info went through the registered transforms.
//!
//! ```ignore
//! let auth = Arc::new(Authenticator::<ConnectCredentials>::new(cfg));
//! auth.use_strategy(Arc::new(StaticCredentialsStrategy::from_config(&plugin_cfg)?))?;
//!
//! let verdict = auth
//!     .authenticate(&ChainRequest::new(["static-credentials"]), &creds, &mut client, &AuthenticateOptions::default())
//!     .await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod config;
pub mod domain;

pub use config::{AuthenticateOptions, AuthenticatorConfig};
pub use domain::{Authenticator, ChainRequest, StrategyRegistry, TransformPipeline};
