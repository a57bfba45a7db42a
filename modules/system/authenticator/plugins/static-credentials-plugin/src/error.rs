//! Configuration errors for the static credentials plugin.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid plugin configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("strategy name must not be empty")]
    EmptyName,

    #[error("user entry has an empty username")]
    EmptyUsername,

    #[error("duplicate user '{0}'")]
    DuplicateUser(String),
}
