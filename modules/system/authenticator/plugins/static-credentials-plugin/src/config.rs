//! Configuration for the static credentials plugin.

use std::collections::HashSet;

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticCredentialsPluginConfig {
    /// Name the strategy declares when registered without an explicit one.
    pub name: String,

    /// Verification mode.
    pub mode: CredentialsMode,

    /// Known users for `static_users` mode.
    pub users: Vec<UserEntry>,
}

impl Default for StaticCredentialsPluginConfig {
    fn default() -> Self {
        Self {
            name: "static-credentials".to_owned(),
            mode: CredentialsMode::StaticUsers,
            users: Vec::new(),
        }
    }
}

/// Verification mode.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialsMode {
    /// Accept any non-empty username.
    AcceptAll,
    /// Match against the configured users.
    #[default]
    StaticUsers,
}

/// A configured user.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEntry {
    pub username: String,
    pub password: SecretString,
    /// Extra fields merged into the principal.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl StaticCredentialsPluginConfig {
    /// Parse and validate a module config section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed input or a failed [`validate`](Self::validate).
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_value(value)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// - `EmptyName` if `name` is empty
    /// - `EmptyUsername` if a user has an empty username
    /// - `DuplicateUser` if a username appears twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::EmptyUsername);
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::DuplicateUser(user.username.clone()));
            }
        }
        Ok(())
    }
}
