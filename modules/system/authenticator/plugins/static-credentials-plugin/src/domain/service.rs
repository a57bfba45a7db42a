//! Service implementation for the static credentials plugin.

use std::collections::HashMap;

use authenticator_sdk::Principal;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use subtle::ConstantTimeEq;

use crate::config::{CredentialsMode, StaticCredentialsPluginConfig, UserEntry};
use crate::error::ConfigError;

/// Static username/password strategy.
///
/// Holds no per-attempt state; one instance serves every authentication call.
pub struct StaticCredentialsStrategy {
    pub(crate) name: String,
    mode: CredentialsMode,
    users: HashMap<String, UserEntry>,
}

impl StaticCredentialsStrategy {
    /// Create the strategy from plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration does not validate.
    pub fn from_config(cfg: &StaticCredentialsPluginConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        if matches!(cfg.mode, CredentialsMode::AcceptAll) {
            tracing::warn!(
                strategy = %cfg.name,
                "Static credentials strategy is running in `accept_all` mode, \
                 any non-empty username will be accepted. \
                 Do NOT use this mode in production."
            );
        }

        let users: HashMap<String, UserEntry> = cfg
            .users
            .iter()
            .map(|u| (u.username.clone(), u.clone()))
            .collect();

        tracing::info!(
            strategy = %cfg.name,
            mode = ?cfg.mode,
            user_count = users.len(),
            "Loaded static credentials"
        );

        Ok(Self {
            name: cfg.name.clone(),
            mode: cfg.mode.clone(),
            users,
        })
    }

    /// Verify a username/password pair and build the principal.
    ///
    /// Returns `None` for an empty username, an unknown user, or a wrong
    /// password (the password is ignored in `accept_all` mode).
    #[must_use]
    pub fn verify(&self, username: &str, password: Option<&SecretString>) -> Option<Principal> {
        if username.is_empty() {
            return None;
        }

        match self.mode {
            CredentialsMode::AcceptAll => Some(principal(username, None)),
            CredentialsMode::StaticUsers => {
                let user = self.users.get(username)?;
                let given = password.map_or("", ExposeSecret::expose_secret);
                password_matches(given, user.password.expose_secret())
                    .then(|| principal(username, Some(user)))
            }
        }
    }
}

/// Constant-time password comparison; a length mismatch still runs a
/// comparison of the expected value against itself.
fn password_matches(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();
    if given.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    given.ct_eq(expected).into()
}

fn principal(username: &str, user: Option<&UserEntry>) -> Principal {
    let mut fields = serde_json::Map::new();
    fields.insert("username".to_owned(), Value::String(username.to_owned()));
    if let Some(user) = user {
        fields.extend(user.attributes.clone());
    }
    Value::Object(fields)
}
