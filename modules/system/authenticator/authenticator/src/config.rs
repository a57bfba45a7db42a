//! Configuration for the authenticator.

use authenticator_sdk::{CallOptions, DEFAULT_USER_PROPERTY, LoginOptions};
use serde::Deserialize;

/// Engine-wide configuration.
///
/// Accepts both `snake_case` keys and the `userProperty` / `assignProperty` /
/// `authInfo` spellings used by existing broker configs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthenticatorConfig {
    /// Session property written by a successful login.
    #[serde(alias = "userProperty")]
    pub user_property: String,

    /// When set, accepted principals are attached to this property instead
    /// of being logged in (authorization mode).
    #[serde(alias = "assignProperty")]
    pub assign_property: Option<String>,

    /// Whether accepted auth info is transformed and stored on the session.
    #[serde(alias = "authInfo")]
    pub auth_info: bool,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            user_property: DEFAULT_USER_PROPERTY.to_owned(),
            assign_property: None,
            auth_info: true,
        }
    }
}

impl AuthenticatorConfig {
    /// Build the configuration from a module config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section has unknown keys or mistyped values.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Login options derived from this configuration; an empty user
    /// property falls back to `"user"`.
    #[must_use]
    pub fn login_options(&self) -> LoginOptions {
        if self.user_property.is_empty() {
            LoginOptions::default()
        } else {
            LoginOptions {
                user_property: self.user_property.clone(),
                call_options: CallOptions::new(),
            }
        }
    }
}

/// Per-call overrides of [`AuthenticatorConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticateOptions {
    pub assign_property: Option<String>,
    pub auth_info: Option<bool>,
    /// Free-form options passed to every strategy attempt and to the login.
    pub call_options: CallOptions,
}

impl AuthenticateOptions {
    /// Authorization mode: attach the principal under `property`.
    #[must_use]
    pub fn assign_to(property: impl Into<String>) -> Self {
        Self {
            assign_property: Some(property.into()),
            ..Self::default()
        }
    }

    /// Add a per-call option, e.g. `with_option("scope", json!("email"))`.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.call_options.insert(key.into(), value);
        self
    }

    /// Skip the auth-info transforms and leave the session's auth info alone.
    #[must_use]
    pub fn without_auth_info(mut self) -> Self {
        self.auth_info = Some(false);
        self
    }
}
