//! Session collaborator contract.
//!
//! The session (a broker client, a connection, ...) is owned by the framework
//! adapter. The engine only writes to it through this trait.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::models::{AuthInfo, CallOptions, DEFAULT_USER_PROPERTY, Principal};

/// Options forwarded to [`Session::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOptions {
    /// Session property that receives the principal.
    pub user_property: String,
    /// Options the caller passed to this authentication call.
    pub call_options: CallOptions,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            user_property: DEFAULT_USER_PROPERTY.to_owned(),
            call_options: CallOptions::new(),
        }
    }
}

/// Session that receives the outcome of an accepted strategy.
#[async_trait]
pub trait Session: Send {
    /// Establish `principal` as the session's primary identity.
    ///
    /// # Errors
    ///
    /// Returns the session's own error when the login is refused; the engine
    /// propagates it unchanged and skips the auth-info transforms.
    async fn login(&mut self, principal: Principal, options: &LoginOptions)
    -> Result<(), BoxError>;

    /// Attach `principal` under `property` without touching the primary identity.
    fn assign(&mut self, property: &str, principal: Principal);

    /// Store the (transformed) auth info.
    fn set_auth_info(&mut self, info: AuthInfo);
}
