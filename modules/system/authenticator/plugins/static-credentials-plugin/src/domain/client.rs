//! Strategy implementation for the static credentials plugin.
//!
//! Implements `Strategy` for any credentials carrying a username/password pair.

use async_trait::async_trait;
use authenticator_sdk::{CallOptions, Outcome, PasswordCredentials, Strategy};

use super::service::StaticCredentialsStrategy;

/// Challenge reported for every rejected attempt.
pub const INVALID_CREDENTIALS_CHALLENGE: &str = "user or pass incorrect!";

#[async_trait]
impl<C: PasswordCredentials> Strategy<C> for StaticCredentialsStrategy {
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    async fn attempt(&self, credentials: &C, _options: &CallOptions, outcome: Outcome) {
        let principal = credentials
            .username()
            .and_then(|username| self.verify(username, credentials.password()));

        match principal {
            Some(principal) => outcome.accept(principal),
            None => outcome.reject(Some(INVALID_CREDENTIALS_CHALLENGE.into()), None),
        }
    }
}
