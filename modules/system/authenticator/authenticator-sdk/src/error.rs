//! Error types for the authenticator module.

use thiserror::Error;

/// Boxed error produced by strategies, transforms, and sessions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that halt an authentication call.
///
/// A strategy rejecting a credential is not an error; it ends up in
/// [`Verdict::Rejected`](crate::Verdict::Rejected) instead.
#[derive(Debug, Error)]
pub enum AuthenticatorError {
    /// A strategy was registered without an explicit name and declares none.
    #[error("authentication strategies must have a name")]
    MissingStrategyName,

    /// A chain referenced a strategy name that is not registered.
    #[error("unknown authentication strategy \"{0}\"")]
    UnknownStrategy(String),

    /// A strategy reported an infrastructural failure through its outcome surface.
    #[error("authentication strategy \"{strategy}\" failed: {source}")]
    Strategy {
        strategy: String,
        #[source]
        source: BoxError,
    },

    /// A strategy dropped its outcome surface without reporting anything.
    #[error("authentication strategy \"{0}\" finished without reporting an outcome")]
    AbandonedAttempt(String),

    /// An auth-info transform returned an error or panicked.
    #[error("auth info transform failed: {source}")]
    Transform {
        #[source]
        source: BoxError,
    },

    /// The session collaborator refused the login.
    #[error("session login failed: {source}")]
    Session {
        #[source]
        source: BoxError,
    },
}

impl AuthenticatorError {
    /// Whether the error comes from how the authenticator was set up
    /// rather than from a failure while verifying credentials.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingStrategyName | Self::UnknownStrategy(_))
    }
}
