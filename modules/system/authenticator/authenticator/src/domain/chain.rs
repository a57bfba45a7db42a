//! Strategy chain executor.
//!
//! Strategies run one at a time in request order. A rejection is recorded
//! and the next strategy gets its turn; an acceptance or an error ends the
//! chain immediately. Each attempt gets its own [`Outcome`] surface and the
//! failure accumulator lives on this call's stack, so concurrent chains never
//! share per-attempt state.

use authenticator_sdk::{
    AuthInfo, AuthenticatorError, CallOptions, Credentials, Failure, Outcome, Principal,
    Rejection, StrategyOutcome,
};

use super::registry::StrategyMap;

/// Ordered strategy names for one authentication call.
///
/// A request naming more than one strategy is a multi-strategy request; that
/// only changes the shape of the final [`Rejection`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRequest {
    names: Vec<String>,
}

impl ChainRequest {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.names.len() > 1
    }
}

impl From<&str> for ChainRequest {
    fn from(name: &str) -> Self {
        Self::single(name)
    }
}

impl From<String> for ChainRequest {
    fn from(name: String) -> Self {
        Self::single(name)
    }
}

/// Terminal state of a chain that did not error.
#[derive(Debug)]
pub enum ChainOutcome {
    Succeeded {
        strategy: String,
        principal: Principal,
        info: AuthInfo,
        /// Rejections recorded before the accepting strategy ran.
        failures: Vec<Failure>,
    },
    Failed(Rejection),
}

/// Run `request` against `strategies`, handing `options` to every attempt.
///
/// # Errors
///
/// - `UnknownStrategy` when a name is not registered
/// - `Strategy` when an attempt reports an error
/// - `AbandonedAttempt` when an attempt drops its outcome unreported
#[tracing::instrument(skip_all)]
pub async fn execute<C: Credentials>(
    strategies: &StrategyMap<C>,
    request: &ChainRequest,
    credentials: &C,
    options: &CallOptions,
) -> Result<ChainOutcome, AuthenticatorError> {
    let mut failures: Vec<Failure> = Vec::new();

    for name in request.names() {
        let strategy = strategies
            .get(name)
            .ok_or_else(|| AuthenticatorError::UnknownStrategy(name.clone()))?;

        let (outcome, report) = Outcome::channel();
        strategy.attempt(credentials, options, outcome).await;

        match report.await {
            Ok(StrategyOutcome::Accepted { principal, info }) => {
                tracing::debug!(
                    strategy = %name,
                    rejected = failures.len(),
                    "Strategy accepted credentials"
                );
                return Ok(ChainOutcome::Succeeded {
                    strategy: name.clone(),
                    principal,
                    info,
                    failures,
                });
            }
            Ok(StrategyOutcome::Rejected(failure)) => {
                tracing::debug!(strategy = %name, status = ?failure.status, "Strategy rejected credentials");
                failures.push(failure);
            }
            Ok(StrategyOutcome::Errored(source)) => {
                tracing::warn!(strategy = %name, error = %source, "Strategy failed");
                return Err(AuthenticatorError::Strategy {
                    strategy: name.clone(),
                    source,
                });
            }
            Err(_) => {
                tracing::warn!(strategy = %name, "Strategy dropped its outcome without reporting");
                return Err(AuthenticatorError::AbandonedAttempt(name.clone()));
            }
        }
    }

    tracing::debug!(rejected = failures.len(), "All strategies rejected credentials");
    Ok(ChainOutcome::Failed(rejection(failures, request.is_multi())))
}

/// Shape the accumulated failures: scalars for a single-strategy request,
/// parallel sequences in chain order otherwise.
#[must_use]
pub fn rejection(failures: Vec<Failure>, multi: bool) -> Rejection {
    if multi {
        let (challenges, statuses) = failures
            .into_iter()
            .map(|f| (f.challenge, f.status))
            .unzip();
        Rejection::Multi {
            challenges,
            statuses,
        }
    } else {
        let first = failures.into_iter().next().unwrap_or_default();
        Rejection::Single {
            challenge: first.challenge,
            status: first.status,
        }
    }
}
