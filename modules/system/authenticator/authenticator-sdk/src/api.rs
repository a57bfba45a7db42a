//! Plugin API for authentication strategies.
//!
//! A strategy is a shared, stateless template. Every authentication call
//! hands it a fresh [`Outcome`] bound to that single attempt, so no per-call
//! state ever lives on the strategy itself.

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::oneshot;

use crate::error::BoxError;
use crate::models::{AuthInfo, CallOptions, Challenge, Failure, Principal};

/// Credential payloads a strategy can verify.
///
/// The shape is protocol-specific (an MQTT CONNECT, a bearer token, ...);
/// the engine only moves it between attempts.
pub trait Credentials: Send + Sync + 'static {}

impl<T> Credentials for T where T: Send + Sync + 'static {}

/// Credentials that carry a username/password pair.
pub trait PasswordCredentials: Credentials {
    fn username(&self) -> Option<&str>;
    fn password(&self) -> Option<&SecretString>;
}

/// Plugin API trait for credential verifiers.
///
/// Implementations must call exactly one action on `outcome`. Returning from
/// `attempt` before doing so is allowed as long as the outcome is moved into
/// a task that eventually reports; dropping it unreported aborts the chain.
#[async_trait]
pub trait Strategy<C: Credentials>: Send + Sync {
    /// Name used when the strategy is registered without an explicit one.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Verify `credentials` and report the verdict through `outcome`.
    ///
    /// `options` are the caller's per-call options; strategies may use them
    /// to shape the principal (a requested scope, an audience, ...).
    async fn attempt(&self, credentials: &C, options: &CallOptions, outcome: Outcome);
}

/// What a single strategy attempt reported.
#[derive(Debug)]
pub enum StrategyOutcome {
    Accepted { principal: Principal, info: AuthInfo },
    Rejected(Failure),
    Errored(BoxError),
}

/// Write-once accept/reject/error surface for one strategy attempt.
///
/// Every action consumes the surface, so an attempt reports at most once.
#[derive(Debug)]
#[must_use = "a strategy attempt must report exactly one outcome"]
pub struct Outcome {
    tx: oneshot::Sender<StrategyOutcome>,
}

impl Outcome {
    /// Create a surface together with the receiver that observes its report.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<StrategyOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// The credential was verified; auth info defaults to an empty map.
    pub fn accept(self, principal: Principal) {
        self.accept_with_info(principal, AuthInfo::new());
    }

    /// The credential was verified and the strategy has extra auth info.
    pub fn accept_with_info(self, principal: Principal, info: AuthInfo) {
        self.report(StrategyOutcome::Accepted { principal, info });
    }

    /// The credential was not verified by this strategy.
    pub fn reject(self, challenge: Option<Challenge>, status: Option<u16>) {
        self.report(StrategyOutcome::Rejected(Failure { challenge, status }));
    }

    /// Verification could not be performed (e.g. the user store is down).
    pub fn error(self, err: impl Into<BoxError>) {
        self.report(StrategyOutcome::Errored(err.into()));
    }

    fn report(self, outcome: StrategyOutcome) {
        if self.tx.send(outcome).is_err() {
            tracing::trace!("strategy outcome reported after the chain stopped listening");
        }
    }
}
