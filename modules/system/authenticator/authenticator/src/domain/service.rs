//! The authenticator engine.

use std::sync::Arc;

use authenticator_sdk::{
    AuthInfo, AuthenticatorError, Credentials, DEFAULT_ASSIGN_PROPERTY, LoginOptions, Session,
    Strategy, Transform, Verdict,
};

use super::chain::{self, ChainOutcome, ChainRequest};
use super::delivery::Delivery;
use super::pipeline::TransformPipeline;
use super::registry::StrategyRegistry;
use crate::config::{AuthenticateOptions, AuthenticatorConfig};

/// Authenticator for credentials of type `C`.
///
/// Built once at startup and shared (typically behind an `Arc`) by every
/// connection handler. Strategies and transforms may be registered at any
/// time; in-flight calls keep the snapshot they started with.
pub struct Authenticator<C: Credentials> {
    config: AuthenticatorConfig,
    strategies: StrategyRegistry<C>,
    transforms: TransformPipeline,
}

impl<C: Credentials> Default for Authenticator<C> {
    fn default() -> Self {
        Self::new(AuthenticatorConfig::default())
    }
}

impl<C: Credentials> Authenticator<C> {
    #[must_use]
    pub fn new(config: AuthenticatorConfig) -> Self {
        Self {
            config,
            strategies: StrategyRegistry::new(),
            transforms: TransformPipeline::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    #[must_use]
    pub fn strategies(&self) -> &StrategyRegistry<C> {
        &self.strategies
    }

    /// Register `strategy` under its declared name.
    ///
    /// # Errors
    ///
    /// Returns `MissingStrategyName` if the strategy declares no name.
    pub fn use_strategy(
        &self,
        strategy: Arc<dyn Strategy<C>>,
    ) -> Result<&Self, AuthenticatorError> {
        self.strategies.register(None, strategy)?;
        Ok(self)
    }

    /// Register `strategy` under `name`, overriding its declared name.
    ///
    /// # Errors
    ///
    /// Returns `MissingStrategyName` if `name` is empty and the strategy
    /// declares no name either.
    pub fn use_strategy_as(
        &self,
        name: &str,
        strategy: Arc<dyn Strategy<C>>,
    ) -> Result<&Self, AuthenticatorError> {
        self.strategies.register(Some(name), strategy)?;
        Ok(self)
    }

    /// Unregister the strategy named `name`; unknown names are ignored.
    pub fn unuse(&self, name: &str) -> &Self {
        self.strategies.unregister(name);
        self
    }

    #[must_use]
    pub fn strategy(&self, name: &str) -> Option<Arc<dyn Strategy<C>>> {
        self.strategies.lookup(name)
    }

    /// Append an auth-info transform.
    pub fn transform_auth_info(&self, transform: Transform) -> &Self {
        self.transforms.push(transform);
        self
    }

    /// Run the registered transforms over `info`.
    ///
    /// # Errors
    ///
    /// Returns `Transform` if a participant fails or panics.
    pub async fn run_transforms(&self, info: AuthInfo) -> Result<AuthInfo, AuthenticatorError> {
        self.transforms.run(info).await
    }

    /// Authenticate `credentials` against the strategies named in `request`
    /// and deliver an accepted principal to `session`.
    ///
    /// `options.call_options` are handed to every strategy attempt and to
    /// [`Session::login`].
    ///
    /// Returns [`Verdict::Rejected`] when every strategy rejected.
    ///
    /// # Errors
    ///
    /// - `UnknownStrategy` when the request names an unregistered strategy
    /// - `Strategy` / `AbandonedAttempt` when an attempt fails
    /// - `Session` when the session refuses the login
    /// - `Transform` when an auth-info transform fails
    #[tracing::instrument(skip_all, fields(chain = ?request.names()))]
    pub async fn authenticate<S>(
        &self,
        request: &ChainRequest,
        credentials: &C,
        session: &mut S,
        options: &AuthenticateOptions,
    ) -> Result<Verdict, AuthenticatorError>
    where
        S: Session + ?Sized,
    {
        let strategies = self.strategies.snapshot();

        match chain::execute(&strategies, request, credentials, &options.call_options).await? {
            ChainOutcome::Succeeded {
                strategy,
                principal,
                info,
                ..
            } => {
                tracing::debug!(strategy = %strategy, "Authentication succeeded");
                self.delivery(options)
                    .deliver(session, &self.transforms, principal, info)
                    .await
            }
            ChainOutcome::Failed(rejection) => Ok(Verdict::Rejected(rejection)),
        }
    }

    /// Like [`authenticate`](Self::authenticate), but attaches the accepted
    /// principal to a side property (`"account"` unless `options` names one)
    /// and leaves the session's primary identity alone.
    ///
    /// # Errors
    ///
    /// Same as [`authenticate`](Self::authenticate), minus the login and
    /// transform errors which authorization never triggers.
    pub async fn authorize<S>(
        &self,
        request: &ChainRequest,
        credentials: &C,
        session: &mut S,
        options: &AuthenticateOptions,
    ) -> Result<Verdict, AuthenticatorError>
    where
        S: Session + ?Sized,
    {
        let options = AuthenticateOptions {
            assign_property: Some(
                options
                    .assign_property
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ASSIGN_PROPERTY.to_owned()),
            ),
            ..options.clone()
        };
        self.authenticate(request, credentials, session, &options)
            .await
    }

    fn delivery(&self, options: &AuthenticateOptions) -> Delivery {
        Delivery {
            assign_property: options
                .assign_property
                .clone()
                .or_else(|| self.config.assign_property.clone()),
            auth_info: options.auth_info.unwrap_or(self.config.auth_info),
            login: LoginOptions {
                call_options: options.call_options.clone(),
                ..self.config.login_options()
            },
        }
    }
}
