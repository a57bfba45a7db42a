//! Delivery of an accepted principal to the session.

use authenticator_sdk::{
    AuthInfo, AuthenticatorError, LoginOptions, Principal, Session, Verdict,
};

use super::pipeline::TransformPipeline;

/// How an accepted principal reaches the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Authorization mode: attach the principal here and skip login.
    pub assign_property: Option<String>,
    /// Transform and store the strategy's auth info after login.
    pub auth_info: bool,
    pub login: LoginOptions,
}

impl Delivery {
    /// Hand `principal` to `session`.
    ///
    /// In authorization mode the principal is assigned to the side property
    /// and nothing else happens. Otherwise the session logs the principal in
    /// and, unless disabled, stores the transformed auth info.
    ///
    /// # Errors
    ///
    /// - `Session` when the login is refused; auth info is left untouched
    /// - `Transform` when a transform fails; auth info is left untouched
    pub async fn deliver<S>(
        &self,
        session: &mut S,
        transforms: &TransformPipeline,
        principal: Principal,
        info: AuthInfo,
    ) -> Result<Verdict, AuthenticatorError>
    where
        S: Session + ?Sized,
    {
        if let Some(property) = &self.assign_property {
            tracing::debug!(property = %property, "Assigning authorized principal");
            session.assign(property, principal.clone());
            return Ok(Verdict::Authenticated { principal });
        }

        session
            .login(principal.clone(), &self.login)
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "Session login failed");
                AuthenticatorError::Session { source }
            })?;

        if self.auth_info {
            let transformed = transforms.run(info).await?;
            session.set_auth_info(transformed);
        }

        Ok(Verdict::Authenticated { principal })
    }
}
