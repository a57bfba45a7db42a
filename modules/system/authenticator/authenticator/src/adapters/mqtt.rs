//! MQTT CONNECT adapter.
//!
//! Authenticates the username/password carried by a CONNECT packet and maps
//! the verdict onto a CONNACK return code. The broker owns the [`MqttClient`]
//! session; the authenticator only writes the principal and auth info to it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use authenticator_sdk::{
    AuthInfo, AuthenticatorError, BoxError, DEFAULT_USER_PROPERTY, LoginOptions,
    PasswordCredentials, Principal, Session, Verdict,
};
use secrecy::SecretString;

use crate::config::AuthenticateOptions;
use crate::domain::{Authenticator, ChainRequest};

/// Credentials carried by an MQTT CONNECT packet.
#[derive(Debug, Clone)]
pub struct ConnectCredentials {
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl ConnectCredentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            username: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }
}

impl PasswordCredentials for ConnectCredentials {
    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }
}

/// Connected client as seen by the authenticator.
#[derive(Debug, Default)]
pub struct MqttClient {
    id: String,
    properties: HashMap<String, Principal>,
    auth_info: Option<AuthInfo>,
}

impl MqttClient {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Principal stored under the default `"user"` property.
    #[must_use]
    pub fn user(&self) -> Option<&Principal> {
        self.property(DEFAULT_USER_PROPERTY)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Principal> {
        self.properties.get(name)
    }

    #[must_use]
    pub fn auth_info(&self) -> Option<&AuthInfo> {
        self.auth_info.as_ref()
    }
}

#[async_trait]
impl Session for MqttClient {
    async fn login(
        &mut self,
        principal: Principal,
        options: &LoginOptions,
    ) -> Result<(), BoxError> {
        self.properties
            .insert(options.user_property.clone(), principal);
        Ok(())
    }

    fn assign(&mut self, property: &str, principal: Principal) {
        self.properties.insert(property.to_owned(), principal);
    }

    fn set_auth_info(&mut self, info: AuthInfo) {
        self.auth_info = Some(info);
    }
}

/// CONNACK return codes produced by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnackCode {
    Accepted = 0,
    NotAuthorized = 5,
}

impl ConnackCode {
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Adapter result: the CONNACK code plus the engine's verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResult {
    pub return_code: ConnackCode,
    pub verdict: Verdict,
}

/// Authenticates CONNECT packets with a fixed strategy chain.
pub struct ConnectAuthenticator {
    engine: Arc<Authenticator<ConnectCredentials>>,
    request: ChainRequest,
    options: AuthenticateOptions,
}

impl ConnectAuthenticator {
    #[must_use]
    pub fn new(engine: Arc<Authenticator<ConnectCredentials>>, request: ChainRequest) -> Self {
        Self {
            engine,
            request,
            options: AuthenticateOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: AuthenticateOptions) -> Self {
        self.options = options;
        self
    }

    /// Authenticate one CONNECT.
    ///
    /// # Errors
    ///
    /// Returns the engine error unchanged; the broker decides how to answer
    /// an infrastructural failure.
    #[tracing::instrument(skip_all, fields(client_id = %credentials.client_id))]
    pub async fn authenticate(
        &self,
        client: &mut MqttClient,
        credentials: &ConnectCredentials,
    ) -> Result<ConnectResult, AuthenticatorError> {
        let verdict = self
            .engine
            .authenticate(&self.request, credentials, client, &self.options)
            .await?;

        let return_code = if verdict.is_authenticated() {
            ConnackCode::Accepted
        } else {
            ConnackCode::NotAuthorized
        };
        tracing::debug!(return_code = return_code.as_u8(), "CONNECT authenticated");

        Ok(ConnectResult {
            return_code,
            verdict,
        })
    }
}
