#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for strategy chains driven through the MQTT adapter
//!
//! These tests verify that:
//! 1. Rejections fall through to the next strategy, acceptance stops the chain
//! 2. Single and multi-strategy rejections keep their distinct shapes
//! 3. Unknown strategies and strategy errors surface as errors, not verdicts
//! 4. Concurrent CONNECTs sharing one authenticator do not interfere
//! 5. Per-call options reach both the strategy and the session login

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use authenticator::adapters::mqtt::{
    ConnackCode, ConnectAuthenticator, ConnectCredentials, MqttClient,
};
use authenticator::{AuthenticateOptions, Authenticator, ChainRequest};
use authenticator_sdk::{
    AuthInfo, AuthenticatorError, BoxError, CallOptions, LoginOptions, Outcome,
    PasswordCredentials, Principal, Rejection, Session, Strategy, Transform, TransformStep,
    Verdict,
};
use serde_json::json;

/// Accepts with a fixed principal and counts attempts.
struct Accepting {
    principal: Principal,
    attempts: AtomicUsize,
}

impl Accepting {
    fn new(principal: Principal) -> Arc<Self> {
        Arc::new(Self {
            principal,
            attempts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Strategy<ConnectCredentials> for Accepting {
    async fn attempt(
        &self,
        _credentials: &ConnectCredentials,
        _options: &CallOptions,
        outcome: Outcome,
    ) {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        outcome.accept(self.principal.clone());
    }
}

/// Rejects with a fixed challenge and status.
struct Rejecting {
    challenge: &'static str,
    status: Option<u16>,
}

#[async_trait]
impl Strategy<ConnectCredentials> for Rejecting {
    async fn attempt(
        &self,
        _credentials: &ConnectCredentials,
        _options: &CallOptions,
        outcome: Outcome,
    ) {
        outcome.reject(Some(self.challenge.into()), self.status);
    }
}

/// Reports an infrastructural failure.
struct Failing;

#[async_trait]
impl Strategy<ConnectCredentials> for Failing {
    async fn attempt(
        &self,
        _credentials: &ConnectCredentials,
        _options: &CallOptions,
        outcome: Outcome,
    ) {
        outcome.error("user directory unavailable");
    }
}

/// Echoes the CONNECT username back after a delay.
struct SlowEcho;

#[async_trait]
impl Strategy<ConnectCredentials> for SlowEcho {
    fn name(&self) -> Option<&str> {
        Some("echo")
    }

    async fn attempt(
        &self,
        credentials: &ConnectCredentials,
        _options: &CallOptions,
        outcome: Outcome,
    ) {
        let username = credentials.username().unwrap_or_default().to_owned();
        tokio::time::sleep(Duration::from_millis(5)).await;
        if username.ends_with("-ok") {
            outcome.accept(json!({ "username": username }));
        } else {
            outcome.reject(Some(json!(format!("no {username}"))), None);
        }
    }
}

/// Adds the user's email to the principal when the caller asks for that scope.
struct ScopedProfile;

#[async_trait]
impl Strategy<ConnectCredentials> for ScopedProfile {
    async fn attempt(
        &self,
        _credentials: &ConnectCredentials,
        options: &CallOptions,
        outcome: Outcome,
    ) {
        let mut user = json!({ "id": "1", "username": "jaredhanson" });
        if options.get("scope") == Some(&json!("email")) {
            user["email"] = json!("jaredhanson@example.com");
        }
        outcome.accept(user);
    }
}

/// Session that refuses a login unless the caller requested the email scope.
#[derive(Default)]
struct ScopeCheckingSession {
    user: Option<Principal>,
    auth_info: Option<AuthInfo>,
}

#[async_trait]
impl Session for ScopeCheckingSession {
    async fn login(
        &mut self,
        principal: Principal,
        options: &LoginOptions,
    ) -> Result<(), BoxError> {
        if options.call_options.get("scope") != Some(&json!("email")) {
            return Err("invalid options".into());
        }
        self.user = Some(principal);
        Ok(())
    }

    fn assign(&mut self, _property: &str, _principal: Principal) {}

    fn set_auth_info(&mut self, info: AuthInfo) {
        self.auth_info = Some(info);
    }
}

fn engine() -> Arc<Authenticator<ConnectCredentials>> {
    Arc::new(Authenticator::default())
}

fn connect(username: &str) -> ConnectCredentials {
    ConnectCredentials::new(format!("client-{username}")).with_login(username, "pw")
}

#[tokio::test]
async fn second_strategy_accepts_after_first_rejects() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as(
        "a",
        Arc::new(Rejecting {
            challenge: "A challenge",
            status: None,
        }),
    )?
    .use_strategy_as("b", Accepting::new(json!({ "username": "bob-b" })))?;

    let adapter = ConnectAuthenticator::new(Arc::clone(&auth), ChainRequest::new(["a", "b"]));
    let mut client = MqttClient::new("c1");
    let result = adapter.authenticate(&mut client, &connect("bob")).await?;

    assert_eq!(result.return_code, ConnackCode::Accepted);
    assert_eq!(client.user(), Some(&json!({ "username": "bob-b" })));
    assert_eq!(client.auth_info(), Some(&serde_json::Map::new()));
    Ok(())
}

#[tokio::test]
async fn first_strategy_accepting_skips_the_rest() -> Result<()> {
    let a = Accepting::new(json!({ "username": "bob-a" }));
    let b = Accepting::new(json!({ "username": "bob-b" }));

    let auth = engine();
    auth.use_strategy_as("a", Arc::clone(&a) as Arc<dyn Strategy<ConnectCredentials>>)?
        .use_strategy_as("b", Arc::clone(&b) as Arc<dyn Strategy<ConnectCredentials>>)?;

    let mut client = MqttClient::new("c1");
    let verdict = auth
        .authenticate(
            &ChainRequest::new(["a", "b"]),
            &connect("bob"),
            &mut client,
            &AuthenticateOptions::default(),
        )
        .await?;

    assert_eq!(verdict.principal(), Some(&json!({ "username": "bob-a" })));
    assert_eq!(a.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(b.attempts.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn single_strategy_rejection_is_not_authorized() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as(
        "a",
        Arc::new(Rejecting {
            challenge: "A challenge",
            status: Some(403),
        }),
    )?;

    let adapter = ConnectAuthenticator::new(auth, ChainRequest::single("a"));
    let mut client = MqttClient::new("c1");
    let result = adapter.authenticate(&mut client, &connect("bob")).await?;

    assert_eq!(result.return_code, ConnackCode::NotAuthorized);
    assert_eq!(
        result.verdict,
        Verdict::Rejected(Rejection::Single {
            challenge: Some(json!("A challenge")),
            status: Some(403),
        })
    );
    assert!(client.user().is_none());
    assert!(client.auth_info().is_none());
    Ok(())
}

#[tokio::test]
async fn multi_strategy_rejection_lists_every_failure() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as(
        "a",
        Arc::new(Rejecting {
            challenge: "A challenge",
            status: None,
        }),
    )?
    .use_strategy_as(
        "b",
        Arc::new(Rejecting {
            challenge: "B challenge",
            status: Some(401),
        }),
    )?;

    let mut client = MqttClient::new("c1");
    let verdict = auth
        .authenticate(
            &ChainRequest::new(["a", "b"]),
            &connect("bob"),
            &mut client,
            &AuthenticateOptions::default(),
        )
        .await?;

    assert_eq!(
        verdict,
        Verdict::Rejected(Rejection::Multi {
            challenges: vec![Some(json!("A challenge")), Some(json!("B challenge"))],
            statuses: vec![None, Some(401)],
        })
    );
    Ok(())
}

#[tokio::test]
async fn unknown_strategy_is_reported_by_name() {
    let adapter = ConnectAuthenticator::new(engine(), ChainRequest::single("foo"));
    let mut client = MqttClient::new("c1");

    let err = adapter
        .authenticate(&mut client, &connect("bob"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthenticatorError::UnknownStrategy(_)));
    assert!(err.to_string().contains("\"foo\""));
    assert!(client.user().is_none());
}

#[tokio::test]
async fn strategy_error_halts_chain_without_principal() -> Result<()> {
    let c = Accepting::new(json!({ "username": "bob-c" }));

    let auth = engine();
    auth.use_strategy_as("fail", Arc::new(Failing))?
        .use_strategy_as("c", Arc::clone(&c) as Arc<dyn Strategy<ConnectCredentials>>)?;

    let mut client = MqttClient::new("c1");
    let err = auth
        .authenticate(
            &ChainRequest::new(["fail", "c"]),
            &connect("bob"),
            &mut client,
            &AuthenticateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("user directory unavailable"));
    assert_eq!(c.attempts.load(Ordering::SeqCst), 0);
    assert!(client.user().is_none());
    assert!(client.auth_info().is_none());
    Ok(())
}

#[tokio::test]
async fn transform_error_is_returned_after_login() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as("a", Accepting::new(json!({ "username": "bob" })))?
        .transform_auth_info(Transform::asynchronous(|_| async {
            Err::<TransformStep, BoxError>("client registry unavailable".into())
        }));

    let mut client = MqttClient::new("c1");
    let err = auth
        .authenticate(
            &ChainRequest::single("a"),
            &connect("bob"),
            &mut client,
            &AuthenticateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthenticatorError::Transform { .. }));
    assert!(client.auth_info().is_none());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_connects_do_not_share_attempt_state() -> Result<()> {
    let auth = engine();
    auth.use_strategy(Arc::new(SlowEcho))?;
    let adapter = Arc::new(ConnectAuthenticator::new(
        Arc::clone(&auth),
        ChainRequest::new(["echo", "echo"]),
    ));

    let mut handles = Vec::new();
    for i in 0..32 {
        let adapter = Arc::clone(&adapter);
        handles.push(tokio::spawn(async move {
            let username = if i % 2 == 0 {
                format!("user{i}-ok")
            } else {
                format!("user{i}")
            };
            let mut client = MqttClient::new(format!("c{i}"));
            let result = adapter.authenticate(&mut client, &connect(&username)).await;
            (username, client, result)
        }));
    }

    for handle in handles {
        let (username, client, result) = handle.await?;
        let result = result?;
        if username.ends_with("-ok") {
            assert_eq!(result.return_code, ConnackCode::Accepted);
            assert_eq!(client.user(), Some(&json!({ "username": username })));
        } else {
            assert_eq!(result.return_code, ConnackCode::NotAuthorized);
            let expected = json!(format!("no {username}"));
            assert_eq!(
                result.verdict,
                Verdict::Rejected(Rejection::Multi {
                    challenges: vec![Some(expected.clone()), Some(expected)],
                    statuses: vec![None, None],
                })
            );
            assert!(client.user().is_none());
        }
    }
    Ok(())
}

#[tokio::test]
async fn unregistering_mid_flight_does_not_affect_running_chain() -> Result<()> {
    let auth = engine();
    auth.use_strategy(Arc::new(SlowEcho))?;

    let running = {
        let auth = Arc::clone(&auth);
        tokio::spawn(async move {
            let mut client = MqttClient::new("c1");
            auth.authenticate(
                &ChainRequest::new(["echo", "echo"]),
                &connect("bob"),
                &mut client,
                &AuthenticateOptions::default(),
            )
            .await
        })
    };

    tokio::task::yield_now().await;
    auth.unuse("echo");

    let verdict = running.await??;
    assert!(!verdict.is_authenticated());
    assert!(auth.strategy("echo").is_none());
    Ok(())
}

#[tokio::test]
async fn strategy_specific_options_reach_strategy_and_login() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as("success", Arc::new(ScopedProfile))?;

    let mut session = ScopeCheckingSession::default();
    let verdict = auth
        .authenticate(
            &ChainRequest::single("success"),
            &connect("jaredhanson"),
            &mut session,
            &AuthenticateOptions::default().with_option("scope", json!("email")),
        )
        .await?;

    let expected = json!({
        "id": "1",
        "username": "jaredhanson",
        "email": "jaredhanson@example.com",
    });
    assert_eq!(verdict.principal(), Some(&expected));
    assert_eq!(session.user, Some(expected));
    assert_eq!(session.auth_info, Some(AuthInfo::new()));
    Ok(())
}

#[tokio::test]
async fn login_refusing_missing_options_surfaces_session_error() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as("success", Arc::new(ScopedProfile))?;

    let mut session = ScopeCheckingSession::default();
    let err = auth
        .authenticate(
            &ChainRequest::single("success"),
            &connect("jaredhanson"),
            &mut session,
            &AuthenticateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthenticatorError::Session { .. }));
    assert!(err.to_string().contains("invalid options"));
    assert!(session.user.is_none());
    assert!(session.auth_info.is_none());
    Ok(())
}

#[tokio::test]
async fn connect_adapter_forwards_its_options() -> Result<()> {
    let auth = engine();
    auth.use_strategy_as("success", Arc::new(ScopedProfile))?;

    let adapter = ConnectAuthenticator::new(auth, ChainRequest::single("success"))
        .with_options(AuthenticateOptions::default().with_option("scope", json!("email")));
    let mut client = MqttClient::new("c1");
    let result = adapter.authenticate(&mut client, &connect("jaredhanson")).await?;

    assert_eq!(result.return_code, ConnackCode::Accepted);
    assert_eq!(
        client.user().and_then(|user| user.get("email")),
        Some(&json!("jaredhanson@example.com"))
    );
    Ok(())
}
