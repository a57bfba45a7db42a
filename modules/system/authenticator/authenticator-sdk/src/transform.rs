//! Auth-info transform participants.
//!
//! Transforms rewrite the auth info of an accepted strategy before it is
//! stored on the session, e.g. to resolve a client ID into the full client
//! record. Each participant is registered as either a synchronous function or
//! an asynchronous one; the variant is fixed at registration time.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::BoxError;
use crate::models::AuthInfo;

/// Non-error result of an asynchronous participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformStep {
    /// Decline to act; the next participant sees the original info.
    Continue,
    /// Replace the info and stop the pipeline.
    Done(AuthInfo),
}

/// Synchronous participant: its return value always becomes the result.
pub type SyncTransformFn = dyn Fn(&AuthInfo) -> AuthInfo + Send + Sync;

/// Asynchronous participant.
pub type AsyncTransformFn =
    dyn Fn(AuthInfo) -> BoxFuture<'static, Result<TransformStep, BoxError>> + Send + Sync;

/// A registered transform participant.
#[derive(Clone)]
pub enum Transform {
    Sync(Arc<SyncTransformFn>),
    Async(Arc<AsyncTransformFn>),
}

impl Transform {
    /// Register a synchronous rewrite of the auth info.
    #[must_use]
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&AuthInfo) -> AuthInfo + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Register an asynchronous participant that may skip, rewrite, or fail.
    #[must_use]
    pub fn asynchronous<F, Fut>(f: F) -> Self
    where
        F: Fn(AuthInfo) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TransformStep, BoxError>> + Send + 'static,
    {
        Self::Async(Arc::new(move |info| f(info).boxed()))
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Transform::Sync(..)"),
            Self::Async(_) => f.write_str("Transform::Async(..)"),
        }
    }
}
