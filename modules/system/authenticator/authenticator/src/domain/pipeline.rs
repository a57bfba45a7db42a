//! Auth-info transform pipeline.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use arc_swap::ArcSwap;
use authenticator_sdk::{AuthInfo, AuthenticatorError, BoxError, Transform, TransformStep};
use futures::FutureExt;

/// A transform participant panicked; carries the panic message.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformPanic(pub String);

impl TransformPanic {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "transform panicked".to_owned());
        Self(message)
    }
}

/// Ordered auth-info transform participants.
///
/// The first participant that produces a value or fails ends the run.
/// Participants that return [`TransformStep::Continue`] hand the original,
/// untransformed info to the next one. With no participants, or when all
/// of them continue, the info comes back unchanged.
pub struct TransformPipeline {
    transforms: ArcSwap<Vec<Transform>>,
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append a participant.
    #[allow(clippy::needless_pass_by_value)] // cloned into each rcu attempt
    pub fn push(&self, transform: Transform) {
        self.transforms.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(transform.clone());
            next
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.load().is_empty()
    }

    /// Run the participants over `info`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Transform` with the participant's error
    /// (or panic message) as its source. No further participants run.
    #[tracing::instrument(skip_all, fields(transforms = tracing::field::Empty))]
    pub async fn run(&self, info: AuthInfo) -> Result<AuthInfo, AuthenticatorError> {
        let transforms: Arc<Vec<Transform>> = self.transforms.load_full();
        tracing::Span::current().record("transforms", transforms.len());

        for (index, transform) in transforms.iter().enumerate() {
            match invoke(transform, &info).await {
                Ok(TransformStep::Continue) => {
                    tracing::trace!(index, "Transform passed");
                }
                Ok(TransformStep::Done(transformed)) => {
                    tracing::trace!(index, "Transform produced auth info");
                    return Ok(transformed);
                }
                Err(source) => {
                    tracing::warn!(index, error = %source, "Auth info transform failed");
                    return Err(AuthenticatorError::Transform { source });
                }
            }
        }

        Ok(info)
    }
}

async fn invoke(transform: &Transform, info: &AuthInfo) -> Result<TransformStep, BoxError> {
    match transform {
        Transform::Sync(f) => panic::catch_unwind(AssertUnwindSafe(|| f(info)))
            .map(TransformStep::Done)
            .map_err(|payload| TransformPanic::from_payload(&*payload).into()),
        Transform::Async(f) => {
            let fut = panic::catch_unwind(AssertUnwindSafe(|| f(info.clone())))
                .map_err(|payload| BoxError::from(TransformPanic::from_payload(&*payload)))?;
            AssertUnwindSafe(fut)
                .catch_unwind()
                .await
                .map_err(|payload| BoxError::from(TransformPanic::from_payload(&*payload)))?
        }
    }
}
