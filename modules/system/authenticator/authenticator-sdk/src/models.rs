//! Domain models for the authenticator module.

use serde::{Deserialize, Serialize};

/// Identity produced by a strategy on acceptance. The engine imposes no schema.
pub type Principal = serde_json::Value;

/// Opaque authorization metadata returned alongside an accepted principal.
pub type AuthInfo = serde_json::Map<String, serde_json::Value>;

/// Protocol-level hint attached to a rejection (a string, a list, ...).
pub type Challenge = serde_json::Value;

/// Caller-supplied options of one authentication call, handed unchanged to
/// every strategy attempt and to the session login (e.g. `{"scope": "email"}`).
pub type CallOptions = serde_json::Map<String, serde_json::Value>;

/// Session property that receives the principal after login.
pub const DEFAULT_USER_PROPERTY: &str = "user";

/// Session property used by `authorize` when the caller names none.
pub const DEFAULT_ASSIGN_PROPERTY: &str = "account";

/// Conventional status of a rejection that carries no explicit status.
pub const DEFAULT_FAILURE_STATUS: u16 = 401;

/// A single strategy's rejection, recorded in chain order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub challenge: Option<Challenge>,
    pub status: Option<u16>,
}

impl Failure {
    /// Status reported by the strategy, or 401 when it gave none.
    #[must_use]
    pub fn status_or_default(&self) -> u16 {
        self.status.unwrap_or(DEFAULT_FAILURE_STATUS)
    }
}

/// Rejection data exposed once every strategy in a chain has rejected.
///
/// Single-strategy requests expose the only failure as scalars, multi-strategy
/// requests expose every failure as parallel sequences in chain order. Callers
/// rely on this shape to tell the two request kinds apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Single {
        challenge: Option<Challenge>,
        status: Option<u16>,
    },
    Multi {
        challenges: Vec<Option<Challenge>>,
        statuses: Vec<Option<u16>>,
    },
}

/// Terminal result of a successful (non-erroring) authentication call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Authenticated { principal: Principal },
    Rejected(Rejection),
}

impl Verdict {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal } => Some(principal),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Authenticated { .. } => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}
