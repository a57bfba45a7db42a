//! Name to strategy mapping.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use authenticator_sdk::{AuthenticatorError, Credentials, Strategy};

/// Immutable view of the registered strategies.
pub type StrategyMap<C> = HashMap<String, Arc<dyn Strategy<C>>>;

/// Registered strategies, keyed by name.
///
/// Mutations publish a new map; readers keep whatever snapshot they loaded,
/// so a chain never sees a half-applied registration.
pub struct StrategyRegistry<C: Credentials> {
    strategies: ArcSwap<StrategyMap<C>>,
}

impl<C: Credentials> Default for StrategyRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Credentials> StrategyRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Register `strategy` under `name`, or under the strategy's declared
    /// name when `name` is absent or empty. Replaces any previous entry.
    ///
    /// Returns the name the strategy was registered under.
    ///
    /// # Errors
    ///
    /// Returns `MissingStrategyName` if no non-empty name can be determined.
    #[allow(clippy::needless_pass_by_value)] // cloned into each rcu attempt
    pub fn register(
        &self,
        name: Option<&str>,
        strategy: Arc<dyn Strategy<C>>,
    ) -> Result<String, AuthenticatorError> {
        let name = name
            .filter(|n| !n.is_empty())
            .or_else(|| strategy.name().filter(|n| !n.is_empty()))
            .map(str::to_owned)
            .ok_or(AuthenticatorError::MissingStrategyName)?;

        self.strategies.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(name.clone(), Arc::clone(&strategy));
            next
        });
        tracing::debug!(strategy = %name, "Registered authentication strategy");

        Ok(name)
    }

    /// Remove the strategy registered under `name`. Returns whether it existed.
    pub fn unregister(&self, name: &str) -> bool {
        if !self.strategies.load().contains_key(name) {
            return false;
        }

        let previous = self.strategies.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.remove(name);
            next
        });
        let removed = previous.contains_key(name);
        if removed {
            tracing::debug!(strategy = %name, "Unregistered authentication strategy");
        }
        removed
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Strategy<C>>> {
        self.strategies.load().get(name).cloned()
    }

    /// Current set of strategies, unaffected by later registrations.
    #[must_use]
    pub fn snapshot(&self) -> Arc<StrategyMap<C>> {
        self.strategies.load_full()
    }

    /// Registered names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.load().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
