use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::state::{Feature, FeatureState};

/// Persistence contract for feature state.
///
/// Implementations must be safe to call concurrently. Reads return owned,
/// independent copies: mutating a returned state never affects the stored
/// one until it is written back with [Self::set_feature_state]. No
/// cross-feature transactional guarantee is required.
pub trait StateRepository: Send + Sync {
    /// Returns the persisted state of the feature, or None if the feature
    /// was never persisted.
    fn feature_state(&self, feature: &Feature) -> Option<FeatureState>;

    /// Persists the given state, replacing any previous state of the same
    /// feature.
    fn set_feature_state(&self, state: FeatureState);
}

/// A state repository holding everything in memory. Feature state is lost
/// when the process stops; mostly useful for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    states: RwLock<HashMap<String, FeatureState>>,
}

impl InMemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateRepository for InMemoryStateRepository {
    fn feature_state(&self, feature: &Feature) -> Option<FeatureState> {
        self.states
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(feature.name())
            .cloned()
    }

    fn set_feature_state(&self, state: FeatureState) {
        self.states
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(state.feature().name().to_string(), state);
    }
}
