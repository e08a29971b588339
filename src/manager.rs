use std::sync::Arc;

use log::warn;

use crate::metadata::{FeatureMetadata, FeatureMetadataSource, StaticFeatureMetadataSource};
use crate::registry::{ActivationStrategyProvider, DefaultActivationStrategyProvider};
use crate::repository::StateRepository;
use crate::state::{Feature, FeatureState};
use crate::strategies::UsernameActivationStrategy;
use crate::strategy::ActivationStrategy;
use crate::user::{FeatureUser, NullUserProvider, UserProvider};
use crate::util;

/// The central entry point for feature decisions: loads the persisted state
/// of a feature, dispatches to the selected activation strategy and returns
/// the final active/inactive answer.
///
/// Evaluation is fail-safe by design. A disabled feature, an unknown
/// strategy id or a misconfigured strategy all yield `false`; flag checks
/// sit on hot paths of the host application and must never take it down.
pub struct FeatureManager {
    repository: Arc<dyn StateRepository>,
    user_provider: Arc<dyn UserProvider>,
    metadata_source: Arc<dyn FeatureMetadataSource>,
    strategy_provider: Arc<dyn ActivationStrategyProvider>,
}

impl FeatureManager {
    pub fn builder() -> FeatureManagerBuilder {
        FeatureManagerBuilder::new()
    }

    /// Checks whether the feature is active for the currently acting user.
    ///
    /// Without persisted state the answer comes from the feature metadata's
    /// enabled-by-default flag. With state, a disabled feature is never
    /// active; an enabled feature without a strategy selection falls back
    /// to the legacy user list rule; otherwise the selected strategy
    /// decides.
    pub fn is_active(&self, feature: &Feature) -> bool {
        let state = match self.repository.feature_state(feature) {
            Some(state) => state,
            None => {
                return self
                    .metadata_source
                    .metadata_for(feature)
                    .map(|metadata| metadata.is_enabled_by_default())
                    .unwrap_or(false)
            }
        };

        // disabled features are never active
        if !state.is_enabled() {
            return false;
        }

        let user = self.user_provider.current_user();

        match util::non_blank(state.strategy_id()) {
            None => UsernameActivationStrategy::new().is_active(&state, user.as_ref()),
            Some(strategy_id) => match self.strategy_provider.strategy_for(strategy_id) {
                Some(strategy) => strategy.is_active(&state, user.as_ref()),
                None => {
                    warn!(
                        "unknown activation strategy '{}' configured for feature {}",
                        strategy_id, feature
                    );
                    false
                }
            },
        }
    }

    /// Returns the persisted state of the feature, or a fresh default state
    /// derived from the feature metadata when nothing is persisted yet.
    pub fn feature_state(&self, feature: &Feature) -> FeatureState {
        self.repository.feature_state(feature).unwrap_or_else(|| {
            let mut state = FeatureState::new(feature.clone());
            if let Some(metadata) = self.metadata_source.metadata_for(feature) {
                state.set_enabled(metadata.is_enabled_by_default());
            }
            state
        })
    }

    /// Persists the given feature state.
    pub fn set_feature_state(&self, state: FeatureState) {
        self.repository.set_feature_state(state);
    }

    /// The currently acting user, as reported by the user provider.
    pub fn current_feature_user(&self) -> Option<FeatureUser> {
        self.user_provider.current_user()
    }

    /// All features known to the metadata source.
    pub fn features(&self) -> Vec<Feature> {
        self.metadata_source.features()
    }

    pub fn metadata_for(&self, feature: &Feature) -> Option<FeatureMetadata> {
        self.metadata_source.metadata_for(feature)
    }
}

/// Assembles a [FeatureManager]. The state repository is the one required
/// collaborator; the user provider defaults to
/// [NullUserProvider], the metadata source to an empty table and the
/// strategy provider to the built-in strategies.
pub struct FeatureManagerBuilder {
    repository: Option<Arc<dyn StateRepository>>,
    user_provider: Arc<dyn UserProvider>,
    metadata_source: Arc<dyn FeatureMetadataSource>,
    strategy_provider: Option<Arc<dyn ActivationStrategyProvider>>,
}

impl FeatureManagerBuilder {
    pub fn new() -> Self {
        FeatureManagerBuilder {
            repository: None,
            user_provider: Arc::new(NullUserProvider),
            metadata_source: Arc::new(StaticFeatureMetadataSource::new()),
            strategy_provider: None,
        }
    }

    pub fn state_repository(mut self, repository: Arc<dyn StateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn user_provider(mut self, user_provider: Arc<dyn UserProvider>) -> Self {
        self.user_provider = user_provider;
        self
    }

    pub fn metadata_source(mut self, metadata_source: Arc<dyn FeatureMetadataSource>) -> Self {
        self.metadata_source = metadata_source;
        self
    }

    pub fn strategy_provider(
        mut self,
        strategy_provider: Arc<dyn ActivationStrategyProvider>,
    ) -> Self {
        self.strategy_provider = Some(strategy_provider);
        self
    }

    /// Builds the manager, failing fast when a required collaborator is
    /// missing.
    pub fn build(self) -> Result<FeatureManager, String> {
        let repository = self
            .repository
            .ok_or_else(|| "a state repository is required to build a feature manager".to_string())?;
        let strategy_provider = self
            .strategy_provider
            .unwrap_or_else(|| Arc::new(DefaultActivationStrategyProvider::new()));

        Ok(FeatureManager {
            repository,
            user_provider: self.user_provider,
            metadata_source: self.metadata_source,
            strategy_provider,
        })
    }
}

impl Default for FeatureManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
