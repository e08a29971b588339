use std::sync::Arc;

use crate::strategies::{
    GradualActivationStrategy, ReleaseDateActivationStrategy, SystemPropertyActivationStrategy,
    UserRoleActivationStrategy, UsernameActivationStrategy,
};
use crate::strategy::ActivationStrategy;

/// Enumerates the activation strategies available to a
/// [FeatureManager](crate::FeatureManager), sorted by priority.
pub trait ActivationStrategyProvider: Send + Sync {
    /// All registered strategies, in priority order (lower priority first,
    /// registration order within equal priorities).
    fn strategies(&self) -> &[Arc<dyn ActivationStrategy>];

    /// Looks up a strategy by its persisted id.
    fn strategy_for(&self, id: &str) -> Option<Arc<dyn ActivationStrategy>> {
        self.strategies()
            .iter()
            .find(|strategy| strategy.id() == id)
            .cloned()
    }
}

/// A strategy registry populated explicitly at application start, either
/// with [Self::new] for the built-in strategies or from scratch with
/// [Self::empty]. Strategies that need collaborators (request providers,
/// host addresses, active stages) are constructed by the assembly code and
/// added with [Self::add_strategy].
pub struct DefaultActivationStrategyProvider {
    strategies: Vec<Arc<dyn ActivationStrategy>>,
}

impl DefaultActivationStrategyProvider {
    /// Creates a provider holding the built-in strategies that work without
    /// collaborators.
    pub fn new() -> Self {
        let mut strategies: Vec<Arc<dyn ActivationStrategy>> = vec![
            Arc::new(GradualActivationStrategy::new()),
            Arc::new(UsernameActivationStrategy::new()),
            Arc::new(UserRoleActivationStrategy::new()),
            Arc::new(ReleaseDateActivationStrategy::new()),
            Arc::new(SystemPropertyActivationStrategy::new()),
        ];
        strategies.sort_by_key(|strategy| strategy.priority());
        DefaultActivationStrategyProvider { strategies }
    }

    /// Creates a provider with no strategies registered.
    pub fn empty() -> Self {
        DefaultActivationStrategyProvider {
            strategies: Vec::new(),
        }
    }

    /// Registers a strategy. Registering two strategies with the same id is
    /// a configuration error, reported here rather than at evaluation time.
    pub fn add_strategy(&mut self, strategy: Arc<dyn ActivationStrategy>) -> Result<(), String> {
        if let Some(existing) = self.strategies.iter().find(|s| s.id() == strategy.id()) {
            return Err(format!(
                "duplicate activation strategy id '{}' ({} and {})",
                existing.id(),
                existing.name(),
                strategy.name()
            ));
        }
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|strategy| strategy.priority());
        Ok(())
    }

    /// Registers several strategies. See [Self::add_strategy].
    pub fn add_strategies<I>(&mut self, strategies: I) -> Result<(), String>
    where
        I: IntoIterator<Item = Arc<dyn ActivationStrategy>>,
    {
        for strategy in strategies {
            self.add_strategy(strategy)?;
        }
        Ok(())
    }
}

impl Default for DefaultActivationStrategyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationStrategyProvider for DefaultActivationStrategyProvider {
    fn strategies(&self) -> &[Arc<dyn ActivationStrategy>] {
        &self.strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FeatureState;
    use crate::user::FeatureUser;
    use spectral::prelude::*;

    struct CustomStrategy {
        id: &'static str,
        priority: i32,
    }

    impl ActivationStrategy for CustomStrategy {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn is_active(&self, _state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
            false
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn ids(provider: &DefaultActivationStrategyProvider) -> Vec<&str> {
        provider.strategies().iter().map(|s| s.id()).collect()
    }

    #[test]
    fn loads_built_in_strategies() {
        let provider = DefaultActivationStrategyProvider::new();
        let ids = ids(&provider);
        assert!(ids.contains(&"gradual"));
        assert!(ids.contains(&"username"));
        assert!(ids.contains(&"user-role"));
        assert!(ids.contains(&"release-date"));
        assert!(ids.contains(&"system-property"));
    }

    #[test]
    fn username_strategy_sorts_last() {
        let provider = DefaultActivationStrategyProvider::new();
        assert_eq!(ids(&provider).last(), Some(&"username"));
    }

    #[test]
    fn looks_up_strategies_by_id() {
        let provider = DefaultActivationStrategyProvider::new();
        assert_eq!(provider.strategy_for("gradual").unwrap().id(), "gradual");
        assert_that!(provider.strategy_for("nope")).is_none();
        assert_that!(provider.strategy_for("Gradual")).is_none();
    }

    #[test]
    fn custom_strategies_can_be_added() {
        let mut provider = DefaultActivationStrategyProvider::new();
        provider
            .add_strategy(Arc::new(CustomStrategy {
                id: "custom",
                priority: 0,
            }))
            .unwrap();
        assert!(provider.strategy_for("custom").is_some());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut provider = DefaultActivationStrategyProvider::new();
        let result = provider.add_strategy(Arc::new(CustomStrategy {
            id: "gradual",
            priority: 0,
        }));
        let message = result.unwrap_err();
        assert!(message.contains("duplicate activation strategy id 'gradual'"));
    }

    #[test]
    fn strategies_sort_by_priority() {
        let mut provider = DefaultActivationStrategyProvider::empty();
        provider
            .add_strategies([
                Arc::new(CustomStrategy {
                    id: "late",
                    priority: 50,
                }) as Arc<dyn ActivationStrategy>,
                Arc::new(CustomStrategy {
                    id: "early",
                    priority: -10,
                }),
                Arc::new(CustomStrategy {
                    id: "middle",
                    priority: 0,
                }),
            ])
            .unwrap();
        assert_that!(ids(&provider)).is_equal_to(vec!["early", "middle", "late"]);
    }
}
