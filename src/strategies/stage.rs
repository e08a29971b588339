use std::collections::HashSet;

use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategies::tokenized::{Token, TokenizedActivationStrategy};
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;

/// Activates a feature based on the deployment stages the application runs
/// in (e.g. `development`, `staging`, `production`). The active stages are
/// supplied at assembly time; the `stages` parameter lists the stages the
/// feature should be active for, case-insensitively.
///
/// A stage prefixed with the NOT operator (`!`) inverts the test: with
/// `"development,!production"` the feature is active when `development` is
/// active or when `production` is not.
#[derive(Clone, Debug)]
pub struct StageActivationStrategy {
    active_stages: HashSet<String>,
}

impl StageActivationStrategy {
    pub const ID: &'static str = "stage";
    pub const PARAM_STAGES: &'static str = "stages";

    pub fn new<I, S>(active_stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StageActivationStrategy {
            active_stages: active_stages
                .into_iter()
                .map(|stage| stage.into().to_lowercase())
                .collect(),
        }
    }
}

impl TokenizedActivationStrategy for StageActivationStrategy {
    fn token_parameter_name(&self) -> &str {
        Self::PARAM_STAGES
    }

    fn transform_token(&self, value: &str) -> String {
        value.to_lowercase()
    }

    fn is_active_for_tokens(
        &self,
        _state: &FeatureState,
        _user: Option<&FeatureUser>,
        tokens: &[Token],
    ) -> bool {
        tokens
            .iter()
            .any(|token| self.active_stages.contains(token.value()) != token.is_negated())
    }
}

impl ActivationStrategy for StageActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Deployment stage"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_STAGES)
            .label("Stage names")
            .description(
                "A comma-separated list of stage names for which the feature should be active. A stage can be negated by prefixing the name with the NOT operator (!).",
            )]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        self.evaluate(state, user)
    }
}
