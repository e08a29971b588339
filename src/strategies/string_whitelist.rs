use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::{ActivationStrategy, ContextAwareActivationStrategy};
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature for caller-supplied context strings on a whitelist,
/// e.g. tenant identifiers or correlation keys the application passes in at
/// the call site.
///
/// This strategy decides on the context alone; the plain two-argument
/// [ActivationStrategy::is_active] cannot work and panics when called.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringWhitelistActivationStrategy;

impl StringWhitelistActivationStrategy {
    pub const ID: &'static str = "string_whitelist";
    pub const PARAM_WHITELIST: &'static str = "whitelist";

    pub fn new() -> Self {
        StringWhitelistActivationStrategy
    }
}

impl ActivationStrategy for StringWhitelistActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "String whitelist"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_WHITELIST)
            .label("Whitelist")
            .description("A comma-separated list of strings for which the feature is active.")]
    }

    /// Unsupported: this strategy needs an evaluation context.
    fn is_active(&self, _state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        panic!("the string whitelist strategy decides on a context; call is_active_in_context");
    }
}

impl ContextAwareActivationStrategy for StringWhitelistActivationStrategy {
    fn is_active_in_context(
        &self,
        state: &FeatureState,
        _user: Option<&FeatureUser>,
        context: &str,
    ) -> bool {
        let whitelist = match util::non_blank(state.parameter(Self::PARAM_WHITELIST)) {
            Some(whitelist) => whitelist,
            None => return false,
        };

        let context = context.trim();
        if context.is_empty() {
            return false;
        }

        util::split_and_trim(whitelist).iter().any(|entry| entry == context)
    }
}
