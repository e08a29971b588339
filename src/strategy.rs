use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::user::FeatureUser;

/// A pluggable rule for deciding whether a feature is active.
///
/// Implementations are stateless, or hold only immutable configuration fixed
/// at construction time (a compiled pattern, an address set, a script
/// engine), and must be safe to invoke concurrently from arbitrary threads.
pub trait ActivationStrategy: Send + Sync {
    /// A unique id for this strategy. The id is persisted in
    /// [FeatureState::strategy_id](crate::FeatureState::strategy_id) and
    /// must never change once released.
    fn id(&self) -> &str;

    /// A human readable name, used for display only. Never used for lookup.
    fn name(&self) -> &str;

    /// The ordered list of configuration parameters the strategy
    /// understands. Used for validation and administrative UIs; not enforced
    /// during evaluation.
    fn parameters(&self) -> Vec<Parameter> {
        Vec::new()
    }

    /// Decides whether the feature is active. Reads its configuration from
    /// the state's parameters; `user` is the currently acting user, or None
    /// when the user could not be identified.
    ///
    /// Missing or malformed parameters must degrade to `false`, never
    /// panic: a misconfigured flag silently disables the feature rather
    /// than breaking the host application.
    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool;

    /// Sort weight for strategies participating in ordered evaluation.
    /// Lower values sort first.
    fn priority(&self) -> i32 {
        0
    }
}

/// A strategy that decides against an opaque caller-supplied context string
/// (e.g. a client-provided correlation key) rather than the acting user.
///
/// The inherited two-argument [ActivationStrategy::is_active] is
/// intentionally unsupported on these strategies and panics when called;
/// callers must go through [Self::is_active_in_context].
pub trait ContextAwareActivationStrategy: ActivationStrategy {
    /// Decides whether the feature is active for the given context. A blank
    /// context never activates.
    fn is_active_in_context(
        &self,
        state: &FeatureState,
        user: Option<&FeatureUser>,
        context: &str,
    ) -> bool;
}
