use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategies::property_driven::PropertyDrivenActivationStrategy;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;

/// Drives a feature off a process environment property: the feature is
/// active when the named variable is set to the expected value (the literal
/// `true` unless the `value` parameter says otherwise).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemPropertyActivationStrategy;

impl SystemPropertyActivationStrategy {
    pub const ID: &'static str = "system-property";
    pub const PARAM_NAME: &'static str = "name";
    pub const PARAM_VALUE: &'static str = "value";

    pub fn new() -> Self {
        SystemPropertyActivationStrategy
    }
}

impl PropertyDrivenActivationStrategy for SystemPropertyActivationStrategy {
    fn property_value(
        &self,
        _state: &FeatureState,
        _user: Option<&FeatureUser>,
        name: &str,
    ) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ActivationStrategy for SystemPropertyActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "System property"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::named(Self::PARAM_NAME)
                .label("Property name")
                .optional()
                .description("The name of the property to be used to determine whether the feature is enabled."),
            Parameter::named(Self::PARAM_VALUE)
                .label("Property value")
                .optional()
                .description("Enable the feature when this value matches the property value."),
        ]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        self.evaluate(state, user)
    }
}
