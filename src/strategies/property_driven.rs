use crate::state::FeatureState;
use crate::user::FeatureUser;
use crate::util;

const DEFAULT_PROPERTY_PREFIX: &str = "togglz.";
const DEFAULT_EXPECTED_VALUE: &str = "true";

/// Base behavior for strategies that activate a feature off the value of an
/// external property: a system/environment property, an HTTP header,
/// whatever an implementation can look up by name.
///
/// The base resolves the property *name* (an explicit parameter, falling
/// back to a name derived from the feature) and compares the resolved
/// *value* against an expected value; only the lookup itself varies per
/// implementation. A feature is never activated when no property value is
/// found.
pub trait PropertyDrivenActivationStrategy: Send + Sync {
    /// The parameter naming the property to look up. When that parameter is
    /// blank the name falls back to `togglz.` + the feature name.
    fn property_name_parameter(&self) -> &str {
        "name"
    }

    /// The parameter holding the expected property value. When absent, the
    /// property is expected to be the literal `true`.
    fn expected_value_parameter(&self) -> &str {
        "value"
    }

    /// Resolves the name of the property to look up for this state.
    fn property_name(&self, state: &FeatureState) -> String {
        match util::non_blank(state.parameter(self.property_name_parameter())) {
            Some(name) => name.to_string(),
            None => format!("{}{}", DEFAULT_PROPERTY_PREFIX, state.feature().name()),
        }
    }

    /// Looks up the raw value of the named property, or None when the
    /// property does not exist in this implementation's source.
    fn property_value(
        &self,
        state: &FeatureState,
        user: Option<&FeatureUser>,
        name: &str,
    ) -> Option<String>;

    /// Resolves the property and compares it against the expected value,
    /// case-insensitively. A blank or missing property value never
    /// activates.
    ///
    /// Note the comparison is plain string equality, not boolean
    /// conversion: an expected value of `false` is matched by a property
    /// whose value is the word `false`, and that match *activates* the
    /// feature.
    fn evaluate(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let name = self.property_name(state);
        let expected = state
            .parameter(self.expected_value_parameter())
            .unwrap_or(DEFAULT_EXPECTED_VALUE);
        match self.property_value(state, user, &name) {
            Some(value) if !util::is_blank(&value) => expected.eq_ignore_ascii_case(&value),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use std::collections::HashMap;

    struct MapBacked {
        properties: HashMap<String, String>,
    }

    impl PropertyDrivenActivationStrategy for MapBacked {
        fn property_value(
            &self,
            _state: &FeatureState,
            _user: Option<&FeatureUser>,
            name: &str,
        ) -> Option<String> {
            self.properties.get(name).cloned()
        }
    }

    fn strategy(properties: HashMap<String, String>) -> MapBacked {
        MapBacked { properties }
    }

    fn state_with_name(property: &str) -> FeatureState {
        let mut state = FeatureState::new("F1".into());
        state.set_parameter("name", property);
        state
    }

    #[test]
    fn missing_property_is_inactive() {
        let strategy = strategy(hashmap! {});
        assert!(!strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn true_property_is_active() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "true".to_string()});
        assert!(strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn comparison_ignores_case() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "TRUE".to_string()});
        assert!(strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn false_property_is_inactive_by_default() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "false".to_string()});
        assert!(!strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn garbage_property_is_inactive() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "enabledish".to_string()});
        assert!(!strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn blank_property_is_inactive() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "  ".to_string()});
        assert!(!strategy.evaluate(&state_with_name("foo.bar"), None));
    }

    #[test]
    fn expected_value_parameter_overrides_true() {
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "staging".to_string()});
        let mut state = state_with_name("foo.bar");
        state.set_parameter("value", "staging");
        assert!(strategy.evaluate(&state, None));

        state.set_parameter("value", "production");
        assert!(!strategy.evaluate(&state, None));
    }

    #[test]
    fn expected_false_matches_literal_false() {
        // string equality, not boolean semantics: "false" == "false" activates
        let strategy = strategy(hashmap! {"foo.bar".to_string() => "false".to_string()});
        let mut state = state_with_name("foo.bar");
        state.set_parameter("value", "false");
        assert!(strategy.evaluate(&state, None));
    }

    #[test]
    fn property_name_falls_back_to_feature_derived_name() {
        let strategy = strategy(hashmap! {"togglz.F1".to_string() => "true".to_string()});
        let state = FeatureState::new("F1".into());
        assert_eq!(strategy.property_name(&state), "togglz.F1");
        assert!(strategy.evaluate(&state, None));
    }
}
