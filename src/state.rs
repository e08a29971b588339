use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::strategies::UsernameActivationStrategy;
use crate::util;

/// Identity of a feature: a stable name string. Two features are the same
/// feature exactly when their names are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature {
    name: String,
}

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Feature { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Feature {
    fn from(name: &str) -> Self {
        Feature::new(name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The persisted configuration of one feature: the enabled flag, the selected
/// activation strategy and its parameter values.
///
/// A state is a plain mutable value object. Callers build it up with the
/// fluent setters, hand it to a [StateRepository](crate::StateRepository),
/// and treat it as logically immutable afterwards; repositories return
/// independent copies so no mutation is shared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureState {
    feature: Feature,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    strategy_id: Option<String>,
    #[serde(default)]
    parameters: HashMap<String, String>,
}

impl FeatureState {
    /// Creates a new, disabled state for the given feature.
    pub fn new(feature: Feature) -> Self {
        FeatureState {
            feature,
            enabled: false,
            strategy_id: None,
            parameters: HashMap::new(),
        }
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    pub fn enable(&mut self) -> &mut Self {
        self.set_enabled(true)
    }

    pub fn disable(&mut self) -> &mut Self {
        self.set_enabled(false)
    }

    /// The id of the selected activation strategy, if one is selected.
    pub fn strategy_id(&self) -> Option<&str> {
        self.strategy_id.as_deref()
    }

    pub fn set_strategy_id(&mut self, strategy_id: impl Into<String>) -> &mut Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }

    /// Clears the strategy selection, reverting the feature to the legacy
    /// user list semantics.
    pub fn clear_strategy_id(&mut self) -> &mut Self {
        self.strategy_id = None;
        self
    }

    /// Returns the value of the given strategy parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn remove_parameter(&mut self, name: &str) -> &mut Self {
        self.parameters.remove(name);
        self
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn parameter_map(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// The legacy user list, parsed from the `users` parameter. Order follows
    /// the stored list; entries are trimmed.
    pub fn users(&self) -> Vec<String> {
        match util::non_blank(self.parameter(UsernameActivationStrategy::PARAM_USERS)) {
            Some(value) => util::split_and_trim(value),
            None => Vec::new(),
        }
    }

    /// Appends a user to the legacy user list, keeping entries unique while
    /// preserving their first-seen order.
    pub fn add_user(&mut self, user: impl Into<String>) -> &mut Self {
        self.add_users([user.into()])
    }

    /// Appends several users to the legacy user list. See [Self::add_user].
    pub fn add_users<I, S>(&mut self, users: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let merged = self
            .users()
            .into_iter()
            .chain(users.into_iter().map(Into::<String>::into).map(|u| u.trim().to_string()))
            .filter(|u| !u.is_empty())
            .unique()
            .join(",");
        if merged.is_empty() {
            self.remove_parameter(UsernameActivationStrategy::PARAM_USERS)
        } else {
            self.set_parameter(UsernameActivationStrategy::PARAM_USERS, merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use spectral::prelude::*;

    #[test]
    fn new_state_is_disabled_with_no_strategy() {
        let state = FeatureState::new("F1".into());
        assert!(!state.is_enabled());
        assert_that!(state.strategy_id()).is_none();
        assert_that!(state.parameter("anything")).is_none();
        assert!(state.users().is_empty());
    }

    #[test]
    fn fluent_mutation() {
        let mut state = FeatureState::new("F1".into());
        state
            .enable()
            .set_strategy_id("gradual")
            .set_parameter("percentage", "50");

        assert!(state.is_enabled());
        assert_that!(state.strategy_id()).contains_value("gradual");
        assert_that!(state.parameter("percentage")).contains_value("50");

        state.disable().clear_strategy_id().remove_parameter("percentage");
        assert!(!state.is_enabled());
        assert_that!(state.strategy_id()).is_none();
        assert_that!(state.parameter("percentage")).is_none();
    }

    #[test]
    fn user_list_keeps_order_and_uniqueness() {
        let mut state = FeatureState::new("F1".into());
        state.add_user("alice");
        state.add_users(vec!["bob", " carol ", "alice"]);

        assert_that!(state.users()).is_equal_to(vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ]);
        assert_that!(state.parameter(UsernameActivationStrategy::PARAM_USERS))
            .contains_value("alice,bob,carol");
    }

    #[test]
    fn user_list_parses_stored_parameter() {
        let mut state = FeatureState::new("F1".into());
        state.set_parameter(UsernameActivationStrategy::PARAM_USERS, "alice, bob,,carol");
        assert_that!(state.users()).is_equal_to(vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ]);
    }

    #[test]
    fn copies_are_independent() {
        let mut state = FeatureState::new("F1".into());
        state.enable().set_parameter("percentage", "50");

        let mut copy = state.clone();
        copy.disable().set_parameter("percentage", "99");

        assert!(state.is_enabled());
        assert_that!(state.parameter("percentage")).contains_value("50");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut state = FeatureState::new("F1".into());
        state.enable().set_strategy_id("gradual").set_parameter("percentage", "50");

        let json = serde_json::to_value(&state).unwrap();
        assert_json_eq!(
            json,
            serde_json::json!({
                "feature": "F1",
                "enabled": true,
                "strategyId": "gradual",
                "parameters": {"percentage": "50"}
            })
        );
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let state: FeatureState = serde_json::from_str(r#"{"feature": "F1"}"#).unwrap();
        assert_eq!(state.feature().name(), "F1");
        assert!(!state.is_enabled());
        assert_that!(state.strategy_id()).is_none();
    }
}
