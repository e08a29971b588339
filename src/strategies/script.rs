use chrono::Local;
use log::error;
use rhai::{Dynamic, Engine, Map, Scope};

use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::{AttributeValue, FeatureUser};
use crate::util;

/// Decides feature activation by evaluating a configured script with an
/// embedded [rhai] interpreter.
///
/// The script sees three scope variables: `user` (a map with `name`,
/// `feature_admin` and `attributes`, or unit when no user is acting),
/// `date` (the current local time as an RFC 3339 string) and `timestamp`
/// (epoch seconds). The feature is active only when the script evaluates to
/// the boolean `true`; any other result, an unknown language, or an
/// evaluation error leaves the feature inactive.
pub struct ScriptEngineActivationStrategy {
    engine: Engine,
}

impl ScriptEngineActivationStrategy {
    pub const ID: &'static str = "script";
    pub const PARAM_LANG: &'static str = "lang";
    pub const PARAM_SCRIPT: &'static str = "script";

    const LANGUAGE: &'static str = "rhai";

    pub fn new() -> Self {
        ScriptEngineActivationStrategy {
            engine: Engine::new(),
        }
    }
}

impl Default for ScriptEngineActivationStrategy {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute_to_dynamic(value: &AttributeValue) -> Dynamic {
    match value {
        AttributeValue::String(s) => Dynamic::from(s.clone()),
        AttributeValue::Bool(b) => Dynamic::from(*b),
        AttributeValue::Number(n) => Dynamic::from(*n),
        AttributeValue::Array(values) => {
            Dynamic::from_array(values.iter().map(attribute_to_dynamic).collect())
        }
        AttributeValue::Null => Dynamic::UNIT,
    }
}

fn user_to_dynamic(user: Option<&FeatureUser>) -> Dynamic {
    let user = match user {
        Some(user) => user,
        None => return Dynamic::UNIT,
    };

    let mut attributes = Map::new();
    for (name, value) in user.attributes() {
        attributes.insert(name.as_str().into(), attribute_to_dynamic(value));
    }

    let mut map = Map::new();
    map.insert(
        "name".into(),
        match user.name() {
            Some(name) => Dynamic::from(name.to_string()),
            None => Dynamic::UNIT,
        },
    );
    map.insert("feature_admin".into(), Dynamic::from(user.is_feature_admin()));
    map.insert("attributes".into(), Dynamic::from_map(attributes));
    Dynamic::from_map(map)
}

impl ActivationStrategy for ScriptEngineActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Scripted rule"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter::named(Self::PARAM_LANG)
                .label("Language")
                .description("The script language to use. Only 'rhai' is supported."),
            Parameter::named(Self::PARAM_SCRIPT)
                .label("Script")
                .large_text()
                .description(
                    "The script to check if the feature is active. The variable 'user' refers to the current acting user, 'date' to the current time as an RFC 3339 string and 'timestamp' to the current epoch seconds.",
                ),
        ]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let lang = state.parameter(Self::PARAM_LANG).unwrap_or("");
        if !lang.trim().eq_ignore_ascii_case(Self::LANGUAGE) {
            error!("could not find script engine for {:?}", lang);
            return false;
        }

        let script = match util::non_blank(state.parameter(Self::PARAM_SCRIPT)) {
            Some(script) => script,
            None => {
                error!("no script configured for feature {}", state.feature());
                return false;
            }
        };

        let now = Local::now();
        let mut scope = Scope::new();
        scope.push_dynamic("user", user_to_dynamic(user));
        scope.push("date", now.to_rfc3339());
        scope.push("timestamp", now.timestamp());

        match self.engine.eval_with_scope::<Dynamic>(&mut scope, script) {
            Ok(result) => matches!(result.as_bool(), Ok(true)),
            Err(e) => {
                error!(
                    "could not evaluate script for feature {}: {}",
                    state.feature(),
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn state(lang: &str, script: &str) -> FeatureState {
        let mut state = FeatureState::new("F1".into());
        state
            .enable()
            .set_strategy_id(ScriptEngineActivationStrategy::ID)
            .set_parameter(ScriptEngineActivationStrategy::PARAM_LANG, lang)
            .set_parameter(ScriptEngineActivationStrategy::PARAM_SCRIPT, script);
        state
    }

    #[test_case("true", true; "boolean literal true")]
    #[test_case("false", false; "boolean literal false")]
    #[test_case("1 == 1", true; "boolean expression")]
    #[test_case("40 + 2", false; "non boolean result")]
    #[test_case("\"true\"", false; "string true is not boolean true")]
    #[test_case("this is not a script(", false; "parse error")]
    #[test_case("undefined_fn()", false; "runtime error")]
    fn script_results(script: &str, expected: bool) {
        let strategy = ScriptEngineActivationStrategy::new();
        assert_eq!(strategy.is_active(&state("rhai", script), None), expected);
    }

    #[test]
    fn unknown_language_is_inactive() {
        let strategy = ScriptEngineActivationStrategy::new();
        assert!(!strategy.is_active(&state("groovy", "true"), None));

        let mut no_lang = FeatureState::new("F1".into());
        no_lang
            .enable()
            .set_parameter(ScriptEngineActivationStrategy::PARAM_SCRIPT, "true");
        assert!(!strategy.is_active(&no_lang, None));
    }

    #[test]
    fn language_name_is_case_insensitive() {
        let strategy = ScriptEngineActivationStrategy::new();
        assert!(strategy.is_active(&state("Rhai", "true"), None));
    }

    #[test]
    fn missing_script_is_inactive() {
        let strategy = ScriptEngineActivationStrategy::new();
        let mut state = FeatureState::new("F1".into());
        state
            .enable()
            .set_parameter(ScriptEngineActivationStrategy::PARAM_LANG, "rhai");
        assert!(!strategy.is_active(&state, None));
    }

    #[test]
    fn user_is_bound_into_scope() {
        let strategy = ScriptEngineActivationStrategy::new();
        let alice = FeatureUser::named("alice").attribute("tier", "gold");

        let by_name = state("rhai", r#"user.name == "alice""#);
        assert!(strategy.is_active(&by_name, Some(&alice)));
        assert!(!strategy.is_active(&by_name, Some(&FeatureUser::named("bob"))));
        assert!(!strategy.is_active(&by_name, None));

        let by_attribute = state("rhai", r#"user.attributes.tier == "gold""#);
        assert!(strategy.is_active(&by_attribute, Some(&alice)));
    }

    #[test]
    fn date_and_timestamp_are_bound_into_scope() {
        let strategy = ScriptEngineActivationStrategy::new();
        assert!(strategy.is_active(&state("rhai", "timestamp > 0"), None));
        assert!(strategy.is_active(&state("rhai", "date.len() > 0"), None));
    }
}
