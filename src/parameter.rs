use regex::Regex;

/// Describes one named configuration input of an
/// [ActivationStrategy](crate::ActivationStrategy).
///
/// Parameters are declared once, when the strategy is defined, and describe
/// how the strategy wants to be configured: a stable name used to store the
/// value in a [FeatureState](crate::FeatureState), a display label, and an
/// optional validation pattern. They carry no value themselves; values live
/// in the feature state.
#[derive(Clone, Debug)]
pub struct Parameter {
    name: String,
    label: String,
    description: Option<String>,
    optional: bool,
    large_text: bool,
    pattern: Option<Regex>,
}

impl Parameter {
    /// Starts a new parameter definition with the given name. The name is the
    /// key used to store and retrieve the value from the feature state, so it
    /// must never change once released. The label defaults to the name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.trim().is_empty(), "parameter name must not be blank");
        Parameter {
            label: name.clone(),
            name,
            description: None,
            optional: false,
            large_text: false,
            pattern: None,
        }
    }

    /// Sets a human readable label for the parameter.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets a description displayed alongside the parameter.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Hints that values are typically large, so an editor should offer a
    /// text area rather than a single line input.
    pub fn large_text(mut self) -> Self {
        self.large_text = true;
        self
    }

    /// Requires values to fully match the given regular expression.
    ///
    /// Panics if the pattern does not compile; parameter definitions are
    /// static strategy metadata, so a bad pattern is a programming error.
    pub fn matching(mut self, pattern: &str) -> Self {
        let anchored = format!("^(?:{})$", pattern);
        self.pattern = Some(Regex::new(&anchored).expect("invalid parameter pattern"));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_large_text(&self) -> bool {
        self.large_text
    }

    /// Checks a candidate value against the validation pattern. Always true
    /// when no pattern was declared.
    pub fn is_valid(&self, value: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(value),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectral::prelude::*;
    use test_case::test_case;

    #[test]
    fn label_defaults_to_name() {
        let param = Parameter::named("percentage");
        assert_eq!(param.name(), "percentage");
        assert_eq!(param.display_label(), "percentage");
        assert_that!(param.get_description()).is_none();
        assert!(!param.is_optional());
        assert!(!param.is_large_text());
    }

    #[test]
    fn builder_sets_all_attributes() {
        let param = Parameter::named("users")
            .label("Users")
            .description("A list of users for which the feature is active.")
            .optional()
            .large_text();
        assert_eq!(param.display_label(), "Users");
        assert_that!(param.get_description())
            .contains_value("A list of users for which the feature is active.");
        assert!(param.is_optional());
        assert!(param.is_large_text());
    }

    #[test]
    fn valid_without_pattern() {
        let param = Parameter::named("anything");
        assert!(param.is_valid(""));
        assert!(param.is_valid("some value"));
    }

    #[test_case("0", true)]
    #[test_case("42", true)]
    #[test_case("100", true)]
    #[test_case("999", true)]
    #[test_case("1000", false; "too many digits")]
    #[test_case("4x", false)]
    #[test_case("", false; "empty value")]
    #[test_case(" 42", false; "no trimming")]
    fn pattern_must_match_whole_value(value: &str, expected: bool) {
        let param = Parameter::named("percentage").matching(r"\d{1,3}");
        assert_eq!(param.is_valid(value), expected);
    }
}
