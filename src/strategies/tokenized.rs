use crate::state::FeatureState;
use crate::user::FeatureUser;
use crate::util;

/// One parsed entry of a delimited list parameter, optionally negated with a
/// leading `!`. Tokens come out of [TokenizedActivationStrategy::evaluate]
/// in source list order, trimmed and with the negation prefix stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    value: String,
    negated: bool,
}

impl Token {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

/// Base behavior for strategies whose configuration is a single delimited
/// parameter of negatable tokens, e.g. `"alice,!bob,carol"`.
///
/// The base only tokenizes; implementations decide what a token means and
/// are responsible for honoring negation. The usual shape:
///
/// ```ignore
/// fn is_active_for_tokens(&self, _state, _user, tokens: &[Token]) -> bool {
///     tokens.iter().any(|t| self.matches(t.value()) != t.is_negated())
/// }
/// ```
pub trait TokenizedActivationStrategy: Send + Sync {
    /// The name of the feature state parameter holding the raw token list.
    fn token_parameter_name(&self) -> &str;

    /// Transforms a raw segment before anything else happens to it. The
    /// negation prefix is examined on the transformed value, so a
    /// lower-casing transform also lower-cases the `!`-prefixed form.
    fn transform_token(&self, value: &str) -> String {
        value.to_string()
    }

    /// Decides whether the feature is active given the parsed tokens.
    fn is_active_for_tokens(
        &self,
        state: &FeatureState,
        user: Option<&FeatureUser>,
        tokens: &[Token],
    ) -> bool;

    /// Tokenizes the configured parameter and delegates the decision to
    /// [Self::is_active_for_tokens].
    fn evaluate(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let raw = state.parameter(self.token_parameter_name()).unwrap_or("");
        let tokens: Vec<Token> = util::split_list(raw)
            .into_iter()
            .map(|segment| {
                let value = self.transform_token(&segment);
                match value.strip_prefix('!') {
                    Some(rest) => Token {
                        value: rest.to_string(),
                        negated: true,
                    },
                    None => Token {
                        value,
                        negated: false,
                    },
                }
            })
            .collect();
        self.is_active_for_tokens(state, user, &tokens)
    }
}
