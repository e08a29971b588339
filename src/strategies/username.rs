use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;

/// Restricts a feature to an explicit list of user names. An empty list
/// means no restriction: the feature is active for everyone, including
/// anonymous users.
///
/// This is also the rule applied when a feature has no strategy selected at
/// all, which is how user lists worked before strategies existed.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsernameActivationStrategy;

impl UsernameActivationStrategy {
    pub const ID: &'static str = "username";
    pub const PARAM_USERS: &'static str = "users";

    pub fn new() -> Self {
        UsernameActivationStrategy
    }
}

impl ActivationStrategy for UsernameActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Users by name"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_USERS)
            .label("Users")
            .large_text()
            .description("A list of users for which the feature is active.")]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let users = state.users();
        if users.is_empty() {
            return true;
        }

        match user {
            Some(user) if user.has_name() => {
                let name = user.name().unwrap_or_default();
                users.iter().any(|candidate| candidate == name)
            }
            _ => false,
        }
    }

    fn priority(&self) -> i32 {
        100
    }
}
