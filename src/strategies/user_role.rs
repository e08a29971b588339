use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature when the acting user holds at least one of the
/// configured roles.
///
/// The strategy is not coupled to any particular security framework: it
/// only expects the user provider to populate a `roles` attribute with the
/// granted authorities. Any collection shape works, including a single bare
/// string.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserRoleActivationStrategy;

impl UserRoleActivationStrategy {
    pub const ID: &'static str = "user-role";
    pub const PARAM_ROLES: &'static str = "roles";
    pub const USER_ATTRIBUTE_ROLES: &'static str = "roles";

    pub fn new() -> Self {
        UserRoleActivationStrategy
    }
}

impl ActivationStrategy for UserRoleActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Users by role"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_ROLES)
            .label("Roles")
            .large_text()
            .description("A list of user roles for which the feature is active.")]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let user = match user {
            Some(user) => user,
            None => return false,
        };

        let user_roles = match user.get_attribute(Self::USER_ATTRIBUTE_ROLES) {
            Some(attribute) => attribute.string_values(),
            None => return false,
        };
        if user_roles.is_empty() {
            return false;
        }

        match util::non_blank(state.parameter(Self::PARAM_ROLES)) {
            Some(raw) => util::split_and_trim(raw)
                .iter()
                .any(|role| user_roles.contains(&role.as_str())),
            None => false,
        }
    }
}
