use std::sync::Arc;

use crate::parameter::Parameter;
use crate::request::RequestProvider;
use crate::state::FeatureState;
use crate::strategies::server_name::server_name_matches;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;

/// Activates a feature based on the virtual host name of the request. Same
/// rule as [ServerNameActivationStrategy](crate::ServerNameActivationStrategy),
/// kept as a distinct strategy id and parameter name for installations that
/// configure their hosts as vhosts.
pub struct VhostNameActivationStrategy {
    requests: Arc<dyn RequestProvider>,
}

impl VhostNameActivationStrategy {
    pub const ID: &'static str = "vhost";
    pub const PARAM_VHOST_NAMES: &'static str = "vhosts";

    pub fn new(requests: Arc<dyn RequestProvider>) -> Self {
        VhostNameActivationStrategy { requests }
    }
}

impl ActivationStrategy for VhostNameActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Virtual host (vhost) names"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_VHOST_NAMES)
            .label("vhost names")
            .description(
                "A comma-separated list of virtual host (vhost) server names used in request for which the feature should be active.",
            )]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        server_name_matches(
            self.requests.as_ref(),
            state.parameter(Self::PARAM_VHOST_NAMES),
        )
    }
}
