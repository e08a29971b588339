use std::sync::Arc;

use crate::parameter::Parameter;
use crate::request::RequestProvider;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature based on the server name the request was addressed
/// to. Useful when one service instance answers under several host names
/// (say `www.example.com` and `beta.example.com`) with different features
/// enabled on each.
///
/// Matching is exact and case sensitive; wildcard names like
/// `*.beta.example.com` are not supported.
pub struct ServerNameActivationStrategy {
    requests: Arc<dyn RequestProvider>,
}

impl ServerNameActivationStrategy {
    pub const ID: &'static str = "servername";
    pub const PARAM_SERVER_NAMES: &'static str = "servernames";

    pub fn new(requests: Arc<dyn RequestProvider>) -> Self {
        ServerNameActivationStrategy { requests }
    }
}

impl ActivationStrategy for ServerNameActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Server names (vhosts)"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_SERVER_NAMES)
            .label("Server names")
            .description(
                "A comma-separated list of server names (virtual hosts) used in request for which the feature should be active.",
            )]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        server_name_matches(
            self.requests.as_ref(),
            state.parameter(Self::PARAM_SERVER_NAMES),
        )
    }
}

pub(crate) fn server_name_matches(
    requests: &dyn RequestProvider,
    allowed_names: Option<&str>,
) -> bool {
    let request = match requests.current_request() {
        Some(request) => request,
        None => return false,
    };
    let server_name = match request.server_name() {
        Some(server_name) => server_name,
        None => return false,
    };

    util::split_list(allowed_names.unwrap_or(""))
        .iter()
        .any(|allowed| allowed == server_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestInfo;
    use crate::test_common::FixedRequestProvider;

    fn strategy_for(request: Option<RequestInfo>) -> ServerNameActivationStrategy {
        ServerNameActivationStrategy::new(Arc::new(FixedRequestProvider::new(request)))
    }

    fn state(names: &str) -> FeatureState {
        let mut state = FeatureState::new("F1".into());
        state
            .enable()
            .set_parameter(ServerNameActivationStrategy::PARAM_SERVER_NAMES, names);
        state
    }

    #[test]
    fn listed_server_name_is_active() {
        let strategy =
            strategy_for(Some(RequestInfo::new().with_server_name("beta.example.com")));
        assert!(strategy.is_active(&state("www.example.com, beta.example.com"), None));
    }

    #[test]
    fn unlisted_server_name_is_inactive() {
        let strategy = strategy_for(Some(RequestInfo::new().with_server_name("example.org")));
        assert!(!strategy.is_active(&state("www.example.com, beta.example.com"), None));
    }

    #[test]
    fn matching_is_case_sensitive_without_wildcards() {
        let strategy =
            strategy_for(Some(RequestInfo::new().with_server_name("beta.example.com")));
        assert!(!strategy.is_active(&state("Beta.example.com"), None));
        assert!(!strategy.is_active(&state("*.example.com"), None));
    }

    #[test]
    fn missing_request_or_parameter_is_inactive() {
        assert!(!strategy_for(None).is_active(&state("beta.example.com"), None));

        let strategy =
            strategy_for(Some(RequestInfo::new().with_server_name("beta.example.com")));
        assert!(!strategy.is_active(&FeatureState::new("F1".into()), None));

        let no_name = strategy_for(Some(RequestInfo::new()));
        assert!(!no_name.is_active(&state("beta.example.com"), None));
    }
}
