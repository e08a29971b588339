use std::collections::HashMap;
use std::sync::Arc;

use crate::parameter::Parameter;
use crate::request::RequestProvider;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature when the request carries one of the configured query
/// parameters, e.g. to let testers flip a feature on with
/// `?ft-preview=true`.
///
/// The `params` parameter lists `name` or `name=value` entries. A bare name
/// matches any request carrying that parameter; `name=value` additionally
/// requires one of the parameter's values to match. Query parameters of the
/// referer URL count as well, so the activation survives in-site
/// navigation, but they never override a parameter the request itself
/// carries.
pub struct UrlParameterActivationStrategy {
    requests: Arc<dyn RequestProvider>,
}

impl UrlParameterActivationStrategy {
    pub const ID: &'static str = "url-parameter";
    pub const PARAM_URL_PARAMS: &'static str = "params";

    pub fn new(requests: Arc<dyn RequestProvider>) -> Self {
        UrlParameterActivationStrategy { requests }
    }
}

/// Parses the query part of a referer URL into grouped name/value pairs. A
/// pair without `=` yields a name with no values.
fn referer_query_params(referer: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    let query = match referer.split_once('?') {
        Some((_, query)) => query.split('#').next().unwrap_or(""),
        None => return params,
    };

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        match pair.split_once('=') {
            Some((name, value)) if !name.is_empty() => {
                params
                    .entry(util::percent_decode(name))
                    .or_default()
                    .push(util::percent_decode(value));
            }
            _ => {
                params.entry(pair.to_string()).or_default();
            }
        }
    }

    params
}

impl ActivationStrategy for UrlParameterActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "URL parameter"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_URL_PARAMS)
            .label("URL parameters")
            .description(
                "A comma-separated list of name[=value] pairs for which the feature should be active. If no value is specified, simply having the parameter present will activate the feature.",
            )]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        let request = match self.requests.current_request() {
            Some(request) => request,
            None => return false,
        };

        let raw = match util::non_blank(state.parameter(Self::PARAM_URL_PARAMS)) {
            Some(raw) => raw,
            None => return false,
        };

        let mut params = request.query_params().clone();
        if let Some(referer) = request.referer() {
            for (name, values) in referer_query_params(referer) {
                params.entry(name).or_insert(values);
            }
        }

        for allowed in util::split_and_trim(raw) {
            let (name, expected) = match allowed.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (allowed.as_str(), None),
            };

            if let Some(values) = params.get(name) {
                match expected {
                    None => return true,
                    Some(expected) => {
                        if values.iter().any(|value| value == expected) {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }
}
