use std::collections::HashSet;
use std::net::IpAddr;

use log::warn;

use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// Activates a feature only on servers with one of the configured IP
/// addresses, e.g. to canary a feature on a single machine of a fleet.
///
/// The addresses of the local machine are captured at assembly time and
/// handed to the constructor; the strategy itself performs no interface
/// discovery.
#[derive(Clone, Debug)]
pub struct ServerIpActivationStrategy {
    addresses: HashSet<IpAddr>,
}

impl ServerIpActivationStrategy {
    pub const ID: &'static str = "server-ip";
    pub const PARAM_IPS: &'static str = "ips";

    pub fn new<I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        ServerIpActivationStrategy {
            addresses: addresses.into_iter().collect(),
        }
    }
}

impl ActivationStrategy for ServerIpActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "IP address (server)"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_IPS)
            .label("Server IPs")
            .description("A comma-separated list of server IPs for which the feature should be active.")]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        let raw = match util::non_blank(state.parameter(Self::PARAM_IPS)) {
            Some(raw) => raw,
            None => return false,
        };

        for entry in util::split_list(raw) {
            match entry.parse::<IpAddr>() {
                Ok(address) => {
                    if self.addresses.contains(&address) {
                        return true;
                    }
                }
                Err(_) => {
                    warn!(
                        "ignoring malformed server IP {:?} configured for feature {}",
                        entry,
                        state.feature()
                    );
                }
            }
        }

        false
    }
}
