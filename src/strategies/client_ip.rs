use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use log::warn;

use crate::parameter::Parameter;
use crate::request::RequestProvider;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;
use crate::util;

/// An address range in CIDR notation, e.g. `10.1.2.0/24` or `2001:db8::/32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CidrRange {
    network: IpAddr,
    prefix_len: u8,
}

impl FromStr for CidrRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("missing prefix length in CIDR range {:?}", s))?;
        let network: IpAddr = address
            .trim()
            .parse()
            .map_err(|_| format!("invalid network address in CIDR range {:?}", s))?;
        let prefix_len: u8 = prefix
            .trim()
            .parse()
            .map_err(|_| format!("invalid prefix length in CIDR range {:?}", s))?;

        let max_prefix = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix_len > max_prefix {
            return Err(format!("prefix length out of range in CIDR range {:?}", s));
        }

        Ok(CidrRange {
            network,
            prefix_len,
        })
    }
}

impl CidrRange {
    pub(crate) fn contains(&self, address: &IpAddr) -> bool {
        if self.prefix_len == 0 {
            return matches!(
                (self.network, address),
                (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_))
            );
        }
        match (self.network, address) {
            (IpAddr::V4(network), IpAddr::V4(address)) => {
                let shift = 32 - u32::from(self.prefix_len);
                u32::from(network) >> shift == u32::from(*address) >> shift
            }
            (IpAddr::V6(network), IpAddr::V6(address)) => {
                let shift = 128 - u32::from(self.prefix_len);
                u128::from(network) >> shift == u128::from(*address) >> shift
            }
            _ => false,
        }
    }
}

/// Activates a feature for requests arriving from certain client addresses,
/// given either literally or as CIDR ranges. The client address is taken
/// from the `X-Forwarded-For` header when present (the usual proxy setup),
/// falling back to the connection's remote address.
pub struct ClientIpActivationStrategy {
    requests: Arc<dyn RequestProvider>,
}

impl ClientIpActivationStrategy {
    pub const ID: &'static str = "client-ip";
    pub const PARAM_IPS: &'static str = "ips";

    pub fn new(requests: Arc<dyn RequestProvider>) -> Self {
        ClientIpActivationStrategy { requests }
    }
}

impl ActivationStrategy for ClientIpActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "IP address (client)"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_IPS)
            .label("Client IPs")
            .description(
                "A comma-separated list of client IPs or address ranges in CIDR notation (e.g. 10.1.2.0/24) for which the feature should be active.",
            )]
    }

    fn is_active(&self, state: &FeatureState, _user: Option<&FeatureUser>) -> bool {
        let request = match self.requests.current_request() {
            Some(request) => request,
            None => return false,
        };

        let raw = match util::non_blank(state.parameter(Self::PARAM_IPS)) {
            Some(raw) => raw,
            None => return false,
        };

        let remote = request
            .header("X-Forwarded-For")
            .filter(|forwarded| !util::is_blank(forwarded))
            .or_else(|| request.remote_addr())
            .map(str::trim);
        let remote = match remote {
            Some(remote) if !remote.is_empty() => remote,
            _ => return false,
        };
        let remote_address: Option<IpAddr> = remote.parse().ok();

        for entry in util::split_list(raw) {
            if entry == remote {
                return true;
            }

            if entry.contains('/') {
                match entry.parse::<CidrRange>() {
                    Ok(range) => {
                        if let Some(address) = remote_address {
                            if range.contains(&address) {
                                return true;
                            }
                        }
                    }
                    Err(reason) => {
                        warn!("ignoring illegal CIDR range for feature {}: {}", state.feature(), reason)
                    }
                }
            } else {
                match entry.parse::<IpAddr>() {
                    Ok(address) => {
                        if remote_address == Some(address) {
                            return true;
                        }
                    }
                    Err(_) => warn!(
                        "ignoring illegal IP address {:?} for feature {}",
                        entry,
                        state.feature()
                    ),
                }
            }
        }

        false
    }
}
