use log::error;
use sha1::{Digest, Sha1};

use crate::parameter::Parameter;
use crate::state::FeatureState;
use crate::strategy::ActivationStrategy;
use crate::user::FeatureUser;

/// Enables a feature for a percentage of users, the usual vehicle for a
/// gradual rollout. Each user is assigned a stable bucket in `0..100` from a
/// hash of their name; the feature is active for the buckets at or below
/// the configured percentage.
///
/// The bucket hash is fixed: the first 15 hex characters of the SHA-1 digest
/// of the lower-cased, trimmed user name, parsed base 16, modulo 100. It
/// never varies by platform or release, so a user keeps their bucket (and
/// their rollout decision) as long as the percentage stands.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradualActivationStrategy;

impl GradualActivationStrategy {
    pub const ID: &'static str = "gradual";
    pub const PARAM_PERCENTAGE: &'static str = "percentage";

    pub fn new() -> Self {
        GradualActivationStrategy
    }

    pub(crate) fn bucket(name: &str) -> u32 {
        let mut hash = Sha1::new();
        hash.update(name.trim().to_lowercase().as_bytes());
        let digest = hash.finalize();
        let hexhash = base16ct::lower::encode_string(&digest);

        // 15 hex chars fit a u64, so this cannot fail
        let numhash = u64::from_str_radix(&hexhash[..15], 16).unwrap();
        (numhash % 100) as u32
    }
}

impl ActivationStrategy for GradualActivationStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    fn name(&self) -> &str {
        "Gradual rollout"
    }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter::named(Self::PARAM_PERCENTAGE)
            .label("Percentage")
            .matching(r"\d{1,3}")
            .description(
                "Percentage of users for which the feature should be active (i.e. '25' for every fourth user).",
            )]
    }

    fn is_active(&self, state: &FeatureState, user: Option<&FeatureUser>) -> bool {
        let user = match user {
            Some(user) if user.has_name() => user,
            _ => return false,
        };

        let raw = state.parameter(Self::PARAM_PERCENTAGE).unwrap_or("");
        let percentage: i64 = match raw.trim().parse() {
            Ok(percentage) => percentage,
            Err(_) => {
                error!(
                    "invalid gradual rollout percentage for feature {}: {:?}",
                    state.feature(),
                    raw
                );
                return false;
            }
        };

        if percentage <= 0 {
            return false;
        }

        let name = user.name().unwrap_or_default();
        i64::from(Self::bucket(name)) <= percentage
    }
}
