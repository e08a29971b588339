mod client_ip;
mod gradual;
mod property_driven;
mod release_date;
#[cfg(feature = "scripting")]
mod script;
mod server_ip;
mod server_name;
mod stage;
mod string_whitelist;
mod system_property;
mod tokenized;
mod url_parameter;
mod user_role;
mod username;
mod vhost;

pub use client_ip::ClientIpActivationStrategy;
pub use gradual::GradualActivationStrategy;
pub use property_driven::PropertyDrivenActivationStrategy;
pub use release_date::ReleaseDateActivationStrategy;
#[cfg(feature = "scripting")]
pub use script::ScriptEngineActivationStrategy;
pub use server_ip::ServerIpActivationStrategy;
pub use server_name::ServerNameActivationStrategy;
pub use stage::StageActivationStrategy;
pub use string_whitelist::StringWhitelistActivationStrategy;
pub use system_property::SystemPropertyActivationStrategy;
pub use tokenized::{Token, TokenizedActivationStrategy};
pub use url_parameter::UrlParameterActivationStrategy;
pub use user_role::UserRoleActivationStrategy;
pub use username::UsernameActivationStrategy;
pub use vhost::VhostNameActivationStrategy;
