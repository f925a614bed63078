//! Provider configuration shared by every resolution against one identity provider.
//!
//! The configuration is assembled once (through [`ProviderConfigBuilder`] or deserialized
//! [`ProviderSettings`]), filters are compiled at that point, and the result is shared behind
//! `Arc` without further mutation.

/// Builder API for assembling provider configurations.
pub mod builder;
/// Deserializable settings mirroring the builder.
pub mod settings;

pub use builder::*;
pub use settings::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderName, ScopeSet, Secret},
	filter::FilterAxes,
	provider::ProviderKind,
};

const GITHUB_USER_INFO: &str = "https://api.github.com/user";
const LINKEDIN_USER_INFO: &str = "https://api.linkedin.com/v2/userinfo";
const FACEBOOK_USER_INFO: &str = "https://graph.facebook.com/me";
const DISCORD_USER_INFO: &str = "https://discord.com/api/v10/users/@me";
const DISCORD_GUILDS: &str = "https://discord.com/api/v10/users/@me/guilds";

/// Endpoint set used by a provider.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileEndpoints {
	/// User-info endpoint; `None` until discovered for self-hosted providers.
	pub user_info: Option<Url>,
	/// Guild-list endpoint (guild-style providers only). Per-guild member records live under
	/// `<guilds>/<guild-id>/member`.
	pub guilds: Option<Url>,
}
impl ProfileEndpoints {
	/// Returns the well-known endpoints for `kind`.
	pub fn defaults(kind: ProviderKind) -> Self {
		match kind {
			ProviderKind::Github => Self::with_user_info(GITHUB_USER_INFO),
			ProviderKind::Linkedin => Self::with_user_info(LINKEDIN_USER_INFO),
			ProviderKind::Facebook => Self::with_user_info(FACEBOOK_USER_INFO),
			ProviderKind::Discord => Self {
				guilds: Url::parse(DISCORD_GUILDS).ok(),
				..Self::with_user_info(DISCORD_USER_INFO)
			},
			ProviderKind::Gitlab => Self::default(),
		}
	}

	fn with_user_info(url: &str) -> Self {
		Self { user_info: Url::parse(url).ok(), guilds: None }
	}
}

/// Immutable provider configuration consumed by the resolver.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
	/// Configured instance name, used in log fields.
	pub name: ProviderName,
	/// Provider dialect.
	pub kind: ProviderKind,
	/// OAuth client identifier, kept for callers that share this configuration with the
	/// authorization flow.
	pub client_id: Option<String>,
	/// Client secret, required by providers that sign profile requests.
	pub client_secret: Option<Secret>,
	/// Scopes requested for this provider; gate the guild enrichment steps.
	pub scopes: ScopeSet,
	/// Endpoint definitions.
	pub endpoints: ProfileEndpoints,
	/// Namespace for in-profile group identifiers; defaults to the user-info host.
	pub server_name: Option<String>,
	/// Compiled filter axes.
	pub filters: FilterAxes,
}
impl ProviderConfig {
	/// Creates a new builder for the provided name and provider kind.
	pub fn builder(name: ProviderName, kind: ProviderKind) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(name, kind)
	}

	/// Installs a (typically discovered) user-info endpoint.
	pub fn with_user_info_endpoint(mut self, url: Url) -> Self {
		self.endpoints.user_info = Some(url);

		self
	}

	/// Returns true if `scope` is configured for this provider.
	pub fn has_scope(&self, scope: &str) -> bool {
		self.scopes.contains(scope)
	}

	/// Namespace for group identifiers taken from the profile itself.
	pub fn server_name(&self) -> Option<&str> {
		self.server_name
			.as_deref()
			.or_else(|| self.endpoints.user_info.as_ref().and_then(Url::host_str))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_cover_well_known_providers() {
		let discord = ProfileEndpoints::defaults(ProviderKind::Discord);

		assert_eq!(
			discord.user_info.as_ref().map(Url::as_str),
			Some("https://discord.com/api/v10/users/@me")
		);
		assert_eq!(
			discord.guilds.as_ref().map(Url::as_str),
			Some("https://discord.com/api/v10/users/@me/guilds")
		);
		assert_eq!(ProfileEndpoints::defaults(ProviderKind::Gitlab), ProfileEndpoints::default());
		assert!(ProfileEndpoints::defaults(ProviderKind::Github).guilds.is_none());
	}

	#[test]
	fn server_name_falls_back_to_user_info_host() {
		let name = ProviderName::new("corp-gitlab").expect("Name fixture should be valid.");
		let config = ProviderConfig::builder(name, ProviderKind::Gitlab)
			.build()
			.expect("GitLab config without endpoint should build.");

		assert_eq!(config.server_name(), None);

		let config = config.with_user_info_endpoint(
			Url::parse("https://gitlab.example.com/oauth/userinfo")
				.expect("Endpoint fixture should parse."),
		);

		assert_eq!(config.server_name(), Some("gitlab.example.com"));
	}
}
