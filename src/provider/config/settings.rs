// self
use crate::{
	_prelude::*,
	auth::{ProviderName, ScopeSet, Secret},
	provider::{ProviderConfig, ProviderConfigError, ProviderKind},
};

/// Serialized provider settings as found in configuration files.
///
/// Every key is optional except `driver`; conversion through [`TryFrom`] resolves the driver,
/// applies endpoint defaults, and compiles filters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
	/// Instance name; defaults to the driver string.
	pub name: Option<ProviderName>,
	/// Provider dialect (`github`, `gitlab`, `discord`, `facebook`, `linkedin`).
	pub driver: String,
	/// Client identifier.
	pub client_id: Option<String>,
	/// Client secret.
	pub client_secret: Option<Secret>,
	/// Requested scopes.
	pub scopes: Vec<String>,
	/// User-info endpoint override.
	pub user_info_url: Option<Url>,
	/// Guild-list endpoint override.
	pub guilds_url: Option<Url>,
	/// Namespace for in-profile group identifiers.
	pub server_name: Option<String>,
	/// Organization filter patterns.
	pub user_org_filters: Vec<String>,
	/// Group/guild filter patterns.
	pub user_group_filters: Vec<String>,
}
impl TryFrom<ProviderSettings> for ProviderConfig {
	type Error = Error;

	fn try_from(settings: ProviderSettings) -> Result<Self> {
		let kind = ProviderKind::from_str(&settings.driver)?;
		let name = match settings.name {
			Some(name) => name,
			None => ProviderName::new(kind.as_str()).map_err(ProviderConfigError::from)?,
		};
		let scopes = ScopeSet::new(settings.scopes).map_err(ProviderConfigError::from)?;
		let mut builder = ProviderConfig::builder(name, kind)
			.scopes(scopes)
			.org_filters(settings.user_org_filters)
			.group_filters(settings.user_group_filters);

		builder.client_id = settings.client_id;
		builder.client_secret = settings.client_secret;

		if let Some(url) = settings.user_info_url {
			builder = builder.user_info_endpoint(url);
		}
		if let Some(url) = settings.guilds_url {
			builder = builder.guilds_endpoint(url);
		}
		if let Some(server_name) = settings.server_name {
			builder = builder.server_name(server_name);
		}

		Ok(builder.build()?)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::error::ConfigError;

	fn settings(value: serde_json::Value) -> ProviderSettings {
		serde_json::from_value(value).expect("Settings fixture should deserialize.")
	}

	#[test]
	fn settings_apply_defaults_and_compile_filters() {
		let config = ProviderConfig::try_from(settings(json!({
			"driver": "discord",
			"scopes": ["identify", "guilds"],
			"user_group_filters": ["^1234$"],
		})))
		.expect("Discord settings should convert.");

		assert_eq!(config.name.as_ref(), "discord");
		assert_eq!(config.kind, ProviderKind::Discord);
		assert!(config.has_scope("guilds"));
		assert!(config.filters.groups.admits("1234"));
		assert!(!config.filters.organizations.is_enabled());
		assert!(config.endpoints.guilds.is_some());
	}

	#[test]
	fn unknown_driver_is_unsupported() {
		let err = ProviderConfig::try_from(settings(json!({ "driver": "myspace" })))
			.expect_err("Unknown driver must be rejected.");

		assert!(matches!(err, Error::UnsupportedProvider { .. }));
	}

	#[test]
	fn facebook_requires_client_secret() {
		let err = ProviderConfig::try_from(settings(json!({ "driver": "facebook" })))
			.expect_err("Facebook without a secret must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::Provider(ProviderConfigError::MissingClientSecret { .. }))
		));

		let config = ProviderConfig::try_from(settings(json!({
			"name": "fb",
			"driver": "facebook",
			"client_secret": "app-secret",
		})))
		.expect("Facebook with a secret should convert.");

		assert_eq!(config.client_secret.as_ref().map(Secret::expose), Some("app-secret"));
	}

	#[test]
	fn malformed_name_fails_deserialization() {
		assert!(
			serde_json::from_value::<ProviderSettings>(json!({ "name": "", "driver": "github" }))
				.is_err()
		);
	}

	#[test]
	fn invalid_filter_pattern_is_reported() {
		let err = ProviderConfig::try_from(settings(json!({
			"driver": "github",
			"user_org_filters": ["["],
		})))
		.expect_err("Invalid pattern must be rejected.");

		assert!(err.to_string().contains("Invalid organization filter pattern `[`."));
	}
}
