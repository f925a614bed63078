// std
use std::iter::IntoIterator;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, ProviderName, ScopeSet, ScopeValidationError, Secret},
	filter::{FilterAxes, FilterAxis, FilterError, FilterSet},
	provider::{ProfileEndpoints, ProviderConfig, ProviderKind},
};

/// Errors raised while constructing or validating provider configurations.
#[derive(Debug, ThisError)]
pub enum ProviderConfigError {
	/// A filter pattern failed to compile.
	#[error(transparent)]
	InvalidFilter(#[from] FilterError),
	/// Configured scopes are malformed.
	#[error(transparent)]
	InvalidScope(#[from] ScopeValidationError),
	/// Provider name is malformed.
	#[error(transparent)]
	InvalidName(#[from] IdentifierError),
	/// Provider signs its profile requests and needs a client secret.
	#[error("Provider {provider} requires a client secret.")]
	MissingClientSecret {
		/// Provider lacking the secret.
		provider: ProviderKind,
	},
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Instance name for the configuration being constructed.
	pub name: ProviderName,
	/// Provider dialect.
	pub kind: ProviderKind,
	/// Optional client identifier.
	pub client_id: Option<String>,
	/// Optional client secret.
	pub client_secret: Option<Secret>,
	/// Configured scopes.
	pub scopes: ScopeSet,
	/// Endpoints, seeded with the provider defaults.
	pub endpoints: ProfileEndpoints,
	/// Optional namespace for in-profile groups.
	pub server_name: Option<String>,
	/// Raw organization filter patterns.
	pub org_filters: Vec<String>,
	/// Raw group filter patterns.
	pub group_filters: Vec<String>,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provider's default endpoints.
	pub fn new(name: ProviderName, kind: ProviderKind) -> Self {
		Self {
			name,
			kind,
			client_id: None,
			client_secret: None,
			scopes: ScopeSet::default(),
			endpoints: ProfileEndpoints::defaults(kind),
			server_name: None,
			org_filters: Vec::new(),
			group_filters: Vec::new(),
		}
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Sets the configured scopes.
	pub fn scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = scopes;

		self
	}

	/// Overrides the user-info endpoint.
	pub fn user_info_endpoint(mut self, url: Url) -> Self {
		self.endpoints.user_info = Some(url);

		self
	}

	/// Overrides the guild-list endpoint.
	pub fn guilds_endpoint(mut self, url: Url) -> Self {
		self.endpoints.guilds = Some(url);

		self
	}

	/// Sets the namespace for in-profile group identifiers.
	pub fn server_name(mut self, server_name: impl Into<String>) -> Self {
		self.server_name = Some(server_name.into());

		self
	}

	/// Appends organization filter patterns.
	pub fn org_filters<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.org_filters.extend(patterns.into_iter().map(Into::into));

		self
	}

	/// Appends group/guild filter patterns.
	pub fn group_filters<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.group_filters.extend(patterns.into_iter().map(Into::into));

		self
	}

	/// Consumes the builder, compiles filters, and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let filters = FilterAxes {
			organizations: FilterSet::compile(FilterAxis::Organizations, &self.org_filters)?,
			groups: FilterSet::compile(FilterAxis::Groups, &self.group_filters)?,
		};
		let config = ProviderConfig {
			name: self.name,
			kind: self.kind,
			client_id: self.client_id,
			client_secret: self.client_secret,
			scopes: self.scopes,
			endpoints: self.endpoints,
			server_name: self.server_name,
			filters,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ProviderConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ProviderConfigError> {
		if self.kind == ProviderKind::Facebook && self.client_secret.is_none() {
			return Err(ProviderConfigError::MissingClientSecret { provider: self.kind });
		}

		Ok(())
	}
}
