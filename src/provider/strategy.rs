//! Provider strategy hooks that turn profile responses into claims.
//!
//! Each supported provider is one [`ProviderStrategy`] implementation. The resolver drives the
//! same pipeline for all of them: resolve the endpoint, authorize the request, decode the
//! envelope, reject error envelopes, map claims, and finally enrich groups.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	claims::{Claims, ProfileField},
	error::ConfigError,
	fetch::{EnrichmentContext, TransportErrorMapper},
	http::ProfileHttpClient,
	provider::ProviderConfig,
};

/// Boxed future returned by strategy hooks that may issue requests.
pub type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Supported identity providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
	/// GitHub REST API (organization-style groups).
	Github,
	/// GitLab OIDC userinfo (groups carried in the profile).
	Gitlab,
	/// Discord API (guild-style groups).
	Discord,
	/// Facebook Graph API (signed query parameters).
	Facebook,
	/// LinkedIn OIDC userinfo.
	Linkedin,
}
impl ProviderKind {
	/// Returns the driver label used in configuration and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderKind::Github => "github",
			ProviderKind::Gitlab => "gitlab",
			ProviderKind::Discord => "discord",
			ProviderKind::Facebook => "facebook",
			ProviderKind::Linkedin => "linkedin",
		}
	}

	/// Returns the domain that namespaces subjects and group identifiers.
	pub const fn domain(self) -> &'static str {
		match self {
			ProviderKind::Github => "github.com",
			ProviderKind::Gitlab => "gitlab.com",
			ProviderKind::Discord => "discord.com",
			ProviderKind::Facebook => "facebook.com",
			ProviderKind::Linkedin => "linkedin.com",
		}
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProviderKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"github" => Ok(ProviderKind::Github),
			"gitlab" => Ok(ProviderKind::Gitlab),
			"discord" => Ok(ProviderKind::Discord),
			"facebook" => Ok(ProviderKind::Facebook),
			"linkedin" => Ok(ProviderKind::Linkedin),
			other => Err(Error::UnsupportedProvider { driver: other.to_owned() }),
		}
	}
}

/// How the access token is attached to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScheme {
	/// `Authorization: token <t>`.
	Token,
	/// `Authorization: Bearer <t>`.
	Bearer,
	/// `access_token` and `appsecret_proof` query parameters, no header.
	AppSecretProof,
}

/// Uniform capability set implemented by every supported provider.
///
/// `check_envelope` and `map_claims` are pure; only `enrich_groups` may issue requests, and it
/// must never fail: enrichment problems are logged through [`EnrichmentContext::skip`] and the
/// groups gathered so far are returned.
pub trait ProviderStrategy: Send + Sync {
	/// Provider-specific decoded profile.
	type Envelope: DeserializeOwned + Send + Sync;

	/// Provider this strategy implements.
	fn kind(&self) -> ProviderKind;

	/// Scheme used to attach the access token to every request.
	fn auth_scheme(&self) -> AuthScheme;

	/// Resolves the user-info endpoint from configuration.
	///
	/// The default reads the configured (or discovered) endpoint and fails before any request
	/// when it is missing.
	fn user_info_endpoint(&self, config: &ProviderConfig) -> Result<Url> {
		config
			.endpoints
			.user_info
			.clone()
			.ok_or_else(|| ConfigError::MissingUserInfoEndpoint { provider: self.kind() }.into())
	}

	/// Extra query parameters appended to the profile request.
	fn profile_query(&self) -> &'static [(&'static str, &'static str)] {
		&[]
	}

	/// Rejects provider error envelopes and responses missing the identity field.
	fn check_envelope(&self, envelope: &Self::Envelope) -> Result<()>;

	/// Maps a checked envelope onto the canonical claims.
	fn map_claims(&self, envelope: &Self::Envelope, origin: &Url) -> Result<Claims>;

	/// Derives group identifiers, issuing follow-up requests where the provider needs them.
	///
	/// The default derives nothing.
	fn enrich_groups<'a, C, M>(
		&'a self,
		ctx: &'a EnrichmentContext<'a, C, M>,
		envelope: &'a Self::Envelope,
	) -> FetchFuture<'a, Vec<String>>
	where
		C: ?Sized + ProfileHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let _ = (ctx, envelope);

		Box::pin(async { Vec::new() })
	}
}

/// Rejects an OIDC-style `{"error": ..., "error_description": ...}` envelope.
pub(crate) fn check_oidc_error(
	provider: ProviderKind,
	error: &ProfileField,
	description: &ProfileField,
) -> Result<()> {
	let Some(error) = error.render() else {
		return Ok(());
	};
	let message = match description.text() {
		Some(description) => format!("{error}: {description}"),
		None => error,
	};

	Err(Error::ProviderReported { provider, message })
}
