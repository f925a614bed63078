//! GitHub REST profile mapping and organization membership.

// self
use crate::{
	_prelude::*,
	claims::{Claims, ProfileField},
	error::ConfigError,
	fetch::{EnrichmentContext, TransportErrorMapper},
	filter::{FilterAxis, FilterSet},
	http::ProfileHttpClient,
	obs::{self, FetchStage},
	provider::{AuthScheme, FetchFuture, ProviderKind, ProviderStrategy},
};

/// Decoded `GET /user` response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GithubProfile {
	/// Error message; GitHub answers failures with `{"message": ..., "documentation_url": ...}`.
	pub message: ProfileField,
	/// Account login, used as the subject.
	pub login: ProfileField,
	/// Numeric account identifier, kept as metadata.
	pub id: ProfileField,
	/// Display name.
	pub name: ProfileField,
	/// Public email.
	pub email: ProfileField,
	/// Avatar URL.
	pub avatar_url: ProfileField,
	/// Organization list endpoint for this user.
	pub organizations_url: ProfileField,
}

#[derive(Debug, Deserialize)]
struct OrganizationEntry {
	#[serde(default)]
	login: ProfileField,
}

/// Organization-style provider: groups are `github.com/<org>/members`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GithubStrategy;
impl ProviderStrategy for GithubStrategy {
	type Envelope = GithubProfile;

	fn kind(&self) -> ProviderKind {
		ProviderKind::Github
	}

	fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::Token
	}

	fn check_envelope(&self, profile: &GithubProfile) -> Result<()> {
		if let Some(message) = profile.message.render() {
			return Err(Error::ProviderReported { provider: self.kind(), message });
		}

		profile.login.require_text(self.kind(), "login")?;

		Ok(())
	}

	fn map_claims(&self, profile: &GithubProfile, origin: &Url) -> Result<Claims> {
		let login = profile.login.require_text(self.kind(), "login")?;
		let mut claims = Claims::new(origin, Claims::subject(self.kind().domain(), login))
			.with_name(&profile.name)
			.with_email(&profile.email)
			.with_picture(&profile.avatar_url);

		if let Some(id) = profile.id.value().filter(|id| !id.is_null()) {
			claims.metadata.insert("id".into(), id);
		}

		Ok(claims)
	}

	fn enrich_groups<'a, C, M>(
		&'a self,
		ctx: &'a EnrichmentContext<'a, C, M>,
		profile: &'a GithubProfile,
	) -> FetchFuture<'a, Vec<String>>
	where
		C: ?Sized + ProfileHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		const STAGE: FetchStage = FetchStage::Organizations;

		Box::pin(async move {
			let filter = ctx.config.filters.axis(FilterAxis::Organizations);

			if !filter.is_enabled() {
				return Vec::new();
			}

			let Some(raw_url) = profile.organizations_url.text() else {
				return Vec::new();
			};
			let url = match Url::parse(raw_url) {
				Ok(url) => url,
				Err(source) => {
					ctx.skip(STAGE, &ConfigError::InvalidEndpoint { source }.into());

					return Vec::new();
				},
			};
			let entries = match ctx
				.get_json::<Vec<OrganizationEntry>>(STAGE, url, self.auth_scheme())
				.await
			{
				Ok(entries) => entries,
				Err(e) => {
					ctx.skip(STAGE, &e);

					return Vec::new();
				},
			};
			let groups = organization_groups(filter, &entries);

			obs::groups_parsed(&ctx.config.name, STAGE, &groups);

			groups
		})
	}
}

fn organization_groups(filter: &FilterSet, entries: &[OrganizationEntry]) -> Vec<String> {
	let domain = ProviderKind::Github.domain();

	entries
		.iter()
		.filter_map(|entry| entry.login.text())
		.filter(|login| filter.admits(login))
		.map(|login| format!("{domain}/{login}/members"))
		.collect()
}
