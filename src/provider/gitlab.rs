//! GitLab OIDC userinfo mapping; groups travel inside the profile itself.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	claims::{Claims, ProfileField},
	fetch::{EnrichmentContext, TransportErrorMapper},
	filter::{FilterAxis, FilterSet},
	http::ProfileHttpClient,
	obs::{self, FetchStage},
	provider::{AuthScheme, FetchFuture, ProviderKind, ProviderStrategy, strategy},
};

/// Decoded userinfo response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitlabProfile {
	/// OIDC error code.
	pub error: ProfileField,
	/// OIDC error description.
	pub error_description: ProfileField,
	/// Profile URL, e.g. `https://gitlab.com/alice`.
	pub profile: ProfileField,
	/// Display name.
	pub name: ProfileField,
	/// Email.
	pub email: ProfileField,
	/// Avatar URL.
	pub picture: ProfileField,
	/// Full paths of the groups the user belongs to.
	pub groups: ProfileField,
}

/// Self-hosted OIDC provider; the user-info endpoint comes from discovery.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitlabStrategy;
impl ProviderStrategy for GitlabStrategy {
	type Envelope = GitlabProfile;

	fn kind(&self) -> ProviderKind {
		ProviderKind::Gitlab
	}

	fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::Bearer
	}

	fn check_envelope(&self, profile: &GitlabProfile) -> Result<()> {
		strategy::check_oidc_error(self.kind(), &profile.error, &profile.error_description)?;
		profile.profile.require_text(self.kind(), "profile")?;

		Ok(())
	}

	fn map_claims(&self, profile: &GitlabProfile, origin: &Url) -> Result<Claims> {
		let url = profile.profile.require_text(self.kind(), "profile")?;

		Ok(Claims::new(origin, strip_scheme(url))
			.with_name(&profile.name)
			.with_email(&profile.email)
			.with_picture(&profile.picture))
	}

	fn enrich_groups<'a, C, M>(
		&'a self,
		ctx: &'a EnrichmentContext<'a, C, M>,
		profile: &'a GitlabProfile,
	) -> FetchFuture<'a, Vec<String>>
	where
		C: ?Sized + ProfileHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		Box::pin(async move {
			let config = ctx.config;
			let filter = config.filters.axis(FilterAxis::Groups);

			if !filter.is_enabled() {
				return Vec::new();
			}

			let entries = match &profile.groups {
				ProfileField::Other(Value::Array(entries)) => entries.as_slice(),
				_ => &[],
			};
			let server_name = config.server_name().unwrap_or(self.kind().domain());
			let groups = profile_groups(filter, server_name, entries);

			obs::groups_parsed(&config.name, FetchStage::Profile, &groups);

			groups
		})
	}
}

fn strip_scheme(url: &str) -> &str {
	url.split_once("://").map_or(url, |(_, rest)| rest)
}

fn profile_groups(filter: &FilterSet, server_name: &str, groups: &[Value]) -> Vec<String> {
	groups
		.iter()
		.filter_map(Value::as_str)
		.filter(|group| filter.admits(group))
		.map(|group| format!("{server_name}/{group}"))
		.collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn profile(value: Value) -> GitlabProfile {
		serde_json::from_value(value).expect("Profile fixture should decode.")
	}

	#[test]
	fn subject_is_profile_url_without_scheme() {
		let origin =
			Url::parse("https://gitlab.com/oauth/userinfo").expect("Origin fixture should parse.");
		let profile = profile(json!({
			"sub": "1234",
			"profile": "https://gitlab.com/alice",
			"name": "Alice",
			"picture": "https://gitlab.com/uploads/alice.png",
		}));

		GitlabStrategy.check_envelope(&profile).expect("Well-formed profile should pass.");

		let claims = GitlabStrategy.map_claims(&profile, &origin).expect("Claims should map.");

		assert_eq!(claims.sub, "gitlab.com/alice");
		assert_eq!(claims.name.as_deref(), Some("Alice"));
		assert_eq!(claims.picture.as_deref(), Some("https://gitlab.com/uploads/alice.png"));
		assert_eq!(strip_scheme("gitlab.example.com/bob"), "gitlab.example.com/bob");
	}

	#[test]
	fn oidc_error_and_missing_profile_are_rejected() {
		let err = GitlabStrategy
			.check_envelope(&profile(json!({
				"error": "invalid_token",
				"error_description": "Token is expired.",
			})))
			.expect_err("Error envelope must be rejected.");

		assert!(err.to_string().contains("invalid_token: Token is expired."));

		let err = GitlabStrategy
			.check_envelope(&profile(json!({ "sub": "1" })))
			.expect_err("Missing profile must be rejected.");

		assert!(matches!(err, Error::MalformedProfile { field: "profile", .. }));
	}

	#[test]
	fn profile_groups_are_namespaced_and_filtered() {
		let filter = FilterSet::compile(FilterAxis::Groups, ["^platform"])
			.expect("Filter fixture should compile.");
		let groups = [json!("platform/infra"), json!(42), json!("sales"), json!("platform")];

		assert_eq!(
			profile_groups(&filter, "gitlab.example.com", &groups),
			["gitlab.example.com/platform/infra", "gitlab.example.com/platform"]
		);
	}
}
