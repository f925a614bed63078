//! OIDC discovery for self-hosted providers whose user-info endpoint is not well known.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	fetch::{ProfileRequest, TransportErrorMapper},
	http::ProfileHttpClient,
	obs::FetchStage,
	resolver::ClaimsResolver,
};

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
	userinfo_endpoint: Url,
}

impl<C, M> ClaimsResolver<C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Fetches `<issuer>/.well-known/openid-configuration` and returns its `userinfo_endpoint`.
	pub async fn discover_user_info_endpoint(&self, issuer: &Url) -> Result<Url> {
		let request = ProfileRequest::new(FetchStage::Discovery, discovery_url(issuer)?);
		let document = self.fetcher().get_json::<DiscoveryDocument>(request).await?;

		Ok(document.userinfo_endpoint)
	}

	/// Returns a resolver whose configuration carries the discovered user-info endpoint.
	pub async fn discover(self, issuer: &Url) -> Result<Self> {
		let endpoint = self.discover_user_info_endpoint(issuer).await?;
		let config = self.config.as_ref().clone().with_user_info_endpoint(endpoint);

		Ok(Self { config: Arc::new(config), ..self })
	}
}

fn discovery_url(issuer: &Url) -> Result<Url, ConfigError> {
	let mut url = issuer.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::CannotBeBase { url: issuer.to_string() })?
		.pop_if_empty()
		.push(".well-known")
		.push("openid-configuration");

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn discovery_url_appends_well_known_path() {
		let issuer = Url::parse("https://gitlab.example.com").expect("Issuer fixture should parse.");

		assert_eq!(
			discovery_url(&issuer).expect("Discovery URL should build.").as_str(),
			"https://gitlab.example.com/.well-known/openid-configuration"
		);

		let issuer =
			Url::parse("https://sso.example.com/realms/main/").expect("Issuer fixture should parse.");

		assert_eq!(
			discovery_url(&issuer).expect("Discovery URL should build.").as_str(),
			"https://sso.example.com/realms/main/.well-known/openid-configuration"
		);
	}
}
