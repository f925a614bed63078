//! Claims resolution against a single configured provider.
//!
//! [`ClaimsResolver`] owns the transport, the transport error mapper, and the provider
//! configuration. Each call to [`ClaimsResolver::resolve`] runs one sequential chain: the
//! primary profile request, the provider's error and identity checks, claim mapping, and
//! finally group enrichment, whose failures are logged and never returned.

pub mod discovery;

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::Secret,
	claims::Claims,
	fetch::{EnrichmentContext, Fetcher, ProfileRequest, TransportErrorMapper},
	http::ProfileHttpClient,
	obs::{self, FetchStage},
	provider::{
		DiscordStrategy, FacebookStrategy, GithubStrategy, GitlabStrategy, LinkedinStrategy,
		ProviderConfig, ProviderKind, ProviderStrategy,
	},
};
#[cfg(feature = "reqwest")]
use crate::{fetch::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Resolver specialized for the crate's default reqwest transport stack.
pub type ReqwestClaimsResolver = ClaimsResolver<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Turns access tokens into canonical claim sets for one provider configuration.
///
/// The resolver is cheap to clone and safe to share; concurrent resolutions only share the
/// read-only configuration and the injected transport.
#[derive(Clone)]
pub struct ClaimsResolver<C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider configuration shared by every resolution.
	pub config: Arc<ProviderConfig>,
}
impl<C, M> ClaimsResolver<C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a resolver that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: impl Into<Arc<ProviderConfig>>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config: config.into(),
		}
	}

	/// Resolves claims from a raw token-endpoint response.
	///
	/// The response must carry a non-empty `access_token` string; otherwise
	/// [`Error::MissingAccessToken`] is returned without issuing any request.
	pub async fn resolve_token_response(&self, token_response: &Map<String, Value>) -> Result<Claims> {
		let token = match token_response.get("access_token") {
			Some(Value::String(token)) => Secret::new(token.as_str()),
			_ => return Err(Error::MissingAccessToken),
		};

		self.resolve(&token).await
	}

	/// Resolves claims for `token` using the strategy matching the configured provider.
	pub async fn resolve(&self, token: &Secret) -> Result<Claims> {
		match self.config.kind {
			ProviderKind::Github => self.resolve_with(&GithubStrategy, token).await,
			ProviderKind::Gitlab => self.resolve_with(&GitlabStrategy, token).await,
			ProviderKind::Discord => self.resolve_with(&DiscordStrategy, token).await,
			ProviderKind::Facebook => self.resolve_with(&FacebookStrategy, token).await,
			ProviderKind::Linkedin => self.resolve_with(&LinkedinStrategy, token).await,
		}
	}

	/// Runs the resolution pipeline with an explicit strategy.
	pub async fn resolve_with<S>(&self, strategy: &S, token: &Secret) -> Result<Claims>
	where
		S: ProviderStrategy,
	{
		if token.expose().is_empty() {
			return Err(Error::MissingAccessToken);
		}

		let config = self.config.as_ref();
		let mut url = strategy.user_info_endpoint(config)?;
		let mut origin = url.clone();

		origin.set_query(None);

		let query = strategy.profile_query();

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query);
		}

		let request = ProfileRequest::new(FetchStage::Profile, url).authorize(
			config.kind,
			strategy.auth_scheme(),
			token,
			config.client_secret.as_ref(),
		)?;
		let fetcher = self.fetcher();
		let envelope = fetcher.get_json::<S::Envelope>(request).await?;

		strategy.check_envelope(&envelope)?;

		let mut claims = strategy.map_claims(&envelope, &origin)?;
		let ctx = EnrichmentContext { fetcher, config, token };

		claims.groups = strategy.enrich_groups(&ctx, &envelope).await;

		obs::claims_extracted(&config.name, &claims);

		Ok(claims)
	}

	fn fetcher(&self) -> Fetcher<'_, C, M> {
		Fetcher {
			provider: self.config.kind,
			name: &self.config.name,
			http_client: self.http_client.as_ref(),
			transport_mapper: self.transport_mapper.as_ref(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl ClaimsResolver<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a resolver backed by a default reqwest client.
	pub fn new(config: impl Into<Arc<ProviderConfig>>) -> Self {
		Self::with_http_client(
			config,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Debug for ClaimsResolver<C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClaimsResolver").field("config", &self.config).finish()
	}
}
