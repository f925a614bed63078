//! Request construction, dispatch, and decoding for provider profile APIs.
//!
//! Every request issued by the resolver, primary or enrichment, flows through
//! [`Fetcher::get_json`]: build an `http` request, run it on a handle obtained from the
//! injected [`ProfileHttpClient`], log the raw response, then decode the body with
//! `serde_path_to_error` so decode failures name the JSON path that broke.

// crates.io
use hmac::{Hmac, Mac};
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION},
	},
};
use serde::de::DeserializeOwned;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{ProviderName, Secret},
	error::{ConfigError, DecodeError, TransportError},
	http::{ProfileHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::{self, FetchOutcome, FetchSpan, FetchStage},
	provider::{AuthScheme, ProviderConfig, ProviderKind},
};

type HmacSha256 = Hmac<Sha256>;

/// Maps HTTP transport failures into resolver [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a resolver error.
	fn map_transport_error(
		&self,
		provider: ProviderKind,
		stage: FetchStage,
		url: &str,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_provider: ProviderKind,
		_stage: FetchStage,
		url: &str,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		let status = meta.and_then(|meta| meta.status);

		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(url, status, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Other { url: url.to_owned(), status, message }.into(),
			_ => TransportError::Other {
				url: url.to_owned(),
				status,
				message: "unrecognized HTTP client failure".into(),
			}
			.into(),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(url: &str, status: Option<u16>, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::network(url, status, err).into()
}

/// A single GET request against a provider API.
pub struct ProfileRequest {
	/// Stage the request belongs to.
	pub stage: FetchStage,
	/// Target URL, including any signed query parameters.
	pub url: Url,
	/// Value of the `Authorization` header, if the scheme uses one.
	pub authorization: Option<String>,
}
impl ProfileRequest {
	/// Creates an unauthenticated request.
	pub fn new(stage: FetchStage, url: Url) -> Self {
		Self { stage, url, authorization: None }
	}

	/// Attaches the access token according to `scheme`.
	///
	/// [`AuthScheme::AppSecretProof`] appends `access_token` and `appsecret_proof` query
	/// parameters instead of a header and therefore needs the client secret.
	pub fn authorize(
		mut self,
		provider: ProviderKind,
		scheme: AuthScheme,
		token: &Secret,
		client_secret: Option<&Secret>,
	) -> Result<Self, ConfigError> {
		match scheme {
			AuthScheme::Token => self.authorization = Some(format!("token {}", token.expose())),
			AuthScheme::Bearer => self.authorization = Some(format!("Bearer {}", token.expose())),
			AuthScheme::AppSecretProof => {
				let client_secret =
					client_secret.ok_or(ConfigError::MissingClientSecret { provider })?;
				let proof = appsecret_proof(client_secret, token)?;

				self.url
					.query_pairs_mut()
					.append_pair("access_token", token.expose())
					.append_pair("appsecret_proof", &proof);
			},
		}

		Ok(self)
	}

	/// URL rendered without its query string, safe for logs and error messages.
	pub fn display_url(&self) -> String {
		let mut url = self.url.clone();

		url.set_query(None);

		url.to_string()
	}

	/// Converts the request into the `http` representation consumed by [`AsyncHttpClient`].
	pub fn into_http(self) -> Result<HttpRequest, ConfigError> {
		let mut builder = Request::builder()
			.method(Method::GET)
			.uri(self.url.as_str())
			.header(ACCEPT, "application/json");

		if let Some(value) = self.authorization {
			builder = builder.header(AUTHORIZATION, value);
		}

		Ok(builder.body(Vec::new())?)
	}
}
impl Debug for ProfileRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileRequest")
			.field("stage", &self.stage)
			.field("url", &self.display_url())
			.field("authorization_set", &self.authorization.is_some())
			.finish()
	}
}

/// Computes the hex-encoded HMAC-SHA256 of the access token keyed by the client secret.
pub fn appsecret_proof(client_secret: &Secret, token: &Secret) -> Result<String, ConfigError> {
	let mut mac = HmacSha256::new_from_slice(client_secret.expose().as_bytes())
		.map_err(|_| ConfigError::InvalidClientSecret)?;

	mac.update(token.expose().as_bytes());

	Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Borrowed view over the resolver's transport used for a single resolution.
pub struct Fetcher<'a, C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Provider kind used for error context and metrics labels.
	pub provider: ProviderKind,
	/// Configured provider name used for log fields.
	pub name: &'a ProviderName,
	/// Transport issuing the requests.
	pub http_client: &'a C,
	/// Mapper applied to transport failures.
	pub transport_mapper: &'a M,
}
impl<'a, C, M> Fetcher<'a, C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Dispatches `request` and decodes the JSON body into `T`.
	///
	/// Non-2xx statuses are not failures on their own: providers report errors inside the
	/// body, which the caller inspects after decoding.
	pub async fn get_json<T>(&self, request: ProfileRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let provider = self.provider;
		let stage = request.stage;
		let url = request.display_url();
		let span = FetchSpan::new(provider, self.name, stage);

		obs::record_fetch_outcome(provider, stage, FetchOutcome::Attempt);

		let result: Result<T> = span
			.instrument(async {
				let http_request = request.into_http()?;
				let slot = ResponseMetadataSlot::default();
				let handle = self.http_client.with_metadata(slot.clone());
				let response = handle.call(http_request).await.map_err(|err| {
					self.transport_mapper.map_transport_error(
						provider,
						stage,
						&url,
						slot.take().as_ref(),
						err,
					)
				})?;

				obs::response_received(
					stage,
					&url,
					Some(response.status().as_u16()),
					response.body(),
				);

				decode(provider, stage, &url, response.body())
			})
			.await;

		match &result {
			Ok(_) => obs::record_fetch_outcome(provider, stage, FetchOutcome::Success),
			Err(_) => obs::record_fetch_outcome(provider, stage, FetchOutcome::Failure),
		}

		result
	}
}

/// Per-resolution state handed to group enrichment.
pub struct EnrichmentContext<'a, C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Transport view.
	pub fetcher: Fetcher<'a, C, M>,
	/// Provider configuration (filters, scopes, endpoints).
	pub config: &'a ProviderConfig,
	/// Access token of the user being resolved.
	pub token: &'a Secret,
}
impl<'a, C, M> EnrichmentContext<'a, C, M>
where
	C: ?Sized + ProfileHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Issues an authorized enrichment request and decodes its body.
	pub async fn get_json<T>(&self, stage: FetchStage, url: Url, scheme: AuthScheme) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = ProfileRequest::new(stage, url).authorize(
			self.config.kind,
			scheme,
			self.token,
			self.config.client_secret.as_ref(),
		)?;

		self.fetcher.get_json(request).await
	}

	/// Logs an enrichment failure; the step is skipped and resolution continues.
	pub fn skip(&self, stage: FetchStage, error: &Error) {
		obs::enrichment_skipped(&self.config.name, stage, error);
	}
}

fn decode<T>(provider: ProviderKind, stage: FetchStage, url: &str, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError { provider, stage, url: url.to_owned(), source }.into())
}
