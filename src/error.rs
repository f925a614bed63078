//! Resolver-level error types shared across fetchers, providers, and configuration.

// self
use crate::{
	_prelude::*,
	obs::FetchStage,
	provider::{ProviderConfigError, ProviderKind},
};

/// Resolver-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical resolver error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Provider answered with its own error envelope.
	#[error("Failed obtaining user profile from {provider}: {message}.")]
	ProviderReported {
		/// Provider that reported the failure.
		provider: ProviderKind,
		/// Provider-supplied diagnostics rendered as text.
		message: String,
	},
	/// Success response lacks a provider-mandated identity field.
	#[error("Malformed {provider} profile response: the `{field}` field {problem}.")]
	MalformedProfile {
		/// Provider whose response was malformed.
		provider: ProviderKind,
		/// Name of the offending field.
		field: &'static str,
		/// What was wrong with the field.
		problem: FieldProblem,
	},
	/// Driver string does not map onto a supported provider.
	#[error("Provider `{driver}` is unsupported for fetching claims.")]
	UnsupportedProvider {
		/// Driver string supplied by configuration.
		driver: String,
	},
	/// Token response did not carry an access token.
	#[error("Token response has no access_token field.")]
	MissingAccessToken,
}
impl Error {
	/// Convenience constructor for a missing identity field.
	pub fn missing_field(provider: ProviderKind, field: &'static str) -> Self {
		Self::MalformedProfile { provider, field, problem: FieldProblem::Missing }
	}

	/// Convenience constructor for an identity field that is not a string.
	pub fn non_text_field(provider: ProviderKind, field: &'static str) -> Self {
		Self::MalformedProfile { provider, field, problem: FieldProblem::NotText }
	}
}

/// Describes why a mandated profile field was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldProblem {
	/// Field is absent from the response.
	Missing,
	/// Field is present but not a JSON string.
	NotText,
}
impl Display for FieldProblem {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Missing => f.write_str("was not found"),
			Self::NotText => f.write_str("is not a string"),
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] ProviderConfigError),
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A derived endpoint URL could not be built.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint URL cannot carry extra path segments.
	#[error("Endpoint `{url}` cannot be used as a base URL.")]
	CannotBeBase {
		/// Offending URL.
		url: String,
	},
	/// Provider needs a user-info endpoint that was never discovered or configured.
	#[error("Provider {provider} has no user-info endpoint; run discovery first.")]
	MissingUserInfoEndpoint {
		/// Provider lacking the endpoint.
		provider: ProviderKind,
	},
	/// Provider needs a client secret that was not configured.
	#[error("Provider {provider} requires a client secret.")]
	MissingClientSecret {
		/// Provider lacking the secret.
		provider: ProviderKind,
	},
	/// Client secret cannot key the request signature.
	#[error("Client secret cannot be used as a signing key.")]
	InvalidClientSecret,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ProviderConfigError> for Error {
	fn from(e: ProviderConfigError) -> Self {
		Self::Config(e.into())
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Response body could not be decoded into the expected structure.
#[derive(Debug, ThisError)]
#[error("Failed to decode the {stage} response from {provider} at {url}.")]
pub struct DecodeError {
	/// Provider that sent the body.
	pub provider: ProviderKind,
	/// Fetch stage that produced the body.
	pub stage: FetchStage,
	/// Request URL without query parameters.
	pub url: String,
	/// Structured parsing failure, including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Request URL without query parameters.
		url: String,
		/// HTTP status observed before the failure, if any.
		status: Option<u16>,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling a provider endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured cause.
	#[error("HTTP client error occurred while calling {url}: {message}.")]
	Other {
		/// Request URL without query parameters.
		url: String,
		/// HTTP status observed before the failure, if any.
		status: Option<u16>,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		url: impl Into<String>,
		status: Option<u16>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { url: url.into(), status, source: Box::new(src) }
	}

	/// HTTP status recorded by the transport before it failed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Network { status, .. } | Self::Other { status, .. } => *status,
			Self::Io(_) => None,
		}
	}
}
