#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
// self
use oauth2_claims::{
	auth::{ProviderName, ScopeSet},
	fetch::ReqwestTransportErrorMapper,
	http::ReqwestHttpClient,
	provider::{ProviderConfig, ProviderConfigBuilder, ProviderKind},
	reqwest::Client,
	resolver::ReqwestClaimsResolver,
	url::Url,
};

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Resolves `path` against the mock server.
pub fn endpoint(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock endpoint should parse successfully.")
}

/// Starts a configuration named after the provider kind.
pub fn config_builder(kind: ProviderKind) -> ProviderConfigBuilder {
	let name = ProviderName::new(kind.as_str()).expect("Provider name fixture should be valid.");

	ProviderConfig::builder(name, kind)
}

/// Parses a scope fixture.
pub fn scopes(scopes: &[&str]) -> ScopeSet {
	ScopeSet::new(scopes.iter().copied()).expect("Scope fixture should be valid.")
}

/// Constructs a resolver backed by the insecure reqwest transport used across integration tests.
pub fn build_resolver(config: ProviderConfig) -> ReqwestClaimsResolver {
	ReqwestClaimsResolver::with_http_client(
		config,
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
}
