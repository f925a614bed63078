#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_claims::{
	auth::Secret,
	error::Error,
	fetch::appsecret_proof,
	provider::{ProviderConfig, ProviderKind},
};

const TOKEN: &str = "fb-token";
const APP_SECRET: &str = "fb-app-secret";

fn build_config(server: &MockServer) -> ProviderConfig {
	common::config_builder(ProviderKind::Facebook)
		.user_info_endpoint(common::endpoint(server, "/me"))
		.client_secret(APP_SECRET)
		.build()
		.expect("Facebook config should build.")
}

#[tokio::test]
async fn facebook_request_is_signed_with_appsecret_proof() {
	let server = MockServer::start_async().await;
	let proof = appsecret_proof(&Secret::new(APP_SECRET), &Secret::new(TOKEN))
		.expect("Proof should compute.");
	let profile = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/me")
				.query_param("fields", "id,first_name,last_name,name,email")
				.query_param("access_token", TOKEN)
				.query_param("appsecret_proof", proof);
			then.status(200).header("content-type", "application/json").json_body(json!({
				"id": "10158",
				"first_name": "Carol",
				"last_name": "Doe",
				"name": "Carol Doe",
				"email": "carol@example.com",
			}));
		})
		.await;
	let claims = common::build_resolver(build_config(&server))
		.resolve(&Secret::new(TOKEN))
		.await
		.expect("Signed Facebook request should resolve.");

	assert_eq!(claims.origin, server.url("/me"), "Origin must not leak the signed query.");
	assert_eq!(claims.sub, "facebook.com/10158");
	assert_eq!(claims.name.as_deref(), Some("Carol Doe"));
	assert_eq!(claims.email.as_deref(), Some("carol@example.com"));
	assert!(claims.groups.is_empty());

	profile.assert_calls_async(1).await;
}

#[tokio::test]
async fn facebook_structured_error_is_rendered() {
	let server = MockServer::start_async().await;
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/me");
			then.status(400).header("content-type", "application/json").json_body(json!({
				"error": {
					"message": "Invalid OAuth access token.",
					"type": "OAuthException",
					"code": 190,
					"fbtrace_id": "AbCdEf",
				}
			}));
		})
		.await;
	let err = common::build_resolver(build_config(&server))
		.resolve(&Secret::new(TOKEN))
		.await
		.expect_err("Graph error must fail resolution.");

	assert!(matches!(err, Error::ProviderReported { provider: ProviderKind::Facebook, .. }));
	assert!(err.to_string().contains(
		"code=190, fbtrace_id=AbCdEf, message=Invalid OAuth access token., type=OAuthException"
	));
}

#[tokio::test]
async fn facebook_profile_without_name_is_malformed() {
	let server = MockServer::start_async().await;
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/me");
			then.status(200).header("content-type", "application/json").json_body(json!({ "id": "1" }));
		})
		.await;
	let err = common::build_resolver(build_config(&server))
		.resolve(&Secret::new(TOKEN))
		.await
		.expect_err("Missing name must fail resolution.");

	assert!(matches!(err, Error::MalformedProfile { field: "name", .. }));
}
