#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use oauth2_claims::{auth::Secret, provider::ProviderKind};

const TOKEN: &str = "discord-token";

async fn mock_profile(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(GET).path("/users/me").header("authorization", format!("Bearer {TOKEN}"));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "id": "42", "username": "bob", "avatar": "abc" }));
		})
		.await;
}

#[tokio::test]
async fn profile_without_guild_scope_has_no_groups() {
	let server = MockServer::start_async().await;

	mock_profile(&server).await;

	let guilds = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds");
			then.status(200).header("content-type", "application/json").json_body(json!([]));
		})
		.await;
	let config = common::config_builder(ProviderKind::Discord)
		.user_info_endpoint(common::endpoint(&server, "/users/me"))
		.guilds_endpoint(common::endpoint(&server, "/guilds"))
		.scopes(common::scopes(&["identify"]))
		.group_filters([".*"])
		.build()
		.expect("Discord config should build.");
	let claims = common::build_resolver(config)
		.resolve(&Secret::new(TOKEN))
		.await
		.expect("Discord profile should resolve.");

	assert_eq!(
		Value::Object(claims.to_map()),
		json!({
			"origin": server.url("/users/me"),
			"sub": "discord.com/42",
			"name": "bob",
			"picture": "https://cdn.discordapp.com/avatars/42/abc.png",
		})
	);

	guilds.assert_calls_async(0).await;
}

#[tokio::test]
async fn guild_permissions_and_roles_become_groups() {
	let server = MockServer::start_async().await;

	mock_profile(&server).await;

	let guilds = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds").header("authorization", format!("Bearer {TOKEN}"));
			then.status(200).header("content-type", "application/json").json_body(json!([
				{ "id": "1", "name": "Admins", "permissions": "8" },
				{ "id": "2", "name": "Plain", "permissions": "0" },
				{ "id": "3", "name": "Odd", "permissions": "not-a-number" },
				{ "id": "4", "name": "Filtered", "permissions": "8" },
			]));
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds/1/member");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "roles": ["r1", "r2"] }));
		})
		.await;
	let failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds/2/member");
			then.status(500).body("internal error");
		})
		.await;
	let third = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds/3/member");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "roles": ["r3"] }));
		})
		.await;
	let filtered = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds/4/member");
			then.status(200).header("content-type", "application/json").json_body(json!({ "roles": [] }));
		})
		.await;
	let config = common::config_builder(ProviderKind::Discord)
		.user_info_endpoint(common::endpoint(&server, "/users/me"))
		.guilds_endpoint(common::endpoint(&server, "/guilds"))
		.scopes(common::scopes(&["identify", "guilds", "guilds.members.read"]))
		.group_filters(["^[1-3]$"])
		.build()
		.expect("Discord config should build.");
	let claims = common::build_resolver(config)
		.resolve(&Secret::new(TOKEN))
		.await
		.expect("Guild enrichment failures must not fail resolution.");

	assert_eq!(
		claims.groups,
		[
			"discord.com/1/admins",
			"discord.com/1/members",
			"discord.com/1/role/r1",
			"discord.com/1/role/r2",
			"discord.com/2/members",
			"discord.com/3/members",
			"discord.com/3/role/r3",
		]
	);

	guilds.assert_calls_async(1).await;
	first.assert_calls_async(1).await;
	failing.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
	filtered.assert_calls_async(0).await;
}

#[tokio::test]
async fn roles_are_skipped_without_member_scope() {
	let server = MockServer::start_async().await;

	mock_profile(&server).await;

	let _guilds = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!([{ "id": "1", "permissions": "8" }]));
		})
		.await;
	let member = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds/1/member");
			then.status(200).header("content-type", "application/json").json_body(json!({ "roles": ["r1"] }));
		})
		.await;
	let config = common::config_builder(ProviderKind::Discord)
		.user_info_endpoint(common::endpoint(&server, "/users/me"))
		.guilds_endpoint(common::endpoint(&server, "/guilds"))
		.scopes(common::scopes(&["identify", "guilds"]))
		.group_filters([".*"])
		.build()
		.expect("Discord config should build.");
	let claims = common::build_resolver(config)
		.resolve(&Secret::new(TOKEN))
		.await
		.expect("Discord profile should resolve.");

	assert_eq!(claims.groups, ["discord.com/1/admins", "discord.com/1/members"]);

	member.assert_calls_async(0).await;
}

#[tokio::test]
async fn guild_list_failure_keeps_profile_claims() {
	let server = MockServer::start_async().await;

	mock_profile(&server).await;

	let _guilds = server
		.mock_async(|when, then| {
			when.method(GET).path("/guilds");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "message": "401: Unauthorized", "code": 0 }));
		})
		.await;
	let config = common::config_builder(ProviderKind::Discord)
		.user_info_endpoint(common::endpoint(&server, "/users/me"))
		.guilds_endpoint(common::endpoint(&server, "/guilds"))
		.scopes(common::scopes(&["guilds"]))
		.group_filters([".*"])
		.build()
		.expect("Discord config should build.");
	let claims = common::build_resolver(config)
		.resolve(&Secret::new(TOKEN))
		.await
		.expect("Guild list failures must not fail resolution.");

	assert_eq!(claims.sub, "discord.com/42");
	assert!(claims.groups.is_empty());
}
