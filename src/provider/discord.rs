//! Discord profile mapping and guild membership.
//!
//! Guild enrichment is gated twice: the `guilds` scope must be configured and the group filter
//! axis must hold at least one pattern. Roles are read per admitted guild only when the
//! `guilds.members.read` scope is configured as well.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{GUILD_MEMBERS_READ_SCOPE, GUILDS_SCOPE},
	claims::{Claims, ProfileField},
	error::ConfigError,
	fetch::{EnrichmentContext, TransportErrorMapper},
	filter::{FilterAxis, FilterSet},
	http::ProfileHttpClient,
	obs::{self, FetchStage},
	provider::{AuthScheme, FetchFuture, ProviderKind, ProviderStrategy},
};

const CDN_BASE: &str = "https://cdn.discordapp.com";
const ADMINISTRATOR: i64 = 0x08;

/// Decoded `GET /users/@me` response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscordProfile {
	/// Error message from Discord's `{"message": ..., "code": ...}` failure shape.
	pub message: ProfileField,
	/// Snowflake user identifier.
	pub id: ProfileField,
	/// Username, used as the display name.
	pub username: ProfileField,
	/// Avatar hash.
	pub avatar: ProfileField,
	/// Email (needs the `email` scope).
	pub email: ProfileField,
}

/// Guild list entry.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Guild {
	/// Snowflake guild identifier.
	pub id: ProfileField,
	/// Guild name.
	pub name: ProfileField,
	/// Caller's permission bitset, a decimal string in current API versions.
	pub permissions: ProfileField,
}
impl Guild {
	/// Returns true when the administrator bit is set; unparsable permissions count as unset.
	pub fn is_admin(&self) -> bool {
		let permissions = match &self.permissions {
			ProfileField::Absent => return false,
			ProfileField::Text(raw) => raw.parse::<i64>().ok(),
			ProfileField::Other(value) => value.as_i64(),
		};

		match permissions {
			Some(permissions) => permissions & ADMINISTRATOR == ADMINISTRATOR,
			None => {
				let raw = self.permissions.render().unwrap_or_default();

				obs::permissions_unparsable(
					self.id.text().unwrap_or_default(),
					self.name.text().unwrap_or_default(),
					&raw,
				);

				false
			},
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GuildMember {
	roles: Vec<Value>,
}

/// Guild-style provider: groups are `discord.com/<guild>/{admins,members,role/<role>}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscordStrategy;
impl ProviderStrategy for DiscordStrategy {
	type Envelope = DiscordProfile;

	fn kind(&self) -> ProviderKind {
		ProviderKind::Discord
	}

	fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::Bearer
	}

	fn check_envelope(&self, profile: &DiscordProfile) -> Result<()> {
		if let Some(message) = profile.message.render() {
			return Err(Error::ProviderReported { provider: self.kind(), message });
		}

		profile.id.require_text(self.kind(), "id")?;

		Ok(())
	}

	fn map_claims(&self, profile: &DiscordProfile, origin: &Url) -> Result<Claims> {
		let id = profile.id.require_text(self.kind(), "id")?;
		let mut claims = Claims::new(origin, Claims::subject(self.kind().domain(), id))
			.with_name(&profile.username)
			.with_email(&profile.email);

		claims.picture =
			profile.avatar.text().map(|avatar| format!("{CDN_BASE}/avatars/{id}/{avatar}.png"));

		Ok(claims)
	}

	fn enrich_groups<'a, C, M>(
		&'a self,
		ctx: &'a EnrichmentContext<'a, C, M>,
		_: &'a DiscordProfile,
	) -> FetchFuture<'a, Vec<String>>
	where
		C: ?Sized + ProfileHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		Box::pin(async move {
			let config = ctx.config;
			let filter = config.filters.axis(FilterAxis::Groups);

			if !filter.is_enabled() || !config.has_scope(GUILDS_SCOPE) {
				return Vec::new();
			}

			let Some(guilds_url) = config.endpoints.guilds.clone() else {
				return Vec::new();
			};
			let guilds = match ctx
				.get_json::<Vec<Guild>>(FetchStage::Guilds, guilds_url.clone(), self.auth_scheme())
				.await
			{
				Ok(guilds) => guilds,
				Err(e) => {
					ctx.skip(FetchStage::Guilds, &e);

					return Vec::new();
				},
			};
			let read_roles = config.has_scope(GUILD_MEMBERS_READ_SCOPE);
			let mut groups = Vec::new();

			for guild in &guilds {
				let Some((guild_id, membership)) = membership_groups(filter, guild) else {
					continue;
				};

				groups.extend(membership);

				if !read_roles {
					continue;
				}

				match self.guild_roles(ctx, &guilds_url, guild_id).await {
					Ok(roles) => groups.extend(roles),
					Err(e) => ctx.skip(FetchStage::GuildMember, &e),
				}
			}

			obs::groups_parsed(&config.name, FetchStage::Guilds, &groups);

			groups
		})
	}
}
impl DiscordStrategy {
	async fn guild_roles<C, M>(
		&self,
		ctx: &EnrichmentContext<'_, C, M>,
		guilds_url: &Url,
		guild_id: &str,
	) -> Result<Vec<String>>
	where
		C: ?Sized + ProfileHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let url = member_url(guilds_url, guild_id)?;
		let member = ctx
			.get_json::<GuildMember>(FetchStage::GuildMember, url, self.auth_scheme())
			.await?;
		let domain = self.kind().domain();

		Ok(member
			.roles
			.iter()
			.filter_map(Value::as_str)
			.map(|role| format!("{domain}/{guild_id}/role/{role}"))
			.collect())
	}
}

/// Returns the guild identifier with its admins/members groups, or `None` when the guild has no
/// identifier or the group filter rejects it.
fn membership_groups<'g>(filter: &FilterSet, guild: &'g Guild) -> Option<(&'g str, Vec<String>)> {
	let domain = ProviderKind::Discord.domain();
	let id = guild.id.text().filter(|id| filter.admits(id))?;
	let mut groups = Vec::with_capacity(2);

	if guild.is_admin() {
		groups.push(format!("{domain}/{id}/admins"));
	}

	groups.push(format!("{domain}/{id}/members"));

	Some((id, groups))
}

fn member_url(guilds_url: &Url, guild_id: &str) -> Result<Url, ConfigError> {
	let mut url = guilds_url.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::CannotBeBase { url: guilds_url.to_string() })?
		.pop_if_empty()
		.push(guild_id)
		.push("member");

	Ok(url)
}
