//! Facebook Graph API profile mapping.
//!
//! Graph requests carry the token and its `appsecret_proof` as query parameters, so a client
//! secret is mandatory for this provider.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	claims::{Claims, ProfileField},
	provider::{AuthScheme, ProviderKind, ProviderStrategy},
};

const PROFILE_FIELDS: &[(&str, &str)] = &[("fields", "id,first_name,last_name,name,email")];
const ERROR_KEYS: [&str; 4] = ["code", "fbtrace_id", "message", "type"];

/// Decoded `GET /me` response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FacebookProfile {
	/// Graph error, usually an object with `code`, `fbtrace_id`, `message` and `type`.
	pub error: ProfileField,
	/// App-scoped user identifier.
	pub id: ProfileField,
	/// Full name.
	pub name: ProfileField,
	/// Email (needs the `email` permission).
	pub email: ProfileField,
}

/// Graph API provider without group support.
#[derive(Clone, Copy, Debug, Default)]
pub struct FacebookStrategy;
impl ProviderStrategy for FacebookStrategy {
	type Envelope = FacebookProfile;

	fn kind(&self) -> ProviderKind {
		ProviderKind::Facebook
	}

	fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::AppSecretProof
	}

	fn profile_query(&self) -> &'static [(&'static str, &'static str)] {
		PROFILE_FIELDS
	}

	fn check_envelope(&self, profile: &FacebookProfile) -> Result<()> {
		if let Some(message) = render_error(&profile.error) {
			return Err(Error::ProviderReported { provider: self.kind(), message });
		}

		profile.id.require_text(self.kind(), "id")?;
		profile.name.require_text(self.kind(), "name")?;

		Ok(())
	}

	fn map_claims(&self, profile: &FacebookProfile, origin: &Url) -> Result<Claims> {
		let id = profile.id.require_text(self.kind(), "id")?;

		Ok(Claims::new(origin, Claims::subject(self.kind().domain(), id))
			.with_name(&profile.name)
			.with_email(&profile.email))
	}
}

/// Renders a Graph error as `code=.., fbtrace_id=.., message=.., type=..` using the keys present.
fn render_error(error: &ProfileField) -> Option<String> {
	let ProfileField::Other(Value::Object(object)) = error else {
		return error.render();
	};
	let parts = ERROR_KEYS
		.iter()
		.filter_map(|key| {
			object.get(*key).map(|value| match value {
				Value::String(text) => format!("{key}={text}"),
				other => format!("{key}={other}"),
			})
		})
		.collect::<Vec<_>>();

	Some(parts.join(", "))
}
