//! LinkedIn OIDC userinfo mapping.

// self
use crate::{
	_prelude::*,
	claims::{Claims, ProfileField},
	provider::{AuthScheme, ProviderKind, ProviderStrategy, strategy},
};

/// Decoded `GET /v2/userinfo` response.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkedinProfile {
	/// OIDC error code.
	pub error: ProfileField,
	/// OIDC error description.
	pub error_description: ProfileField,
	/// Member identifier.
	pub sub: ProfileField,
	/// Full name.
	pub name: ProfileField,
	/// Email.
	pub email: ProfileField,
	/// Avatar URL.
	pub picture: ProfileField,
}

/// OIDC userinfo provider without group support.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkedinStrategy;
impl ProviderStrategy for LinkedinStrategy {
	type Envelope = LinkedinProfile;

	fn kind(&self) -> ProviderKind {
		ProviderKind::Linkedin
	}

	fn auth_scheme(&self) -> AuthScheme {
		AuthScheme::Bearer
	}

	fn check_envelope(&self, profile: &LinkedinProfile) -> Result<()> {
		strategy::check_oidc_error(self.kind(), &profile.error, &profile.error_description)?;
		profile.sub.require_text(self.kind(), "sub")?;

		Ok(())
	}

	fn map_claims(&self, profile: &LinkedinProfile, origin: &Url) -> Result<Claims> {
		let sub = profile.sub.require_text(self.kind(), "sub")?;

		Ok(Claims::new(origin, Claims::subject(self.kind().domain(), sub))
			.with_name(&profile.name)
			.with_email(&profile.email)
			.with_picture(&profile.picture))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn maps_userinfo_fields() {
		let origin = Url::parse("https://api.linkedin.com/v2/userinfo")
			.expect("Origin fixture should parse.");
		let profile: LinkedinProfile = serde_json::from_value(json!({
			"sub": "782bbtaQ",
			"name": "Dana Roe",
			"email": "dana@example.com",
			"email_verified": true,
			"picture": 17,
		}))
		.expect("Profile fixture should decode.");

		LinkedinStrategy.check_envelope(&profile).expect("Well-formed profile should pass.");

		let claims = LinkedinStrategy.map_claims(&profile, &origin).expect("Claims should map.");

		assert_eq!(claims.sub, "linkedin.com/782bbtaQ");
		assert_eq!(claims.email.as_deref(), Some("dana@example.com"));
		assert_eq!(claims.picture, None, "Non-string picture is dropped.");
	}

	#[test]
	fn error_envelope_is_rejected() {
		let profile: LinkedinProfile =
			serde_json::from_value(json!({ "error": "invalid_token" }))
				.expect("Error fixture should decode.");
		let err = LinkedinStrategy.check_envelope(&profile).expect_err("Error must be rejected.");

		assert!(matches!(err, Error::ProviderReported { provider: ProviderKind::Linkedin, .. }));
		assert!(
			LinkedinStrategy.check_envelope(&LinkedinProfile::default()).is_err(),
			"Missing sub must be rejected."
		);
	}
}
