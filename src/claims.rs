//! Canonical claim set and the field primitive used by provider envelopes.

// crates.io
use serde::Deserializer;
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, provider::ProviderKind};

/// Profile attribute as decoded from a provider envelope.
///
/// Providers disagree on types and omit fields freely, so every envelope field keeps three
/// states: absent, a JSON string, or some other JSON value (including `null`). Envelope structs
/// declare their fields with `#[serde(default)]` so absence never fails decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProfileField {
	/// Key missing from the response.
	#[default]
	Absent,
	/// Key present with a string value.
	Text(String),
	/// Key present with a non-string value.
	Other(Value),
}
impl ProfileField {
	/// Returns the string value, or `None` for absent and wrong-typed fields.
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the raw JSON value when present.
	pub fn value(&self) -> Option<Value> {
		match self {
			Self::Absent => None,
			Self::Text(value) => Some(Value::String(value.clone())),
			Self::Other(value) => Some(value.clone()),
		}
	}

	/// Returns the string value of a mandated field or the matching malformed-profile error.
	pub fn require_text(&self, provider: ProviderKind, field: &'static str) -> Result<&str> {
		match self {
			Self::Absent => Err(Error::missing_field(provider, field)),
			Self::Text(value) => Ok(value),
			Self::Other(_) => Err(Error::non_text_field(provider, field)),
		}
	}

	/// Renders the present value for error messages; strings are shown without quotes.
	pub fn render(&self) -> Option<String> {
		match self {
			Self::Absent => None,
			Self::Text(value) => Some(value.clone()),
			Self::Other(value) => Some(value.to_string()),
		}
	}
}
impl<'de> Deserialize<'de> for ProfileField {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match Value::deserialize(deserializer)? {
			Value::String(value) => Self::Text(value),
			other => Self::Other(other),
		})
	}
}

/// Canonical claim set handed to downstream session and policy logic.
///
/// Optional claims are omitted from the serialized form when absent, `metadata` when empty,
/// and `groups` when no group was derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
	/// User-info endpoint the profile was read from.
	pub origin: String,
	/// Globally unique subject, `<provider-domain>/<provider-native-id>`.
	pub sub: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub picture: Option<String>,
	/// Provider-native identifiers unsuitable as top-level claims.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub metadata: BTreeMap<String, Value>,
	/// Derived group identifiers in upstream order, duplicates preserved.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub groups: Vec<String>,
}
impl Claims {
	/// Starts a draft for the given endpoint and subject.
	pub fn new(origin: &Url, sub: impl Into<String>) -> Self {
		Self {
			origin: origin.to_string(),
			sub: sub.into(),
			name: None,
			email: None,
			picture: None,
			metadata: BTreeMap::new(),
			groups: Vec::new(),
		}
	}

	/// Builds the `<domain>/<id>` subject string.
	pub fn subject(domain: &str, id: &str) -> String {
		format!("{domain}/{id}")
	}

	/// Sets `name` when the field holds a string.
	pub fn with_name(mut self, field: &ProfileField) -> Self {
		self.name = field.text().map(str::to_owned);

		self
	}

	/// Sets `email` when the field holds a string.
	pub fn with_email(mut self, field: &ProfileField) -> Self {
		self.email = field.text().map(str::to_owned);

		self
	}

	/// Sets `picture` when the field holds a string.
	pub fn with_picture(mut self, field: &ProfileField) -> Self {
		self.picture = field.text().map(str::to_owned);

		self
	}

	/// Renders the claim set as an untyped JSON object.
	pub fn to_map(&self) -> Map<String, Value> {
		let mut map = Map::new();

		map.insert("origin".into(), Value::String(self.origin.clone()));
		map.insert("sub".into(), Value::String(self.sub.clone()));

		for (key, value) in [("name", &self.name), ("email", &self.email), ("picture", &self.picture)]
		{
			if let Some(value) = value {
				map.insert(key.into(), Value::String(value.clone()));
			}
		}

		if !self.metadata.is_empty() {
			map.insert(
				"metadata".into(),
				Value::Object(self.metadata.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
			);
		}
		if !self.groups.is_empty() {
			map.insert(
				"groups".into(),
				Value::Array(self.groups.iter().cloned().map(Value::String).collect()),
			);
		}

		map
	}
}
