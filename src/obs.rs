//! Optional observability helpers for profile fetches.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_claims.fetch` with the `provider`
//!   and `stage` fields, plus debug events at every fetch boundary and error events whenever a
//!   group enrichment step is skipped.
//! - Enable `metrics` to increment the `oauth2_claims_fetch_total` counter for every
//!   attempt/success/failure, labeled by `provider` + `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Requests issued while resolving a claim set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchStage {
	/// Primary user-info request.
	Profile,
	/// Organization list (secondary).
	Organizations,
	/// Guild list (secondary).
	Guilds,
	/// Per-guild member record carrying roles (tertiary).
	GuildMember,
	/// OIDC discovery document.
	Discovery,
}
impl FetchStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchStage::Profile => "profile",
			FetchStage::Organizations => "organizations",
			FetchStage::Guilds => "guilds",
			FetchStage::GuildMember => "guild_member",
			FetchStage::Discovery => "discovery",
		}
	}
}
impl Display for FetchStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
	/// Request about to be dispatched.
	Attempt,
	/// Response decoded successfully.
	Success,
	/// Failure propagated (or swallowed, for enrichment stages).
	Failure,
}
impl FetchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FetchOutcome::Attempt => "attempt",
			FetchOutcome::Success => "success",
			FetchOutcome::Failure => "failure",
		}
	}
}
impl Display for FetchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

const BODY_PREVIEW_LIMIT: usize = 256;

/// Renders a response body for logs, truncated to a bounded number of characters.
pub fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = String::new();

	for (idx, ch) in text.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}
