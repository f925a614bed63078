// self
use crate::{_prelude::*, auth::ProviderName, claims::Claims, obs::FetchStage, provider::ProviderKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFetch<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFetch<F> = F;

/// A span builder wrapped around each provider request.
#[derive(Clone, Debug)]
pub struct FetchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FetchSpan {
	/// Creates a new span tagged with the provider kind, instance name, and stage.
	pub fn new(provider: ProviderKind, name: &ProviderName, stage: FetchStage) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!(
				"oauth2_claims.fetch",
				provider = provider.as_str(),
				identity_provider_name = %name,
				stage = stage.as_str()
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (provider, name, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFetch<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a raw provider response.
pub fn response_received(stage: FetchStage, url: &str, status: Option<u16>, body: &[u8]) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			stage = stage.as_str(),
			url,
			status,
			body = %crate::obs::body_preview(body),
			"Provider response received."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, url, status, body);
	}
}

/// Emits a debug event listing the groups derived by one enrichment step.
pub fn groups_parsed(name: &ProviderName, stage: FetchStage, groups: &[String]) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			identity_provider_name = %name,
			stage = stage.as_str(),
			?groups,
			"Parsed additional user group data."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (name, stage, groups);
	}
}

/// Emits a debug event with the final claim set.
pub fn claims_extracted(name: &ProviderName, claims: &Claims) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(identity_provider_name = %name, ?claims, "Extracted UserInfo endpoint data.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (name, claims);
	}
}

/// Emits an error event for an enrichment step that was skipped.
pub fn enrichment_skipped(name: &ProviderName, stage: FetchStage, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(
			identity_provider_name = %name,
			stage = stage.as_str(),
			error = %error,
			"Failed extracting user group data."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (name, stage, error);
	}
}

/// Emits a debug event for a guild permission value that is not an integer.
pub fn permissions_unparsable(guild: &str, guild_name: &str, raw: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			guild,
			guild_name,
			permissions = raw,
			"Guild permissions are not an integer."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (guild, guild_name, raw);
	}
}
