// self
use crate::{
	obs::{FetchOutcome, FetchStage},
	provider::ProviderKind,
};

/// Records a fetch outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(provider: ProviderKind, stage: FetchStage, outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_claims_fetch_total",
			"provider" => provider.as_str(),
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (provider, stage, outcome);
	}
}
