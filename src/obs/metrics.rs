// self
use crate::obs::{ApiKind, CallOutcome};

/// Counter incremented once per recorded outcome.
pub const CALL_COUNTER: &str = "seaplane_client_call_total";

/// Counts one outcome of a platform call, labeled by surface and outcome.
///
/// A renewed call records `attempt`, `renewal`, then a single terminal outcome.
pub fn record_call_outcome(kind: ApiKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(CALL_COUNTER, "api" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
