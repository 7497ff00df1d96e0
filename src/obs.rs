//! Optional observability helpers for platform calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `seaplane_client.call` with the `api`
//!   (platform surface) and `stage` (call site) fields, plus `warn` events for failures.
//! - Enable `metrics` to increment the `seaplane_client_call_total` counter for every
//!   attempt/success/failure/renewal, labeled by `api` + `outcome`.
//!
//! Both are side channels only: nothing recorded here changes what a call returns.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Platform surfaces observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiKind {
	/// Identity endpoint issuing bearer tokens.
	Identity,
	/// Compute API (formations, containers).
	Compute,
	/// Distributed locks.
	Locks,
	/// Key-value metadata store.
	Metadata,
	/// Data placement restrictions.
	Restrict,
}
impl ApiKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiKind::Identity => "identity",
			ApiKind::Compute => "compute",
			ApiKind::Locks => "locks",
			ApiKind::Metadata => "metadata",
			ApiKind::Restrict => "restrict",
		}
	}
}
impl Display for ApiKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to an executor or token provider call.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// A `401` triggered the renew-and-retry cycle.
	Renewal,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Renewal => "renewal",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
