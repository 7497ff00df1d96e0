// self
use crate::{_prelude::*, obs::ApiKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by the token provider and the executor.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided API kind + stage.
	pub fn new(kind: ApiKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("seaplane_client.call", api = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
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

/// Emits a `warn` event describing a failed call.
pub fn log_failure(kind: ApiKind, stage: &'static str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		match error.status() {
			Some(status) => tracing::warn!(
				api = kind.as_str(),
				stage,
				status,
				detail = %error.detail(),
				"Platform call failed."
			),
			None => tracing::warn!(api = kind.as_str(), stage, %error, "Platform call failed."),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage, error);
	}
}

/// Emits an `info` event when a stale token triggers a renewal.
pub fn log_renewal(kind: ApiKind, stage: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(api = kind.as_str(), stage, "Token rejected; renewing once and retrying.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, stage);
	}
}
