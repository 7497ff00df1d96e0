//! Authenticated call execution with a bounded renew-and-retry cycle.
//!
//! [`RequestExecutor::execute`] resolves a bearer token, hands it to a request-building
//! closure, sends the request, and decodes the JSON body of a 2xx response. A `401` is
//! retried exactly once with a renewed token, and only when the caller did not supply an
//! explicit token and the provider's auto-renew policy is on. Every other outcome,
//! including a second `401` and any transport failure, is returned as-is.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenProvider},
	http::{self as transport, ApiHttpClient, ApiRequest},
	obs::{self, ApiKind, CallOutcome, CallSpan},
};

/// Runs resource calls against the shared [`TokenProvider`].
#[derive(Clone)]
pub struct RequestExecutor {
	tokens: Arc<TokenProvider>,
	http_client: Arc<dyn ApiHttpClient>,
}
impl RequestExecutor {
	/// Creates an executor sending through `http_client` with tokens from `tokens`.
	pub fn new(tokens: Arc<TokenProvider>, http_client: Arc<dyn ApiHttpClient>) -> Self {
		Self { tokens, http_client }
	}

	/// Token provider backing this executor.
	pub fn token_provider(&self) -> &Arc<TokenProvider> {
		&self.tokens
	}

	/// Executes one authenticated call and decodes its JSON body into `T`.
	///
	/// `build` receives the token to authenticate with and may be invoked twice when a
	/// renewal happens. Passing `token` bypasses the provider and disables the retry.
	pub async fn execute<T, F>(
		&self,
		kind: ApiKind,
		stage: &'static str,
		token: Option<&AccessToken>,
		build: F,
	) -> Result<T>
	where
		T: DeserializeOwned,
		F: Fn(&AccessToken) -> Result<ApiRequest>,
	{
		let span = CallSpan::new(kind, stage);

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let explicit = token.is_some();
				let token = match token {
					Some(token) => token.clone(),
					None => self.tokens.acquire().await?,
				};

				match self.send(&build, &token).await {
					Err(e) if e.is_unauthorized() && !explicit && self.tokens.auto_renew() => {
						obs::log_renewal(kind, stage);
						obs::record_call_outcome(kind, CallOutcome::Renewal);

						let renewed = self.tokens.renew_after(&token).await?;

						self.send(&build, &renewed).await
					},
					outcome => outcome,
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(e) => {
				obs::log_failure(kind, stage, e);
				obs::record_call_outcome(kind, CallOutcome::Failure);
			},
		}

		result
	}

	async fn send<T, F>(&self, build: &F, token: &AccessToken) -> Result<T>
	where
		T: DeserializeOwned,
		F: Fn(&AccessToken) -> Result<ApiRequest>,
	{
		let request = build(token)?;
		let response = self.http_client.execute(request).await?;

		if !response.status().is_success() {
			return Err(transport::http_error(&response).into());
		}

		transport::decode_json(&response)
	}
}
impl Debug for RequestExecutor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor").field("tokens", &self.tokens).finish_non_exhaustive()
	}
}
