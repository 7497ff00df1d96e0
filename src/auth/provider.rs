//! Bearer token acquisition and caching against the identity endpoint.
//!
//! A [`TokenProvider`] owns exactly one token slot. The slot is read and replaced as a
//! whole under a [`RwLock`], so readers never observe a partially written token. Token
//! requests are serialized by a singleflight guard: a caller that saw a token rejected
//! re-checks the slot after acquiring the guard and reuses a replacement installed by a
//! concurrent caller instead of hitting the identity endpoint again.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenResponse},
	error::ConfigError,
	http::{self as transport, ApiHttpClient},
	obs::{self, ApiKind, CallOutcome, CallSpan},
};

#[derive(Clone, Debug)]
struct TokenSlot {
	token: Option<AccessToken>,
	auto_renew: bool,
}

/// Acquires, caches, and renews the bearer token used by every resource call.
pub struct TokenProvider {
	token_url: Url,
	api_key: Option<String>,
	http_client: Arc<dyn ApiHttpClient>,
	slot: RwLock<TokenSlot>,
	renewal: AsyncMutex<()>,
}
impl TokenProvider {
	/// Creates a provider for `{identity}/token` with an empty slot and auto-renew enabled.
	pub fn new(
		identity: &Url,
		api_key: Option<String>,
		http_client: Arc<dyn ApiHttpClient>,
	) -> Result<Self> {
		let token_url = transport::join_segments(identity, ["token"])?;

		Ok(Self {
			token_url,
			api_key,
			http_client,
			slot: RwLock::new(TokenSlot { token: None, auto_renew: true }),
			renewal: AsyncMutex::new(()),
		})
	}

	/// Seeds the slot with a caller-owned token, which turns auto-renew off.
	pub fn with_token(mut self, token: AccessToken) -> Self {
		let slot = self.slot.get_mut();

		slot.token = Some(token);
		slot.auto_renew = false;

		self
	}

	/// Seeds the auto-renew policy without touching the slot.
	pub fn with_auto_renew(mut self, enabled: bool) -> Self {
		self.slot.get_mut().auto_renew = enabled;

		self
	}

	/// Identity URL tokens are requested from.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Returns the cached token without a network call.
	pub fn current_token(&self) -> Option<AccessToken> {
		self.slot.read().token.clone()
	}

	/// Returns `true` when the executor may request tokens implicitly after a `401`.
	pub fn auto_renew(&self) -> bool {
		self.slot.read().auto_renew
	}

	/// Injects (or clears) the token; the caller now owns its lifecycle, so auto-renew
	/// is disabled.
	pub fn set_token(&self, token: Option<AccessToken>) {
		let mut slot = self.slot.write();

		slot.token = token;
		slot.auto_renew = false;
	}

	/// Toggles auto-renew and clears the cached token.
	pub fn set_auto_renew(&self, enabled: bool) {
		let mut slot = self.slot.write();

		slot.token = None;
		slot.auto_renew = enabled;
	}

	/// Clears the cached token without changing the auto-renew policy.
	pub fn invalidate(&self) {
		self.slot.write().token = None;
	}

	/// Requests a fresh token from the identity endpoint and caches it.
	///
	/// Any failure clears the slot and is returned to the caller untouched.
	pub async fn request_new_token(&self) -> Result<AccessToken> {
		let _singleflight = self.renewal.lock().await;

		self.fetch_token().await
	}

	/// Returns the cached token, requesting a fresh one when the slot is empty.
	pub(crate) async fn acquire(&self) -> Result<AccessToken> {
		if let Some(token) = self.current_token() {
			return Ok(token);
		}

		self.renew_unless_replaced(None).await
	}

	/// Replaces `stale` with a fresh token unless a concurrent caller already did.
	pub(crate) async fn renew_after(&self, stale: &AccessToken) -> Result<AccessToken> {
		self.renew_unless_replaced(Some(stale)).await
	}

	async fn renew_unless_replaced(&self, stale: Option<&AccessToken>) -> Result<AccessToken> {
		let _singleflight = self.renewal.lock().await;

		match (self.current_token(), stale) {
			(Some(current), Some(stale)) if &current != stale => return Ok(current),
			(Some(current), None) => return Ok(current),
			_ => (),
		}

		self.fetch_token().await
	}

	async fn fetch_token(&self) -> Result<AccessToken> {
		const KIND: ApiKind = ApiKind::Identity;

		let span = CallSpan::new(KIND, "request_new_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let api_key = self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
				let request = transport::authorized_request(
					Method::POST,
					&self.token_url,
					api_key,
					Some(b"{}".to_vec()),
				)?;
				let response = self.http_client.execute(request).await?;

				if !response.status().is_success() {
					return Err(transport::http_error(&response).into());
				}

				let TokenResponse { token } = transport::decode_json(&response)?;

				Ok(AccessToken::new(token))
			})
			.await;

		match &result {
			Ok(token) => {
				self.slot.write().token = Some(token.clone());

				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(e) => {
				self.slot.write().token = None;

				obs::log_failure(KIND, "request_new_token", e);
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}
}
impl Debug for TokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let slot = self.slot.read();

		f.debug_struct("TokenProvider")
			.field("token_url", &self.token_url.as_str())
			.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
			.field("token", &slot.token)
			.field("auto_renew", &slot.auto_renew)
			.finish()
	}
}
