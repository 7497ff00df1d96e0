//! Client facade owning the configuration and the token provider built from it.
//!
//! Every configuration change swaps in a freshly built [`TokenProvider`] and
//! [`RequestExecutor`] pair; nothing is mutated in place, so a token issued under an old
//! API key or identity endpoint is never reused. Resource clients resolve the current pair
//! on each call, which makes a change visible to handles created before it.

// std
#[cfg(feature = "reqwest")] use std::sync::OnceLock;
// self
use crate::{
	_prelude::*,
	api::{FormationsClient, LocksClient, MetadataClient, RestrictClient},
	auth::{AccessToken, TokenProvider},
	config::{self, Configuration, Endpoints},
	executor::RequestExecutor,
	http::ApiHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Shared handle to a configured platform client.
///
/// Cloning is cheap; clones observe the same configuration and token slot.
#[derive(Clone)]
pub struct Client(Arc<ClientInner>);
impl Client {
	/// Creates a client backed by a default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(config: Configuration) -> Result<Self> {
		Self::with_http_client(config, Arc::new(ReqwestHttpClient::default()))
	}

	/// Creates a client backed by a caller-provided transport.
	pub fn with_http_client(
		config: Configuration,
		http_client: Arc<dyn ApiHttpClient>,
	) -> Result<Self> {
		let state = ClientState::build(config, &http_client)?;

		Ok(Self(Arc::new(ClientInner { http_client, state: RwLock::new(state) })))
	}

	/// Returns the process-wide client, configured from the environment on first use.
	///
	/// Prefer explicit clients; this exists for callers that cannot thread one through.
	#[cfg(feature = "reqwest")]
	pub fn global() -> Result<&'static Client> {
		static GLOBAL: OnceLock<Client> = OnceLock::new();

		if let Some(client) = GLOBAL.get() {
			return Ok(client);
		}

		let client = Client::new(Configuration::from_env()?)?;

		Ok(GLOBAL.get_or_init(|| client))
	}

	/// Snapshot of the current configuration.
	pub fn configuration(&self) -> Configuration {
		self.0.state.read().config.clone()
	}

	/// Applies `f` to a copy of the configuration and rebuilds the token provider.
	///
	/// Concurrent updates are serialized; each one sees the result of the previous. `f` runs
	/// with the configuration locked and must not call back into this client. The previous
	/// configuration stays in effect when the rebuild fails.
	pub fn update(&self, f: impl FnOnce(&mut Configuration)) -> Result<()> {
		let mut state = self.0.state.write();
		let mut config = state.config.clone();

		f(&mut config);

		*state = ClientState::build(config, &self.0.http_client)?;

		Ok(())
	}

	/// Replaces the configuration wholesale.
	pub fn set_configuration(&self, config: Configuration) -> Result<()> {
		self.update(|current| *current = config)
	}

	/// Sets a new API key, discarding any token issued under the previous one.
	pub fn set_api_key(&self, api_key: impl Into<String>) -> Result<()> {
		let api_key = api_key.into();

		self.update(|config| config.api_key = Some(api_key))
	}

	/// Points token requests at a new identity endpoint.
	pub fn set_identity_endpoint(&self, url: &str) -> Result<()> {
		let url = config::parse_endpoint("identity", url)?;

		self.update(|config| config.endpoints.identity = url)
	}

	/// Points compute calls at a new endpoint.
	pub fn set_compute_endpoint(&self, url: &str) -> Result<()> {
		let url = config::parse_endpoint("compute", url)?;

		self.update(|config| config.endpoints.compute = url)
	}

	/// Points coordination calls (locks, metadata, restrictions) at a new endpoint.
	pub fn set_coordination_endpoint(&self, url: &str) -> Result<()> {
		let url = config::parse_endpoint("coordination", url)?;

		self.update(|config| config.endpoints.coordination = url)
	}

	/// Replaces every endpoint at once.
	pub fn set_endpoints(&self, endpoints: Endpoints) -> Result<()> {
		self.update(|config| config.endpoints = endpoints)
	}

	/// Injects (or clears) a caller-owned token and disables auto-renew.
	pub fn set_token(&self, token: Option<AccessToken>) -> Result<()> {
		self.update(|config| {
			config.access_token = token;
			config.auto_renew = false;
		})
	}

	/// Toggles auto-renew; any cached or injected token is discarded.
	pub fn set_auto_renew(&self, enabled: bool) -> Result<()> {
		self.update(|config| {
			config.access_token = None;
			config.auto_renew = enabled;
		})
	}

	/// Caps exhaustive listings at `max_pages` requests (`None` is unbounded).
	pub fn set_max_pages(&self, max_pages: Option<usize>) -> Result<()> {
		self.update(|config| config.max_pages = max_pages)
	}

	/// Token provider currently in effect.
	pub fn token_provider(&self) -> Arc<TokenProvider> {
		self.0.state.read().executor.token_provider().clone()
	}

	/// Executor currently in effect.
	pub fn executor(&self) -> RequestExecutor {
		self.0.state.read().executor.clone()
	}

	/// Distributed locks.
	pub fn locks(&self) -> LocksClient {
		LocksClient::new(self.clone())
	}

	/// Key-value metadata store.
	pub fn metadata(&self) -> MetadataClient {
		MetadataClient::new(self.clone())
	}

	/// Data placement restrictions.
	pub fn restrict(&self) -> RestrictClient {
		RestrictClient::new(self.clone())
	}

	/// Compute formations and containers.
	pub fn formations(&self) -> FormationsClient {
		FormationsClient::new(self.clone())
	}

	pub(crate) fn context(&self) -> CallContext {
		let state = self.0.state.read();

		CallContext {
			executor: state.executor.clone(),
			endpoints: state.config.endpoints.clone(),
			max_pages: state.config.max_pages,
		}
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Client").field(&self.0.state.read().config).finish()
	}
}

/// Per-call view of the client state.
#[derive(Clone, Debug)]
pub(crate) struct CallContext {
	pub(crate) executor: RequestExecutor,
	pub(crate) endpoints: Endpoints,
	pub(crate) max_pages: Option<usize>,
}

struct ClientInner {
	http_client: Arc<dyn ApiHttpClient>,
	state: RwLock<ClientState>,
}

struct ClientState {
	config: Configuration,
	executor: RequestExecutor,
}
impl ClientState {
	fn build(config: Configuration, http_client: &Arc<dyn ApiHttpClient>) -> Result<Self> {
		let mut tokens = TokenProvider::new(
			&config.endpoints.identity,
			config.api_key.clone(),
			http_client.clone(),
		)?;

		if let Some(token) = config.access_token.clone() {
			tokens = tokens.with_token(token);
		}

		let tokens = tokens.with_auto_renew(config.auto_renew);
		let executor = RequestExecutor::new(Arc::new(tokens), http_client.clone());

		Ok(Self { config, executor })
	}
}
