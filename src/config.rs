//! Client configuration: endpoints, credentials, and the token policy.
//!
//! [`Configuration`] is a plain value. [`crate::Client`] rebuilds its token provider from it
//! whenever it changes, so a new API key or identity endpoint never reuses a token issued
//! under the old one.

// std
use std::env;
// self
use crate::{_prelude::*, auth::AccessToken, error::ConfigError};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SEAPLANE_API_KEY";
/// Environment variable overriding the identity endpoint.
pub const IDENTITY_ENDPOINT_ENV: &str = "SEAPLANE_IDENTITY_ENDPOINT";
/// Environment variable overriding the compute endpoint.
pub const COMPUTE_ENDPOINT_ENV: &str = "SEAPLANE_COMPUTE_ENDPOINT";
/// Environment variable overriding the coordination endpoint.
pub const COORDINATION_ENDPOINT_ENV: &str = "SEAPLANE_COORDINATION_ENDPOINT";

/// Default identity endpoint.
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://flightdeck.cplane.cloud/";
/// Default compute endpoint.
pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.cplane.cloud/v1/";
/// Default coordination endpoint (locks, metadata, restrictions).
pub const DEFAULT_COORDINATION_ENDPOINT: &str = "https://metadata.cplane.cloud/v1/";

/// Base URLs of the platform surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Identity endpoint issuing bearer tokens.
	pub identity: Url,
	/// Compute API base URL.
	pub compute: Url,
	/// Coordination API base URL.
	pub coordination: Url,
}
impl Endpoints {
	/// Parses the three base URLs.
	pub fn parse(identity: &str, compute: &str, coordination: &str) -> Result<Self> {
		Ok(Self {
			identity: parse_endpoint("identity", identity)?,
			compute: parse_endpoint("compute", compute)?,
			coordination: parse_endpoint("coordination", coordination)?,
		})
	}

	/// Points every surface at the same base URL, which is convenient for mock servers.
	pub fn uniform(base: Url) -> Self {
		Self { identity: base.clone(), compute: base.clone(), coordination: base }
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			identity: Url::parse(DEFAULT_IDENTITY_ENDPOINT)
				.unwrap_or_else(|_| unreachable!("Default identity endpoint is a valid URL.")),
			compute: Url::parse(DEFAULT_COMPUTE_ENDPOINT)
				.unwrap_or_else(|_| unreachable!("Default compute endpoint is a valid URL.")),
			coordination: Url::parse(DEFAULT_COORDINATION_ENDPOINT)
				.unwrap_or_else(|_| unreachable!("Default coordination endpoint is a valid URL.")),
		}
	}
}

/// Settings a [`crate::Client`] builds its token provider and executor from.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
	/// Platform base URLs.
	pub endpoints: Endpoints,
	/// API key exchanged for bearer tokens.
	pub api_key: Option<String>,
	/// Caller-owned bearer token; while set, tokens are never renewed implicitly.
	pub access_token: Option<AccessToken>,
	/// Whether a `401` triggers one implicit renew-and-retry cycle.
	pub auto_renew: bool,
	/// Upper bound on page requests per exhaustive listing; `None` is unbounded.
	pub max_pages: Option<usize>,
}
impl Configuration {
	/// Builds the defaults and overlays the `SEAPLANE_*` environment variables.
	pub fn from_env() -> Result<Self> {
		let mut config = Self::default();

		if let Ok(api_key) = env::var(API_KEY_ENV) {
			config.api_key = Some(api_key);
		}
		if let Ok(identity) = env::var(IDENTITY_ENDPOINT_ENV) {
			config.endpoints.identity = parse_endpoint("identity", &identity)?;
		}
		if let Ok(compute) = env::var(COMPUTE_ENDPOINT_ENV) {
			config.endpoints.compute = parse_endpoint("compute", &compute)?;
		}
		if let Ok(coordination) = env::var(COORDINATION_ENDPOINT_ENV) {
			config.endpoints.coordination = parse_endpoint("coordination", &coordination)?;
		}

		Ok(config)
	}

	/// Replaces every endpoint.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Sets the API key.
	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());

		self
	}

	/// Injects a caller-owned token and turns auto-renew off.
	pub fn with_access_token(mut self, token: impl Into<AccessToken>) -> Self {
		self.access_token = Some(token.into());
		self.auto_renew = false;

		self
	}

	/// Sets the auto-renew policy.
	pub fn with_auto_renew(mut self, enabled: bool) -> Self {
		self.auto_renew = enabled;

		self
	}

	/// Caps exhaustive listings at `max_pages` requests.
	pub fn with_max_pages(mut self, max_pages: usize) -> Self {
		self.max_pages = Some(max_pages);

		self
	}
}
impl Default for Configuration {
	fn default() -> Self {
		Self {
			endpoints: Endpoints::default(),
			api_key: None,
			access_token: None,
			auto_renew: true,
			max_pages: None,
		}
	}
}
impl Debug for Configuration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Configuration")
			.field("endpoints", &self.endpoints)
			.field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
			.field("access_token", &self.access_token)
			.field("auto_renew", &self.auto_renew)
			.field("max_pages", &self.max_pages)
			.finish()
	}
}

pub(crate) fn parse_endpoint(endpoint: &'static str, value: &str) -> Result<Url> {
	let url = Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })?;

	if url.cannot_be_a_base() {
		return Err(ConfigError::EndpointCannotBeABase { url: url.into() }.into());
	}

	Ok(url)
}
