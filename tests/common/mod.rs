//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
// self
use seaplane_client::{
	Client, Configuration,
	config::Endpoints,
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, ReqwestHttpClient, TransportFuture},
	reqwest::Client as ReqwestClient,
	url::Url,
};

pub const API_KEY: &str = "api-key-1";
pub const IDENTITY_PATH: &str = "/identity/token";

/// Endpoints pointing every surface at `server`: identity under `/identity/`, compute and
/// coordination under `/v1/`.
pub fn endpoints(server: &MockServer) -> Endpoints {
	let base = Url::parse(&server.url("/v1/")).expect("Mock base URL should parse.");
	let identity =
		Url::parse(&server.url("/identity/")).expect("Mock identity URL should parse.");

	Endpoints { identity, compute: base.clone(), coordination: base }
}

pub fn config(server: &MockServer) -> Configuration {
	Configuration::default().with_endpoints(endpoints(server)).with_api_key(API_KEY)
}

/// Reqwest transport that accepts the self-signed certificates `httpmock` serves.
pub fn mock_transport() -> Arc<ReqwestHttpClient> {
	let transport = ReqwestHttpClient::from_builder(
		ReqwestClient::builder().danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true),
	)
	.expect("Insecure reqwest transport should build for tests.");

	Arc::new(transport)
}

/// Client backed by the real reqwest transport with `config`.
pub fn mock_client(config: Configuration) -> Client {
	Client::with_http_client(config, mock_transport())
		.expect("Client should build against the mock server.")
}

/// Client backed by the real reqwest transport and pointed at `server`.
pub fn client(server: &MockServer) -> Client {
	mock_client(config(server))
}

/// Registers an identity mock answering `token` for `API_KEY`.
pub async fn mock_identity<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	mock_identity_for(server, API_KEY, token).await
}

/// Registers an identity mock answering `token` for `api_key`.
pub async fn mock_identity_for<'a>(
	server: &'a MockServer,
	api_key: &str,
	token: &str,
) -> httpmock::Mock<'a> {
	let authorization = format!("Bearer {api_key}");
	let body = format!("{{\"token\":\"{token}\",\"tenant\":\"tenant-1\",\"subdomain\":\"sub\"}}");

	server
		.mock_async(|when, then| {
			when.method(POST).path(IDENTITY_PATH).header("authorization", authorization).body("{}");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// A recorded outbound request.
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: String,
	pub uri: String,
	pub authorization: Option<String>,
	pub body: Vec<u8>,
}

/// Transport replaying scripted outcomes in order; an exhausted script refuses the
/// connection.
#[derive(Default)]
pub struct ScriptedTransport {
	script: Mutex<VecDeque<Result<(u16, String), String>>>,
	recorded: Mutex<Vec<Recorded>>,
}
impl ScriptedTransport {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
		self.script.lock().push_back(Ok((status, body.into())));

		self
	}

	pub fn fail(&self, message: impl Into<String>) -> &Self {
		self.script.lock().push_back(Err(message.into()));

		self
	}

	pub fn recorded(&self) -> Vec<Recorded> {
		self.recorded.lock().clone()
	}

	pub fn calls_to(&self, path: &str) -> usize {
		self.recorded.lock().iter().filter(|r| r.uri.ends_with(path)).count()
	}
}
impl ApiHttpClient for ScriptedTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		self.recorded.lock().push(Recorded {
			method: request.method().to_string(),
			uri: request.uri().to_string(),
			authorization: request
				.headers()
				.get("authorization")
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned),
			body: request.body().clone(),
		});

		let next = self.script.lock().pop_front();

		Box::pin(async move {
			let (status, body) = match next {
				Some(Ok(outcome)) => outcome,
				Some(Err(message)) => return Err(TransportError::Io(std::io::Error::other(message))),
				None =>
					return Err(TransportError::Io(std::io::Error::new(
						std::io::ErrorKind::ConnectionRefused,
						"connection refused",
					))),
			};
			let mut response = ApiResponse::new(body.into_bytes());

			*response.status_mut() =
				http::StatusCode::from_u16(status).expect("Scripted status should be valid.");

			Ok(response)
		})
	}
}

/// Configuration for a [`ScriptedTransport`]-backed client.
pub fn scripted_config() -> Configuration {
	let base = Url::parse("https://platform.test/v1/").expect("Fixture URL should parse.");
	let identity = Url::parse("https://identity.test/").expect("Fixture URL should parse.");

	Configuration::default()
		.with_endpoints(Endpoints { identity, compute: base.clone(), coordination: base })
		.with_api_key(API_KEY)
}

pub fn scripted_client(transport: Arc<ScriptedTransport>) -> Client {
	Client::with_http_client(scripted_config(), transport)
		.expect("Client should build against the scripted transport.")
}
