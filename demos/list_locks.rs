//! Lists every held lock against a local mock of the platform with the reqwest transport,
//! showing the lazy token request and the cursor walk.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use seaplane_client::{
	Client, Configuration, config::Endpoints, http::ReqwestHttpClient,
	reqwest::Client as ReqwestClient, url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let identity = server
		.mock_async(|when, then| {
			when.method(POST).path("/identity/token");
			then.status(200).body("{\"token\":\"demo-token\"}");
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks").query_param("from", "base64:c2Vjb25k");
			then.status(200).body(
				"{\"locks\":[{\"id\":\"id-2\",\"name\":\"c2Vjb25k\",\"info\":{\"ttl\":60,\"client-id\":\"worker-b\",\"ip\":\"10.0.0.2\"}}],\"next\":null}",
			);
		})
		.await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/locks").query_param_missing("from");
			then.status(200).body(
				"{\"locks\":[{\"id\":\"id-1\",\"name\":\"Zmlyc3Q\",\"info\":{\"ttl\":30,\"client-id\":\"worker-a\",\"ip\":\"10.0.0.1\"}}],\"next\":\"c2Vjb25k\"}",
			);
		})
		.await;
	let base = Url::parse(&server.url("/v1/"))?;
	let config = Configuration::default()
		.with_endpoints(Endpoints {
			identity: Url::parse(&server.url("/identity/"))?,
			compute: base.clone(),
			coordination: base,
		})
		.with_api_key("demo-api-key");
	let http_client = ReqwestHttpClient::from_builder(
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true),
	)?;
	let client = Client::with_http_client(config, Arc::new(http_client))?;

	for lock in client.locks().get_all_pages(None, None).await? {
		println!("{} held by {} for {}s.", lock.name, lock.info.client_id, lock.info.ttl);
	}

	identity.assert_calls_async(1).await;
	first.assert_calls_async(1).await;
	second.assert_calls_async(1).await;

	Ok(())
}
