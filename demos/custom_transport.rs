//! Plugs a custom transport into the client and shows how failures surface.
//!
//! 1. Implement [`ApiHttpClient`] and return the raw response for every status.
//! 2. Report failures that happen before a status line as [`TransportError`].
//! 3. Hand the transport to [`Client::with_http_client`].

// std
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};
// crates.io
use color_eyre::Result;
// self
use seaplane_client::{
	Client, Configuration, Error,
	encoding::{Key, Value},
	error::TransportError,
	http::{ApiHttpClient, ApiRequest, ApiResponse, TransportFuture},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let transport = Arc::new(InMemoryTransport::default());
	let client = Client::with_http_client(
		Configuration::default().with_api_key("demo-api-key"),
		transport.clone(),
	)?;
	let metadata = client.metadata();
	let acknowledged = metadata.set(&Key::from("greeting"), &Value::from("hello")).await?;

	println!("Write acknowledged: {acknowledged}.");

	transport.offline.store(true, Ordering::SeqCst);

	match metadata.get(&Key::from("greeting")).await {
		Err(e @ Error::Transport(_)) =>
			println!("Transport failure (status {:?}): {}.", e.status(), e.detail()),
		other => println!("Unexpected outcome: {other:?}."),
	}

	Ok(())
}

/// Answers identity and metadata writes from memory until switched offline.
#[derive(Default)]
struct InMemoryTransport {
	offline: AtomicBool,
}
impl ApiHttpClient for InMemoryTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let offline = self.offline.load(Ordering::SeqCst);

		Box::pin(async move {
			if offline {
				return Err(TransportError::Io(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					"platform unreachable",
				)));
			}

			let body: &[u8] = if request.uri().path().ends_with("/token") {
				b"{\"token\":\"in-memory-token\"}"
			} else {
				b"\"Ok\""
			};

			Ok(ApiResponse::new(body.to_vec()))
		})
	}
}
