//! Transport primitives shared by the token provider and the request executor.
//!
//! The module exposes [`ApiHttpClient`], the client's only dependency on an HTTP stack,
//! alongside the [`ApiRequest`]/[`ApiResponse`] aliases it exchanges. Implementations return
//! every HTTP response untouched (2xx or not) and reserve `Err` for failures that happen
//! before a status line exists, which the executor reports with the transport sentinel
//! status. JSON (de)serialization stays on the client side of the seam.

// crates.io
use http::{
	HeaderValue, Method, Request, Response,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, DecodeError, HttpError, TransportError},
};

/// Outbound request handed to an [`ApiHttpClient`].
pub type ApiRequest = Request<Vec<u8>>;
/// Raw response returned by an [`ApiHttpClient`].
pub type ApiResponse = Response<Vec<u8>>;
/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing platform calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back every
/// token provider the client rebuilds over its lifetime. Timeouts, TLS, and proxy policy
/// belong to the implementation; the client passes them through unchanged.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the response for any HTTP status.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Configure timeouts on the wrapped client; the executor never adds its own.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the wrapped client from a configured builder (timeouts, TLS, proxies).
	pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self> {
		let client = builder.build().map_err(ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = ApiResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Builds a request carrying the JSON headers and `Authorization: Bearer {bearer}`.
pub fn authorized_request(
	method: Method,
	url: &Url,
	bearer: &str,
	body: Option<Vec<u8>>,
) -> Result<ApiRequest> {
	let authorization = HeaderValue::try_from(format!("Bearer {bearer}"))
		.map_err(|e| ConfigError::HttpRequest(e.into()))?;
	let request = Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(ACCEPT, HeaderValue::from_static("application/json"))
		.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
		.header(AUTHORIZATION, authorization)
		.body(body.unwrap_or_default())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Serializes `value` into a JSON request body.
pub fn json_body<T>(value: &T) -> Result<Vec<u8>>
where
	T: ?Sized + Serialize,
{
	serde_json::to_vec(value).map_err(|e| ConfigError::EncodeBody(e).into())
}

/// Appends path segments to `base`, ignoring a trailing slash on the base.
///
/// An empty final segment produces a trailing slash, which the coordination APIs use to
/// tell a directory apart from a key.
pub fn join_segments<I, S>(base: &Url, segments: I) -> Result<Url>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::EndpointCannotBeABase { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}

/// Converts a non-2xx response into an [`HttpError`].
pub fn http_error(response: &ApiResponse) -> HttpError {
	HttpError::new(response.status().as_u16(), String::from_utf8_lossy(response.body()))
}

/// Decodes a successful response body; an empty body decodes as JSON `null`.
pub fn decode_json<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let body = response.body().as_slice();
	let body = if body.iter().all(u8::is_ascii_whitespace) { b"null".as_slice() } else { body };
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		DecodeError::Json { source, status: response.status().as_u16() }.into()
	})
}
