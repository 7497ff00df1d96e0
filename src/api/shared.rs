// crates.io
use http::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	client::CallContext,
	encoding,
	http as transport,
	obs::ApiKind,
};

/// One fully described resource call.
pub(crate) struct Call {
	pub(crate) kind: ApiKind,
	pub(crate) stage: &'static str,
	pub(crate) method: Method,
	pub(crate) url: Url,
	pub(crate) body: Option<Vec<u8>>,
}
impl Call {
	pub(crate) fn new(kind: ApiKind, stage: &'static str, method: Method, url: Url) -> Self {
		Self { kind, stage, method, url, body: None }
	}

	pub(crate) fn body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	pub(crate) fn query(mut self, pairs: &[(&str, &str)]) -> Self {
		if !pairs.is_empty() {
			self.url.query_pairs_mut().extend_pairs(pairs);
		}

		self
	}

	/// Sends the call through the executor and decodes the JSON body.
	pub(crate) async fn send<T>(self, context: &CallContext, token: Option<&AccessToken>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let Self { kind, stage, method, url, body } = self;

		context
			.executor
			.execute(kind, stage, token, |token| {
				transport::authorized_request(method.clone(), &url, token.expose(), body.clone())
			})
			.await
	}
}

/// Acknowledgement string returned by mutating coordination calls (`"OK"` / `"Ok"`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub(crate) struct Ack(String);
impl Ack {
	pub(crate) fn is_ok(&self) -> bool {
		self.0.eq_ignore_ascii_case("ok")
	}
}

/// `{base}/{resource}/base64:{bytes}` or, for a directory, the same with a trailing slash.
pub(crate) fn keyed_url(base: &Url, resource: &str, key: &[u8], directory: bool) -> Result<Url> {
	let segment = encoding::segment(key);

	if directory {
		transport::join_segments(base, [resource, segment.as_str(), ""])
	} else {
		transport::join_segments(base, [resource, segment.as_str()])
	}
}
