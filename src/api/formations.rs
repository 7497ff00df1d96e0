//! Compute formations and their containers under `{compute}/formations`.
//!
//! Every operation accepts an optional explicit token. A call made with one bypasses the
//! token provider and is never renewed; a `401` is returned to the caller as-is.

// crates.io
use http::Method;
use serde_json::Value as JsonValue;
// self
use crate::{
	_prelude::*,
	api::shared::Call,
	auth::AccessToken,
	client::Client,
	http as transport,
	obs::ApiKind,
};

const RESOURCE: &str = "formations";
const KIND: ApiKind = ApiKind::Compute;

/// Public metadata of a formation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FormationMetadata {
	/// Public URL the formation is served from.
	pub url: String,
}

/// Client for the formations API.
#[derive(Clone, Debug)]
pub struct FormationsClient {
	client: Client,
}
impl FormationsClient {
	pub(crate) fn new(client: Client) -> Self {
		Self { client }
	}

	/// Lists the names of every formation.
	pub async fn list_names(&self, token: Option<&AccessToken>) -> Result<Vec<String>> {
		self.call("formations.list_names", Method::GET, &[], &[], token).await
	}

	/// Returns the metadata of formation `name`.
	pub async fn get_metadata(
		&self,
		name: &str,
		token: Option<&AccessToken>,
	) -> Result<FormationMetadata> {
		self.call("formations.get_metadata", Method::GET, &[name], &[], token).await
	}

	/// Creates formation `name`, optionally cloned from `source` and deployed at once.
	pub async fn create(
		&self,
		name: &str,
		active: bool,
		source: Option<&str>,
		token: Option<&AccessToken>,
	) -> Result<JsonValue> {
		let active = active.to_string();
		let mut query = vec![("active", active.as_str())];

		if let Some(source) = source {
			query.push(("source", source));
		}

		self.call("formations.create", Method::POST, &[name], &query, token).await
	}

	/// Deletes formation `name`.
	pub async fn delete(&self, name: &str, token: Option<&AccessToken>) -> Result<JsonValue> {
		self.call("formations.delete", Method::DELETE, &[name], &[], token).await
	}

	/// Lists the containers of formation `name`.
	pub async fn containers(&self, name: &str, token: Option<&AccessToken>) -> Result<JsonValue> {
		self.call("formations.containers", Method::GET, &[name, "containers"], &[], token).await
	}

	/// Returns container `id` of formation `name`.
	pub async fn container(
		&self,
		name: &str,
		id: &str,
		token: Option<&AccessToken>,
	) -> Result<JsonValue> {
		self.call("formations.container", Method::GET, &[name, "containers", id], &[], token).await
	}

	async fn call<T>(
		&self,
		stage: &'static str,
		method: Method,
		segments: &[&str],
		query: &[(&str, &str)],
		token: Option<&AccessToken>,
	) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let context = self.client.context();
		let url = transport::join_segments(
			&context.endpoints.compute,
			std::iter::once(RESOURCE).chain(segments.iter().copied()),
		)?;

		Call::new(KIND, stage, method, url).query(query).send(&context, token).await
	}
}
