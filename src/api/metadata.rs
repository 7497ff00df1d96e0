//! Key-value metadata store under `{coordination}/config`.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	api::shared::{self, Ack, Call},
	client::Client,
	encoding::{Key, Value},
	http as transport,
	obs::ApiKind,
	page::{Page, PageCursor},
};

const RESOURCE: &str = "config";
const KIND: ApiKind = ApiKind::Metadata;

/// Key-value pair stored in the metadata store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct KeyValue {
	/// Key the value is stored under.
	pub key: Key,
	/// Stored value.
	pub value: Value,
}
impl KeyValue {
	/// Creates a pair.
	pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
		Self { key: key.into(), value: value.into() }
	}
}

#[derive(Debug, Deserialize)]
struct KeyValuePageResponse {
	kvs: Vec<KeyValue>,
	#[serde(default)]
	next_key: Option<Key>,
}

/// Client for the key-value metadata API.
#[derive(Clone, Debug)]
pub struct MetadataClient {
	client: Client,
}
impl MetadataClient {
	pub(crate) fn new(client: Client) -> Self {
		Self { client }
	}

	/// Stores `value` under `key`; `true` when the platform acknowledged the write.
	pub async fn set(&self, key: &Key, value: &Value) -> Result<bool> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, key, false)?;
		let ack: Ack = Call::new(KIND, "metadata.set", Method::PUT, url)
			.body(value.encoded().into_bytes())
			.send(&context, None)
			.await?;

		Ok(ack.is_ok())
	}

	/// Returns the pair stored under `key`.
	pub async fn get(&self, key: &Key) -> Result<KeyValue> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, key, false)?;

		Call::new(KIND, "metadata.get", Method::GET, url).send(&context, None).await
	}

	/// Deletes the pair stored under `key`; `true` when the platform acknowledged it.
	pub async fn delete(&self, key: &Key) -> Result<bool> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, key, false)?;
		let ack: Ack =
			Call::new(KIND, "metadata.delete", Method::DELETE, url).send(&context, None).await?;

		Ok(ack.is_ok())
	}

	/// Returns one page of pairs under `directory` (the root when `None`), starting at
	/// `from`.
	pub async fn get_page(
		&self,
		directory: Option<&Key>,
		from: Option<&Key>,
	) -> Result<Page<KeyValue, Key>> {
		let context = self.client.context();
		let url = match directory {
			Some(directory) =>
				shared::keyed_url(&context.endpoints.coordination, RESOURCE, directory, true)?,
			None => transport::join_segments(&context.endpoints.coordination, [RESOURCE])?,
		};
		let from = from.map(Key::to_segment);
		let mut call = Call::new(KIND, "metadata.get_page", Method::GET, url);

		if let Some(from) = &from {
			call = call.query(&[("from", from.as_str())]);
		}

		let response: KeyValuePageResponse = call.send(&context, None).await?;

		Ok(Page::new(response.kvs, response.next_key))
	}

	/// Returns every pair under `directory` from `from` onwards.
	pub async fn get_all_pages(
		&self,
		directory: Option<&Key>,
		from: Option<&Key>,
	) -> Result<Vec<KeyValue>> {
		let max_pages = self.client.context().max_pages;

		PageCursor::new(from.cloned(), move |cursor: Option<Key>| async move {
			self.get_page(directory, cursor.as_ref()).await
		})
		.with_page_limit(max_pages)
		.collect_all()
		.await
	}
}
