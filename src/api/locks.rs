//! Distributed locks under `{coordination}/locks`.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	api::shared::{self, Ack, Call},
	client::Client,
	encoding::{self, LockName},
	http as transport,
	obs::ApiKind,
	page::{Page, PageCursor},
};

const RESOURCE: &str = "locks";
const KIND: ApiKind = ApiKind::Locks;

/// Lock as reported by the platform.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Lock {
	/// Holder id; required to renew or release the lock.
	pub id: String,
	/// Lock name; a `null` name decodes as the empty name.
	#[serde(default, deserialize_with = "encoding::null_as_default")]
	pub name: LockName,
	/// Holder details.
	pub info: LockInfo,
}

/// Holder details attached to a [`Lock`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LockInfo {
	/// Requested time to live, in seconds.
	pub ttl: u64,
	/// Client-chosen identifier of the holder.
	#[serde(rename = "client-id")]
	pub client_id: String,
	/// Address the lock was acquired from.
	#[serde(default)]
	pub ip: String,
}

/// Lock acquired by this client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HeldLock {
	/// Holder id used by [`LocksClient::renew`] and [`LocksClient::release`].
	pub id: String,
	/// Number of times the lock has gone from held to free.
	pub sequencer: u64,
}

#[derive(Debug, Deserialize)]
struct LockPageResponse {
	#[serde(alias = "infos")]
	locks: Vec<Lock>,
	#[serde(default)]
	next: Option<LockName>,
}

/// Client for the locks API.
#[derive(Clone, Debug)]
pub struct LocksClient {
	client: Client,
}
impl LocksClient {
	pub(crate) fn new(client: Client) -> Self {
		Self { client }
	}

	/// Returns the current state of the lock `name`.
	pub async fn get(&self, name: &LockName) -> Result<Lock> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, name, false)?;

		Call::new(KIND, "locks.get", Method::GET, url).send(&context, None).await
	}

	/// Attempts to acquire `name` for `ttl` seconds on behalf of `client_id`.
	pub async fn acquire(&self, name: &LockName, client_id: &str, ttl: u64) -> Result<HeldLock> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, name, false)?;
		let ttl = ttl.to_string();

		Call::new(KIND, "locks.acquire", Method::POST, url)
			.query(&[("client-id", client_id), ("ttl", ttl.as_str())])
			.send(&context, None)
			.await
	}

	/// Releases a held lock; `true` when the platform acknowledged the release.
	pub async fn release(&self, name: &LockName, id: &str) -> Result<bool> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, name, false)?;
		let ack: Ack = Call::new(KIND, "locks.release", Method::DELETE, url)
			.query(&[("id", id)])
			.send(&context, None)
			.await?;

		Ok(ack.is_ok())
	}

	/// Extends a held lock to `ttl` seconds; `true` when the platform acknowledged it.
	pub async fn renew(&self, name: &LockName, id: &str, ttl: u64) -> Result<bool> {
		let context = self.client.context();
		let url = shared::keyed_url(&context.endpoints.coordination, RESOURCE, name, false)?;
		let ttl = ttl.to_string();
		let ack: Ack = Call::new(KIND, "locks.renew", Method::PATCH, url)
			.query(&[("id", id), ("ttl", ttl.as_str())])
			.send(&context, None)
			.await?;

		Ok(ack.is_ok())
	}

	/// Returns one page of held locks under `directory` (the root when `None`), starting
	/// at `from`.
	pub async fn get_page(
		&self,
		directory: Option<&LockName>,
		from: Option<&LockName>,
	) -> Result<Page<Lock, LockName>> {
		let context = self.client.context();
		let url = match directory {
			Some(directory) =>
				shared::keyed_url(&context.endpoints.coordination, RESOURCE, directory, true)?,
			None => transport::join_segments(&context.endpoints.coordination, [RESOURCE])?,
		};
		let from = from.map(LockName::to_segment);
		let mut call = Call::new(KIND, "locks.get_page", Method::GET, url);

		if let Some(from) = &from {
			call = call.query(&[("from", from.as_str())]);
		}

		let response: LockPageResponse = call.send(&context, None).await?;

		Ok(Page::new(response.locks, response.next))
	}

	/// Returns every held lock under `directory` from `from` onwards.
	pub async fn get_all_pages(
		&self,
		directory: Option<&LockName>,
		from: Option<&LockName>,
	) -> Result<Vec<Lock>> {
		let max_pages = self.client.context().max_pages;

		PageCursor::new(from.cloned(), move |cursor: Option<LockName>| async move {
			self.get_page(directory, cursor.as_ref()).await
		})
		.with_page_limit(max_pages)
		.collect_all()
		.await
	}
}
