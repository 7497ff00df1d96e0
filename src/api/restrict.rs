//! Data placement restrictions under `{coordination}/restrict`.
//!
//! A restriction pins the records of one API directory to a set of regions and cloud
//! providers. Listing resumes from a composite cursor: the key alone is ambiguous because
//! restrictions of every API share one range.

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	api::shared::{Ack, Call},
	client::Client,
	encoding::{self, Key},
	error::{DecodeError, ValidationError},
	http as transport,
	obs::ApiKind,
	page::{Page, PageCursor},
};

const RESOURCE: &str = "restrict";
const KIND: ApiKind = ApiKind::Restrict;

macro_rules! def_wire_enum {
	($name:ident, $doc:literal, $kind:literal, { $($(#[$meta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
		#[doc = $doc]
		#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub enum $name {
			$($(#[$meta])* $variant,)+
		}
		impl $name {
			/// Every variant in declaration order.
			pub const ALL: &'static [Self] = &[$(Self::$variant),+];

			/// Value used on the wire.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $wire,)+
				}
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl FromStr for $name {
			type Err = DecodeError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::ALL
					.iter()
					.copied()
					.find(|variant| variant.as_str().eq_ignore_ascii_case(s))
					.ok_or_else(|| DecodeError::UnknownVariant { kind: $kind, value: s.to_owned() })
			}
		}
		impl TryFrom<String> for $name {
			type Error = DecodeError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				value.parse()
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.as_str().to_owned()
			}
		}
	};
}

def_wire_enum!(Api, "APIs whose data placement can be restricted.", "api", {
	/// Key-value metadata store.
	Config => "Config",
	/// Distributed locks.
	Locks => "Locks",
});
def_wire_enum!(RestrictionState, "Enforcement state of a restriction.", "restriction state", {
	/// Accepted but not yet applied everywhere.
	Pending => "Pending",
	/// Applied.
	Enforced => "Enforced",
});
def_wire_enum!(Region, "Geographic region codes.", "region", {
	/// Asia.
	Asia => "XA",
	/// People's Republic of China.
	RepublicOfChina => "XC",
	/// Europe.
	Europe => "XE",
	/// Africa.
	Africa => "XF",
	/// North America.
	NorthAmerica => "XN",
	/// Oceania.
	Oceania => "XO",
	/// Antarctica.
	Antarctica => "XQ",
	/// South America.
	SouthAmerica => "XS",
	/// United Kingdom.
	Uk => "XU",
});
def_wire_enum!(Provider, "Cloud providers.", "provider", {
	/// Amazon Web Services.
	Aws => "AWS",
	/// Microsoft Azure.
	Azure => "Azure",
	/// DigitalOcean.
	DigitalOcean => "DigitalOcean",
	/// Equinix.
	Equinix => "Equinix",
	/// Google Cloud Platform.
	Gcp => "GCP",
});

/// Allow and deny lists attached to a restricted directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionDetails {
	/// Regions records may be placed in; empty allows every region not denied.
	#[serde(default, deserialize_with = "encoding::null_as_default")]
	pub regions_allowed: BTreeSet<Region>,
	/// Regions records must never be placed in.
	#[serde(default, deserialize_with = "encoding::null_as_default")]
	pub regions_denied: BTreeSet<Region>,
	/// Providers records may be placed with; empty allows every provider not denied.
	#[serde(default, deserialize_with = "encoding::null_as_default")]
	pub providers_allowed: BTreeSet<Provider>,
	/// Providers records must never be placed with.
	#[serde(default, deserialize_with = "encoding::null_as_default")]
	pub providers_denied: BTreeSet<Provider>,
}
impl RestrictionDetails {
	/// Returns a builder that rejects contradictory lists.
	pub fn builder() -> RestrictionDetailsBuilder {
		RestrictionDetailsBuilder::default()
	}
}

/// Builder for [`RestrictionDetails`].
#[derive(Clone, Debug, Default)]
pub struct RestrictionDetailsBuilder {
	details: RestrictionDetails,
}
impl RestrictionDetailsBuilder {
	/// Allows `region`.
	pub fn allow_region(mut self, region: Region) -> Self {
		self.details.regions_allowed.insert(region);

		self
	}

	/// Denies `region`.
	pub fn deny_region(mut self, region: Region) -> Self {
		self.details.regions_denied.insert(region);

		self
	}

	/// Allows `provider`.
	pub fn allow_provider(mut self, provider: Provider) -> Self {
		self.details.providers_allowed.insert(provider);

		self
	}

	/// Denies `provider`.
	pub fn deny_provider(mut self, provider: Provider) -> Self {
		self.details.providers_denied.insert(provider);

		self
	}

	/// Consumes the builder; fails when a region or provider is both allowed and denied.
	pub fn build(self) -> Result<RestrictionDetails, ValidationError> {
		let details = self.details;

		if !details.regions_allowed.is_disjoint(&details.regions_denied)
			|| !details.providers_allowed.is_disjoint(&details.providers_denied)
		{
			return Err(ValidationError::ConflictingRestrictions);
		}

		Ok(details)
	}
}

/// Restriction attached to one API directory.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Restriction {
	/// API the directory belongs to.
	pub api: Api,
	/// Restricted directory.
	pub directory: Key,
	/// Allow and deny lists.
	pub details: RestrictionDetails,
	/// Enforcement state.
	pub state: RestrictionState,
}

/// Resume point of a restriction listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RestrictionCursor {
	/// API the resume key belongs to.
	pub api: Api,
	/// Directory to resume from.
	pub key: Key,
}

#[derive(Debug, Deserialize)]
struct RestrictionPageResponse {
	restrictions: Vec<Restriction>,
	#[serde(default)]
	next_api: Option<Api>,
	#[serde(default)]
	next_key: Option<Key>,
}
impl RestrictionPageResponse {
	fn into_page(self) -> Page<Restriction, RestrictionCursor> {
		let next = match (self.next_api, self.next_key) {
			(Some(api), Some(key)) => Some(RestrictionCursor { api, key }),
			_ => None,
		};

		Page::new(self.restrictions, next)
	}
}

/// Client for the restrictions API.
#[derive(Clone, Debug)]
pub struct RestrictClient {
	client: Client,
}
impl RestrictClient {
	pub(crate) fn new(client: Client) -> Self {
		Self { client }
	}

	/// Returns the restriction on `directory` of `api`.
	pub async fn get(&self, api: Api, directory: &Key) -> Result<Restriction> {
		let context = self.client.context();
		let url = directory_url(&context.endpoints.coordination, api, directory)?;

		Call::new(KIND, "restrict.get", Method::GET, url).send(&context, None).await
	}

	/// Sets the restriction on `directory` of `api`; `true` when acknowledged.
	pub async fn set(&self, api: Api, directory: &Key, details: &RestrictionDetails) -> Result<bool> {
		let context = self.client.context();
		let url = directory_url(&context.endpoints.coordination, api, directory)?;
		let ack: Ack = Call::new(KIND, "restrict.set", Method::PUT, url)
			.body(transport::json_body(details)?)
			.send(&context, None)
			.await?;

		Ok(ack.is_ok())
	}

	/// Removes the restriction on `directory` of `api`; `true` when acknowledged.
	pub async fn delete(&self, api: Api, directory: &Key) -> Result<bool> {
		let context = self.client.context();
		let url = directory_url(&context.endpoints.coordination, api, directory)?;
		let ack: Ack =
			Call::new(KIND, "restrict.delete", Method::DELETE, url).send(&context, None).await?;

		Ok(ack.is_ok())
	}

	/// Returns one page of restrictions starting at `from`.
	///
	/// Restrictions of `api` are listed unless `all_range` is set or `api` is `None`, in
	/// which case every API is listed. Resuming from `from` requires the API the key
	/// belongs to and fails with [`ValidationError::MissingRestrictionApi`] before any
	/// request otherwise.
	pub async fn get_page(
		&self,
		api: Option<Api>,
		from: Option<&Key>,
		all_range: bool,
	) -> Result<Page<Restriction, RestrictionCursor>> {
		let query = resume_query(api, from)?;
		let context = self.client.context();
		let url = match api {
			Some(api) if !all_range =>
				transport::join_segments(&context.endpoints.coordination, [RESOURCE, api.as_str()])?,
			_ => transport::join_segments(&context.endpoints.coordination, [RESOURCE])?,
		};
		let mut call = Call::new(KIND, "restrict.get_page", Method::GET, url);

		if let Some((from, from_api)) = &query {
			call = call.query(&[("from", from.as_str()), ("from_api", *from_api)]);
		}

		let response: RestrictionPageResponse = call.send(&context, None).await?;

		Ok(response.into_page())
	}

	/// Returns every restriction across all APIs from `from` (a key of `api`) onwards.
	pub async fn get_all_pages(&self, api: Option<Api>, from: Option<&Key>) -> Result<Vec<Restriction>> {
		resume_query(api, from)?;

		let start = api.zip(from).map(|(api, key)| RestrictionCursor { api, key: key.clone() });
		let max_pages = self.client.context().max_pages;

		PageCursor::new(start, move |cursor: Option<RestrictionCursor>| async move {
			match cursor {
				Some(cursor) => self.get_page(Some(cursor.api), Some(&cursor.key), true).await,
				None => self.get_page(api, None, true).await,
			}
		})
		.with_page_limit(max_pages)
		.collect_all()
		.await
	}
}

fn directory_url(base: &Url, api: Api, directory: &Key) -> Result<Url> {
	let segment = directory.to_segment();

	transport::join_segments(base, [RESOURCE, api.as_str(), segment.as_str(), ""])
}

fn resume_query(api: Option<Api>, from: Option<&Key>) -> Result<Option<(String, &'static str)>> {
	match (api, from) {
		(_, None) => Ok(None),
		(Some(api), Some(from)) => Ok(Some((from.to_segment(), api.as_str()))),
		(None, Some(_)) => Err(ValidationError::MissingRestrictionApi.into()),
	}
}
