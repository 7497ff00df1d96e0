//! Url-safe base64 helpers and the binary key types shared by the coordination APIs.
//!
//! Keys, directories, and lock names are arbitrary bytes on the platform. They travel as
//! url-safe base64 without padding, prefixed with `base64:` when used in a path segment or
//! in the `from` pagination parameter.

// std
use std::ops::Deref;
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{_prelude::*, error::DecodeError};

/// Prefix marking a path segment or cursor as base64-encoded.
pub const BASE64_PREFIX: &str = "base64:";

macro_rules! def_key {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(Vec<u8>);
		impl $name {
			/// Wraps raw bytes.
			pub fn new(value: impl Into<Vec<u8>>) -> Self {
				Self(value.into())
			}

			/// Decodes a url-safe base64 value.
			pub fn from_encoded(encoded: impl AsRef<str>) -> Result<Self, DecodeError> {
				decode(encoded.as_ref()).map(Self)
			}

			/// Returns the raw bytes.
			pub fn as_bytes(&self) -> &[u8] {
				&self.0
			}

			/// Returns the url-safe base64 form without padding.
			pub fn encoded(&self) -> String {
				encode(&self.0)
			}

			/// Returns the `base64:`-prefixed form used in paths and cursors.
			pub fn to_segment(&self) -> String {
				segment(&self.0)
			}

			/// Consumes the key and returns the raw bytes.
			pub fn into_bytes(self) -> Vec<u8> {
				self.0
			}
		}
		impl Deref for $name {
			type Target = [u8];

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<[u8]> for $name {
			fn as_ref(&self) -> &[u8] {
				&self.0
			}
		}
		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self(value.as_bytes().to_vec())
			}
		}
		impl From<&[u8]> for $name {
			fn from(value: &[u8]) -> Self {
				Self(value.to_vec())
			}
		}
		impl From<Vec<u8>> for $name {
			fn from(value: Vec<u8>) -> Self {
				Self(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.encoded()
			}
		}
		impl TryFrom<String> for $name {
			type Error = DecodeError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::from_encoded(value)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({:?})"), String::from_utf8_lossy(&self.0))
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&String::from_utf8_lossy(&self.0))
			}
		}
	};
}

def_key!(Key, "Key of a key-value pair or directory in the metadata store.", "Key");
def_key!(LockName, "Name of a distributed lock; may not contain `\\0` bytes.", "LockName");
def_key!(Value, "Value stored under a [`Key`] in the metadata store.", "Value");

/// Encodes bytes as url-safe base64 without padding.
pub fn encode(bytes: &[u8]) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes url-safe base64, tolerating trailing padding.
pub fn decode(encoded: &str) -> Result<Vec<u8>, DecodeError> {
	URL_SAFE_NO_PAD
		.decode(encoded.trim_end_matches('='))
		.map_err(|source| DecodeError::Base64 { value: encoded.to_owned(), source })
}

/// Returns the `base64:`-prefixed encoding of `bytes`.
pub fn segment(bytes: &[u8]) -> String {
	format!("{BASE64_PREFIX}{}", encode(bytes))
}

/// Deserializes a nullable field, substituting the type's default for `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + DeserializeOwned,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
