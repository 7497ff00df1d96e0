//! Redacted bearer token wrapper.

// self
use crate::_prelude::*;

/// Opaque bearer token that keeps its value out of logs.
///
/// The platform does not report an expiry; a token is considered stale once a call using
/// it is answered with `401`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<String> for AccessToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for AccessToken {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Body returned by the identity endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	pub(crate) token: String,
}
