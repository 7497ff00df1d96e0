//! Client-level error types shared across the token provider, executor, and resources.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout) before any HTTP status was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The platform answered with a non-2xx status.
	#[error(transparent)]
	Http(#[from] HttpError),
	/// Caller-supplied parameters were rejected before any request was made.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// A successful response carried a body that could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// An exhaustive listing reached the configured page cap without a terminal page.
	#[error("Listing exceeded the configured limit of {limit} pages.")]
	PageLimitExceeded {
		/// Maximum number of pages the listing was allowed to request.
		limit: usize,
	},
}
impl Error {
	/// Status reported for failures that never produced an HTTP status.
	pub const TRANSPORT_STATUS: u16 = 0;

	/// Returns the HTTP status tied to this error.
	///
	/// Transport failures report [`Error::TRANSPORT_STATUS`]; errors raised locally report
	/// `None`.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(_) => Some(Self::TRANSPORT_STATUS),
			Self::Http(err) => Some(err.status),
			_ => None,
		}
	}

	/// Returns the error detail: the response body for HTTP errors, the transport message
	/// for transport errors, and the display string otherwise.
	pub fn detail(&self) -> String {
		match self {
			Self::Transport(err) => err.message(),
			Self::Http(err) => err.message(),
			other => other.to_string(),
		}
	}

	/// Returns `true` when the platform rejected the bearer token.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Http(err) if err.is_unauthorized())
	}

	/// Returns `true` for transport failures.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Transport(_))
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No API key is configured, so no token can be requested.
	#[error("No API key is configured; set one before calling the identity endpoint.")]
	MissingApiKey,
	/// An endpoint URL cannot be parsed.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Endpoint label (`identity`, `compute`, `coordination`).
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An endpoint URL cannot carry path segments (e.g. `mailto:`).
	#[error("The endpoint URL `{url}` cannot be used as a base for API paths.")]
	EndpointCannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	EncodeBody(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform: {source}.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform: {0}.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the underlying failure message.
	pub fn message(&self) -> String {
		match self {
			Self::Network { source } => source.to_string(),
			Self::Io(err) => err.to_string(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Structured non-2xx response: status code plus the raw message body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Platform returned HTTP {status}: {body}")]
pub struct HttpError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body; often a JSON string.
	pub body: String,
}
impl HttpError {
	/// Creates a new HTTP error.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Classifies the status code.
	pub fn kind(&self) -> HttpErrorKind {
		HttpErrorKind::from(self.status)
	}

	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Returns the body as plain text, unwrapping it when it is a JSON string.
	pub fn message(&self) -> String {
		match serde_json::from_str::<String>(&self.body) {
			Ok(message) => message,
			Err(_) => self.body.clone(),
		}
	}
}

/// Coarse classification of HTTP failure statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
	/// HTTP 400.
	BadRequest,
	/// HTTP 401; the token is treated as expired.
	Unauthorized,
	/// HTTP 403.
	Forbidden,
	/// HTTP 404.
	NotFound,
	/// HTTP 409.
	Conflict,
	/// HTTP 500.
	InternalServerError,
	/// HTTP 503.
	ServiceUnavailable,
	/// Any other status.
	Other(u16),
}
impl From<u16> for HttpErrorKind {
	fn from(status: u16) -> Self {
		match status {
			400 => Self::BadRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			409 => Self::Conflict,
			500 => Self::InternalServerError,
			503 => Self::ServiceUnavailable,
			other => Self::Other(other),
		}
	}
}

/// Pre-condition failures raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A restriction cursor was supplied without the API it belongs to.
	#[error("An API must be set when resuming restrictions from a key.")]
	MissingRestrictionApi,
	/// A region or provider is both allowed and denied.
	#[error("Restriction details allow and deny the same region or provider.")]
	ConflictingRestrictions,
}

/// Failures decoding a successful response.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body is not the expected JSON document.
	#[error("Response body (HTTP {status}) does not match the expected JSON shape.")]
	Json {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: u16,
	},
	/// A key or value is not valid url-safe base64.
	#[error("Value `{value}` is not valid url-safe base64.")]
	Base64 {
		/// Offending encoded value.
		value: String,
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// An enumerated field carried a value this client does not know.
	#[error("Unknown {kind} `{value}`.")]
	UnknownVariant {
		/// Name of the enumeration (`api`, `region`, ...).
		kind: &'static str,
		/// Offending value.
		value: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transport_errors_report_sentinel_status() {
		let err: Error =
			TransportError::Io(std::io::Error::other("connection refused")).into();

		assert_eq!(err.status(), Some(Error::TRANSPORT_STATUS));
		assert!(err.is_transport());
		assert!(!err.is_unauthorized());
		assert_eq!(err.detail(), "connection refused");
	}

	#[test]
	fn http_error_message_unwraps_json_strings() {
		let quoted = HttpError::new(400, "\"Invalid lock name\"");
		let raw = HttpError::new(500, "{\"title\":\"boom\"}");

		assert_eq!(quoted.message(), "Invalid lock name");
		assert_eq!(raw.message(), "{\"title\":\"boom\"}");
		assert_eq!(quoted.kind(), HttpErrorKind::BadRequest);
		assert_eq!(HttpError::new(418, "").kind(), HttpErrorKind::Other(418));
	}

	#[test]
	fn unauthorized_is_detected_through_the_wrapper() {
		let err: Error = HttpError::new(401, "\"expired\"").into();

		assert!(err.is_unauthorized());
		assert_eq!(err.status(), Some(401));
		assert_eq!(err.detail(), "expired");
	}

	#[test]
	fn local_errors_have_no_status() {
		let err: Error = ValidationError::MissingRestrictionApi.into();

		assert_eq!(err.status(), None);
		assert!(err.detail().contains("API must be set"));
	}
}
