//! Broker-level error types shared by the upstream client, the broker, and the HTTP layer.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout, body decoding).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Upstream rejected the session request.
	#[error(
		"Upstream rejected the request (status {status}, code {}): {message}.",
		.code.as_deref().unwrap_or("unknown")
	)]
	Upstream {
		/// HTTP status returned by the upstream API.
		status: u16,
		/// Upstream error code (`invalid_api_key`, `model_not_found`, ...), when supplied.
		code: Option<String>,
		/// Upstream message with the configured credential scrubbed out.
		message: String,
	},
	/// Upstream answered successfully but the body did not carry an ephemeral key.
	#[error("Upstream response is malformed: {reason}.")]
	MalformedResponse {
		/// Human-readable description of what was missing or unparsable.
		reason: String,
	},
}
impl Error {
	/// Stable label describing the error kind, suitable for span or metric fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Error::Config(_) => "config",
			Error::Transport(_) => "transport",
			Error::Upstream { .. } => "upstream",
			Error::MalformedResponse { .. } => "malformed_response",
		}
	}
}

/// Configuration and validation failures raised while starting the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No upstream API key was configured, or it was blank.
	#[error("The OPENAI_API_KEY environment variable (or --api-key) must be set to a non-empty value.")]
	MissingApiKey,
	/// Upstream base URL cannot be used to build endpoint URLs.
	#[error("Upstream base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Upstream request timeout must be at least one second.
	#[error("Upstream timeout must be a positive number of seconds.")]
	NonPositiveTimeout,
	/// API key contains bytes that cannot be sent in an HTTP header.
	#[error("The configured API key cannot be used as an HTTP header value.")]
	InvalidApiKeyHeader,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the realtime sessions endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The upstream call did not finish within the configured timeout.
	#[error("Request timed out while calling the realtime sessions endpoint.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e.without_url()) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn upstream_display_includes_code_and_status() {
		let err = Error::Upstream {
			status: 401,
			code: Some("invalid_api_key".into()),
			message: "Incorrect API key provided".into(),
		};

		assert_eq!(
			err.to_string(),
			"Upstream rejected the request (status 401, code invalid_api_key): Incorrect API key provided."
		);
		assert_eq!(err.kind(), "upstream");
	}

	#[test]
	fn upstream_display_falls_back_to_unknown_code() {
		let err = Error::Upstream { status: 503, code: None, message: "Service unavailable".into() };

		assert!(err.to_string().contains("code unknown"));
	}

	#[test]
	fn kinds_are_distinct() {
		let malformed = Error::MalformedResponse { reason: "missing token".into() };
		let transport = Error::from(TransportError::Timeout);
		let config = Error::from(ConfigError::MissingApiKey);

		assert_eq!(malformed.kind(), "malformed_response");
		assert_eq!(transport.kind(), "transport");
		assert_eq!(config.kind(), "config");
	}
}
