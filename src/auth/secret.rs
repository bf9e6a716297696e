//! Secure secret wrappers that redact sensitive material.

// self
use crate::{_prelude::*, error::ConfigError};

const REDACTED: &str = "<redacted>";

/// Upstream API credential configured at startup.
///
/// The value never appears in `Debug`/`Display` output, and [`ApiKey::scrub`] removes it from
/// upstream messages before they travel further.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps a credential, rejecting blank values.
	pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
		let value = value.into();
		let trimmed = value.trim();

		if trimmed.is_empty() {
			return Err(ConfigError::MissingApiKey);
		}

		Ok(Self(trimmed.to_owned()))
	}

	/// Returns the inner credential. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Replaces every occurrence of the credential inside `text` with a redaction marker.
	pub fn scrub(&self, text: &str) -> String {
		text.replace(&self.0, REDACTED)
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&REDACTED).finish()
	}
}
impl Display for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}

/// Short-lived key minted upstream for a single realtime connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EphemeralKey(String);
impl EphemeralKey {
	const PREVIEW_LEN: usize = 10;

	/// Wraps a freshly issued key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner key value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the raw key.
	pub fn into_inner(self) -> String {
		self.0
	}

	/// Leading characters of the key, safe for debug logs.
	pub fn preview(&self) -> &str {
		match self.0.char_indices().nth(Self::PREVIEW_LEN) {
			Some((idx, _)) => &self.0[..idx],
			None => &self.0,
		}
	}
}
impl AsRef<str> for EphemeralKey {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for EphemeralKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("EphemeralKey").field(&REDACTED).finish()
	}
}
impl Display for EphemeralKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let key = ApiKey::new("sk-super-secret").expect("API key should be accepted.");
		let ephemeral = EphemeralKey::new("ek_abc123");

		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
		assert_eq!(format!("{key}"), "<redacted>");
		assert_eq!(format!("{ephemeral:?}"), "EphemeralKey(\"<redacted>\")");
		assert_eq!(format!("{ephemeral}"), "<redacted>");
	}

	#[test]
	fn api_key_rejects_blank_values() {
		assert!(matches!(ApiKey::new(""), Err(ConfigError::MissingApiKey)));
		assert!(matches!(ApiKey::new("   \n"), Err(ConfigError::MissingApiKey)));
		assert_eq!(
			ApiKey::new("  sk-trimmed ").expect("Padded key should be accepted.").expose(),
			"sk-trimmed"
		);
	}

	#[test]
	fn scrub_removes_every_occurrence() {
		let key = ApiKey::new("sk-live-123").expect("API key should be accepted.");
		let scrubbed = key.scrub("Incorrect API key provided: sk-live-123 (sk-live-123).");

		assert_eq!(scrubbed, "Incorrect API key provided: <redacted> (<redacted>).");
	}

	#[test]
	fn preview_truncates_on_char_boundaries() {
		assert_eq!(EphemeralKey::new("ek_0123456789abcdef").preview(), "ek_0123456");
		assert_eq!(EphemeralKey::new("ek_short").preview(), "ek_short");
		assert_eq!(EphemeralKey::new("ékékékékékék").preview(), "ékékékékék");
	}
}
