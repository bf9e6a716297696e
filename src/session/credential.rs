//! Ephemeral credentials and upstream response shape detection.
//!
//! The realtime API has returned the minted key at different paths across versions:
//!
//! | Shape | Path | Source |
//! |---|---|---|
//! | [`ResponseShape::ClientSecretObject`] | `client_secret.value` | beta `/v1/realtime/sessions` |
//! | [`ResponseShape::TopLevelValue`] | `value` | GA `/v1/realtime/client_secrets` |
//! | [`ResponseShape::ClientSecretString`] | `client_secret` | legacy string form |
//! | [`ResponseShape::Token`] | `token` | legacy token form |
//!
//! Detection walks the table top to bottom and keeps the first non-empty key.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::EphemeralKey};

/// Response layout that carried the ephemeral key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseShape {
	/// `client_secret.value` with an optional sibling `expires_at`.
	ClientSecretObject,
	/// Top-level `value` with an optional top-level `expires_at`.
	TopLevelValue,
	/// `client_secret` given directly as a string.
	ClientSecretString,
	/// Top-level `token`.
	Token,
}
impl ResponseShape {
	const DETECTION_ORDER: [ResponseShape; 4] = [
		ResponseShape::ClientSecretObject,
		ResponseShape::TopLevelValue,
		ResponseShape::ClientSecretString,
		ResponseShape::Token,
	];

	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResponseShape::ClientSecretObject => "client_secret.value",
			ResponseShape::TopLevelValue => "value",
			ResponseShape::ClientSecretString => "client_secret",
			ResponseShape::Token => "token",
		}
	}

	const fn key_pointer(self) -> &'static str {
		match self {
			ResponseShape::ClientSecretObject => "/client_secret/value",
			ResponseShape::TopLevelValue => "/value",
			ResponseShape::ClientSecretString => "/client_secret",
			ResponseShape::Token => "/token",
		}
	}

	const fn expiry_pointer(self) -> Option<&'static str> {
		match self {
			ResponseShape::ClientSecretObject => Some("/client_secret/expires_at"),
			ResponseShape::TopLevelValue | ResponseShape::Token => Some("/expires_at"),
			ResponseShape::ClientSecretString => None,
		}
	}
}
impl Display for ResponseShape {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Key issued upstream for one realtime connection, plus what the response said about it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EphemeralCredential {
	/// Issued key.
	pub key: EphemeralKey,
	/// Expiry reported upstream, when present. Informational only.
	pub expires_at: Option<OffsetDateTime>,
	/// Layout the key was found in.
	pub shape: ResponseShape,
}
impl EphemeralCredential {
	/// Extracts the credential from a successful upstream response body.
	///
	/// Each path is inspected on its own, so a mistyped field never hides a usable key found
	/// earlier in the detection order.
	pub fn from_response(body: &Value) -> Result<Self> {
		if !body.is_object() {
			return Err(Error::MalformedResponse {
				reason: format!("expected a JSON object, got {}", json_kind(body)),
			});
		}

		let mut mistyped = Vec::new();

		for shape in ResponseShape::DETECTION_ORDER {
			match body.pointer(shape.key_pointer()) {
				Some(Value::String(key)) if !key.is_empty() =>
					return Ok(Self {
						key: EphemeralKey::new(key.as_str()),
						expires_at: shape
							.expiry_pointer()
							.and_then(|pointer| body.pointer(pointer))
							.and_then(unix_timestamp),
						shape,
					}),
				// `client_secret` holds the object form for the nested shape.
				Some(Value::String(_) | Value::Null | Value::Object(_)) | None => (),
				Some(other) => mistyped.push(format!(
					"`{shape}` is {}, expected a string",
					json_kind(other)
				)),
			}
		}

		let reason = if mistyped.is_empty() {
			"no ephemeral key at `client_secret.value`, `value`, `client_secret`, or `token`".into()
		} else {
			format!("no usable ephemeral key ({})", mistyped.join("; "))
		};

		Err(Error::MalformedResponse { reason })
	}
}

fn unix_timestamp(value: &Value) -> Option<OffsetDateTime> {
	let secs = value
		.as_i64()
		.or_else(|| value.as_f64().filter(|secs| secs.is_finite()).map(|secs| secs as i64))?;

	OffsetDateTime::from_unix_timestamp(secs).ok()
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
