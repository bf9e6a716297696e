//! Upstream transport for minting realtime session keys.
//!
//! [`CredentialService`] is the broker's only dependency on the upstream API. The production
//! implementation, [`OpenAiCredentialService`], is built once at startup and shared by every
//! request; tests swap in their own implementations to script upstream behavior.

// crates.io
use reqwest::{StatusCode, header::HeaderValue, redirect::Policy};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::ApiKey,
	config::{UpstreamApi, UpstreamConfig},
	error::{ConfigError, TransportError},
	session::{SessionConfig, ToolDefinition},
};

/// Boxed future returned by [`CredentialService`] implementations.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Upstream capability that creates a realtime session and returns its raw JSON body.
///
/// Implementations map non-success answers into [`Error::Upstream`] and transport failures into
/// [`Error::Transport`]; the broker handles locating the key inside a successful body.
pub trait CredentialService
where
	Self: 'static + Send + Sync,
{
	/// Requests a new realtime session configured by `session`.
	fn create_session<'a>(&'a self, session: &'a SessionConfig) -> ServiceFuture<'a, Value>;
}

/// Reqwest-backed client for the OpenAI realtime session endpoints.
///
/// Redirects are disabled; the endpoint answers directly or not at all.
#[derive(Clone)]
pub struct OpenAiCredentialService {
	client: ReqwestClient,
	api_key: ApiKey,
	upstream: UpstreamConfig,
}
impl OpenAiCredentialService {
	const BETA_HEADER: &'static str = "openai-beta";
	const BETA_VALUE: &'static str = "realtime=v1";
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds a client with the configured timeout and redirects disabled.
	pub fn new(api_key: ApiKey, upstream: UpstreamConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(upstream.timeout)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Self::with_client(client, api_key, upstream)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(
		client: ReqwestClient,
		api_key: ApiKey,
		upstream: UpstreamConfig,
	) -> Result<Self, ConfigError> {
		HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
			.map_err(|_| ConfigError::InvalidApiKeyHeader)?;

		Ok(Self { client, api_key, upstream })
	}

	/// Endpoint every session request is sent to.
	pub fn endpoint(&self) -> &Url {
		&self.upstream.endpoint
	}

	async fn send(&self, session: &SessionConfig) -> Result<Value> {
		let request =
			self.client.post(self.upstream.endpoint.clone()).bearer_auth(self.api_key.expose());
		let request = match self.upstream.api {
			UpstreamApi::Sessions =>
				request.header(Self::BETA_HEADER, Self::BETA_VALUE).json(session),
			UpstreamApi::ClientSecrets => request.json(&ClientSecretsRequest::from(session)),
		};
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(self.upstream_error(status, &body));
		}

		serde_json::from_slice(&body).map_err(|e| Error::MalformedResponse {
			reason: format!("body is not valid JSON ({e})"),
		})
	}

	fn upstream_error(&self, status: StatusCode, body: &[u8]) -> Error {
		let (code, message) = match serde_json::from_slice::<UpstreamErrorEnvelope>(body) {
			Ok(UpstreamErrorEnvelope { error }) => (
				error.code.or(error.kind),
				error.message.unwrap_or_else(|| status.to_string()),
			),
			Err(_) => (
				None,
				body_preview(
					&self.api_key.scrub(&String::from_utf8_lossy(body)),
					Self::BODY_PREVIEW_LIMIT,
				),
			),
		};
		let trimmed = message.trim().trim_end_matches('.');
		let message =
			if trimmed.is_empty() { status.to_string() } else { self.api_key.scrub(trimmed) };

		Error::Upstream { status: status.as_u16(), code, message }
	}
}
impl CredentialService for OpenAiCredentialService {
	fn create_session<'a>(&'a self, session: &'a SessionConfig) -> ServiceFuture<'a, Value> {
		Box::pin(self.send(session))
	}
}
impl Debug for OpenAiCredentialService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OpenAiCredentialService")
			.field("endpoint", &self.upstream.endpoint.as_str())
			.field("api", &self.upstream.api)
			.field("api_key", &self.api_key)
			.finish()
	}
}

#[derive(Debug, Serialize)]
struct ClientSecretsRequest<'a> {
	session: GaSession<'a>,
}
impl<'a> From<&'a SessionConfig> for ClientSecretsRequest<'a> {
	fn from(session: &'a SessionConfig) -> Self {
		Self {
			session: GaSession {
				kind: "realtime",
				model: &session.model,
				instructions: &session.instructions,
				audio: GaAudio { output: GaAudioOutput { voice: &session.voice } },
				tools: &session.tools,
			},
		}
	}
}

#[derive(Debug, Serialize)]
struct GaSession<'a> {
	#[serde(rename = "type")]
	kind: &'static str,
	model: &'a str,
	instructions: &'a str,
	audio: GaAudio<'a>,
	#[serde(skip_serializing_if = "<[_]>::is_empty")]
	tools: &'a [ToolDefinition],
}

#[derive(Debug, Serialize)]
struct GaAudio<'a> {
	output: GaAudioOutput<'a>,
}

#[derive(Debug, Serialize)]
struct GaAudioOutput<'a> {
	voice: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorEnvelope {
	error: UpstreamErrorBody,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
	#[serde(default)]
	message: Option<String>,
	#[serde(default, rename = "type")]
	kind: Option<String>,
	#[serde(default)]
	code: Option<String>,
}

fn body_preview(text: &str, limit: usize) -> String {
	let text = text.trim();

	if text.chars().count() <= limit {
		return text.to_owned();
	}

	let mut buf = text.chars().take(limit).collect::<String>();

	buf.push('…');

	buf
}
