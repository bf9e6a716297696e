//! Process configuration sourced from CLI flags and environment variables.
//!
//! [`Cli`] is the raw clap surface; [`Config`] is the validated form the rest of the crate
//! consumes. Conversion fails fast, so a missing API key stops the process before the listener
//! is bound.

// std
use std::{net::SocketAddr, time::Duration as StdDuration};
// crates.io
use clap::{Parser, ValueEnum};
// self
use crate::{_prelude::*, auth::ApiKey, error::ConfigError, session::SessionConfig};

/// Default upstream API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Upstream API flavor used to mint keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum UpstreamApi {
	#[default]
	/// Beta `POST /v1/realtime/sessions`; key at `client_secret.value`.
	Sessions,
	/// GA `POST /v1/realtime/client_secrets`; key at `value`.
	ClientSecrets,
}
impl UpstreamApi {
	/// Endpoint path relative to the base URL.
	pub const fn path(self) -> &'static str {
		match self {
			UpstreamApi::Sessions => "v1/realtime/sessions",
			UpstreamApi::ClientSecrets => "v1/realtime/client_secrets",
		}
	}

	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			UpstreamApi::Sessions => "sessions",
			UpstreamApi::ClientSecrets => "client_secrets",
		}
	}
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	#[default]
	/// Human-readable lines.
	Text,
	/// One JSON object per event.
	Json,
}

/// Command-line surface; every flag can also come from the environment.
#[derive(Clone, Debug, Parser)]
#[command(name = "ephemeral-key-broker", version, about)]
pub struct Cli {
	/// Upstream API key used to mint ephemeral keys.
	#[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
	pub api_key: Option<String>,
	/// Socket address to listen on.
	#[arg(long, env = "BROKER_LISTEN", default_value = "127.0.0.1:8000")]
	pub listen: SocketAddr,
	/// Upstream API origin.
	#[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
	pub upstream_base_url: String,
	/// Upstream API flavor.
	#[arg(long, env = "OPENAI_REALTIME_API", value_enum, default_value_t = UpstreamApi::Sessions)]
	pub upstream_api: UpstreamApi,
	/// Upstream request timeout in seconds.
	#[arg(long, env = "OPENAI_TIMEOUT_SECS", default_value_t = 30)]
	pub upstream_timeout_secs: u64,
	/// Log output format.
	#[arg(long, env = "BROKER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
	pub log_format: LogFormat,
}

/// Upstream connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamConfig {
	/// Fully resolved session-creation endpoint.
	pub endpoint: Url,
	/// API flavor the endpoint speaks.
	pub api: UpstreamApi,
	/// Per-request timeout.
	pub timeout: StdDuration,
}
impl UpstreamConfig {
	/// Resolves the endpoint for `api` under `base_url`.
	pub fn new(
		base_url: &str,
		api: UpstreamApi,
		timeout: StdDuration,
	) -> Result<Self, ConfigError> {
		if timeout.is_zero() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		let invalid = |source: url::ParseError| ConfigError::InvalidBaseUrl {
			url: base_url.to_owned(),
			source,
		};
		let mut base = Url::parse(base_url).map_err(invalid)?;

		if base.cannot_be_a_base() {
			return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
		}
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		let endpoint = base.join(api.path()).map_err(invalid)?;

		Ok(Self { endpoint, api, timeout })
	}
}

/// Validated, read-only process configuration.
#[derive(Clone, Debug)]
pub struct Config {
	/// Upstream credential.
	pub api_key: ApiKey,
	/// Listen address for the HTTP server.
	pub listen: SocketAddr,
	/// Upstream connection settings.
	pub upstream: UpstreamConfig,
	/// Session payload sent with every request.
	pub session: SessionConfig,
	/// Log output format.
	pub log_format: LogFormat,
}
impl TryFrom<Cli> for Config {
	type Error = ConfigError;

	fn try_from(cli: Cli) -> Result<Self, Self::Error> {
		let api_key = ApiKey::new(cli.api_key.ok_or(ConfigError::MissingApiKey)?)?;
		let upstream = UpstreamConfig::new(
			&cli.upstream_base_url,
			cli.upstream_api,
			StdDuration::from_secs(cli.upstream_timeout_secs),
		)?;

		Ok(Self {
			api_key,
			listen: cli.listen,
			upstream,
			session: SessionConfig::ecommerce_agent(),
			log_format: cli.log_format,
		})
	}
}
