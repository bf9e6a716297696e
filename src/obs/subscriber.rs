// crates.io
use tracing_subscriber::{
	EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
	util::TryInitError,
};
// self
use crate::config::LogFormat;

/// Installs the global subscriber: `RUST_LOG` filtering (default `info`) plus a text or JSON
/// formatter.
///
/// Fails when a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
	let filter =
		EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
	let registry = tracing_subscriber::registry().with(filter);

	match format {
		LogFormat::Text => registry.with(fmt::layer()).try_init(),
		LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
	}
}
