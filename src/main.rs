//! `ephemeral-key-broker` binary: validate configuration, install logging, then serve.

// crates.io
use clap::Parser;
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use ephemeral_key_broker::{
	broker::Broker,
	config::{Cli, Config},
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::try_from(Cli::parse())?;

	obs::init_tracing(config.log_format)?;

	let broker = Broker::from_config(&config)?;

	tracing::info!(
		endpoint = %config.upstream.endpoint,
		model = %config.session.model,
		"Session broker configured."
	);

	let listener = TcpListener::bind(config.listen).await?;

	server::serve(listener, AppState::new(broker), server::shutdown_signal()).await?;

	Ok(())
}
