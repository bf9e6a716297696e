//! Session issuance orchestration.
//!
//! The [`Broker`] owns the upstream [`CredentialService`] and the fixed [`SessionConfig`], both
//! built once at startup and shared read-only across requests. Each call to
//! [`Broker::create_session`] is independent: one upstream request, one extracted key, nothing
//! cached.

// self
use crate::{
	_prelude::*,
	config::{Config, UpstreamApi},
	error::ConfigError,
	http::{CredentialService, OpenAiCredentialService},
	obs::{self, IssueOutcome, IssueSpan},
	session::{EphemeralCredential, SessionConfig},
};

/// Issues ephemeral realtime keys on behalf of browser clients.
#[derive(Clone)]
pub struct Broker {
	service: Arc<dyn CredentialService>,
	session: Arc<SessionConfig>,
	api: UpstreamApi,
}
impl Broker {
	/// Creates a broker around an arbitrary upstream implementation.
	pub fn new(service: Arc<dyn CredentialService>, session: SessionConfig) -> Self {
		Self { service, session: Arc::new(session), api: UpstreamApi::default() }
	}

	/// Builds the production broker backed by [`OpenAiCredentialService`].
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let service =
			OpenAiCredentialService::new(config.api_key.clone(), config.upstream.clone())?;

		Ok(Self::new(Arc::new(service), config.session.clone()).with_api(config.upstream.api))
	}

	/// Sets the upstream flavor reported in spans.
	pub fn with_api(mut self, api: UpstreamApi) -> Self {
		self.api = api;

		self
	}

	/// Session payload sent with every request.
	pub fn session(&self) -> &SessionConfig {
		&self.session
	}

	/// Requests a fresh realtime session upstream and returns its ephemeral key.
	pub async fn create_session(&self) -> Result<EphemeralCredential> {
		let span = IssueSpan::new("create_session", self.api);

		obs::record_issue_outcome(IssueOutcome::Attempt);

		let result: Result<EphemeralCredential> = span
			.wrap(async move {
				let body = self.service.create_session(&self.session).await?;
				let credential = EphemeralCredential::from_response(&body)?;

				tracing::info!(shape = %credential.shape, "Issued ephemeral key.");
				tracing::debug!(preview = credential.key.preview(), "Ephemeral key preview.");

				Ok(credential)
			})
			.await;

		match &result {
			Ok(_) => obs::record_issue_outcome(IssueOutcome::Success),
			Err(e) => {
				obs::record_issue_outcome(IssueOutcome::Failure);

				tracing::warn!(kind = e.kind(), error = %e, "Failed to issue ephemeral key.");
			},
		}

		result
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("model", &self.session.model)
			.field("api", &self.api)
			.finish()
	}
}
