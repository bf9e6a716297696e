// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::{_prelude::*, config::UpstreamApi};

/// A span wrapping one issuance attempt.
#[derive(Clone, Debug)]
pub struct IssueSpan {
	span: Span,
}
impl IssueSpan {
	/// Creates a new span tagged with the call-site stage and upstream flavor.
	pub fn new(stage: &'static str, api: UpstreamApi) -> Self {
		let span = tracing::info_span!("ephemeral_key_broker.issue", stage, api = api.as_str());

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn wrap<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}
