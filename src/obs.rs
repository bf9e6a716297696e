//! Observability helpers for the session broker.
//!
//! - Every `create_session` call runs inside an `ephemeral_key_broker.issue` span carrying the
//!   `stage` (call site) and `api` (upstream flavor) fields.
//! - Enable the `metrics` feature to increment the `ephemeral_key_broker_issue_total` counter for
//!   every attempt/success/failure, labeled by `outcome`.
//! - [`init_tracing`] installs the process-wide subscriber used by the binary.

mod counter;
mod span;
mod subscriber;

pub use counter::*;
pub use span::*;
pub use subscriber::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each issuance attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueOutcome {
	/// Entry to [`Broker::create_session`](crate::broker::Broker::create_session).
	Attempt,
	/// A key was returned to the caller.
	Success,
	/// An error was returned to the caller.
	Failure,
}
impl IssueOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			IssueOutcome::Attempt => "attempt",
			IssueOutcome::Success => "success",
			IssueOutcome::Failure => "failure",
		}
	}
}
impl Display for IssueOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
