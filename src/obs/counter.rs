// self
use crate::obs::IssueOutcome;

/// Records an issuance outcome via the global metrics recorder (when enabled).
pub fn record_issue_outcome(outcome: IssueOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("ephemeral_key_broker_issue_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
