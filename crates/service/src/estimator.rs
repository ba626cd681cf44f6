//! Amount estimation with "latest request wins" result application

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bt_types::{Asset, BridgeClient, BridgeRoute, EstimateError, EstimateRequest};

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::estimator";

/// Whether a raw amount input may replace the current one
///
/// Only digits and dots are accepted; clearing the field is always allowed.
pub fn accepts_keystroke(raw: &str) -> bool {
	raw.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Parse an amount string into a non-negative number
///
/// Only plain decimals made of ASCII digits and dots are numbers here; signs,
/// exponents and whitespace yield `None` like any other non-numeric input.
pub fn parse_amount(raw: &str) -> Option<f64> {
	if raw.is_empty() || !accepts_keystroke(raw) {
		return None;
	}
	raw.parse::<f64>()
		.ok()
		.filter(|amount| amount.is_finite() && *amount >= 0.0)
}

/// Asks the bridge for the receivable amount of one input
#[derive(Debug, Clone)]
pub struct AmountEstimator {
	bridge: Arc<dyn BridgeClient>,
	route: BridgeRoute,
}

impl AmountEstimator {
	pub fn new(bridge: Arc<dyn BridgeClient>, route: BridgeRoute) -> Self {
		Self { bridge, route }
	}

	pub fn route(&self) -> &BridgeRoute {
		&self.route
	}

	/// Quote `amount` of `source` into `destination`
	///
	/// Unparseable amounts yield `Ok(None)` without contacting the bridge.
	/// Bridge failures are classified into [`EstimateError`]; only
	/// [`EstimateError::Other`] is unexpected.
	pub async fn estimate(
		&self,
		amount: &str,
		source: &Asset,
		destination: &Asset,
	) -> Result<Option<f64>, EstimateError> {
		if parse_amount(amount).is_none() {
			tracing::debug!(target: TRACING_TARGET, amount, "Amount not quotable, skipping bridge call");
			return Ok(None);
		}

		let request = EstimateRequest::new(&self.route, amount, source, destination);
		tracing::debug!(
			target: TRACING_TARGET,
			amount,
			source = %source,
			destination = %destination,
			"Requesting estimate"
		);

		match self.bridge.estimate_output(&request).await {
			Ok(output) => {
				tracing::debug!(target: TRACING_TARGET, amount, output, "Estimate received");
				Ok(Some(output))
			},
			Err(e) => {
				let error = EstimateError::from(e);
				if error.is_recoverable() {
					tracing::info!(target: TRACING_TARGET, error = %error, "Pair not quotable");
				} else {
					tracing::error!(target: TRACING_TARGET, error = %error, "Unexpected estimation failure");
				}
				Err(error)
			},
		}
	}
}

/// Identifies one issued estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuoteTicket(u64);

impl QuoteTicket {
	pub fn sequence(&self) -> u64 {
		self.0
	}
}

/// The three inputs a quote depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInput {
	pub amount: String,
	pub source: Asset,
	pub destination: Asset,
}

impl QuoteInput {
	pub fn new(amount: impl Into<String>, source: Asset, destination: Asset) -> Self {
		Self {
			amount: amount.into(),
			source,
			destination,
		}
	}
}

/// Result of one estimation task, reported back to the session
#[derive(Debug)]
pub struct EstimateOutcome {
	pub ticket: QuoteTicket,
	pub input: QuoteInput,
	pub result: Result<Option<f64>, EstimateError>,
}

/// Issues monotonically increasing tickets and decides which result may be applied
///
/// In-flight estimations are never cancelled; a result is dropped at
/// application time unless its ticket is still the latest issued.
#[derive(Debug, Clone, Default)]
pub struct QuoteSupervisor {
	latest: Arc<AtomicU64>,
}

impl QuoteSupervisor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Issue the ticket for a new input state, superseding all earlier ones
	pub fn issue(&self) -> QuoteTicket {
		QuoteTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
	}

	pub fn is_current(&self, ticket: QuoteTicket) -> bool {
		self.latest.load(Ordering::SeqCst) == ticket.0
	}

	/// Run an estimation in the background and hand its outcome to `report`
	///
	/// With a non-zero `debounce` the task first waits; if a newer ticket was
	/// issued meanwhile the bridge is not contacted and an empty outcome is
	/// reported for the stale ticket. `report` is called exactly once.
	pub fn spawn<F>(
		&self,
		ticket: QuoteTicket,
		estimator: AmountEstimator,
		input: QuoteInput,
		debounce: Duration,
		report: F,
	) -> tokio::task::JoinHandle<()>
	where
		F: FnOnce(EstimateOutcome) + Send + 'static,
	{
		let supervisor = self.clone();
		tokio::spawn(async move {
			if !debounce.is_zero() {
				tokio::time::sleep(debounce).await;
				if !supervisor.is_current(ticket) {
					tracing::debug!(
						target: TRACING_TARGET,
						ticket = ticket.sequence(),
						"Estimate superseded during debounce"
					);
					report(EstimateOutcome {
						ticket,
						input,
						result: Ok(None),
					});
					return;
				}
			}
			let result = estimator
				.estimate(&input.amount, &input.source, &input.destination)
				.await;
			report(EstimateOutcome {
				ticket,
				input,
				result,
			});
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bt_types::{AdapterError, EstimateFailureKind, MockBridgeClient};
	use tokio::sync::mpsc;

	fn eth() -> Asset {
		Asset::new("ETH")
	}

	fn gbyte() -> Asset {
		Asset::new("GBYTE")
	}

	#[test]
	fn test_keystroke_filter() {
		assert!(accepts_keystroke(""));
		assert!(accepts_keystroke("0.1"));
		assert!(accepts_keystroke("1..2"));
		assert!(!accepts_keystroke("1e5"));
		assert!(!accepts_keystroke("-1"));
		assert!(!accepts_keystroke("0,1"));
	}

	#[test]
	fn test_parse_amount() {
		assert_eq!(parse_amount("0.1"), Some(0.1));
		assert_eq!(parse_amount("0"), Some(0.0));
		assert_eq!(parse_amount(""), None);
		assert_eq!(parse_amount("abc"), None);
		assert_eq!(parse_amount("1.2.3"), None);
		assert_eq!(parse_amount("-3"), None);
		assert_eq!(parse_amount("inf"), None);
		assert_eq!(parse_amount("1e5"), None);
		assert_eq!(parse_amount("+1"), None);
		assert_eq!(parse_amount(" 1"), None);
	}

	#[tokio::test]
	async fn test_invalid_amount_skips_bridge() {
		let mut bridge = MockBridgeClient::new();
		bridge.expect_estimate_output().never();
		let estimator = AmountEstimator::new(Arc::new(bridge), BridgeRoute::default());

		for amount in ["", "abc", ".", "1.2.3", "1e5", "+1", " 1"] {
			assert_eq!(estimator.estimate(amount, &eth(), &gbyte()).await.unwrap(), None);
		}
	}

	#[tokio::test]
	async fn test_estimate_passes_route() {
		let mut bridge = MockBridgeClient::new();
		bridge
			.expect_estimate_output()
			.withf(|request| {
				request.amount == "0.1"
					&& request.src_network == "Ethereum"
					&& request.dst_asset == "GBYTE"
					&& request.testnet
			})
			.times(1)
			.returning(|_| Ok(41.5));
		let estimator =
			AmountEstimator::new(Arc::new(bridge), BridgeRoute::default().with_testnet(true));

		assert_eq!(
			estimator.estimate("0.1", &eth(), &gbyte()).await.unwrap(),
			Some(41.5)
		);
	}

	#[tokio::test]
	async fn test_expected_failures_are_classified() {
		let mut bridge = MockBridgeClient::new();
		bridge.expect_estimate_output().returning(|request| {
			Err(match request.amount.as_str() {
				"1" => AdapterError::AmountTooLarge {
					message: "too large".to_string(),
				},
				"2" => AdapterError::NoBridge {
					message: "no bridge".to_string(),
				},
				"3" => AdapterError::NoOswapPool {
					message: "no pool".to_string(),
				},
				_ => AdapterError::Sdk("boom".to_string()),
			})
		});
		let estimator = AmountEstimator::new(Arc::new(bridge), BridgeRoute::default());

		let cases = [
			("1", EstimateFailureKind::AmountTooLarge),
			("2", EstimateFailureKind::NoBridge),
			("3", EstimateFailureKind::NoLiquidityPool),
			("4", EstimateFailureKind::Other),
		];
		for (amount, expected) in cases {
			let error = estimator.estimate(amount, &eth(), &gbyte()).await.unwrap_err();
			assert_eq!(error.kind(), expected);
			assert_eq!(error.is_recoverable(), expected != EstimateFailureKind::Other);
		}
	}

	#[test]
	fn test_supervisor_latest_ticket_wins() {
		let supervisor = QuoteSupervisor::new();
		let first = supervisor.issue();
		let second = supervisor.issue();
		assert!(first < second);
		assert!(!supervisor.is_current(first));
		assert!(supervisor.is_current(second));
		assert!(supervisor.clone().is_current(second));
	}

	#[tokio::test(start_paused = true)]
	async fn test_debounce_skips_superseded_call() {
		let mut bridge = MockBridgeClient::new();
		bridge
			.expect_estimate_output()
			.withf(|request| request.amount == "12")
			.times(1)
			.returning(|_| Ok(3.0));
		let estimator = AmountEstimator::new(Arc::new(bridge), BridgeRoute::default());
		let supervisor = QuoteSupervisor::new();
		let (tx, mut rx) = mpsc::unbounded_channel();
		let debounce = Duration::from_millis(300);

		for amount in ["1", "12"] {
			let ticket = supervisor.issue();
			let tx = tx.clone();
			supervisor.spawn(
				ticket,
				estimator.clone(),
				QuoteInput::new(amount, eth(), gbyte()),
				debounce,
				move |outcome| {
					let _ = tx.send(outcome);
				},
			);
		}
		drop(tx);

		let mut outcomes = Vec::new();
		while let Some(outcome) = rx.recv().await {
			outcomes.push(outcome);
		}
		outcomes.sort_by_key(|outcome| outcome.ticket);
		let mut outcomes = outcomes.into_iter();

		let skipped = outcomes.next().unwrap();
		assert_eq!(skipped.input.amount, "1");
		assert!(!supervisor.is_current(skipped.ticket));
		assert_eq!(skipped.result.unwrap(), None);

		let latest = outcomes.next().unwrap();
		assert_eq!(latest.input.amount, "12");
		assert!(supervisor.is_current(latest.ticket));
		assert_eq!(latest.result.unwrap(), Some(3.0));
		assert!(outcomes.next().is_none());
	}
}
