//! Mock collaborators for demos and testing
//!
//! Deterministic, in-process stand-ins for the bridge SDK and the
//! source-chain provider. Behaviour is configured per amount so tests can
//! reproduce slow quotes, quote failures and missing wallets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bt_types::{
	AdapterError, AdapterResult, BridgeClient, BridgeEvent, ChainProvider, ClaimEvent,
	EstimateRequest, EventBus, TransactionReceipt, TransferRequest,
};

/// Quote failure a [`MockDemoBridge`] can be told to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockQuoteFailure {
	AmountTooLarge,
	NoBridge,
	NoPool,
	/// Unexpected SDK failure
	Sdk,
}

impl MockQuoteFailure {
	fn to_error(self, request: &EstimateRequest) -> AdapterError {
		match self {
			MockQuoteFailure::AmountTooLarge => AdapterError::AmountTooLarge {
				message: format!("Amount {} {} is too large", request.amount, request.src_asset),
			},
			MockQuoteFailure::NoBridge => AdapterError::NoBridge {
				message: format!(
					"No bridge from {} to {}",
					request.src_asset, request.dst_asset
				),
			},
			MockQuoteFailure::NoPool => AdapterError::NoOswapPool {
				message: format!("No oswap pool for {}", request.dst_asset),
			},
			MockQuoteFailure::Sdk => AdapterError::Sdk("mock SDK failure".to_string()),
		}
	}
}

/// Quoted output per unit of input
const DEMO_RATE: f64 = 400.0;

/// Bridge SDK stand-in publishing claims into an [`EventBus`]
///
/// Quotes are `amount * 400`. Transfers return sequential transaction ids
/// (`0xmock1`, `0xmock2`, ...).
#[derive(Debug)]
pub struct MockDemoBridge {
	events: EventBus,
	delays: HashMap<String, Duration>,
	failures: HashMap<String, MockQuoteFailure>,
	wallet_connected: AtomicBool,
	auto_claim: Option<Duration>,
	estimate_calls: AtomicUsize,
	transfer_calls: AtomicUsize,
}

impl MockDemoBridge {
	pub fn new(events: EventBus) -> Self {
		Self {
			events,
			delays: HashMap::new(),
			failures: HashMap::new(),
			wallet_connected: AtomicBool::new(true),
			auto_claim: None,
			estimate_calls: AtomicUsize::new(0),
			transfer_calls: AtomicUsize::new(0),
		}
	}

	/// Delay estimates for `amount`
	pub fn with_delay(mut self, amount: &str, delay: Duration) -> Self {
		self.delays.insert(amount.to_string(), delay);
		self
	}

	/// Fail estimates for `amount`
	pub fn with_failure(mut self, amount: &str, failure: MockQuoteFailure) -> Self {
		self.failures.insert(amount.to_string(), failure);
		self
	}

	/// Publish a claim request and then a claim confirmation after each transfer
	pub fn with_auto_claim(mut self, delay: Duration) -> Self {
		self.auto_claim = Some(delay);
		self
	}

	pub fn set_wallet_connected(&self, connected: bool) {
		self.wallet_connected.store(connected, Ordering::SeqCst);
	}

	/// Publish a claim for `tx_id`, returning how many subscribers received it
	pub fn emit_claim(&self, tx_id: &str, claim_tx_id: &str, is_request: bool) -> usize {
		self.events.publish(BridgeEvent::NewClaim(ClaimEvent::new(
			tx_id,
			claim_tx_id,
			is_request,
		)))
	}

	pub fn estimate_calls(&self) -> usize {
		self.estimate_calls.load(Ordering::SeqCst)
	}

	pub fn transfer_calls(&self) -> usize {
		self.transfer_calls.load(Ordering::SeqCst)
	}

}

#[async_trait]
impl BridgeClient for MockDemoBridge {
	async fn estimate_output(&self, request: &EstimateRequest) -> AdapterResult<f64> {
		self.estimate_calls.fetch_add(1, Ordering::SeqCst);

		if let Some(delay) = self.delays.get(&request.amount) {
			tokio::time::sleep(*delay).await;
		}
		if let Some(failure) = self.failures.get(&request.amount) {
			return Err(failure.to_error(request));
		}

		let amount: f64 = request
			.amount
			.parse()
			.map_err(|_| AdapterError::Sdk(format!("invalid amount {}", request.amount)))?;
		Ok(amount * DEMO_RATE)
	}

	async fn transfer(&self, request: &TransferRequest) -> AdapterResult<String> {
		if !self.wallet_connected.load(Ordering::SeqCst) {
			return Err(AdapterError::NoWallet);
		}

		let sequence = self.transfer_calls.fetch_add(1, Ordering::SeqCst) + 1;
		let tx_id = format!("0xmock{}", sequence);
		tracing::debug!(
			tx_id = %tx_id,
			recipient = %request.recipient_address,
			"Mock transfer broadcast"
		);

		if let Some(delay) = self.auto_claim {
			let events = self.events.clone();
			let source_tx_id = tx_id.clone();
			tokio::spawn(async move {
				tokio::time::sleep(delay).await;
				events.publish(BridgeEvent::NewClaim(ClaimEvent::new(
					source_tx_id.clone(),
					format!("claim-{}", source_tx_id),
					true,
				)));
				tokio::time::sleep(delay).await;
				events.publish(BridgeEvent::NewClaim(ClaimEvent::new(
					source_tx_id.clone(),
					format!("claim-{}", source_tx_id),
					false,
				)));
			});
		}

		Ok(tx_id)
	}
}

/// How a [`MockDemoChainProvider`] answers confirmation waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockConfirmation {
	/// Mined after the delay
	Confirm(Duration),
	/// Mined but reverted after the delay
	Revert(Duration),
	/// Never resolves
	Hang,
	/// Provider failure
	Fail,
}

/// Source-chain provider stand-in
#[derive(Debug)]
pub struct MockDemoChainProvider {
	mode: MockConfirmation,
	block_number: AtomicUsize,
}

impl MockDemoChainProvider {
	pub fn new(mode: MockConfirmation) -> Self {
		Self {
			mode,
			block_number: AtomicUsize::new(19_000_000),
		}
	}

	/// Confirms every transaction immediately
	pub fn instant() -> Self {
		Self::new(MockConfirmation::Confirm(Duration::ZERO))
	}

	fn next_block(&self) -> u64 {
		self.block_number.fetch_add(1, Ordering::SeqCst) as u64
	}
}

#[async_trait]
impl ChainProvider for MockDemoChainProvider {
	async fn wait_for_transaction(&self, tx_id: &str) -> AdapterResult<TransactionReceipt> {
		match self.mode {
			MockConfirmation::Confirm(delay) => {
				tokio::time::sleep(delay).await;
				Ok(TransactionReceipt::mined(tx_id, self.next_block()))
			},
			MockConfirmation::Revert(delay) => {
				tokio::time::sleep(delay).await;
				Ok(TransactionReceipt::reverted(tx_id, self.next_block()))
			},
			MockConfirmation::Hang => std::future::pending().await,
			MockConfirmation::Fail => Err(AdapterError::Connection(
				"mock provider unavailable".to_string(),
			)),
		}
	}
}

/// A valid Obyte address for demos and tests
pub fn demo_recipient() -> String {
	bt_adapters::encode_address(&[7u8; 16])
}
