//! Transfer session: form state, background work and result application
//!
//! A [`TransferSession`] is the single logical thread of control. Input
//! setters update the form synchronously and issue background work
//! (estimations, confirmation waits) as tokio tasks. Their results, together
//! with claim events from the tracker's subscription, come back through
//! [`TransferSession::next_event`] and are applied in
//! [`TransferSession::handle_event`]. Nothing in the background touches
//! session state directly.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use bt_types::{
	Asset, AssetPair, ClaimEvent, ConfirmationError, EstimateError, Notice, Quote,
	RecipientAddress, SubmitError, TransactionReceipt, Transfer,
};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::estimator::{
	accepts_keystroke, parse_amount, AmountEstimator, EstimateOutcome, QuoteInput,
	QuoteSupervisor,
};
use crate::pair_catalog::{PairCatalog, PairReconciliation};
use crate::recipient::{recipient_from_query, RecipientValidator};
use crate::submitter::TransferSubmitter;
use crate::tracker::TransferTracker;

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::session";

/// Unexpected failures; expected ones become [`Notice`]s instead
#[derive(Error, Debug)]
pub enum SessionError {
	#[error("Pair catalog has no bridgeable pairs")]
	EmptyCatalog,

	#[error(transparent)]
	Estimate(EstimateError),

	#[error(transparent)]
	Submit(SubmitError),
}

/// Result of background work, or a claim from the bridge event stream
#[derive(Debug)]
pub enum SessionEvent {
	QuoteReady(EstimateOutcome),
	Confirmation {
		tx_id: String,
		result: Result<TransactionReceipt, ConfirmationError>,
	},
	Claim(ClaimEvent),
}

pub struct TransferSession {
	catalog: Arc<PairCatalog>,
	estimator: AmountEstimator,
	supervisor: QuoteSupervisor,
	recipient_validator: RecipientValidator,
	submitter: TransferSubmitter,
	tracker: TransferTracker,
	debounce: Duration,

	amount: String,
	pair: AssetPair,
	recipient: RecipientAddress,
	quote: Option<Quote>,
	notices: Vec<Notice>,

	events_tx: mpsc::UnboundedSender<SessionEvent>,
	events_rx: mpsc::UnboundedReceiver<SessionEvent>,
	in_flight: usize,
}

impl TransferSession {
	/// Start with an empty form on the catalog's default pair
	pub fn new(
		catalog: Arc<PairCatalog>,
		estimator: AmountEstimator,
		recipient_validator: RecipientValidator,
		submitter: TransferSubmitter,
		tracker: TransferTracker,
	) -> Result<Self, SessionError> {
		let pair = catalog.default_pair().ok_or(SessionError::EmptyCatalog)?;
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		Ok(Self {
			catalog,
			estimator,
			supervisor: QuoteSupervisor::new(),
			recipient_validator,
			submitter,
			tracker,
			debounce: Duration::ZERO,
			amount: String::new(),
			pair,
			recipient: RecipientAddress::default(),
			quote: None,
			notices: Vec::new(),
			events_tx,
			events_rx,
			in_flight: 0,
		})
	}

	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}

	pub fn amount(&self) -> &str {
		&self.amount
	}

	pub fn pair(&self) -> &AssetPair {
		&self.pair
	}

	pub fn recipient(&self) -> &RecipientAddress {
		&self.recipient
	}

	/// Quote for the current inputs, if one has been applied
	pub fn quote(&self) -> Option<&Quote> {
		self.quote.as_ref()
	}

	pub fn catalog(&self) -> &PairCatalog {
		&self.catalog
	}

	/// Destinations selectable for the current source asset
	pub fn allowed_destinations(&self) -> &[Asset] {
		self.catalog.allowed_destinations(&self.pair.source)
	}

	pub fn transfer(&self) -> Option<&Transfer> {
		self.tracker.current()
	}

	pub fn history(&self) -> &[Transfer] {
		self.tracker.history()
	}

	pub fn tracker(&self) -> &TransferTracker {
		&self.tracker
	}

	/// Background tasks whose results have not been received yet
	pub fn pending_tasks(&self) -> usize {
		self.in_flight
	}

	pub fn notices(&self) -> &[Notice] {
		&self.notices
	}

	/// Drain notices raised since the last call
	pub fn take_notices(&mut self) -> Vec<Notice> {
		mem::take(&mut self.notices)
	}

	/// Whether the submit action is currently available
	pub fn can_submit(&self) -> bool {
		self.submitter
			.check_preconditions(&self.amount, &self.pair, &self.recipient, self.quote.as_ref())
			.is_ok()
	}

	/// Replace the amount input; rejected keystrokes leave it unchanged
	pub fn set_amount(&mut self, raw: &str) -> bool {
		if !accepts_keystroke(raw) {
			tracing::trace!(target: TRACING_TARGET, raw, "Amount keystroke rejected");
			return false;
		}
		if self.amount != raw {
			self.amount = raw.to_string();
			self.refresh_quote();
		}
		true
	}

	/// Select a source asset, correcting the destination if it is no longer allowed
	pub fn set_source_asset(&mut self, source: impl Into<Asset>) {
		let source = source.into();
		if !self.catalog.is_known_source(&source) {
			tracing::warn!(target: TRACING_TARGET, source = %source, "Unknown source asset selected");
			self.notices
				.push(Notice::error(format!("Unsupported source asset {}", source)));
			return;
		}
		if source == self.pair.source {
			return;
		}
		self.pair.source = source;
		self.reconcile_destination();
		self.refresh_quote();
	}

	/// Select a destination asset; a disallowed choice is corrected like a source change
	pub fn set_destination_asset(&mut self, destination: impl Into<Asset>) {
		let destination = destination.into();
		if destination == self.pair.destination {
			return;
		}
		self.pair.destination = destination;
		self.reconcile_destination();
		self.refresh_quote();
	}

	/// Replace the recipient input and re-validate it
	pub fn set_recipient(&mut self, raw: &str) {
		self.recipient = self.recipient_validator.validate(raw);
	}

	/// Pre-populate the recipient from a startup query string
	///
	/// Goes through the same validation as manual input.
	pub fn apply_startup_query(&mut self, query: &str) {
		if let Some(recipient) = recipient_from_query(query) {
			tracing::info!(target: TRACING_TARGET, recipient = %recipient, "Recipient supplied at startup");
			self.set_recipient(&recipient);
		}
	}

	fn reconcile_destination(&mut self) {
		match self
			.catalog
			.reconcile(&self.pair.source, &self.pair.destination)
		{
			PairReconciliation::Unchanged => {},
			PairReconciliation::Corrected { pair, rejected } => {
				tracing::info!(
					target: TRACING_TARGET,
					rejected = %rejected,
					corrected = %pair,
					"Destination not allowed for source, corrected"
				);
				self.notices.push(Notice::warning(format!(
					"Unsupported pair {} to {}",
					pair.source, rejected
				)));
				self.pair = pair;
			},
			PairReconciliation::Unsupported => {
				self.notices.push(Notice::error(format!(
					"Unsupported source asset {}",
					self.pair.source
				)));
			},
		}
	}

	/// Issue a new estimation for the current inputs
	///
	/// The previous quote is discarded immediately; any in-flight estimation
	/// becomes stale.
	fn refresh_quote(&mut self) {
		let ticket = self.supervisor.issue();
		self.quote = None;

		if parse_amount(&self.amount).is_none() {
			tracing::debug!(target: TRACING_TARGET, amount = %self.amount, "No quotable amount");
			return;
		}

		let events = self.events_tx.clone();
		self.supervisor.spawn(
			ticket,
			self.estimator.clone(),
			QuoteInput::new(
				self.amount.clone(),
				self.pair.source.clone(),
				self.pair.destination.clone(),
			),
			self.debounce,
			move |outcome| {
				let _ = events.send(SessionEvent::QuoteReady(outcome));
			},
		);
		self.in_flight += 1;
	}

	/// Broadcast a transfer for the current form
	///
	/// On success the new Transfer becomes current and its confirmation wait
	/// runs in the background. Expected failures raise a notice and return
	/// `Ok(None)`; no Transfer is created for them.
	pub async fn submit(&mut self) -> Result<Option<&Transfer>, SessionError> {
		let result = self
			.submitter
			.submit(&self.amount, &self.pair, &self.recipient, self.quote.as_ref())
			.await;
		let submission = match result {
			Ok(submission) => submission,
			Err(error) if error.is_recoverable() => {
				self.notices.push(Notice::error(error.to_string()));
				return Ok(None);
			},
			Err(error) => return Err(SessionError::Submit(error)),
		};

		let tx_id = submission.transfer.source_tx_id.clone();
		let confirmation = submission.confirmation;
		let events = self.events_tx.clone();
		tokio::spawn(async move {
			let result = confirmation.await;
			let _ = events.send(SessionEvent::Confirmation { tx_id, result });
		});
		self.in_flight += 1;

		self.tracker.track(submission.transfer);
		Ok(self.tracker.current())
	}

	/// Wait for the next background result or claim event
	///
	/// Returns `None` when there is neither background work in flight nor a
	/// claim subscription to listen on.
	pub async fn next_event(&mut self) -> Option<SessionEvent> {
		if self.in_flight == 0 && !self.tracker.is_subscribed() {
			return None;
		}

		let event = tokio::select! {
			Some(event) = self.events_rx.recv(), if self.in_flight > 0 => {
				self.in_flight -= 1;
				event
			},
			Some(claim) = self.tracker.next_claim(), if self.tracker.is_subscribed() => {
				SessionEvent::Claim(claim)
			},
			else => return None,
		};
		Some(event)
	}

	/// Apply one event to the session state
	pub fn handle_event(&mut self, event: SessionEvent) -> Result<(), SessionError> {
		match event {
			SessionEvent::QuoteReady(outcome) => self.apply_estimate(outcome),
			SessionEvent::Confirmation { tx_id, result } => {
				self.apply_confirmation(&tx_id, result);
				Ok(())
			},
			SessionEvent::Claim(claim) => {
				self.tracker.handle_claim(&claim);
				Ok(())
			},
		}
	}

	/// Receive and apply one event; `false` once there is nothing left to wait for
	pub async fn step(&mut self) -> Result<bool, SessionError> {
		match self.next_event().await {
			Some(event) => {
				self.handle_event(event)?;
				Ok(true)
			},
			None => Ok(false),
		}
	}

	/// Apply events until no background work is in flight
	///
	/// Claims that arrive meanwhile are applied as well, but the session does
	/// not keep waiting for further claims.
	pub async fn settle(&mut self) -> Result<(), SessionError> {
		while self.in_flight > 0 {
			if !self.step().await? {
				break;
			}
		}
		Ok(())
	}

	fn apply_estimate(&mut self, outcome: EstimateOutcome) -> Result<(), SessionError> {
		if !self.supervisor.is_current(outcome.ticket) {
			tracing::debug!(
				target: TRACING_TARGET,
				ticket = outcome.ticket.sequence(),
				amount = %outcome.input.amount,
				"Discarding stale estimate"
			);
			return Ok(());
		}

		let QuoteInput {
			amount,
			source,
			destination,
		} = outcome.input;
		match outcome.result {
			Ok(output) => {
				self.quote = Some(Quote::new(amount, source, destination, output));
				Ok(())
			},
			Err(error) if error.is_recoverable() => {
				self.quote = None;
				self.notices.push(Notice::error(error.to_string()));
				Ok(())
			},
			Err(error) => {
				self.quote = None;
				Err(SessionError::Estimate(error))
			},
		}
	}

	fn apply_confirmation(
		&mut self,
		tx_id: &str,
		result: Result<TransactionReceipt, ConfirmationError>,
	) {
		let is_current = self
			.tracker
			.current()
			.is_some_and(|transfer| transfer.source_tx_id == tx_id);

		match result {
			Ok(_) => {
				self.tracker.confirm(tx_id);
			},
			Err(error) => {
				tracing::warn!(target: TRACING_TARGET, tx_id, error = %error, "Transfer not confirmed");
				if is_current {
					self.notices.push(Notice::warning(format!(
						"Transaction {} was not confirmed: {}",
						tx_id, error
					)));
				}
			},
		}
	}
}
