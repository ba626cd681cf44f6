//! Transfer status tracking driven by confirmations and bridge claim events

use std::sync::Arc;

use bt_types::{
	BridgeEvent, ClaimEvent, ClaimEventSource, ClaimOutcome, EventSubscription, StatusChange,
	Transfer,
};

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::tracker";

/// Owner of the current Transfer and of the claim-event subscription scoped to it
///
/// Exactly one subscription is held while a Transfer is tracked. It is
/// replaced whenever a different Transfer becomes current and released on
/// drop. Events are always applied to the Transfer in the current slot at
/// handling time.
pub struct TransferTracker {
	source: Arc<dyn ClaimEventSource>,
	current: Option<Transfer>,
	subscription: Option<EventSubscription>,
	history: Vec<Transfer>,
}

impl TransferTracker {
	pub fn new(source: Arc<dyn ClaimEventSource>) -> Self {
		Self {
			source,
			current: None,
			subscription: None,
			history: Vec::new(),
		}
	}

	/// Make `transfer` the current one
	///
	/// The previous Transfer is archived read-only and its subscription is
	/// released before a fresh one is taken.
	pub fn track(&mut self, transfer: Transfer) {
		self.release();
		if let Some(previous) = self.current.take() {
			tracing::debug!(
				target: TRACING_TARGET,
				tx_id = %previous.source_tx_id,
				status = %previous.status(),
				"Archiving previous transfer"
			);
			self.history.push(previous);
		}

		tracing::info!(
			target: TRACING_TARGET,
			tx_id = %transfer.source_tx_id,
			"Tracking transfer"
		);
		self.subscription = Some(self.source.subscribe());
		self.current = Some(transfer);
	}

	pub fn current(&self) -> Option<&Transfer> {
		self.current.as_ref()
	}

	/// Transfers that were current before, oldest first
	pub fn history(&self) -> &[Transfer] {
		&self.history
	}

	pub fn is_subscribed(&self) -> bool {
		self.subscription.is_some()
	}

	/// Record that the source transaction `tx_id` was mined
	///
	/// Confirmations for transfers that are no longer current are ignored.
	pub fn confirm(&mut self, tx_id: &str) -> StatusChange {
		let Some(transfer) = self
			.current
			.as_mut()
			.filter(|transfer| transfer.source_tx_id == tx_id)
		else {
			tracing::debug!(target: TRACING_TARGET, tx_id, "Confirmation for untracked transfer ignored");
			return StatusChange::Unchanged;
		};

		let change = transfer.mark_mined();
		if let StatusChange::Advanced { from, to } = change {
			tracing::info!(target: TRACING_TARGET, tx_id, %from, %to, "Transfer mined");
		}
		change
	}

	/// Offer a claim event to the current Transfer
	pub fn handle_claim(&mut self, event: &ClaimEvent) -> ClaimOutcome {
		let Some(transfer) = self.current.as_mut() else {
			return ClaimOutcome::Foreign;
		};

		let outcome = transfer.apply_claim(event);
		match outcome {
			ClaimOutcome::Foreign => {
				tracing::debug!(
					target: TRACING_TARGET,
					tx_id = %event.source_tx_id,
					"Claim for another transfer"
				);
			},
			ClaimOutcome::Advanced { from, to } => {
				tracing::info!(
					target: TRACING_TARGET,
					tx_id = %event.source_tx_id,
					claim_tx_id = %event.claim_tx_id,
					%from,
					%to,
					"Transfer claim advanced"
				);
			},
			ClaimOutcome::Duplicate => {
				tracing::debug!(target: TRACING_TARGET, tx_id = %event.source_tx_id, "Duplicate claim");
			},
			ClaimOutcome::Stale { current, requested } => {
				tracing::debug!(
					target: TRACING_TARGET,
					tx_id = %event.source_tx_id,
					%current,
					%requested,
					"Stale claim ignored"
				);
			},
		}
		outcome
	}

	/// Next claim delivered to the current subscription
	///
	/// Returns `None` right away when nothing is subscribed. When the stream
	/// closes the subscription is released and `None` is returned; there is
	/// no reconnection.
	pub async fn next_claim(&mut self) -> Option<ClaimEvent> {
		let subscription = self.subscription.as_mut()?;
		match subscription.recv().await {
			Some(BridgeEvent::NewClaim(claim)) => Some(claim),
			None => {
				tracing::warn!(target: TRACING_TARGET, "Bridge event stream closed, releasing subscription");
				self.subscription = None;
				None
			},
		}
	}

	/// Drop the claim-event subscription, if any
	pub fn release(&mut self) {
		if self.subscription.take().is_some() {
			tracing::debug!(target: TRACING_TARGET, "Released claim subscription");
		}
	}
}

impl Drop for TransferTracker {
	fn drop(&mut self) {
		self.release();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bt_types::{Asset, BridgeRoute, EventBus, TransferRequest, TransferStatus};

	fn transfer(tx_id: &str) -> Transfer {
		let request = TransferRequest::new(
			&BridgeRoute::default(),
			"0.1",
			&Asset::new("ETH"),
			&Asset::new("GBYTE"),
			"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
		);
		Transfer::sent(&request, 40.0, tx_id.to_string())
	}

	fn tracker() -> (EventBus, TransferTracker) {
		let bus = EventBus::new();
		let tracker = TransferTracker::new(Arc::new(bus.clone()));
		(bus, tracker)
	}

	#[test]
	fn test_lifecycle_is_monotonic() {
		let (_bus, mut tracker) = tracker();
		tracker.track(transfer("T"));

		assert!(matches!(tracker.confirm("T"), StatusChange::Advanced { .. }));
		tracker.handle_claim(&ClaimEvent::new("T", "C1", true));
		assert_eq!(tracker.current().unwrap().status(), TransferStatus::Claimed);
		tracker.handle_claim(&ClaimEvent::new("T", "C2", false));
		assert_eq!(tracker.current().unwrap().status(), TransferStatus::ClaimConfirmed);

		assert!(matches!(
			tracker.handle_claim(&ClaimEvent::new("T", "C1", true)),
			ClaimOutcome::Stale { .. }
		));
		assert_eq!(tracker.confirm("T"), StatusChange::Unchanged);
		let current = tracker.current().unwrap();
		assert_eq!(current.status(), TransferStatus::ClaimConfirmed);
		assert_eq!(current.claim_tx_id.as_deref(), Some("C2"));
	}

	#[test]
	fn test_foreign_claim_does_not_mutate() {
		let (_bus, mut tracker) = tracker();
		tracker.track(transfer("T"));
		let before = tracker.current().cloned();

		assert_eq!(
			tracker.handle_claim(&ClaimEvent::new("OTHER", "C", false)),
			ClaimOutcome::Foreign
		);
		assert_eq!(tracker.current().cloned(), before);
	}

	#[test]
	fn test_claim_without_transfer_is_foreign() {
		let (_bus, mut tracker) = tracker();
		assert_eq!(
			tracker.handle_claim(&ClaimEvent::new("T", "C", true)),
			ClaimOutcome::Foreign
		);
		assert_eq!(tracker.confirm("T"), StatusChange::Unchanged);
	}

	#[test]
	fn test_retracking_keeps_single_subscription() {
		let (bus, mut tracker) = tracker();
		assert_eq!(bus.subscriber_count(), 0);

		tracker.track(transfer("A"));
		assert_eq!(bus.subscriber_count(), 1);
		tracker.track(transfer("B"));
		assert_eq!(bus.subscriber_count(), 1);

		assert_eq!(tracker.history().len(), 1);
		assert_eq!(tracker.history()[0].source_tx_id, "A");
		assert_eq!(tracker.current().unwrap().source_tx_id, "B");

		drop(tracker);
		assert_eq!(bus.subscriber_count(), 0);
	}

	#[test]
	fn test_archived_transfer_is_not_updated() {
		let (_bus, mut tracker) = tracker();
		tracker.track(transfer("A"));
		tracker.track(transfer("B"));

		assert_eq!(
			tracker.handle_claim(&ClaimEvent::new("A", "C", true)),
			ClaimOutcome::Foreign
		);
		assert_eq!(tracker.confirm("A"), StatusChange::Unchanged);
		assert_eq!(tracker.history()[0].status(), TransferStatus::Sent);
		assert_eq!(tracker.current().unwrap().status(), TransferStatus::Sent);
	}

	#[tokio::test]
	async fn test_next_claim_reads_subscription() {
		let (bus, mut tracker) = tracker();
		assert_eq!(tracker.next_claim().await, None);

		tracker.track(transfer("T"));
		bus.publish(BridgeEvent::NewClaim(ClaimEvent::new("T", "C", true)));
		assert_eq!(
			tracker.next_claim().await,
			Some(ClaimEvent::new("T", "C", true))
		);
	}

	/// Hands out subscriptions whose bus is already gone
	struct DetachedSource;

	impl ClaimEventSource for DetachedSource {
		fn subscribe(&self) -> EventSubscription {
			EventBus::new().subscribe()
		}
	}

	#[tokio::test]
	async fn test_closed_stream_releases_subscription() {
		let mut tracker = TransferTracker::new(Arc::new(DetachedSource));
		tracker.track(transfer("T"));
		assert!(tracker.is_subscribed());

		assert_eq!(tracker.next_claim().await, None);
		assert!(!tracker.is_subscribed());
		assert_eq!(tracker.current().unwrap().status(), TransferStatus::Sent);
	}
}
