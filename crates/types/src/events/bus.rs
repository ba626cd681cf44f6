//! In-process broadcast bus for bridge events

use tokio::sync::broadcast::{self, error::RecvError};

use super::{BridgeEvent, ClaimEventSource};

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::events";

const DEFAULT_CAPACITY: usize = 64;

/// Process-wide bridge event emitter
///
/// Bridge adapters publish into the bus; consumers subscribe through
/// [`ClaimEventSource`]. The bus never holds a receiver of its own, so
/// [`EventBus::subscriber_count`] is exactly the number of live subscriptions.
#[derive(Debug, Clone)]
pub struct EventBus {
	sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	pub fn with_capacity(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity.max(1));
		Self { sender }
	}

	/// Deliver an event to every live subscription, returning how many received it
	pub fn publish(&self, event: BridgeEvent) -> usize {
		match self.sender.send(event) {
			Ok(receivers) => receivers,
			Err(_) => {
				tracing::debug!(target: TRACING_TARGET, "Bridge event published with no subscribers");
				0
			},
		}
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl ClaimEventSource for EventBus {
	fn subscribe(&self) -> EventSubscription {
		EventSubscription {
			receiver: self.sender.subscribe(),
		}
	}
}

/// Owned handle on the bridge event stream
///
/// Dropping the handle unsubscribes.
#[derive(Debug)]
pub struct EventSubscription {
	receiver: broadcast::Receiver<BridgeEvent>,
}

impl EventSubscription {
	/// Next event in delivery order, or `None` once the stream is closed
	///
	/// Events dropped because this subscriber fell behind are logged and skipped.
	pub async fn recv(&mut self) -> Option<BridgeEvent> {
		loop {
			match self.receiver.recv().await {
				Ok(event) => return Some(event),
				Err(RecvError::Lagged(skipped)) => {
					tracing::warn!(
						target: TRACING_TARGET,
						skipped = skipped,
						"Bridge event subscriber lagged, events skipped"
					);
				},
				Err(RecvError::Closed) => return None,
			}
		}
	}
}
