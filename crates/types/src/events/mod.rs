//! Bridge event stream models and subscription contract

use serde::{Deserialize, Serialize};

pub mod bus;

pub use bus::{EventBus, EventSubscription};

/// Claim notification emitted by the bridge for a source transaction
///
/// Events are addressed by the source transaction id; there is no other
/// linkage to a tracked transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
	#[serde(rename = "txid")]
	pub source_tx_id: String,
	#[serde(rename = "claim_txid")]
	pub claim_tx_id: String,
	/// `true` for a claim request, `false` for a confirmed claim
	pub is_request: bool,
}

impl ClaimEvent {
	pub fn new(source_tx_id: impl Into<String>, claim_tx_id: impl Into<String>, is_request: bool) -> Self {
		Self {
			source_tx_id: source_tx_id.into(),
			claim_tx_id: claim_tx_id.into(),
			is_request,
		}
	}
}

/// Events on the bridge's global stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BridgeEvent {
	NewClaim(ClaimEvent),
}

/// Source of bridge events
///
/// Each call hands out an owned subscription. Dropping the subscription is
/// the unsubscribe operation.
pub trait ClaimEventSource: Send + Sync {
	fn subscribe(&self) -> EventSubscription;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_claim_event_wire_format() {
		let json = serde_json::json!({
			"event": "NewClaim",
			"data": { "txid": "0xabc", "claim_txid": "claim1", "is_request": true }
		});
		let event: BridgeEvent = serde_json::from_value(json).unwrap();
		assert_eq!(
			event,
			BridgeEvent::NewClaim(ClaimEvent::new("0xabc", "claim1", true))
		);
	}
}
