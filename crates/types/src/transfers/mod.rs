//! Core Transfer domain model and its status state machine

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod request;

pub use errors::{ConfirmationError, SubmitError, TransferValidationError};
pub use request::TransferRequest;

use crate::events::ClaimEvent;
use crate::models::Asset;

/// Lifecycle status of a transfer
///
/// Variants are declared in lifecycle order; the derived `Ord` is the
/// transition order and status never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
	/// Source-chain transaction broadcast
	Sent,
	/// Source-chain transaction confirmed
	Mined,
	/// Claim requested on the destination chain
	Claimed,
	/// Claim confirmed on the destination chain (terminal)
	ClaimConfirmed,
}

impl TransferStatus {
	/// Zero-based position in the lifecycle, as shown by a step indicator
	pub fn step_index(&self) -> usize {
		match self {
			TransferStatus::Sent => 0,
			TransferStatus::Mined => 1,
			TransferStatus::Claimed => 2,
			TransferStatus::ClaimConfirmed => 3,
		}
	}

	pub fn is_final(&self) -> bool {
		matches!(self, TransferStatus::ClaimConfirmed)
	}

	/// Status immediately after this one, `None` once terminal
	pub fn next(&self) -> Option<TransferStatus> {
		match self {
			TransferStatus::Sent => Some(TransferStatus::Mined),
			TransferStatus::Mined => Some(TransferStatus::Claimed),
			TransferStatus::Claimed => Some(TransferStatus::ClaimConfirmed),
			TransferStatus::ClaimConfirmed => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TransferStatus::Sent => "sent",
			TransferStatus::Mined => "mined",
			TransferStatus::Claimed => "claimed",
			TransferStatus::ClaimConfirmed => "claim_confirmed",
		}
	}
}

impl fmt::Display for TransferStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result of a local (confirmation-driven) transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
	Advanced {
		from: TransferStatus,
		to: TransferStatus,
	},
	/// Transfer is already at or past the requested status
	Unchanged,
}

/// Result of offering a claim event to a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
	/// Event belongs to another transfer; nothing was touched
	Foreign,
	Advanced {
		from: TransferStatus,
		to: TransferStatus,
	},
	/// Same kind of event delivered again
	Duplicate,
	/// Event would move status backwards; ignored
	Stale {
		current: TransferStatus,
		requested: TransferStatus,
	},
}

/// One user-initiated bridging operation
///
/// The quoted `amount_out` is captured at submission time and never re-queried.
/// Status is changed only through [`Transfer::mark_mined`] and
/// [`Transfer::apply_claim`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
	pub amount_in: String,
	pub amount_out: f64,
	pub source_network: String,
	pub source_asset: Asset,
	pub destination_network: String,
	pub destination_asset: Asset,
	pub recipient_address: String,
	pub source_tx_id: String,
	pub claim_tx_id: Option<String>,
	pub created_at: DateTime<Utc>,
	status: TransferStatus,
	/// Every status entered so far, in order
	#[serde(default)]
	status_trail: Vec<TransferStatus>,
}

impl Transfer {
	/// Create a freshly broadcast transfer in `sent`
	pub fn sent(request: &TransferRequest, amount_out: f64, source_tx_id: String) -> Self {
		Self {
			amount_in: request.amount.clone(),
			amount_out,
			source_network: request.src_network.clone(),
			source_asset: request.src_asset.clone(),
			destination_network: request.dst_network.clone(),
			destination_asset: request.dst_asset.clone(),
			recipient_address: request.recipient_address.clone(),
			source_tx_id,
			claim_tx_id: None,
			created_at: Utc::now(),
			status: TransferStatus::Sent,
			status_trail: vec![TransferStatus::Sent],
		}
	}

	pub fn status(&self) -> TransferStatus {
		self.status
	}

	pub fn is_final(&self) -> bool {
		self.status.is_final()
	}

	/// Statuses entered so far, starting with `sent`
	pub fn status_trail(&self) -> &[TransferStatus] {
		&self.status_trail
	}

	/// Record source-chain confirmation
	pub fn mark_mined(&mut self) -> StatusChange {
		if self.status >= TransferStatus::Mined {
			return StatusChange::Unchanged;
		}
		let from = self.status;
		self.advance_to(TransferStatus::Mined);
		StatusChange::Advanced {
			from,
			to: TransferStatus::Mined,
		}
	}

	/// Step forward one status at a time until `target`
	fn advance_to(&mut self, target: TransferStatus) {
		while self.status < target {
			let Some(next) = self.status.next() else {
				break;
			};
			self.status = next;
			self.status_trail.push(next);
		}
	}

	/// Apply a claim notification from the bridge event stream
	///
	/// Correlation is by source transaction id only. Intermediate statuses are
	/// entered in order: a claim seen while still `sent` implies the source
	/// transaction was mined, and a confirmed claim implies the claim request.
	pub fn apply_claim(&mut self, event: &ClaimEvent) -> ClaimOutcome {
		if event.source_tx_id != self.source_tx_id {
			return ClaimOutcome::Foreign;
		}

		let requested = if event.is_request {
			TransferStatus::Claimed
		} else {
			TransferStatus::ClaimConfirmed
		};

		if requested == self.status {
			return ClaimOutcome::Duplicate;
		}
		if requested < self.status {
			return ClaimOutcome::Stale {
				current: self.status,
				requested,
			};
		}

		let from = self.status;
		self.claim_tx_id = Some(event.claim_tx_id.clone());
		self.advance_to(requested);
		ClaimOutcome::Advanced {
			from,
			to: requested,
		}
	}
}
