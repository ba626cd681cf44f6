//! Collaborator contracts consumed by the transfer orchestrator
//!
//! The bridge SDK, the source-chain provider and the destination address grammar
//! are external to this workspace. Their contracts live here so that real
//! implementations and test doubles can be swapped freely.

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod traits;

pub use errors::AdapterError;
pub use traits::{AddressValidator, BridgeClient, ChainProvider};

#[cfg(feature = "testing")]
pub use traits::{MockAddressValidator, MockBridgeClient, MockChainProvider};

/// Result type for collaborator operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Fixed routing parameters shared by every bridge call
///
/// This is the runtime configuration handed to the bridge SDK on each
/// estimation and transfer: it does not change during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRoute {
	/// Source chain name (e.g. "Ethereum")
	pub src_network: String,
	/// Destination chain name (e.g. "Obyte")
	pub dst_network: String,
	/// Reward offered to the assistant that claims on behalf of the user, in percent
	pub assistant_reward_percent: f64,
	pub testnet: bool,
}

impl BridgeRoute {
	pub fn new(src_network: impl Into<String>, dst_network: impl Into<String>) -> Self {
		Self {
			src_network: src_network.into(),
			dst_network: dst_network.into(),
			assistant_reward_percent: 1.0,
			testnet: false,
		}
	}

	pub fn with_assistant_reward_percent(mut self, percent: f64) -> Self {
		self.assistant_reward_percent = percent;
		self
	}

	pub fn with_testnet(mut self, testnet: bool) -> Self {
		self.testnet = testnet;
		self
	}
}

impl Default for BridgeRoute {
	fn default() -> Self {
		Self::new("Ethereum", "Obyte")
	}
}

/// Receipt reported by the source-chain provider once a transaction is mined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	pub tx_id: String,
	pub block_number: Option<u64>,
	/// `false` when the transaction was mined but reverted
	pub success: bool,
}

impl TransactionReceipt {
	pub fn mined(tx_id: impl Into<String>, block_number: u64) -> Self {
		Self {
			tx_id: tx_id.into(),
			block_number: Some(block_number),
			success: true,
		}
	}

	pub fn reverted(tx_id: impl Into<String>, block_number: u64) -> Self {
		Self {
			tx_id: tx_id.into(),
			block_number: Some(block_number),
			success: false,
		}
	}
}
