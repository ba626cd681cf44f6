//! Core collaborator traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::{AdapterResult, TransactionReceipt};
use crate::quotes::EstimateRequest;
use crate::transfers::TransferRequest;

/// Bridge SDK contract: quoting and source-side transfer submission
///
/// Claim notifications are not part of this trait; they arrive on the global
/// event stream, see [`crate::events::ClaimEventSource`].
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait BridgeClient: Send + Sync + Debug {
	/// Quote the destination amount receivable for the given input
	///
	/// Fails with `AmountTooLarge`, `NoBridge` or `NoOswapPool` for the
	/// expected, user-recoverable cases.
	async fn estimate_output(&self, request: &EstimateRequest) -> AdapterResult<f64>;

	/// Sign and broadcast the source-chain transaction, returning its id
	///
	/// Fails with `NoWallet` when no wallet is connected.
	async fn transfer(&self, request: &TransferRequest) -> AdapterResult<String>;
}

/// Source-chain provider contract
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ChainProvider: Send + Sync + Debug {
	/// Suspend until the transaction is mined
	async fn wait_for_transaction(&self, tx_id: &str) -> AdapterResult<TransactionReceipt>;
}

/// Destination-chain address grammar
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait AddressValidator: Send + Sync + Debug {
	/// Check a non-empty address string for structural validity
	fn is_valid_address(&self, raw: &str) -> bool;

	/// Name of the chain whose grammar is enforced
	fn network_name(&self) -> &str;
}
