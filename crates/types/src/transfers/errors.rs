//! Error types for transfer submission and confirmation

use thiserror::Error;

use crate::adapters::AdapterError;

/// Submission preconditions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferValidationError {
	#[error("Recipient address is missing or invalid")]
	InvalidRecipient,

	#[error("Invalid amount: {amount}")]
	InvalidAmount { amount: String },

	#[error("No positive quote available for {amount} {source_asset} to {destination_asset}")]
	MissingQuote {
		amount: String,
		source_asset: String,
		destination_asset: String,
	},

	#[error("Unsupported pair {source_asset} to {destination_asset}")]
	UnsupportedPair {
		source_asset: String,
		destination_asset: String,
	},
}

/// Transfer submission errors
///
/// No Transfer exists after any of these.
#[derive(Error, Debug)]
pub enum SubmitError {
	#[error("Wallet not found")]
	NoWallet,

	#[error("Transfer rejected: {0}")]
	Validation(#[from] TransferValidationError),

	#[error("Broadcast failed: {0}")]
	Broadcast(AdapterError),
}

impl SubmitError {
	/// Expected failures are reported to the user; the rest propagate
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, SubmitError::Broadcast(_))
	}
}

impl From<AdapterError> for SubmitError {
	fn from(error: AdapterError) -> Self {
		match error {
			AdapterError::NoWallet => SubmitError::NoWallet,
			other => SubmitError::Broadcast(other),
		}
	}
}

/// Failures while waiting for source-chain confirmation
#[derive(Error, Debug)]
pub enum ConfirmationError {
	#[error("Transaction {tx_id} not confirmed after {timeout_ms}ms")]
	Timeout { tx_id: String, timeout_ms: u64 },

	#[error("Transaction {tx_id} was reverted")]
	Reverted { tx_id: String },

	#[error("Provider error while waiting for confirmation: {0}")]
	Provider(#[from] AdapterError),
}
