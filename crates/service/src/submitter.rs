//! Transfer submission and source-chain confirmation

use std::sync::Arc;
use std::time::Duration;

use bt_types::{
	AssetPair, BridgeClient, BridgeRoute, ChainProvider, ConfirmationError, Quote,
	RecipientAddress, SubmitError, TransactionReceipt, Transfer, TransferRequest,
	TransferValidationError,
};
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::estimator::parse_amount;
use crate::pair_catalog::PairCatalog;

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::submitter";

/// Pending source-chain confirmation of a broadcast transfer
pub type ConfirmationFuture = BoxFuture<'static, Result<TransactionReceipt, ConfirmationError>>;

/// A broadcast transfer together with its not-yet-awaited confirmation
pub struct Submission {
	pub transfer: Transfer,
	/// Resolves once the source transaction is mined, reverted, or the wait times out.
	/// The caller decides where it runs; nothing happens until it is polled.
	pub confirmation: ConfirmationFuture,
}

impl std::fmt::Debug for Submission {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Submission")
			.field("transfer", &self.transfer)
			.finish_non_exhaustive()
	}
}

/// Broadcasts bridge transfers through the connected wallet
#[derive(Debug, Clone)]
pub struct TransferSubmitter {
	bridge: Arc<dyn BridgeClient>,
	provider: Arc<dyn ChainProvider>,
	catalog: Arc<PairCatalog>,
	route: BridgeRoute,
	confirmation_timeout: Duration,
}

impl TransferSubmitter {
	pub fn new(
		bridge: Arc<dyn BridgeClient>,
		provider: Arc<dyn ChainProvider>,
		catalog: Arc<PairCatalog>,
		route: BridgeRoute,
		confirmation_timeout: Duration,
	) -> Self {
		Self {
			bridge,
			provider,
			catalog,
			route,
			confirmation_timeout,
		}
	}

	/// Check everything a submission needs before the wallet is asked to sign
	pub fn check_preconditions(
		&self,
		amount: &str,
		pair: &AssetPair,
		recipient: &RecipientAddress,
		quote: Option<&Quote>,
	) -> Result<f64, TransferValidationError> {
		if !self.catalog.is_allowed(pair) {
			return Err(TransferValidationError::UnsupportedPair {
				source_asset: pair.source.to_string(),
				destination_asset: pair.destination.to_string(),
			});
		}
		if !recipient.is_valid() {
			return Err(TransferValidationError::InvalidRecipient);
		}
		if !parse_amount(amount).is_some_and(|value| value > 0.0) {
			return Err(TransferValidationError::InvalidAmount {
				amount: amount.to_string(),
			});
		}
		quote
			.filter(|quote| quote.matches(amount, &pair.source, &pair.destination))
			.and_then(Quote::positive_output)
			.ok_or_else(|| TransferValidationError::MissingQuote {
				amount: amount.to_string(),
				source_asset: pair.source.to_string(),
				destination_asset: pair.destination.to_string(),
			})
	}

	/// Broadcast the transfer and create its record in `sent`
	///
	/// Returns right after broadcast. The quoted amount is captured from
	/// `quote` as it stands now. No [`Transfer`] exists if this fails.
	pub async fn submit(
		&self,
		amount: &str,
		pair: &AssetPair,
		recipient: &RecipientAddress,
		quote: Option<&Quote>,
	) -> Result<Submission, SubmitError> {
		let amount_out = self.check_preconditions(amount, pair, recipient, quote)?;

		let request = TransferRequest::new(
			&self.route,
			amount,
			&pair.source,
			&pair.destination,
			&recipient.raw_value,
		);

		let source_tx_id = self.bridge.transfer(&request).await.map_err(|e| {
			let error = SubmitError::from(e);
			match &error {
				SubmitError::NoWallet => {
					tracing::warn!(target: TRACING_TARGET, "No wallet connected")
				},
				other => {
					tracing::error!(target: TRACING_TARGET, error = %other, "Transfer broadcast failed")
				},
			}
			error
		})?;

		tracing::info!(
			target: TRACING_TARGET,
			tx_id = %source_tx_id,
			amount,
			pair = %pair,
			amount_out,
			"Transfer broadcast"
		);

		let transfer = Transfer::sent(&request, amount_out, source_tx_id.clone());
		let confirmation = wait_for_confirmation(
			Arc::clone(&self.provider),
			source_tx_id,
			self.confirmation_timeout,
		);

		Ok(Submission {
			transfer,
			confirmation,
		})
	}
}

/// Wait for `tx_id` to be mined, bounded by `timeout`
///
/// A reverted receipt is a failure, not a confirmation.
pub fn wait_for_confirmation(
	provider: Arc<dyn ChainProvider>,
	tx_id: String,
	timeout: Duration,
) -> ConfirmationFuture {
	async move {
		let receipt = tokio::time::timeout(timeout, provider.wait_for_transaction(&tx_id))
			.await
			.map_err(|_| ConfirmationError::Timeout {
				tx_id: tx_id.clone(),
				timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
			})??;

		if !receipt.success {
			return Err(ConfirmationError::Reverted { tx_id });
		}
		tracing::debug!(
			target: TRACING_TARGET,
			tx_id = %tx_id,
			block = ?receipt.block_number,
			"Transaction mined"
		);
		Ok(receipt)
	}
	.boxed()
}
