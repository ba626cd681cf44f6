//! Error types for quote estimation

use thiserror::Error;

use crate::adapters::AdapterError;

/// Classified estimation failure
///
/// `AmountTooLarge`, `NoBridge` and `NoLiquidityPool` are expected and only
/// clear the quote. `Other` is an integration failure and must propagate.
#[derive(Error, Debug)]
pub enum EstimateError {
	#[error("{0}")]
	AmountTooLarge(String),

	#[error("{0}")]
	NoBridge(String),

	#[error("{0}")]
	NoLiquidityPool(String),

	#[error("Unexpected estimation failure: {0}")]
	Other(AdapterError),
}

/// Tag of an [`EstimateError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateFailureKind {
	AmountTooLarge,
	NoBridge,
	NoLiquidityPool,
	Other,
}

impl EstimateError {
	pub fn kind(&self) -> EstimateFailureKind {
		match self {
			EstimateError::AmountTooLarge(_) => EstimateFailureKind::AmountTooLarge,
			EstimateError::NoBridge(_) => EstimateFailureKind::NoBridge,
			EstimateError::NoLiquidityPool(_) => EstimateFailureKind::NoLiquidityPool,
			EstimateError::Other(_) => EstimateFailureKind::Other,
		}
	}

	pub fn is_recoverable(&self) -> bool {
		!matches!(self, EstimateError::Other(_))
	}
}

impl From<AdapterError> for EstimateError {
	fn from(error: AdapterError) -> Self {
		match error {
			AdapterError::AmountTooLarge { message } => EstimateError::AmountTooLarge(message),
			AdapterError::NoBridge { message } => EstimateError::NoBridge(message),
			AdapterError::NoOswapPool { message } => EstimateError::NoLiquidityPool(message),
			other => EstimateError::Other(other),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classification_of_bridge_failures() {
		let cases = [
			(
				AdapterError::AmountTooLarge {
					message: "too large".to_string(),
				},
				EstimateFailureKind::AmountTooLarge,
			),
			(
				AdapterError::NoBridge {
					message: "no bridge".to_string(),
				},
				EstimateFailureKind::NoBridge,
			),
			(
				AdapterError::NoOswapPool {
					message: "no pool".to_string(),
				},
				EstimateFailureKind::NoLiquidityPool,
			),
		];

		for (adapter_error, expected) in cases {
			let error = EstimateError::from(adapter_error);
			assert_eq!(error.kind(), expected);
			assert!(error.is_recoverable());
		}
	}

	#[test]
	fn test_everything_else_is_unexpected() {
		let error = EstimateError::from(AdapterError::Sdk("socket hang up".to_string()));
		assert_eq!(error.kind(), EstimateFailureKind::Other);
		assert!(!error.is_recoverable());

		// a missing wallet is not an estimation outcome
		let error = EstimateError::from(AdapterError::NoWallet);
		assert_eq!(error.kind(), EstimateFailureKind::Other);
	}
}
