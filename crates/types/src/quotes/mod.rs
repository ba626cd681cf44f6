//! Quote domain model

use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::{EstimateError, EstimateFailureKind};

use crate::adapters::BridgeRoute;
use crate::models::Asset;

/// Estimated receivable amount for one (amount, source, destination) input
///
/// Quotes are ephemeral. A change to any of the three inputs supersedes the
/// quote; superseded quotes are discarded, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
	pub requested_amount: String,
	pub source_asset: Asset,
	pub destination_asset: Asset,
	/// `None` when the pair/amount is currently unquotable
	pub estimated_output: Option<f64>,
}

impl Quote {
	pub fn new(
		requested_amount: impl Into<String>,
		source_asset: Asset,
		destination_asset: Asset,
		estimated_output: Option<f64>,
	) -> Self {
		Self {
			requested_amount: requested_amount.into(),
			source_asset,
			destination_asset,
			estimated_output,
		}
	}

	/// Whether this quote was computed for exactly these inputs
	pub fn matches(&self, amount: &str, source: &Asset, destination: &Asset) -> bool {
		self.requested_amount == amount
			&& &self.source_asset == source
			&& &self.destination_asset == destination
	}

	/// Quoted output if it is strictly positive
	pub fn positive_output(&self) -> Option<f64> {
		self.estimated_output.filter(|amount| *amount > 0.0)
	}
}

/// Parameters of a bridge estimation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
	pub amount: String,
	pub src_network: String,
	pub src_asset: Asset,
	pub dst_network: String,
	pub dst_asset: Asset,
	pub assistant_reward_percent: f64,
	pub testnet: bool,
}

impl EstimateRequest {
	pub fn new(route: &BridgeRoute, amount: &str, src_asset: &Asset, dst_asset: &Asset) -> Self {
		Self {
			amount: amount.to_string(),
			src_network: route.src_network.clone(),
			src_asset: src_asset.clone(),
			dst_network: route.dst_network.clone(),
			dst_asset: dst_asset.clone(),
			assistant_reward_percent: route.assistant_reward_percent,
			testnet: route.testnet,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_quote_matches_inputs() {
		let quote = Quote::new("0.1", Asset::new("ETH"), Asset::new("GBYTE"), Some(12.0));
		assert!(quote.matches("0.1", &Asset::new("ETH"), &Asset::new("GBYTE")));
		assert!(!quote.matches("0.2", &Asset::new("ETH"), &Asset::new("GBYTE")));
		assert!(!quote.matches("0.1", &Asset::new("ETH"), &Asset::new("OETHV2")));
	}

	#[test]
	fn test_positive_output() {
		let asset = Asset::new("ETH");
		let zero = Quote::new("0", asset.clone(), asset.clone(), Some(0.0));
		let absent = Quote::new("1", asset.clone(), asset.clone(), None);
		let positive = Quote::new("1", asset.clone(), asset, Some(0.5));
		assert_eq!(zero.positive_output(), None);
		assert_eq!(absent.positive_output(), None);
		assert_eq!(positive.positive_output(), Some(0.5));
	}

	#[test]
	fn test_estimate_request_copies_route() {
		let route = BridgeRoute::default().with_testnet(true);
		let request = EstimateRequest::new(&route, "0.1", &Asset::new("ETH"), &Asset::new("GBYTE"));
		assert_eq!(request.src_network, "Ethereum");
		assert_eq!(request.dst_network, "Obyte");
		assert_eq!(request.assistant_reward_percent, 1.0);
		assert!(request.testnet);
	}
}
