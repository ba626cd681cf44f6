//! Transfer submission request

use serde::{Deserialize, Serialize};

use crate::adapters::BridgeRoute;
use crate::models::Asset;

/// Parameters of a bridge transfer call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
	pub amount: String,
	pub src_network: String,
	pub src_asset: Asset,
	pub dst_network: String,
	pub dst_asset: Asset,
	pub recipient_address: String,
	pub assistant_reward_percent: f64,
	pub testnet: bool,
}

impl TransferRequest {
	pub fn new(
		route: &BridgeRoute,
		amount: &str,
		src_asset: &Asset,
		dst_asset: &Asset,
		recipient_address: &str,
	) -> Self {
		Self {
			amount: amount.to_string(),
			src_network: route.src_network.clone(),
			src_asset: src_asset.clone(),
			dst_network: route.dst_network.clone(),
			dst_asset: dst_asset.clone(),
			recipient_address: recipient_address.to_string(),
			assistant_reward_percent: route.assistant_reward_percent,
			testnet: route.testnet,
		}
	}
}
