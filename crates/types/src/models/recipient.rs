//! Destination-chain recipient address

use serde::{Deserialize, Serialize};

/// Raw recipient input together with its validation state
///
/// `is_valid` is `None` while the input has not been evaluated (empty input),
/// which is distinct from `Some(false)` for an evaluated, malformed address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientAddress {
	pub raw_value: String,
	pub is_valid: Option<bool>,
}

impl RecipientAddress {
	pub fn new(raw_value: impl Into<String>, is_valid: Option<bool>) -> Self {
		Self {
			raw_value: raw_value.into(),
			is_valid,
		}
	}

	pub fn is_valid(&self) -> bool {
		self.is_valid == Some(true)
	}

	pub fn is_evaluated(&self) -> bool {
		self.is_valid.is_some()
	}
}
