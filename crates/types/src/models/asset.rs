//! Asset symbol and asset pair models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset symbol as understood by the bridge (e.g. "ETH", "GBYTE", "OUSD_V2")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self(symbol.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Asset {
	fn from(symbol: &str) -> Self {
		Self::new(symbol)
	}
}

impl From<String> for Asset {
	fn from(symbol: String) -> Self {
		Self(symbol)
	}
}

impl PartialEq<str> for Asset {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for Asset {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

/// Source/destination asset combination
///
/// Whether a pair is bridgeable is decided by the pair catalog, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
	pub source: Asset,
	pub destination: Asset,
}

impl AssetPair {
	pub fn new(source: impl Into<Asset>, destination: impl Into<Asset>) -> Self {
		Self {
			source: source.into(),
			destination: destination.into(),
		}
	}
}

impl fmt::Display for AssetPair {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} to {}", self.source, self.destination)
	}
}
