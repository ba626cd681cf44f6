//! Network mode selecting which asset lists and pairs apply

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Deployment network mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
	#[default]
	Mainnet,
	Testnet,
}

impl NetworkMode {
	pub fn is_testnet(&self) -> bool {
		matches!(self, NetworkMode::Testnet)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			NetworkMode::Mainnet => "mainnet",
			NetworkMode::Testnet => "testnet",
		}
	}
}

impl fmt::Display for NetworkMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NetworkMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"mainnet" => Ok(NetworkMode::Mainnet),
			"testnet" => Ok(NetworkMode::Testnet),
			other => Err(format!("unknown network mode: {}", other)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_network_mode() {
		assert_eq!("testnet".parse::<NetworkMode>(), Ok(NetworkMode::Testnet));
		assert_eq!(" Mainnet ".parse::<NetworkMode>(), Ok(NetworkMode::Mainnet));
		assert!("devnet".parse::<NetworkMode>().is_err());
	}

	#[test]
	fn test_default_is_mainnet() {
		assert_eq!(NetworkMode::default(), NetworkMode::Mainnet);
		assert!(!NetworkMode::default().is_testnet());
	}
}
