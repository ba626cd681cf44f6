//! Configuration settings structures

use std::time::Duration;

use bt_types::{BridgeRoute, NetworkMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub network: NetworkSettings,
	pub bridge: BridgeSettings,
	pub estimator: EstimatorSettings,
	pub confirmation: ConfirmationSettings,
	pub events: EventSettings,
	pub logging: LoggingSettings,
	pub presentation: PresentationSettings,
}

/// Network mode selecting the asset lists and allowed pairs
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct NetworkSettings {
	pub mode: NetworkMode,
}

/// Fixed bridge routing parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BridgeSettings {
	pub source_network: String,
	pub destination_network: String,
	pub assistant_reward_percent: f64,
}

impl Default for BridgeSettings {
	fn default() -> Self {
		Self {
			source_network: "Ethereum".to_string(),
			destination_network: "Obyte".to_string(),
			assistant_reward_percent: 1.0,
		}
	}
}

/// Quote estimation behaviour
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EstimatorSettings {
	/// Delay before an estimation reaches the bridge; a newer input issued
	/// during the delay makes the older one skip the call. 0 disables.
	pub debounce_ms: u64,
}

/// Source-chain confirmation wait
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ConfirmationSettings {
	/// JSON-RPC endpoint of the source chain node
	pub rpc_url: Option<String>,
	pub poll_interval_ms: u64,
	/// Upper bound on the wait before the transfer is reported as unconfirmed
	pub timeout_ms: u64,
}

impl Default for ConfirmationSettings {
	fn default() -> Self {
		Self {
			rpc_url: None,
			poll_interval_ms: 4_000,
			timeout_ms: 30 * 60 * 1_000,
		}
	}
}

/// Bridge event bus
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EventSettings {
	pub channel_capacity: usize,
}

impl Default for EventSettings {
	fn default() -> Self {
		Self {
			channel_capacity: 64,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

/// Presentation-only settings, carried for front ends
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PresentationSettings {
	/// Base URL of the coin icon CDN
	pub icon_cdn_url: String,
}

impl Default for PresentationSettings {
	fn default() -> Self {
		Self {
			icon_cdn_url: "https://cdn.jsdelivr.net/gh/atomiclabs/cryptocurrency-icons@1a63530be6e374711a8554f31b17e4cb92c25fa5/".to_string(),
		}
	}
}

impl PresentationSettings {
	/// Location of the CDN's icon index
	pub fn icon_list_url(&self) -> String {
		format!("{}/list.json", self.icon_cdn_url.trim_end_matches('/'))
	}
}

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
	#[error("Invalid field {field}: {reason}")]
	InvalidField { field: String, reason: String },
}

impl ConfigValidationError {
	fn invalid(field: &str, reason: impl Into<String>) -> Self {
		Self::InvalidField {
			field: field.to_string(),
			reason: reason.into(),
		}
	}
}

impl Settings {
	/// Check the settings for values the orchestrator cannot run with
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.bridge.source_network.trim().is_empty() {
			return Err(ConfigValidationError::invalid(
				"bridge.source_network",
				"must not be empty",
			));
		}
		if self.bridge.destination_network.trim().is_empty() {
			return Err(ConfigValidationError::invalid(
				"bridge.destination_network",
				"must not be empty",
			));
		}
		let reward = self.bridge.assistant_reward_percent;
		if !reward.is_finite() || !(0.0..100.0).contains(&reward) {
			return Err(ConfigValidationError::invalid(
				"bridge.assistant_reward_percent",
				format!("must be within [0, 100), got {}", reward),
			));
		}
		if let Some(rpc_url) = &self.confirmation.rpc_url {
			Url::parse(rpc_url).map_err(|e| {
				ConfigValidationError::invalid("confirmation.rpc_url", e.to_string())
			})?;
		}
		if self.confirmation.poll_interval_ms == 0 {
			return Err(ConfigValidationError::invalid(
				"confirmation.poll_interval_ms",
				"must be positive",
			));
		}
		if self.confirmation.timeout_ms < self.confirmation.poll_interval_ms {
			return Err(ConfigValidationError::invalid(
				"confirmation.timeout_ms",
				"must not be shorter than the poll interval",
			));
		}
		if self.events.channel_capacity == 0 {
			return Err(ConfigValidationError::invalid(
				"events.channel_capacity",
				"must be positive",
			));
		}
		Ok(())
	}

	pub fn is_testnet(&self) -> bool {
		self.network.mode.is_testnet()
	}

	/// Routing parameters handed to every bridge call
	pub fn bridge_route(&self) -> BridgeRoute {
		BridgeRoute::new(
			self.bridge.source_network.clone(),
			self.bridge.destination_network.clone(),
		)
		.with_assistant_reward_percent(self.bridge.assistant_reward_percent)
		.with_testnet(self.is_testnet())
	}

	pub fn estimate_debounce(&self) -> Duration {
		Duration::from_millis(self.estimator.debounce_ms)
	}

	pub fn confirmation_timeout(&self) -> Duration {
		Duration::from_millis(self.confirmation.timeout_ms)
	}

	pub fn confirmation_poll_interval(&self) -> Duration {
		Duration::from_millis(self.confirmation.poll_interval_ms)
	}
}
