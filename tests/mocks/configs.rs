//! Configuration mocks for tests

use bridge_transfer::config::{LogFormat, Settings};
use bridge_transfer::NetworkMode;

/// Configuration builders for tests
#[allow(dead_code)]
pub struct MockConfigs;

#[allow(dead_code)]
impl MockConfigs {
	/// Mainnet settings with short confirmation timings
	pub fn test_settings() -> Settings {
		let mut settings = Settings::default();
		settings.confirmation.poll_interval_ms = 100;
		settings.confirmation.timeout_ms = 5_000;
		settings.logging.level = "debug".to_string();
		settings.logging.format = LogFormat::Compact;
		settings
	}

	pub fn testnet_settings() -> Settings {
		let mut settings = Self::test_settings();
		settings.network.mode = NetworkMode::Testnet;
		settings
	}

	pub fn debounced_settings(debounce_ms: u64) -> Settings {
		let mut settings = Self::test_settings();
		settings.estimator.debounce_ms = debounce_ms;
		settings
	}
}
