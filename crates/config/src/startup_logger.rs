//! Startup logging for the bridge transfer orchestrator
//!
//! Logs service information, environment details and the effective
//! configuration at startup.

use std::env;
use tracing::info;

use crate::Settings;

/// Logs service and environment information at startup
pub fn log_service_info() {
	let service_name = "bridge-transfer";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Bridge Transfer Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);

	info!("💻 Platform: {}", env::consts::OS);
	info!("🏗️ Architecture: {}", env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the effective configuration once the session is ready
pub fn log_startup_complete(settings: &Settings) {
	info!("✅ Bridge Transfer Session Ready");
	info!("🌍 Network mode: {}", settings.network.mode);
	info!(
		"🌉 Route: {} → {} (assistant reward {}%)",
		settings.bridge.source_network,
		settings.bridge.destination_network,
		settings.bridge.assistant_reward_percent
	);
	match &settings.confirmation.rpc_url {
		Some(url) => info!("⛓️ Confirmation provider: {}", url),
		None => info!("⛓️ Confirmation provider: supplied by caller"),
	}
	info!(
		"⏱️ Confirmation timeout: {}s",
		settings.confirmation.timeout_ms / 1_000
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Bridge Transfer Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}
