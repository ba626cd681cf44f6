//! Bridge Transfer Configuration
//!
//! Configuration management and startup utilities for the bridge transfer orchestrator.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	BridgeSettings, ConfigValidationError, ConfirmationSettings, EstimatorSettings, EventSettings,
	LogFormat, LoggingSettings, NetworkSettings, PresentationSettings, Settings,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};
