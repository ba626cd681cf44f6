//! Bridge Transfer Library
//!
//! Orchestrates the lifecycle of a cross-chain bridge transfer: quoting the
//! receivable amount, validating the pair and recipient, submitting the
//! source-chain transaction and tracking it through confirmation and claim.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

// Core domain types
pub use bt_types::{
	chrono, AdapterError, AdapterResult, AddressValidator, Asset, AssetPair, BridgeClient,
	BridgeEvent, BridgeRoute, ChainProvider, ClaimEvent, ClaimEventSource, ClaimOutcome,
	ConfirmationError, EstimateError, EstimateFailureKind, EstimateRequest, EventBus,
	EventSubscription, NetworkMode, Notice, NoticeLevel, Quote, RecipientAddress, SubmitError,
	TransactionReceipt, Transfer, TransferRequest, TransferStatus, TransferValidationError,
};

// Service layer
pub use bt_service::{
	AmountEstimator, PairCatalog, PairReconciliation, QuoteSupervisor, RecipientValidator,
	SessionError, SessionEvent, TransferSession, TransferSubmitter, TransferTracker,
};

// Adapters
pub use bt_adapters::{JsonRpcChainProvider, JsonRpcConfig, ObyteAddressValidator};

// Config
pub use bt_config::{load_config, log_service_info, log_startup_complete, Settings};

// Module aliases
pub mod models {
	pub use bt_types::*;
}

pub mod config {
	pub use bt_config::*;
}

pub mod adapters {
	pub use bt_adapters::*;
}

pub mod service {
	pub use bt_service::*;
}

pub mod mocks;

// Re-export external dependencies for demos
pub use async_trait;

/// Errors raised while assembling a [`TransferSession`]
#[derive(Error, Debug)]
pub enum BuildError {
	#[error("No bridge client configured")]
	MissingBridge,

	#[error("No claim event source configured")]
	MissingEventSource,

	#[error("No chain provider configured and confirmation.rpc_url is not set")]
	MissingChainProvider,

	#[error("Invalid configuration: {0}")]
	Config(#[from] bt_config::ConfigValidationError),

	#[error("Invalid RPC endpoint: {0}")]
	RpcEndpoint(#[from] url::ParseError),

	#[error("Failed to create chain provider: {0}")]
	ChainProvider(#[from] AdapterError),

	#[error(transparent)]
	Session(#[from] SessionError),

	#[error("Failed to initialize tracing: {0}")]
	Tracing(String),
}

/// Builder for a [`TransferSession`] and its collaborators
#[derive(Default)]
pub struct TransferAppBuilder {
	settings: Option<Settings>,
	bridge: Option<Arc<dyn BridgeClient>>,
	event_source: Option<Arc<dyn ClaimEventSource>>,
	chain_provider: Option<Arc<dyn ChainProvider>>,
	address_validator: Option<Arc<dyn AddressValidator>>,
	startup_query: Option<String>,
}

impl TransferAppBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Bridge SDK used for estimates and transfers
	pub fn with_bridge(mut self, bridge: Arc<dyn BridgeClient>) -> Self {
		self.bridge = Some(bridge);
		self
	}

	/// Global claim-event stream the tracker subscribes to
	pub fn with_event_source(mut self, source: Arc<dyn ClaimEventSource>) -> Self {
		self.event_source = Some(source);
		self
	}

	/// Source-chain provider; defaults to JSON-RPC polling of `confirmation.rpc_url`
	pub fn with_chain_provider(mut self, provider: Arc<dyn ChainProvider>) -> Self {
		self.chain_provider = Some(provider);
		self
	}

	/// Destination address grammar; defaults to Obyte addresses
	pub fn with_address_validator(mut self, validator: Arc<dyn AddressValidator>) -> Self {
		self.address_validator = Some(validator);
		self
	}

	/// Startup query string, e.g. `?recipient=...`
	pub fn with_startup_query(mut self, query: impl Into<String>) -> Self {
		self.startup_query = Some(query.into());
		self
	}

	/// Assemble the session without touching global state
	pub fn build(self) -> Result<TransferSession, BuildError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let bridge = self.bridge.ok_or(BuildError::MissingBridge)?;
		let event_source = self.event_source.ok_or(BuildError::MissingEventSource)?;
		let chain_provider = match self.chain_provider {
			Some(provider) => provider,
			None => json_rpc_provider(&settings)?,
		};
		let address_validator = self
			.address_validator
			.unwrap_or_else(|| Arc::new(ObyteAddressValidator::new()));

		let catalog = Arc::new(PairCatalog::for_network(settings.network.mode));
		let route = settings.bridge_route();

		let mut session = TransferSession::new(
			Arc::clone(&catalog),
			AmountEstimator::new(Arc::clone(&bridge), route.clone()),
			RecipientValidator::new(address_validator),
			TransferSubmitter::new(
				bridge,
				chain_provider,
				catalog,
				route,
				settings.confirmation_timeout(),
			),
			TransferTracker::new(event_source),
		)?
		.with_debounce(settings.estimate_debounce());

		if let Some(query) = &self.startup_query {
			session.apply_startup_query(query);
		}

		Ok(session)
	}

	/// Load `.env` and configuration, initialize tracing, then build the session
	pub fn start(mut self) -> Result<TransferSession, BuildError> {
		// Load .env file if it exists
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_default(),
		};

		init_tracing_from_settings(&settings)?;
		log_service_info();

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		self.settings = Some(settings.clone());
		let session = self.build()?;
		log_startup_complete(&settings);
		Ok(session)
	}
}

fn json_rpc_provider(settings: &Settings) -> Result<Arc<dyn ChainProvider>, BuildError> {
	let rpc_url = settings
		.confirmation
		.rpc_url
		.as_deref()
		.ok_or(BuildError::MissingChainProvider)?;
	let config = JsonRpcConfig::new(url::Url::parse(rpc_url)?)
		.with_poll_interval(settings.confirmation_poll_interval());
	Ok(Arc::new(JsonRpcChainProvider::new(config)?))
}

/// Initialize tracing with configuration-based settings
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing_from_settings(settings: &Settings) -> Result<(), BuildError> {
	use bt_config::LogFormat;

	let log_level = &settings.logging.level;
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	let result = match settings.logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt()
				.pretty()
				.with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt()
				.compact()
				.with_env_filter(env_filter);

			if settings.logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
	};
	result.map_err(|e| BuildError::Tracing(e.to_string()))?;

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		settings.logging.level, settings.logging.format, settings.logging.structured
	);

	Ok(())
}
