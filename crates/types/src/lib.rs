//! Bridge Transfer Types
//!
//! Shared models, errors and collaborator traits for the cross-chain bridge
//! transfer orchestrator. Domain models are organized by business entity.

pub mod adapters;
pub mod events;
pub mod models;
pub mod quotes;
pub mod transfers;

// Re-export chrono for convenience
pub use chrono;

pub use adapters::{
	AdapterError, AdapterResult, AddressValidator, BridgeClient, BridgeRoute, ChainProvider,
	TransactionReceipt,
};

#[cfg(feature = "testing")]
pub use adapters::{MockAddressValidator, MockBridgeClient, MockChainProvider};

pub use events::{BridgeEvent, ClaimEvent, ClaimEventSource, EventBus, EventSubscription};

pub use models::{Asset, AssetPair, NetworkMode, Notice, NoticeLevel, RecipientAddress};

pub use quotes::{EstimateError, EstimateFailureKind, EstimateRequest, Quote};

pub use transfers::{
	ClaimOutcome, ConfirmationError, StatusChange, SubmitError, Transfer, TransferRequest,
	TransferStatus, TransferValidationError,
};
