//! Bridge Transfer Adapters
//!
//! Concrete implementations of the collaborator contracts defined in `bt-types`:
//! the Obyte address grammar and a JSON-RPC source-chain provider.

pub mod evm_provider;
pub mod obyte_address;

pub use bt_types::{AdapterError, AdapterResult, AddressValidator, ChainProvider};
pub use evm_provider::{JsonRpcChainProvider, JsonRpcConfig};
pub use obyte_address::{encode_address, ObyteAddressValidator};
