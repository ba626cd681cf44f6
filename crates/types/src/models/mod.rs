//! Shared domain models used across transfer components

pub mod asset;
pub mod network;
pub mod notice;
pub mod recipient;

pub use asset::{Asset, AssetPair};
pub use network::NetworkMode;
pub use notice::{Notice, NoticeLevel};
pub use recipient::RecipientAddress;
