//! Centralized mocks and fixtures for testing
//!
//! Reusable settings and session fixtures to reduce duplication across test
//! files.

pub mod configs;
pub mod fixtures;

#[allow(unused_imports)]
pub use configs::MockConfigs;
#[allow(unused_imports)]
pub use fixtures::SessionFixture;
