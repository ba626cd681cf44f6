//! Session fixtures wired to the in-process mock bridge

use std::sync::Arc;

use bridge_transfer::config::Settings;
use bridge_transfer::mocks::{
	demo_recipient, MockConfirmation, MockDemoBridge, MockDemoChainProvider,
};
use bridge_transfer::{EventBus, TransferAppBuilder, TransferSession};

use super::MockConfigs;

/// A session together with handles on its mock collaborators
#[allow(dead_code)]
pub struct SessionFixture {
	pub session: TransferSession,
	pub bridge: Arc<MockDemoBridge>,
	pub events: EventBus,
	pub recipient: String,
}

#[allow(dead_code)]
impl SessionFixture {
	/// Default mainnet session with instant confirmations
	pub fn new() -> Self {
		Self::with(|bridge| bridge, MockConfirmation::Confirm(std::time::Duration::ZERO))
	}

	/// Session whose bridge is customised by `configure`
	pub fn with(
		configure: impl FnOnce(MockDemoBridge) -> MockDemoBridge,
		confirmation: MockConfirmation,
	) -> Self {
		Self::with_settings(MockConfigs::test_settings(), configure, confirmation)
	}

	pub fn with_settings(
		settings: Settings,
		configure: impl FnOnce(MockDemoBridge) -> MockDemoBridge,
		confirmation: MockConfirmation,
	) -> Self {
		let events = EventBus::new();
		let bridge = Arc::new(configure(MockDemoBridge::new(events.clone())));
		let session = TransferAppBuilder::new()
			.with_settings(settings)
			.with_bridge(bridge.clone())
			.with_event_source(Arc::new(events.clone()))
			.with_chain_provider(Arc::new(MockDemoChainProvider::new(confirmation)))
			.build()
			.unwrap();

		Self {
			session,
			bridge,
			events,
			recipient: demo_recipient(),
		}
	}

	/// Fill in amount and recipient and wait for the quote
	pub async fn fill_form(&mut self, amount: &str) {
		assert!(self.session.set_amount(amount));
		self.session.set_recipient(&self.recipient);
		self.session.settle().await.unwrap();
	}

	/// Submit and return the new transfer's source transaction id
	pub async fn submit(&mut self) -> String {
		self.session
			.submit()
			.await
			.unwrap()
			.map(|transfer| transfer.source_tx_id.clone())
			.expect("transfer should be created")
	}
}
