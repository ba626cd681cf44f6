//! Bridge Transfer Demo
//!
//! Runs one ETH → GBYTE transfer against the in-process mock bridge and
//! follows it until the claim is confirmed.

use std::sync::Arc;
use std::time::Duration;

use bridge_transfer::config::{load_config, log_service_shutdown};
use bridge_transfer::mocks::{
	demo_recipient, MockConfirmation, MockDemoBridge, MockDemoChainProvider,
};
use bridge_transfer::{EventBus, NoticeLevel, TransferAppBuilder, TransferSession};
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	dotenvy::dotenv().ok();
	let settings = load_config().unwrap_or_default();

	let events = EventBus::with_capacity(settings.events.channel_capacity);
	let bridge = Arc::new(
		MockDemoBridge::new(events.clone()).with_auto_claim(Duration::from_millis(500)),
	);

	let icon_list = settings.presentation.icon_list_url();
	let mut session = TransferAppBuilder::new()
		.with_settings(settings)
		.with_bridge(bridge)
		.with_event_source(Arc::new(events))
		.with_chain_provider(Arc::new(MockDemoChainProvider::new(MockConfirmation::Confirm(
			Duration::from_millis(300),
		))))
		.with_startup_query(format!("?recipient={}", demo_recipient()))
		.start()?;

	info!("Coin icons listed at {}", icon_list);
	session.set_amount("0.1");
	session.settle().await?;
	report_notices(&mut session);

	match session.quote().and_then(|quote| quote.estimated_output) {
		Some(output) => info!(
			"Quoted {} {} for 0.1 {}",
			output,
			session.pair().destination,
			session.pair().source
		),
		None => warn!("No quote available"),
	}

	if session.submit().await?.is_some() {
		while let Some(transfer) = session.transfer() {
			info!(
				"Transfer {} is {} (step {} of 4)",
				transfer.source_tx_id,
				transfer.status(),
				transfer.status().step_index() + 1
			);
			let done = transfer.is_final();
			if done || !session.step().await? {
				break;
			}
		}
	}
	report_notices(&mut session);

	log_service_shutdown();
	Ok(())
}

fn report_notices(session: &mut TransferSession) {
	for notice in session.take_notices() {
		match notice.level {
			NoticeLevel::Warning => warn!("{}", notice.message),
			NoticeLevel::Error => error!("{}", notice.message),
		}
	}
}
