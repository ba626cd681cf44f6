//! Static registry of bridgeable asset pairs

use std::collections::BTreeMap;

use bt_types::{Asset, AssetPair, NetworkMode};

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::pair_catalog";

const MAINNET_SOURCES: &[&str] = &["ETH", "USDC", "WBTC"];
const MAINNET_DESTINATIONS: &[&str] = &["GBYTE", "USDC", "OUSDV2", "WBTC", "OBITV2", "ETH", "OETHV2"];
const MAINNET_PAIRS: &[(&str, &[&str])] = &[
	("ETH", &["GBYTE", "OETHV2", "ETH"]),
	("USDC", &["GBYTE", "OUSDV2", "USDC"]),
	("WBTC", &["GBYTE", "OBITV2", "WBTC"]),
];

const TESTNET_SOURCES: &[&str] = &["ETH", "USDC"];
const TESTNET_DESTINATIONS: &[&str] = &["GBYTE", "USDC3", "OUSD_V2", "ETH3", "OETHV2"];
const TESTNET_PAIRS: &[(&str, &[&str])] = &[
	("ETH", &["GBYTE", "OETHV2", "ETH3"]),
	("USDC", &["OUSD_V2", "USDC3"]),
];

/// Outcome of re-checking a destination selection after the source asset changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairReconciliation {
	/// Current destination is still allowed
	Unchanged,
	/// Destination was not allowed and has been replaced by the first allowed one
	Corrected { pair: AssetPair, rejected: Asset },
	/// Source asset has no allowed destinations at all
	Unsupported,
}

/// Immutable catalog of source assets and the destinations each may settle into
///
/// Built once at startup for the configured [`NetworkMode`].
#[derive(Debug, Clone)]
pub struct PairCatalog {
	sources: Vec<Asset>,
	destinations: Vec<Asset>,
	pairs: BTreeMap<Asset, Vec<Asset>>,
}

impl PairCatalog {
	pub fn for_network(mode: NetworkMode) -> Self {
		let (sources, destinations, pairs) = match mode {
			NetworkMode::Mainnet => (MAINNET_SOURCES, MAINNET_DESTINATIONS, MAINNET_PAIRS),
			NetworkMode::Testnet => (TESTNET_SOURCES, TESTNET_DESTINATIONS, TESTNET_PAIRS),
		};
		tracing::debug!(
			target: TRACING_TARGET,
			network = %mode,
			sources = sources.len(),
			"Loaded pair catalog"
		);
		Self::new(
			sources.iter().map(|s| Asset::new(*s)).collect(),
			destinations.iter().map(|s| Asset::new(*s)).collect(),
			pairs
				.iter()
				.map(|(source, allowed)| {
					(
						Asset::new(*source),
						allowed.iter().map(|d| Asset::new(*d)).collect(),
					)
				})
				.collect(),
		)
	}

	/// Build a catalog from explicit lists
	///
	/// Pairs are restricted to the offered sources and known destinations.
	pub fn new(
		sources: Vec<Asset>,
		destinations: Vec<Asset>,
		pairs: BTreeMap<Asset, Vec<Asset>>,
	) -> Self {
		let pairs = pairs
			.into_iter()
			.filter(|(source, _)| sources.contains(source))
			.map(|(source, allowed)| {
				let allowed: Vec<Asset> = allowed
					.into_iter()
					.filter(|destination| destinations.contains(destination))
					.collect();
				(source, allowed)
			})
			.collect();
		Self {
			sources,
			destinations,
			pairs,
		}
	}

	/// Source assets offered for selection
	pub fn source_assets(&self) -> &[Asset] {
		&self.sources
	}

	/// Every destination asset known to the network
	pub fn destination_assets(&self) -> &[Asset] {
		&self.destinations
	}

	/// Destinations `source` may settle into; empty for unknown sources
	pub fn allowed_destinations(&self, source: &Asset) -> &[Asset] {
		self.pairs.get(source).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn is_allowed(&self, pair: &AssetPair) -> bool {
		self.allowed_destinations(&pair.source)
			.contains(&pair.destination)
	}

	/// First offered source with its first allowed destination
	pub fn default_pair(&self) -> Option<AssetPair> {
		self.sources.iter().find_map(|source| {
			self.allowed_destinations(source)
				.first()
				.map(|destination| AssetPair::new(source.clone(), destination.clone()))
		})
	}

	/// Whether `source` is offered on this network
	pub fn is_known_source(&self, source: &Asset) -> bool {
		self.sources.contains(source)
	}

	/// Re-check `destination` against the allowed set of `source`
	pub fn reconcile(&self, source: &Asset, destination: &Asset) -> PairReconciliation {
		let allowed = self.allowed_destinations(source);
		if allowed.contains(destination) {
			return PairReconciliation::Unchanged;
		}
		match allowed.first() {
			Some(first) => PairReconciliation::Corrected {
				pair: AssetPair::new(source.clone(), first.clone()),
				rejected: destination.clone(),
			},
			None => PairReconciliation::Unsupported,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn asset(symbol: &str) -> Asset {
		Asset::new(symbol)
	}

	#[test]
	fn test_unknown_source_has_no_destinations() {
		let catalog = PairCatalog::for_network(NetworkMode::Mainnet);
		assert!(catalog.allowed_destinations(&asset("DOGE")).is_empty());
		assert!(!catalog.is_known_source(&asset("DOGE")));
		assert_eq!(
			catalog.reconcile(&asset("DOGE"), &asset("GBYTE")),
			PairReconciliation::Unsupported
		);
	}

	#[test]
	fn test_mainnet_pairs() {
		let catalog = PairCatalog::for_network(NetworkMode::Mainnet);
		assert_eq!(
			catalog.allowed_destinations(&asset("ETH")),
			&[asset("GBYTE"), asset("OETHV2"), asset("ETH")]
		);
		assert!(catalog.is_allowed(&AssetPair::new("USDC", "OUSDV2")));
		assert!(!catalog.is_allowed(&AssetPair::new("USDC", "WBTC")));
		assert_eq!(catalog.source_assets().len(), 3);
	}

	#[test]
	fn test_testnet_pairs() {
		let catalog = PairCatalog::for_network(NetworkMode::Testnet);
		assert_eq!(
			catalog.allowed_destinations(&asset("USDC")),
			&[asset("OUSD_V2"), asset("USDC3")]
		);
		assert_eq!(catalog.source_assets(), &[asset("ETH"), asset("USDC")]);
		assert!(catalog.destination_assets().contains(&asset("ETH3")));
	}

	#[test]
	fn test_testnet_rejects_mainnet_only_assets() {
		let catalog = PairCatalog::for_network(NetworkMode::Testnet);
		assert!(!catalog.is_known_source(&asset("WBTC")));
		assert!(catalog.allowed_destinations(&asset("WBTC")).is_empty());
		assert!(!catalog.is_allowed(&AssetPair::new("WBTC", "OBITV2")));
		assert!(!catalog.is_allowed(&AssetPair::new("ETH", "OBITV2")));
	}

	#[test]
	fn test_pairs_limited_to_listed_assets() {
		let mut pairs = BTreeMap::new();
		pairs.insert(asset("ETH"), vec![asset("GBYTE"), asset("OBITV2")]);
		pairs.insert(asset("WBTC"), vec![asset("GBYTE")]);
		let catalog = PairCatalog::new(vec![asset("ETH")], vec![asset("GBYTE")], pairs);

		assert_eq!(catalog.allowed_destinations(&asset("ETH")), &[asset("GBYTE")]);
		assert!(!catalog.is_known_source(&asset("WBTC")));
		assert!(!catalog.is_allowed(&AssetPair::new("WBTC", "GBYTE")));
	}

	#[test]
	fn test_default_pair() {
		let catalog = PairCatalog::for_network(NetworkMode::Mainnet);
		assert_eq!(catalog.default_pair(), Some(AssetPair::new("ETH", "GBYTE")));
		let empty = PairCatalog::new(vec![asset("ETH")], Vec::new(), BTreeMap::new());
		assert_eq!(empty.default_pair(), None);
	}

	#[test]
	fn test_reconcile_keeps_allowed_destination() {
		let catalog = PairCatalog::for_network(NetworkMode::Mainnet);
		assert_eq!(
			catalog.reconcile(&asset("WBTC"), &asset("GBYTE")),
			PairReconciliation::Unchanged
		);
	}

	#[test]
	fn test_reconcile_corrects_to_first_allowed() {
		let catalog = PairCatalog::for_network(NetworkMode::Mainnet);
		assert_eq!(
			catalog.reconcile(&asset("USDC"), &asset("WBTC")),
			PairReconciliation::Corrected {
				pair: AssetPair::new("USDC", "GBYTE"),
				rejected: asset("WBTC"),
			}
		);
	}

	#[test]
	fn test_reconciled_destination_is_always_allowed() {
		for mode in [NetworkMode::Mainnet, NetworkMode::Testnet] {
			let catalog = PairCatalog::for_network(mode);
			for source in catalog.source_assets() {
				for destination in catalog.destination_assets() {
					let chosen = match catalog.reconcile(source, destination) {
						PairReconciliation::Unchanged => destination.clone(),
						PairReconciliation::Corrected { pair, .. } => pair.destination,
						PairReconciliation::Unsupported => panic!("source {} has no pairs", source),
					};
					assert!(catalog.allowed_destinations(source).contains(&chosen));
				}
			}
		}
	}
}
