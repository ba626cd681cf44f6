//! Destination-chain recipient validation

use std::sync::Arc;

use bt_types::{AddressValidator, RecipientAddress};

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::recipient";

/// Query parameter that may pre-populate the recipient at startup
pub const RECIPIENT_QUERY_PARAM: &str = "recipient";

/// Tri-state validation of recipient input
///
/// Used for every keystroke and for the startup parameter alike.
#[derive(Debug, Clone)]
pub struct RecipientValidator {
	validator: Arc<dyn AddressValidator>,
}

impl RecipientValidator {
	pub fn new(validator: Arc<dyn AddressValidator>) -> Self {
		Self { validator }
	}

	/// Empty input stays unevaluated; anything else is checked against the address grammar
	pub fn validate(&self, raw: &str) -> RecipientAddress {
		let is_valid = if raw.is_empty() {
			None
		} else {
			Some(self.validator.is_valid_address(raw))
		};
		tracing::trace!(
			target: TRACING_TARGET,
			network = self.validator.network_name(),
			valid = ?is_valid,
			"Validated recipient"
		);
		RecipientAddress::new(raw, is_valid)
	}

	pub fn network_name(&self) -> &str {
		self.validator.network_name()
	}
}

/// Extract the `recipient` parameter from a URL query string
///
/// Accepts the query with or without a leading `?`. Empty values count as absent.
pub fn recipient_from_query(query: &str) -> Option<String> {
	let query = query.strip_prefix('?').unwrap_or(query);
	url::form_urlencoded::parse(query.as_bytes())
		.find(|(key, _)| key == RECIPIENT_QUERY_PARAM)
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use bt_types::MockAddressValidator;

	const VALID: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

	fn validator() -> RecipientValidator {
		let mut mock = MockAddressValidator::new();
		mock.expect_is_valid_address()
			.returning(|raw| raw == VALID);
		mock.expect_network_name().return_const("Obyte".to_string());
		RecipientValidator::new(Arc::new(mock))
	}

	#[test]
	fn test_empty_input_is_unevaluated() {
		let recipient = validator().validate("");
		assert_eq!(recipient.is_valid, None);
		assert!(!recipient.is_evaluated());
	}

	#[test]
	fn test_valid_and_malformed_input() {
		let validator = validator();
		assert_eq!(validator.validate(VALID).is_valid, Some(true));
		assert_eq!(validator.validate("nope").is_valid, Some(false));
	}

	#[test]
	fn test_validation_is_idempotent() {
		let validator = validator();
		for raw in ["", VALID, "nope"] {
			assert_eq!(validator.validate(raw), validator.validate(raw));
		}
	}

	#[test]
	fn test_recipient_from_query() {
		assert_eq!(
			recipient_from_query("?recipient=ABC&ref=x").as_deref(),
			Some("ABC")
		);
		assert_eq!(
			recipient_from_query("ref=x&recipient=A%20B").as_deref(),
			Some("A B")
		);
		assert_eq!(recipient_from_query("recipient="), None);
		assert_eq!(recipient_from_query("ref=x"), None);
		assert_eq!(recipient_from_query(""), None);
	}
}
