//! Bridge Transfer Service
//!
//! Transfer lifecycle orchestration: pair catalog, amount estimation,
//! recipient validation, submission and status tracking.

pub mod estimator;
pub mod pair_catalog;
pub mod recipient;
pub mod session;
pub mod submitter;
pub mod tracker;

pub use estimator::{
	accepts_keystroke, parse_amount, AmountEstimator, EstimateOutcome, QuoteInput,
	QuoteSupervisor, QuoteTicket,
};
pub use pair_catalog::{PairCatalog, PairReconciliation};
pub use recipient::{recipient_from_query, RecipientValidator, RECIPIENT_QUERY_PARAM};
pub use session::{SessionError, SessionEvent, TransferSession};
pub use submitter::{wait_for_confirmation, ConfirmationFuture, Submission, TransferSubmitter};
pub use tracker::TransferTracker;
