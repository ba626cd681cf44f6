//! Error types for collaborator operations

use thiserror::Error;

/// Failures reported by the bridge SDK, the chain provider or their transports
///
/// The first four variants are the bridge's own expected failure kinds; the
/// service layer classifies them exhaustively and treats everything else as
/// unexpected. Transport variants are produced by the JSON-RPC provider.
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("{message}")]
	AmountTooLarge { message: String },

	#[error("{message}")]
	NoBridge { message: String },

	#[error("{message}")]
	NoOswapPool { message: String },

	#[error("Wallet not found")]
	NoWallet,

	#[error("HTTP request failed: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("JSON-RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	#[error("Bridge SDK error: {0}")]
	Sdk(String),

	#[error("Connection error: {0}")]
	Connection(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			AdapterError::HttpError(reqwest_error) => {
				reqwest_error.status().map(|status| status.as_u16())
			},
			_ => None,
		}
	}

	/// Create an HTTP failure error from response status with default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatusError {
			status_code,
			reason,
		}
	}

	/// Whether retrying the same request may succeed
	///
	/// Transport failures without a status (connect, read timeout), rate
	/// limiting and server-side errors are transient; anything the node
	/// answered deliberately is not.
	pub fn is_transient(&self) -> bool {
		match self {
			AdapterError::HttpError(_) | AdapterError::HttpStatusError { .. } => {
				match self.status_code() {
					Some(status) => status == 429 || status >= 500,
					None => true,
				}
			},
			_ => false,
		}
	}
}
