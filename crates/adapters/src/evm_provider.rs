//! Source-chain provider backed by an Ethereum JSON-RPC endpoint
//!
//! Confirmation is detected by polling `eth_getTransactionReceipt` until the
//! node returns a receipt. The overall wait is bounded by the caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bt_types::{AdapterError, AdapterResult, ChainProvider, TransactionReceipt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

/// Tracing target for structured logging
const TRACING_TARGET: &str = "bridge_transfer::evm_provider";

/// Connection settings for the JSON-RPC provider
#[derive(Debug, Clone)]
pub struct JsonRpcConfig {
	pub endpoint: Url,
	/// Delay between receipt polls
	pub poll_interval: Duration,
	/// Timeout of a single HTTP request
	pub request_timeout: Duration,
}

impl JsonRpcConfig {
	pub fn new(endpoint: Url) -> Self {
		Self {
			endpoint,
			poll_interval: Duration::from_secs(4),
			request_timeout: Duration::from_secs(10),
		}
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
	code: i64,
	message: String,
}

/// [`ChainProvider`] talking to an EVM node over HTTP JSON-RPC
#[derive(Debug)]
pub struct JsonRpcChainProvider {
	config: JsonRpcConfig,
	client: Client,
	request_id: AtomicU64,
}

impl JsonRpcChainProvider {
	pub fn new(config: JsonRpcConfig) -> AdapterResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Content-Type", HeaderValue::from_static("application/json"));
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert("User-Agent", HeaderValue::from_static("bridge-transfer/0.1"));

		let client = Client::builder()
			.default_headers(headers)
			.timeout(config.request_timeout)
			.build()
			.map_err(AdapterError::HttpError)?;

		Ok(Self {
			config,
			client,
			request_id: AtomicU64::new(1),
		})
	}

	async fn call(&self, method: &str, params: Value) -> AdapterResult<Value> {
		let id = self.request_id.fetch_add(1, Ordering::Relaxed);
		let body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});

		let response = self
			.client
			.post(self.config.endpoint.clone())
			.json(&body)
			.send()
			.await
			.map_err(AdapterError::HttpError)?;

		if !response.status().is_success() {
			return Err(AdapterError::from_http_failure(response.status().as_u16()));
		}

		let text = response.text().await.map_err(AdapterError::HttpError)?;
		parse_rpc_response(&text)
	}

	/// Fetch the receipt, `None` while the transaction is still pending
	pub async fn transaction_receipt(&self, tx_id: &str) -> AdapterResult<Option<TransactionReceipt>> {
		let result = self
			.call("eth_getTransactionReceipt", json!([tx_id]))
			.await?;
		parse_receipt(tx_id, &result)
	}
}

/// Unwrap a JSON-RPC response body into its `result`
fn parse_rpc_response(text: &str) -> AdapterResult<Value> {
	let parsed: RpcResponse = serde_json::from_str(text)?;

	if let Some(error) = parsed.error {
		return Err(AdapterError::Rpc {
			code: error.code,
			message: error.message,
		});
	}

	Ok(parsed.result.unwrap_or(Value::Null))
}

fn parse_hex_u64(field: &str, value: &str) -> AdapterResult<u64> {
	let digits = value
		.strip_prefix("0x")
		.ok_or_else(|| AdapterError::InvalidResponse {
			reason: format!("{} is not 0x-prefixed: {}", field, value),
		})?;
	u64::from_str_radix(digits, 16).map_err(|e| AdapterError::InvalidResponse {
		reason: format!("{} is not a hex quantity: {}", field, e),
	})
}

/// Interpret an `eth_getTransactionReceipt` result
fn parse_receipt(tx_id: &str, result: &Value) -> AdapterResult<Option<TransactionReceipt>> {
	if result.is_null() {
		return Ok(None);
	}

	// a receipt without a block number belongs to a pending block
	let block_number = match result.get("blockNumber").and_then(Value::as_str) {
		Some(value) => parse_hex_u64("blockNumber", value)?,
		None => return Ok(None),
	};

	// pre-Byzantium receipts carry no status field; treat them as successful
	let success = match result.get("status").and_then(Value::as_str) {
		Some(value) => parse_hex_u64("status", value)? == 1,
		None => true,
	};

	Ok(Some(TransactionReceipt {
		tx_id: tx_id.to_string(),
		block_number: Some(block_number),
		success,
	}))
}

#[async_trait]
impl ChainProvider for JsonRpcChainProvider {
	async fn wait_for_transaction(&self, tx_id: &str) -> AdapterResult<TransactionReceipt> {
		let mut attempt: u32 = 0;
		loop {
			match self.transaction_receipt(tx_id).await {
				Ok(Some(receipt)) => {
					tracing::debug!(
						target: TRACING_TARGET,
						tx_id = %tx_id,
						block_number = ?receipt.block_number,
						success = receipt.success,
						"Transaction mined"
					);
					return Ok(receipt);
				},
				Ok(None) => {
					tracing::trace!(
						target: TRACING_TARGET,
						tx_id = %tx_id,
						attempt = attempt,
						"Transaction still pending"
					);
				},
				// transport hiccups are retried; node-level errors are not
				Err(e) if e.is_transient() => {
					tracing::warn!(
						target: TRACING_TARGET,
						tx_id = %tx_id,
						attempt = attempt,
						error = %e,
						"Receipt poll failed, retrying"
					);
				},
				Err(e) => return Err(e),
			}

			attempt = attempt.saturating_add(1);
			tokio::time::sleep(self.config.poll_interval).await;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const TX: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

	#[test]
	fn test_pending_transaction_has_no_receipt() {
		assert_eq!(parse_receipt(TX, &Value::Null).unwrap(), None);
		let pending = json!({ "transactionHash": TX, "blockNumber": null });
		assert_eq!(parse_receipt(TX, &pending).unwrap(), None);
	}

	#[test]
	fn test_successful_receipt() {
		let receipt = json!({
			"transactionHash": TX,
			"blockNumber": "0x10d4f",
			"status": "0x1"
		});
		assert_eq!(
			parse_receipt(TX, &receipt).unwrap(),
			Some(TransactionReceipt::mined(TX, 0x10d4f))
		);
	}

	#[test]
	fn test_reverted_receipt() {
		let receipt = json!({ "blockNumber": "0x2a", "status": "0x0" });
		assert_eq!(
			parse_receipt(TX, &receipt).unwrap(),
			Some(TransactionReceipt::reverted(TX, 42))
		);
	}

	#[test]
	fn test_rpc_response_body() {
		let body = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
		assert_eq!(parse_rpc_response(body).unwrap(), Value::Null);

		let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"header not found"}}"#;
		assert!(matches!(
			parse_rpc_response(body),
			Err(AdapterError::Rpc { code: -32000, .. })
		));

		assert!(matches!(
			parse_rpc_response("<html>Bad Gateway</html>"),
			Err(AdapterError::Serialization(_))
		));
	}

	#[test]
	fn test_malformed_block_number() {
		let receipt = json!({ "blockNumber": "42", "status": "0x1" });
		assert!(matches!(
			parse_receipt(TX, &receipt),
			Err(AdapterError::InvalidResponse { .. })
		));
	}

	#[test]
	fn test_provider_construction() {
		let config = JsonRpcConfig::new(Url::parse("http://127.0.0.1:8545").unwrap())
			.with_poll_interval(Duration::from_millis(250));
		let provider = JsonRpcChainProvider::new(config).unwrap();
		assert_eq!(provider.config.poll_interval, Duration::from_millis(250));
	}
}
