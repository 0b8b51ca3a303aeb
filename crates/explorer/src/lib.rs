//! Block-explorer metadata client.
//!
//! Answers the two questions the chain itself cannot: in which transaction a
//! contract was created (the backfill starting point when the database is
//! empty) and what its verified ABI looks like.

use alloy::primitives::{Address, B256};
use alloy_json_abi::JsonAbi;
use eyre::{Context, Result, eyre};
use reqwest::Client as HttpClient;
use serde::Deserialize;

/// Public Etherscan API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.etherscan.io/api";

/// Explorer API envelope. `status` is `"1"` on success; anything else turns
/// into an error carrying the message.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Contract creation record.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractCreation {
    /// The created contract.
    pub contract_address: Address,
    /// The deploying account.
    pub contract_creator: Address,
    /// The deployment transaction.
    pub tx_hash: B256,
}

/// Client for an Etherscan-compatible explorer API.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl ExplorerClient {
    /// Create a new explorer client. `base_url` is injectable so tests can
    /// point it at a local server.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self { http: HttpClient::new(), base_url, api_key }
    }

    async fn call(&self, action: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let mut query: Vec<(&str, String)> = vec![
            ("module", "contract".to_owned()),
            ("action", action.to_owned()),
            ("apikey", self.api_key.clone()),
        ];
        query.extend_from_slice(params);

        let body = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse>()
            .await
            .wrap_err_with(|| format!("malformed explorer response for {action}"))?;

        if body.status != "1" {
            return Err(eyre!("explorer {action} failed: {} (status {})", body.message, body.status));
        }
        Ok(body.result)
    }

    /// The transaction hash that created `address`.
    pub async fn contract_creation(&self, address: Address) -> Result<ContractCreation> {
        let result = self
            .call("getcontractcreation", &[("contractaddresses", address.to_string())])
            .await?;
        let mut records: Vec<ContractCreation> = serde_json::from_value(result)
            .wrap_err("malformed contract creation record")?;
        records.pop().ok_or_else(|| eyre!("no creation record for {address}"))
    }

    /// The verified ABI of `address`.
    pub async fn contract_abi(&self, address: Address) -> Result<JsonAbi> {
        let result = self.call("getabi", &[("address", address.to_string())]).await?;
        // The ABI arrives as a JSON string inside the envelope.
        let raw: String = serde_json::from_value(result).wrap_err("malformed ABI result")?;
        serde_json::from_str(&raw).wrap_err_with(|| format!("unparseable ABI for {address}"))
    }
}
