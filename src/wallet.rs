//! Custodial wallet vendor client
//!
//! Thin pass-through: every call returns the vendor's JSON unchanged.

use reqwest::{Client, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{resolve_api_key, WalletConfig};
use crate::error::{Result, SentinelError};
use crate::llm::{deadline, truncate_response, MAX_ERROR_BODY};

pub struct WalletClient {
    client: Client,
    config: WalletConfig,
    base: Url,
    api_key: Option<String>,
}

impl WalletClient {
    pub fn new(client: Client, config: WalletConfig) -> Result<Self> {
        let base = Url::parse(&config.endpoint)
            .map_err(|e| SentinelError::Config(format!("wallet.endpoint: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(SentinelError::Config(format!(
                "wallet.endpoint is not a base URL: {}",
                config.endpoint
            )));
        }

        let api_key = resolve_api_key(&config.api_key);
        Ok(Self {
            client,
            config,
            base,
            api_key,
        })
    }

    /// Create a smart wallet linked to an email address
    pub async fn create_wallet(&self, email: &str) -> Result<Value> {
        let body = json!({
            "type": "evm-smart-wallet",
            "config": {
                "adminSigner": { "type": "evm-fireblocks-custodial" }
            },
            "linkedUser": format!("email:{}", email),
        });

        let url = self.url(&["wallets"])?;
        self.send(self.client.post(url).json(&body)).await
    }

    /// Submit a call against the configured contract from `wallet_locator`
    pub async fn create_transaction(&self, wallet_locator: &str, data: &str) -> Result<Value> {
        let body = json!({
            "params": {
                "calls": [{
                    "data": data,
                    "value": "0",
                    "to": self.config.contract_address,
                }],
                "chain": self.config.chain,
            }
        });

        let url = self.url(&["wallets", wallet_locator, "transactions"])?;
        self.send(self.client.post(url).json(&body)).await
    }

    pub async fn transaction(&self, wallet_locator: &str, transaction_id: &str) -> Result<Value> {
        let url = self.url(&["wallets", wallet_locator, "transactions", transaction_id])?;
        self.send(self.client.get(url)).await
    }

    /// First page of NFTs held by a wallet on the configured chain
    pub async fn nfts(&self, wallet_address: &str) -> Result<Value> {
        let locator = format!("{}:{}", self.config.chain, wallet_address);
        let url = self.url(&["wallets", &locator, "nfts"])?;
        let request = self
            .client
            .get(url)
            .query(&[("page", "1"), ("perPage", "5")]);
        self.send(request).await
    }

    /// Append `segments` below the configured endpoint. Each segment is
    /// percent-encoded, so caller input never adds path levels.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.trim().is_empty() || matches!(**s, "." | ".."))
        {
            return Err(SentinelError::InvalidRequest(format!(
                "invalid wallet path segment: {:?}",
                bad
            )));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SentinelError::Config("wallet.endpoint is not a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SentinelError::MissingApiKey("wallet".to_string()))?;

        deadline(self.config.timeout(), self.dispatch(request, api_key)).await
    }

    async fn dispatch(&self, request: RequestBuilder, api_key: &str) -> Result<Value> {
        let response = request.header("X-API-KEY", api_key).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "wallet vendor replied");

        if !status.is_success() {
            return Err(SentinelError::Upstream {
                status: status.as_u16(),
                message: truncate_response(&text, MAX_ERROR_BODY).to_string(),
            });
        }

        serde_json::from_str(&text).map_err(|_| SentinelError::malformed(status.as_u16(), "not JSON"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::spawn_upstream;
    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn wallet_config(endpoint: String) -> WalletConfig {
        WalletConfig {
            endpoint,
            api_key: "wallet-key".to_string(),
            ..WalletConfig::default()
        }
    }

    #[tokio::test]
    async fn test_create_wallet_payload() {
        let router = Router::new().route(
            "/wallets",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({ "key": key, "body": body }))
            }),
        );
        let client =
            WalletClient::new(Client::new(), wallet_config(spawn_upstream(router).await)).unwrap();

        let reply = client.create_wallet("user@example.com").await.unwrap();
        assert_eq!(reply["key"], "wallet-key");
        assert_eq!(reply["body"]["linkedUser"], "email:user@example.com");
        assert_eq!(reply["body"]["type"], "evm-smart-wallet");
        assert_eq!(
            reply["body"]["config"]["adminSigner"]["type"],
            "evm-fireblocks-custodial"
        );
    }

    #[tokio::test]
    async fn test_create_transaction_targets_contract() {
        let router = Router::new().route(
            "/wallets/:locator/transactions",
            post(|Path(locator): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({ "locator": locator, "body": body }))
            }),
        );
        let client =
            WalletClient::new(Client::new(), wallet_config(spawn_upstream(router).await)).unwrap();

        let reply = client.create_transaction("0xwallet", "0xdeadbeef").await.unwrap();
        assert_eq!(reply["locator"], "0xwallet");
        let call = &reply["body"]["params"]["calls"][0];
        assert_eq!(call["data"], "0xdeadbeef");
        assert_eq!(call["value"], "0");
        assert_eq!(call["to"], "0x5c030a01e9d2c4bb78212d06f88b7724b494b755");
        assert_eq!(reply["body"]["params"]["chain"], "polygon-amoy");
    }

    #[tokio::test]
    async fn test_nfts_uses_chain_prefix_and_paging() {
        let router = Router::new().route(
            "/wallets/:locator/nfts",
            get(
                |Path(locator): Path<String>, Query(params): Query<HashMap<String, String>>| async move {
                    Json(json!({ "locator": locator, "params": params }))
                },
            ),
        );
        let client =
            WalletClient::new(Client::new(), wallet_config(spawn_upstream(router).await)).unwrap();

        let reply = client.nfts("0xwallet").await.unwrap();
        assert_eq!(reply["locator"], "polygon-amoy:0xwallet");
        assert_eq!(reply["params"]["page"], "1");
        assert_eq!(reply["params"]["perPage"], "5");
    }

    #[tokio::test]
    async fn test_vendor_error_status() {
        let router = Router::new().route(
            "/wallets/:locator/transactions/:id",
            get(|| async { (StatusCode::NOT_FOUND, "no such transaction") }),
        );
        let client =
            WalletClient::new(Client::new(), wallet_config(spawn_upstream(router).await)).unwrap();

        let err = client.transaction("0xwallet", "tx-1").await.unwrap_err();
        assert!(matches!(err, SentinelError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let config = WalletConfig {
            api_key: String::new(),
            ..WalletConfig::default()
        };
        let client = WalletClient::new(Client::new(), config).unwrap();

        let err = client.create_wallet("a@b.c").await.unwrap_err();
        assert!(matches!(err, SentinelError::MissingApiKey(_)));
    }

    #[tokio::test]
    async fn test_locator_cannot_leave_wallets_prefix() {
        let router = Router::new()
            .route(
                "/api/2022-06-09/wallets/:locator/transactions/:id",
                get(|Path((locator, id)): Path<(String, String)>| async move {
                    Json(json!({ "locator": locator, "id": id }))
                }),
            )
            .route(
                "/api/admin/secrets/transactions/:id",
                get(|| async { Json(json!({ "hit": "escaped" })) }),
            );
        let base = spawn_upstream(router).await;
        let client =
            WalletClient::new(Client::new(), wallet_config(format!("{}/api/2022-06-09", base)))
                .unwrap();

        let reply = client.transaction("../../admin/secrets", "tx-1").await.unwrap();
        assert_eq!(reply, json!({ "locator": "../../admin/secrets", "id": "tx-1" }));

        let reply = client.transaction("0xwallet", "a/b?c").await.unwrap();
        assert_eq!(reply, json!({ "locator": "0xwallet", "id": "a/b?c" }));
    }

    #[tokio::test]
    async fn test_dot_segments_rejected() {
        let client =
            WalletClient::new(Client::new(), wallet_config("http://127.0.0.1:9/api".to_string()))
                .unwrap();

        for locator in ["..", ".", ""] {
            let err = client.transaction(locator, "tx-1").await.unwrap_err();
            assert!(
                matches!(err, SentinelError::InvalidRequest(_)),
                "locator {locator:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_url_keeps_endpoint_prefix() {
        let client = WalletClient::new(
            Client::new(),
            wallet_config("https://vendor.example/api/2022-06-09/".to_string()),
        )
        .unwrap();

        let url = client.url(&["wallets", "a/../b", "nfts"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://vendor.example/api/2022-06-09/wallets/a%2F..%2Fb/nfts"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = WalletClient::new(Client::new(), wallet_config("not a url".to_string()));
        assert!(matches!(result, Err(SentinelError::Config(_))));
    }

    #[tokio::test]
    async fn test_hung_vendor_times_out() {
        let router = Router::new().route(
            "/wallets",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                Json(json!({}))
            }),
        );
        let config = WalletConfig {
            timeout_secs: 1,
            ..wallet_config(spawn_upstream(router).await)
        };
        let client = WalletClient::new(Client::new(), config).unwrap();

        let err = client.create_wallet("a@b.c").await.unwrap_err();
        assert!(matches!(err, SentinelError::Timeout));
    }
}
