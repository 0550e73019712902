//! HTTP client for the Radix Babylon Gateway API
//!
//! Implements only the endpoints the redemption calculator reads.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::decode::decode_programmatic_json;
use super::wire::*;
use crate::config::GatewayConfig;
use crate::core::{
    EntityDetails, KeyPage, LedgerError, LedgerQuery, LedgerResult, NonFungibleItem, StoreEntry,
    StoreKey,
};

const APP_NAME_HEADER: &str = "rdx-app-name";

/// Gateway-backed [`LedgerQuery`]
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    http: Client,
    request_timeout: Duration,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> LedgerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let app_name = HeaderValue::from_str(&config.application_name)
            .map_err(|e| LedgerError::Transport(format!("Invalid application name: {}", e)))?;
        headers.insert(APP_NAME_HEADER, app_name);

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LedgerError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            http,
            request_timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> LedgerResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("Gateway call: {}", path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_response(status, &body);
            debug!("Gateway call {} failed: {}", path, err);
            return Err(err);
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| LedgerError::Malformed(format!("{} response: {}", path, e)))
    }

    fn transport_error(&self, err: reqwest::Error) -> LedgerError {
        if err.is_timeout() {
            LedgerError::Timeout(self.request_timeout)
        } else {
            LedgerError::Transport(err.to_string())
        }
    }
}

/// Map a non-2xx gateway response onto [`LedgerError`]
pub fn classify_response(status: StatusCode, body: &str) -> LedgerError {
    let parsed: Option<ErrorResponse> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));
    let error_type = parsed
        .as_ref()
        .and_then(|e| e.details.as_ref())
        .map(|d| d.error_type.as_str())
        .unwrap_or("");

    let mentions_state = {
        let lower = message.to_lowercase();
        lower.contains("state version") || lower.contains("ledger state")
    };

    if error_type.contains("NotFound") {
        LedgerError::NotFound(message)
    } else if mentions_state && (status.is_client_error() || !error_type.is_empty()) {
        LedgerError::StateVersionOutOfRange(message)
    } else if error_type == "InvalidRequestError"
        || error_type == "InvalidEntityError"
        || status == StatusCode::BAD_REQUEST
    {
        LedgerError::InvalidRequest(message)
    } else if status == StatusCode::NOT_FOUND {
        LedgerError::NotFound(message)
    } else {
        LedgerError::Transport(format!("HTTP {}: {}", status, message))
    }
}

#[async_trait]
impl LedgerQuery for GatewayClient {
    async fn current_state_version(&self) -> LedgerResult<u64> {
        let status: GatewayStatusResponse = self
            .post("status/gateway-status", &serde_json::json!({}))
            .await?;
        Ok(status.ledger_state.state_version)
    }

    async fn entity_details(
        &self,
        address: &str,
        state_version: Option<u64>,
    ) -> LedgerResult<Option<EntityDetails>> {
        let request = EntityDetailsRequest {
            addresses: vec![address],
            aggregation_level: "Vault",
            at_ledger_state: LedgerStateSelector::pinned(state_version),
        };
        let response: EntityDetailsResponse = self.post("state/entity/details", &request).await?;

        let Some(item) = response.items.into_iter().next() else {
            warn!("No entity details returned for {}", address);
            return Ok(None);
        };
        let Some(details) = item.details else {
            return Ok(None);
        };

        let state = match details.state {
            Some(state) if state.get("kind").is_some() => Some(decode_programmatic_json(&state)?),
            _ => None,
        };

        Ok(Some(EntityDetails {
            address: item.address,
            entity_type: details.entity_type,
            blueprint_name: details.blueprint_name,
            state,
        }))
    }

    async fn list_store_keys(
        &self,
        store_address: &str,
        state_version: Option<u64>,
        cursor: Option<&str>,
        page_size: usize,
    ) -> LedgerResult<KeyPage> {
        let request = KeyValueStoreKeysRequest {
            key_value_store_address: store_address,
            at_ledger_state: LedgerStateSelector::pinned(state_version),
            cursor,
            limit_per_page: page_size,
        };
        let response: KeyValueStoreKeysResponse =
            self.post("state/key-value-store/keys", &request).await?;

        let items = response
            .items
            .into_iter()
            .map(|item| {
                Ok(StoreKey {
                    decoded: decode_programmatic_json(&item.key.programmatic_json)?,
                    raw_hex: item.key.raw_hex,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(KeyPage {
            items,
            next_cursor: response.next_cursor,
        })
    }

    async fn store_values(
        &self,
        store_address: &str,
        keys: &[StoreKey],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<StoreEntry>> {
        let request = KeyValueStoreDataRequest {
            key_value_store_address: store_address,
            keys: keys
                .iter()
                .map(|key| KeyHex {
                    key_hex: &key.raw_hex,
                })
                .collect(),
            at_ledger_state: LedgerStateSelector::pinned(state_version),
        };
        let response: KeyValueStoreDataResponse =
            self.post("state/key-value-store/data", &request).await?;

        response
            .entries
            .iter()
            .map(|entry| {
                Ok(StoreEntry {
                    key: decode_programmatic_json(&entry.key.programmatic_json)?,
                    value: decode_programmatic_json(&entry.value.programmatic_json)?,
                })
            })
            .collect()
    }

    async fn non_fungible_data(
        &self,
        resource_address: &str,
        ids: &[String],
        state_version: Option<u64>,
    ) -> LedgerResult<Vec<NonFungibleItem>> {
        let request = NonFungibleDataRequest {
            resource_address,
            non_fungible_ids: ids,
            at_ledger_state: LedgerStateSelector::pinned(state_version),
        };
        let response: NonFungibleDataResponse =
            self.post("state/non-fungible/data", &request).await?;

        response
            .non_fungible_ids
            .into_iter()
            .map(|item| {
                let data = item
                    .data
                    .as_ref()
                    .map(|data| decode_programmatic_json(&data.programmatic_json))
                    .transpose()?;
                Ok(NonFungibleItem {
                    id: item.non_fungible_id,
                    is_burned: item.is_burned,
                    data,
                })
            })
            .collect()
    }
}
