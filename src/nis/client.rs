//! reqwest-backed NIS client.
//!
//! No retries. A timeout is only applied when one is configured.

use std::time::Duration;

use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::network::NodeEndpoint;
use crate::nis::api::NisApi;
use crate::nis::error::RemoteError;
use crate::nis::models::{
    AccountInfo, BlockInfo, ChainHeightDto, DataEnvelope, MosaicDefinition,
    MosaicDefinitionMetaDataPair, MosaicDto, NisErrorDto, TransactionMetaDataPair,
};
use crate::types::{Direction, MosaicAmount, TransactionRecord};

pub struct NisClient {
    http_client: HttpClient,
    base_url: String,
}

impl NisClient {
    pub fn new(endpoint: &NodeEndpoint, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        Self::with_base_url(endpoint.base_url(), timeout)
    }

    /// Client for an arbitrary base URL (used against mock servers).
    pub fn with_base_url(base_url: String, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let mut builder = HttpClient::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| RemoteError::Request(format!("cannot build http client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends an arbitrary request and returns the JSON body, whatever its shape.
    pub async fn raw_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, RemoteError> {
        let url = self.url(path);
        log::debug!("[NIS] {} {}", method, url);

        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("{}: {}", url, e)))?;

        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let url = self.url(path);
        log::debug!("[NIS] GET {} {:?}", url, query);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("{}: {}", url, e)))?;

        Self::decode(response).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, RemoteError> {
        let url = self.url(path);
        log::debug!("[NIS] POST {} {}", url, body);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("{}: {}", url, e)))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Request(format!("reading body: {}", e)))?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn status_error(status: StatusCode, body: &str) -> RemoteError {
        let message = match serde_json::from_str::<NisErrorDto>(body) {
            Ok(err) if !err.message.is_empty() => format!("{} - {}", err.error, err.message),
            _ => body.to_string(),
        };

        log::warn!("[NIS] error {}: {}", status.as_u16(), message);
        RemoteError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

impl NisApi for NisClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        direction: Direction,
        cursor: Option<u64>,
    ) -> Result<Vec<TransactionRecord>, RemoteError> {
        let mut query = vec![("address", address.to_string())];
        if let Some(id) = cursor {
            query.push(("id", id.to_string()));
        }

        let page: DataEnvelope<TransactionMetaDataPair> = self.get(direction.path(), &query).await?;
        Ok(page.data.into_iter().map(TransactionRecord::from).collect())
    }

    async fn fetch_owned_mosaics(&self, address: &str) -> Result<Vec<MosaicAmount>, RemoteError> {
        let owned: DataEnvelope<MosaicDto> = self
            .get("/account/mosaic/owned", &[("address", address.to_string())])
            .await?;
        Ok(owned.data.into_iter().map(MosaicAmount::from).collect())
    }

    async fn fetch_mosaic_definitions(
        &self,
        namespace: &str,
    ) -> Result<Vec<MosaicDefinition>, RemoteError> {
        let defs: DataEnvelope<MosaicDefinitionMetaDataPair> = self
            .get(
                "/namespace/mosaic/definition/page",
                &[("namespace", namespace.to_string())],
            )
            .await?;
        Ok(defs.data.into_iter().map(MosaicDefinition::from).collect())
    }

    async fn fetch_account(&self, address: &str) -> Result<AccountInfo, RemoteError> {
        self.get("/account/get", &[("address", address.to_string())])
            .await
    }

    async fn chain_height(&self) -> Result<u64, RemoteError> {
        let h: ChainHeightDto = self.get("/chain/height", &[]).await?;
        Ok(h.height)
    }

    async fn block_at(&self, height: u64) -> Result<BlockInfo, RemoteError> {
        self.post("/block/at/public", &json!({ "height": height })).await
    }
}
