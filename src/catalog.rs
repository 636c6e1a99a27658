//! Client for the read-only product catalog service.
//!
//! No retry, caching, or pagination. A missing product is `Ok(None)`.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::catalog("building http client", e))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let resp = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| StoreError::catalog("listing products", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::upstream_status("listing products", status.as_u16()));
        }
        resp.json::<Vec<Product>>()
            .await
            .map_err(|e| StoreError::catalog("decoding product list", e))
    }

    /// Looks up one product. 404, an empty body, or `null` all mean not found.
    pub async fn product(&self, id: u64) -> StoreResult<Option<Product>> {
        let operation = format!("fetching product {id}");
        let resp = self
            .http
            .get(format!("{}/{}", self.base_url, id))
            .send()
            .await
            .map_err(|e| StoreError::catalog(operation.clone(), e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::upstream_status(operation, status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| StoreError::catalog(operation.clone(), e))?;
        decode_product(&body)
            .map_err(|e| StoreError::upstream_body(operation, e.to_string()))
    }
}

fn decode_product(body: &[u8]) -> Result<Option<Product>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<Product>>(body)
}
