//! Cosmetic name lookup.
//!
//! Replays only carry cosmetic ids ("CID_..."). When enabled, reports show
//! item names resolved through the public cosmetics API instead.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::CosmeticsConfig;

/// Errors that can occur while looking up cosmetics.
#[derive(Debug, Error)]
pub enum CosmeticsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("at least one cosmetic id is required")]
    NoIds,

    #[error("language must not be empty")]
    NoLanguage,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<CosmeticItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmeticItem {
    pub id: String,
    pub name: String,
}

/// Client for the cosmetics search API.
pub struct CosmeticsClient {
    client: Client,
    base_url: Url,
    language: String,
}

impl CosmeticsClient {
    pub fn new(config: &CosmeticsConfig) -> Result<Self, CosmeticsError> {
        if config.language.trim().is_empty() {
            return Err(CosmeticsError::NoLanguage);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("replay-report/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: normalized_base(&config.base_url)?,
            language: config.language.clone(),
        })
    }

    /// URL of the search-by-ids endpoint for the given ids.
    pub fn search_url(&self, ids: &[String]) -> Result<Url, CosmeticsError> {
        let ids: Vec<&str> = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Err(CosmeticsError::NoIds);
        }

        let mut url = self.base_url.join("cosmetics/br/search/ids")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("language", &self.language);
            for id in ids {
                query.append_pair("id", id);
            }
        }
        Ok(url)
    }

    /// Look up display names for the given cosmetic ids.
    pub async fn lookup_names(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, String>, CosmeticsError> {
        let url = self.search_url(ids)?;
        debug!("Looking up {} cosmetics", ids.len());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CosmeticsError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(names_by_id(body.data))
    }

    /// Like [`lookup_names`](Self::lookup_names) but never fails; reports fall
    /// back to raw ids.
    pub async fn lookup_names_or_empty(&self, ids: &[String]) -> HashMap<String, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.lookup_names(ids).await {
            Ok(names) => names,
            Err(e) => {
                warn!("Cosmetic lookup failed, showing raw ids: {}", e);
                HashMap::new()
            }
        }
    }
}

/// Ensure the base URL ends with '/' so `join` appends instead of replacing.
fn normalized_base(raw: &str) -> Result<Url, url::ParseError> {
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{}/", raw))
    }
}

/// API ids are case-insensitive; replays write them in mixed case.
fn names_by_id(items: Vec<CosmeticItem>) -> HashMap<String, String> {
    let mut names = HashMap::with_capacity(items.len() * 2);
    for item in items {
        names.insert(item.id.to_lowercase(), item.name.clone());
        names.insert(item.id, item.name);
    }
    names
}
