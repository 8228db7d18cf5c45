//! # Review Search Client
//!
//! ## Purpose
//! Fetches third-party review links for a free-text query from a Naver-style
//! open search API. This is an external collaborator of the query engine:
//! it shares the error taxonomy but touches none of the dataset state.
//!
//! ## Input/Output Specification
//! - **Input**: Client credentials (headers), free-text query
//! - **Output**: Review items `{title, link, snippet, author, date}` as
//!   delivered by the API; text fields may contain inline markup that the
//!   presentation layer strips before display
//! - **Errors**: `Network` for transport/status failures, `MalformedResponse`
//!   for unexpected payload shapes

use crate::errors::{BoxOfficeError, Result};
use crate::ReviewItem;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

/// Client for the review-search endpoint
pub struct ReviewSearchClient {
    endpoint: String,
    max_results: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    title: String,
    link: String,
    #[serde(rename = "description", default)]
    snippet: String,
    #[serde(rename = "bloggername", default)]
    author: String,
    #[serde(rename = "postdate", default)]
    date: String,
}

impl ReviewSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        client_id: &str,
        client_secret: &str,
        max_results: usize,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CLIENT_ID_HEADER,
            HeaderValue::from_str(client_id).map_err(|e| BoxOfficeError::Config {
                message: format!("invalid review client id: {}", e),
            })?,
        );
        headers.insert(
            CLIENT_SECRET_HEADER,
            HeaderValue::from_str(client_secret).map_err(|e| BoxOfficeError::Config {
                message: format!("invalid review client secret: {}", e),
            })?,
        );

        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(30)))
            .default_headers(headers)
            .user_agent("boxoffice-explorer/0.1")
            .build()
            .map_err(|e| BoxOfficeError::Network {
                details: e.to_string(),
            })?;

        Ok(Self {
            endpoint: endpoint.into(),
            max_results,
            client,
        })
    }

    /// Search review links for a query, newest-first as the API returns them
    pub async fn search(&self, query: &str) -> Result<Vec<ReviewItem>> {
        debug!(query, "searching review links");

        let display = self.max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("display", display.as_str())])
            .send()
            .await
            .map_err(|e| BoxOfficeError::Network {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BoxOfficeError::Network {
                details: format!(
                    "HTTP {}: {}",
                    status,
                    crate::text_processing::truncate(&body, 200)
                ),
            });
        }

        let body = response.text().await.map_err(|e| BoxOfficeError::Network {
            details: e.to_string(),
        })?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| BoxOfficeError::MalformedResponse {
                origin: "review_search".to_string(),
                details: e.to_string(),
            })?;

        Ok(parsed
            .items
            .into_iter()
            .map(|item| ReviewItem {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
                author: item.author,
                date: item.date,
            })
            .collect())
    }
}
