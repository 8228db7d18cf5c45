//! # KOBIS Data Source Client
//!
//! ## Purpose
//! Authenticated HTTP access to the KOBIS open API: the daily box-office
//! ranking endpoint and the per-movie detail endpoint, with error
//! classification into transport failures vs contract violations.
//!
//! ## Input/Output Specification
//! - **Input**: Access key, 8-digit target date, movie codes
//! - **Output**: A [`Dataset`] of ranked entries, or a [`MovieDetail`]
//! - **Errors**: `Network` for transport/status failures, `MalformedResponse`
//!   for unexpected payload shapes
//!
//! ## Key Features
//! - Stateless client: credentials at construction, no hidden response state
//! - KOBIS numeric fields arrive as JSON strings and are parsed per entry;
//!   one bad entry is skipped with a warning instead of failing the load
//! - A day with zero entries is a successful, empty dataset
//! - No automatic retry; failures are surfaced to the caller

use crate::errors::{BoxOfficeError, Result};
use crate::{Dataset, DateKey, MovieDetail, MovieEntry};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout when none is injected.
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Actor names carried on a detail record are capped at this many entries.
const MAX_ACTORS: usize = 5;

/// Trait for daily box-office data sources.
///
/// The query engine is generic over this seam so tests can substitute an
/// in-memory source for the live KOBIS client.
#[async_trait]
pub trait BoxOfficeSource {
    /// Fetch the ranked list for one day. Zero entries is a success.
    async fn fetch_ranking(&self, date: &DateKey) -> Result<Dataset>;

    /// Fetch extended metadata for one movie code. Returns `Ok(None)` when
    /// the endpoint answers cleanly but carries no info block for the code.
    async fn fetch_detail(&self, movie_cd: &str) -> Result<Option<MovieDetail>>;
}

/// HTTP client for the KOBIS open API
pub struct KobisClient {
    base_url: String,
    api_key: String,
    client: Client,
}

// ---------------------------------------------------------------------------
// Wire types. KOBIS delivers every numeric field as a JSON string, so the
// raw structs are all-String and conversion happens in a second step.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RankingResponse {
    #[serde(rename = "boxOfficeResult")]
    box_office_result: RankingResult,
}

#[derive(Debug, Deserialize)]
struct RankingResult {
    #[serde(rename = "dailyBoxOfficeList", default)]
    daily_box_office_list: Vec<RawRankingEntry>,
}

#[derive(Debug, Deserialize)]
struct RawRankingEntry {
    rank: String,
    #[serde(rename = "movieCd")]
    movie_cd: String,
    #[serde(rename = "movieNm")]
    movie_nm: String,
    #[serde(rename = "salesAmt")]
    sales_amt: String,
    #[serde(rename = "salesAcc")]
    sales_acc: String,
    #[serde(rename = "scrnCnt")]
    scrn_cnt: String,
    #[serde(rename = "showCnt")]
    show_cnt: String,
    #[serde(rename = "audiCnt")]
    audi_cnt: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(rename = "movieInfoResult")]
    movie_info_result: DetailResult,
}

#[derive(Debug, Deserialize)]
struct DetailResult {
    #[serde(rename = "movieInfo")]
    movie_info: Option<RawMovieInfo>,
}

#[derive(Debug, Deserialize)]
struct RawMovieInfo {
    #[serde(rename = "movieNm")]
    movie_nm: String,
    #[serde(rename = "showTm", default)]
    show_tm: String,
    #[serde(rename = "openDt", default)]
    open_dt: String,
    #[serde(default)]
    directors: Vec<RawPerson>,
    #[serde(default)]
    actors: Vec<RawPerson>,
}

#[derive(Debug, Deserialize)]
struct RawPerson {
    #[serde(rename = "peopleNm")]
    people_nm: String,
}

impl KobisClient {
    /// Create a new client. `timeout` overrides the transport default, which
    /// exists mainly so tests can fail fast against a stalled endpoint.
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Self::with_base_url(
            "http://www.kobis.or.kr/kobisopenapi/webservice/rest",
            api_key,
            timeout,
        )
    }

    /// Create a client against a non-default base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(BoxOfficeError::Config {
                message: "KOBIS API key must not be empty".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .user_agent("boxoffice-explorer/0.1")
            .build()
            .map_err(|e| BoxOfficeError::Network {
                details: e.to_string(),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        source: &str,
    ) -> Result<T> {
        debug!(url, source, "sending KOBIS request");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| BoxOfficeError::Network {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BoxOfficeError::Network {
                details: format!("HTTP {}: {}", status, crate::text_processing::truncate(&body, 200)),
            });
        }

        // Read the body once so a shape mismatch can be reported with context
        let body = response.text().await.map_err(|e| BoxOfficeError::Network {
            details: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| BoxOfficeError::MalformedResponse {
            origin: source.to_string(),
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl BoxOfficeSource for KobisClient {
    async fn fetch_ranking(&self, date: &DateKey) -> Result<Dataset> {
        let url = format!("{}/boxoffice/searchDailyBoxOfficeList.json", self.base_url);
        let response: RankingResponse = self
            .get_json(
                &url,
                &[("key", self.api_key.as_str()), ("targetDt", date.as_str())],
                "ranking",
            )
            .await?;

        let raw_entries = response.box_office_result.daily_box_office_list;
        let mut entries = Vec::with_capacity(raw_entries.len());
        for raw in raw_entries {
            match convert_entry(raw) {
                Ok(entry) => entries.push(entry),
                // One bad row does not abort the day's load
                Err(e) => warn!(error = %e, "skipping unparsable ranking entry"),
            }
        }

        debug!(date = %date, entries = entries.len(), "fetched daily ranking");
        Ok(Dataset {
            date: date.clone(),
            entries,
        })
    }

    async fn fetch_detail(&self, movie_cd: &str) -> Result<Option<MovieDetail>> {
        let url = format!("{}/movie/searchMovieInfo.json", self.base_url);
        let response: DetailResponse = self
            .get_json(
                &url,
                &[("key", self.api_key.as_str()), ("movieCd", movie_cd)],
                "detail",
            )
            .await?;

        Ok(response.movie_info_result.movie_info.map(convert_detail))
    }
}

/// Parse one string-typed numeric field, classifying failure as a contract
/// violation on that field.
fn parse_field(value: &str, field: &'static str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| BoxOfficeError::MalformedResponse {
            origin: format!("ranking.{}", field),
            details: format!("'{}': {}", value, e),
        })
}

fn convert_entry(raw: RawRankingEntry) -> Result<MovieEntry> {
    Ok(MovieEntry {
        rank: parse_field(&raw.rank, "rank")? as u32,
        movie_cd: raw.movie_cd,
        title: raw.movie_nm.trim().to_string(),
        daily_gross: parse_field(&raw.sales_amt, "salesAmt")?,
        cumulative_gross: parse_field(&raw.sales_acc, "salesAcc")?,
        screen_count: parse_field(&raw.scrn_cnt, "scrnCnt")?,
        show_count: parse_field(&raw.show_cnt, "showCnt")?,
        daily_audience: parse_field(&raw.audi_cnt, "audiCnt")?,
    })
}

fn convert_detail(raw: RawMovieInfo) -> MovieDetail {
    // Optional fields degrade to "unknown" per field, never to an error
    let runtime_minutes = raw.show_tm.trim().parse::<u32>().ok();
    let release_date = DateKey::parse(&raw.open_dt).ok();

    MovieDetail {
        title: raw.movie_nm.trim().to_string(),
        directors: raw
            .directors
            .into_iter()
            .map(|p| p.people_nm)
            .filter(|name| !name.is_empty())
            .collect(),
        actors: raw
            .actors
            .into_iter()
            .map(|p| p.people_nm)
            .filter(|name| !name.is_empty())
            .take(MAX_ACTORS)
            .collect(),
        runtime_minutes,
        release_date,
    }
}
