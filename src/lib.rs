//! # Box-Office Query Engine
//!
//! ## Overview
//! This library implements an interactive client for the KOBIS daily
//! box-office open API: it fetches a day's ranked movie list, derives
//! ticket-sales share and formatted currency/count fields, locates titles by
//! fuzzy name match with explicit disambiguation, fetches extended movie
//! metadata, and surfaces third-party review links via a separate search API.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `client`: Authenticated HTTP access to the ranking and detail endpoints
//! - `cache`: In-memory holder for the most recently fetched day's dataset
//! - `text_processing`: Title normalization and display-text cleanup
//! - `matcher`: Substring title matching and selection validation
//! - `metrics`: Ticket-sales share computation and number formatting
//! - `engine`: Query engine façade orchestrating the above
//! - `review`: Review-link search against a Naver-style open API
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: An 8-digit target date, free-text title queries
//! - **Output**: Ranked listings, per-title metrics, extended movie detail
//! - **State**: One dataset in memory at a time; nothing persists across runs
//!
//! ## Usage
//! ```rust,no_run
//! use boxoffice_explorer::{client::KobisClient, engine::QueryEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KobisClient::new("my-api-key", None)?;
//!     let mut engine = QueryEngine::new(client);
//!     engine.select_date("20250614")?;
//!     engine.load_dataset().await?;
//!     for row in engine.ranking_view()? {
//!         println!("{}. {}", row.rank, row.title);
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod cache;
pub mod client;
pub mod config;
pub mod engine;
pub mod errors;
pub mod matcher;
pub mod metrics;
pub mod review;
pub mod text_processing;

// Re-exports for convenience
pub use config::Config;
pub use engine::QueryEngine;
pub use errors::{BoxOfficeError, Result};

use serde::{Deserialize, Serialize};

/// Calendar-day key in `YYYYMMDD` form, validated at construction.
///
/// Every date the system touches (target day, release date) travels as one of
/// these so malformed input is rejected before any network call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Parse an 8-digit day key, rejecting anything else.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != 8 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(BoxOfficeError::Validation {
                field: "date".to_string(),
                reason: format!("expected an 8-digit day key (YYYYMMDD), got '{}'", raw),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Yesterday's date, the default target when none is given.
    pub fn yesterday() -> Self {
        let day = chrono::Local::now().date_naive() - chrono::Duration::days(1);
        Self(day.format("%Y%m%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of box-office data for a single title on a single day.
///
/// Immutable once fetched. `cumulative_gross` is pass-through data: the
/// upstream source does not guarantee it is at least `daily_gross`, and this
/// library does not pretend otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEntry {
    /// 1-based position in the day's ranking
    pub rank: u32,
    /// Opaque movie code, unique within a dataset, keys the detail endpoint
    pub movie_cd: String,
    /// Display title, not necessarily unique
    pub title: String,
    /// Day's gross in KRW
    pub daily_gross: u64,
    /// Running total gross in KRW
    pub cumulative_gross: u64,
    /// Number of screens the title played on
    pub screen_count: u64,
    /// Number of showings
    pub show_count: u64,
    /// Day's admissions
    pub daily_audience: u64,
}

/// The full ranked movie list for one calendar day.
///
/// Entries are kept in rank order as delivered by the source and are never
/// re-ordered. A dataset with no entries is a valid result (a quiet day),
/// distinct from a failed fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Day this ranking belongs to
    pub date: DateKey,
    /// Entries ordered by rank ascending
    pub entries: Vec<MovieEntry>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Extended, slower-changing metadata about a title, fetched lazily per
/// movie code. Empty name lists and absent optionals mean "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub title: String,
    /// Director names in billing order; empty means unknown
    pub directors: Vec<String>,
    /// Actor names in billing order, capped at 5; empty means unknown
    pub actors: Vec<String>,
    /// Runtime in minutes; absent means unknown
    pub runtime_minutes: Option<u32>,
    /// Theatrical release date; absent means unknown
    pub release_date: Option<DateKey>,
}

/// One review link returned by the review-search API.
///
/// Text fields may carry search-engine markup (`<b>`, HTML entities); callers
/// strip it with [`text_processing::strip_markup`] before display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub author: String,
    pub date: String,
}
