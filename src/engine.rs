//! # Query Engine Module
//!
//! ## Purpose
//! Façade over the data-source client, dataset cache, matcher, and metrics
//! calculator. Owns the session state machine: a date must be selected and
//! its dataset loaded before any query runs.
//!
//! ## Input/Output Specification
//! - **Input**: Date keys, free-text title queries, candidate selections
//! - **Output**: Ranking views, formatted metrics, extended detail, review
//!   links
//! - **States**: NoDate → DateSelected (unloaded) → Loaded; selecting a new
//!   date resets the machine and discards the cached dataset
//!
//! ## Key Features
//! - Ambiguous matches are surfaced whole; the engine never silently picks
//!   one. The interactive retry loop lives in the presentation layer, the
//!   engine only validates one selection at a time.
//! - "Not found" and "no data for this date" are modeled as outcome variants
//!   so callers branch rather than catch.
//! - Fetch failures leave the state machine where it was; the caller decides
//!   whether to retry or change the date. Nothing is retried automatically.

use crate::cache::DatasetCache;
use crate::client::BoxOfficeSource;
use crate::errors::{BoxOfficeError, Result};
use crate::matcher;
use crate::metrics::{self, MovieMetrics};
use crate::review::ReviewSearchClient;
use crate::{Dataset, DateKey, MovieDetail, MovieEntry, ReviewItem};
use serde::Serialize;
use tracing::{debug, info};

/// Session state of the engine
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    /// No target date selected yet
    NoDate,
    /// A date is selected; the dataset may or may not be loaded for it
    DateSelected(DateKey),
}

/// Result of loading a dataset for the selected date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The day's ranking was fetched and holds this many entries
    Loaded(usize),
    /// The fetch succeeded but the day has no data. The engine stays usable:
    /// ranking queries return empty results, or a new date can be selected.
    Empty,
}

/// One row of the top-list view: rank and title only
#[derive(Debug, Clone, Serialize)]
pub struct RankedTitle {
    pub rank: u32,
    pub title: String,
}

/// A matched entry offered to the caller for disambiguation
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub rank: u32,
    pub title: String,
    pub movie_cd: String,
}

/// Outcome of a title-keyed lookup
#[derive(Debug, Clone)]
pub enum TitleLookup<T> {
    /// No entry's title contains the query
    NotFound,
    /// Several entries match; the caller must pick one (in rank order) and
    /// resolve it via [`QueryEngine::select_candidate`]
    Ambiguous(Vec<Candidate>),
    /// Exactly one entry matched
    Found(T),
}

/// Outcome of a detail fetch for a matched title
#[derive(Debug, Clone)]
pub enum DetailOutcome {
    /// Extended metadata was available
    Found(MovieDetail),
    /// The title matched but the detail endpoint has no info block for its
    /// code. Distinct from the title not matching at all.
    Unavailable,
}

/// Query engine façade, generic over the data source so tests can run
/// against an in-memory fake.
pub struct QueryEngine<S: BoxOfficeSource> {
    source: S,
    review_client: Option<ReviewSearchClient>,
    cache: DatasetCache,
    state: SessionState,
}

impl<S: BoxOfficeSource> QueryEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            review_client: None,
            cache: DatasetCache::new(),
            state: SessionState::NoDate,
        }
    }

    /// Attach a review-search client so [`QueryEngine::search_reviews`] works
    pub fn with_review_client(mut self, client: ReviewSearchClient) -> Self {
        self.review_client = Some(client);
        self
    }

    /// Borrow the underlying data source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Select the target date. The key must be exactly 8 digits; an invalid
    /// key is rejected before any network activity and leaves the current
    /// state untouched. A valid key resets the session: any cached dataset
    /// is discarded and must be loaded again.
    pub fn select_date(&mut self, raw: &str) -> Result<DateKey> {
        let date = DateKey::parse(raw)?;
        debug!(date = %date, "date selected, session reset");
        self.cache.clear();
        self.state = SessionState::DateSelected(date.clone());
        Ok(date)
    }

    /// The currently selected date, if any
    pub fn selected_date(&self) -> Option<&DateKey> {
        match &self.state {
            SessionState::NoDate => None,
            SessionState::DateSelected(date) => Some(date),
        }
    }

    /// Whether a dataset is loaded for the selected date
    pub fn is_loaded(&self) -> bool {
        match &self.state {
            SessionState::NoDate => false,
            SessionState::DateSelected(date) => self.cache.is_loaded_for(date),
        }
    }

    /// Fetch the ranking for the selected date and cache it. On failure the
    /// engine stays in its current state so the caller can retry with the
    /// same or a different date; nothing is retried automatically.
    pub async fn load_dataset(&mut self) -> Result<LoadOutcome> {
        let date = match &self.state {
            SessionState::NoDate => {
                return Err(BoxOfficeError::Validation {
                    field: "date".to_string(),
                    reason: "no date selected".to_string(),
                })
            }
            SessionState::DateSelected(date) => date.clone(),
        };

        let dataset = self.source.fetch_ranking(&date).await?;
        let outcome = if dataset.is_empty() {
            info!(date = %date, "no box-office data for this date");
            LoadOutcome::Empty
        } else {
            info!(date = %date, entries = dataset.len(), "dataset loaded");
            LoadOutcome::Loaded(dataset.len())
        };
        self.cache.replace(dataset);
        Ok(outcome)
    }

    fn current_dataset(&self) -> Result<&Dataset> {
        match &self.state {
            SessionState::DateSelected(date) if self.cache.is_loaded_for(date) => self
                .cache
                .current()
                .ok_or(BoxOfficeError::NotLoaded),
            _ => Err(BoxOfficeError::NotLoaded),
        }
    }

    /// The day's top list in rank order, title only
    pub fn ranking_view(&self) -> Result<Vec<RankedTitle>> {
        let dataset = self.current_dataset()?;
        Ok(dataset
            .entries
            .iter()
            .map(|entry| RankedTitle {
                rank: entry.rank,
                title: entry.title.clone(),
            })
            .collect())
    }

    fn lookup_entry(&self, query: &str) -> Result<TitleLookup<MovieEntry>> {
        let dataset = self.current_dataset()?;
        let candidates = matcher::find_candidates(dataset, query);
        Ok(match candidates.as_slice() {
            [] => TitleLookup::NotFound,
            [single] => TitleLookup::Found((*single).clone()),
            many => TitleLookup::Ambiguous(
                many.iter()
                    .map(|entry| Candidate {
                        rank: entry.rank,
                        title: entry.title.clone(),
                        movie_cd: entry.movie_cd.clone(),
                    })
                    .collect(),
            ),
        })
    }

    /// Formatted metrics for a title query. An ambiguous match returns the
    /// candidate list; resolve it with [`QueryEngine::select_candidate`] and
    /// [`QueryEngine::metrics_for_code`].
    pub fn metrics_for(&self, query: &str) -> Result<TitleLookup<MovieMetrics>> {
        Ok(match self.lookup_entry(query)? {
            TitleLookup::NotFound => TitleLookup::NotFound,
            TitleLookup::Ambiguous(candidates) => TitleLookup::Ambiguous(candidates),
            TitleLookup::Found(entry) => {
                let dataset = self.current_dataset()?;
                TitleLookup::Found(metrics::metrics_for_entry(dataset, &entry))
            }
        })
    }

    /// Formatted metrics for a specific movie code (post-disambiguation)
    pub fn metrics_for_code(&self, movie_cd: &str) -> Result<MovieMetrics> {
        let dataset = self.current_dataset()?;
        let entry = self.entry_by_code(dataset, movie_cd)?;
        Ok(metrics::metrics_for_entry(dataset, entry))
    }

    /// Extended detail for a title query. The detail endpoint is only called
    /// once the match is unambiguous.
    pub async fn detail_for(&self, query: &str) -> Result<TitleLookup<DetailOutcome>> {
        Ok(match self.lookup_entry(query)? {
            TitleLookup::NotFound => TitleLookup::NotFound,
            TitleLookup::Ambiguous(candidates) => TitleLookup::Ambiguous(candidates),
            TitleLookup::Found(entry) => {
                TitleLookup::Found(self.fetch_detail_outcome(&entry.movie_cd).await?)
            }
        })
    }

    /// Extended detail for a specific movie code (post-disambiguation)
    pub async fn detail_for_code(&self, movie_cd: &str) -> Result<DetailOutcome> {
        // The code must belong to the loaded dataset
        let dataset = self.current_dataset()?;
        self.entry_by_code(dataset, movie_cd)?;
        self.fetch_detail_outcome(movie_cd).await
    }

    async fn fetch_detail_outcome(&self, movie_cd: &str) -> Result<DetailOutcome> {
        Ok(match self.source.fetch_detail(movie_cd).await? {
            Some(detail) => DetailOutcome::Found(detail),
            None => DetailOutcome::Unavailable,
        })
    }

    fn entry_by_code<'a>(&self, dataset: &'a Dataset, movie_cd: &str) -> Result<&'a MovieEntry> {
        dataset
            .entries
            .iter()
            .find(|entry| entry.movie_cd == movie_cd)
            .ok_or_else(|| BoxOfficeError::Validation {
                field: "movie_cd".to_string(),
                reason: format!("'{}' is not part of the loaded dataset", movie_cd),
            })
    }

    /// Validate a 1-based pick from a previously returned candidate list.
    /// Out-of-range indices come back as validation errors for the caller's
    /// re-prompt loop.
    pub fn select_candidate<'a>(
        &self,
        candidates: &'a [Candidate],
        index: usize,
    ) -> Result<&'a Candidate> {
        matcher::validate_selection(candidates, index)
    }

    /// Search third-party review links for a free-text query. Requires a
    /// review client to be attached; results are returned raw, markup
    /// stripping is the presentation layer's job.
    pub async fn search_reviews(&self, query: &str) -> Result<Vec<ReviewItem>> {
        let client = self
            .review_client
            .as_ref()
            .ok_or_else(|| BoxOfficeError::Config {
                message: "review search is not configured".to_string(),
            })?;
        client.search(query).await
    }
}
