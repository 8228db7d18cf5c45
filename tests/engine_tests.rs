//! Query-engine integration tests over an in-memory data source.
//!
//! The engine is generic over `BoxOfficeSource`, so these tests exercise the
//! full session state machine without any network involvement.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use boxoffice_explorer::client::BoxOfficeSource;
use boxoffice_explorer::engine::{DetailOutcome, LoadOutcome, QueryEngine, TitleLookup};
use boxoffice_explorer::errors::{BoxOfficeError, Result};
use boxoffice_explorer::{Dataset, DateKey, MovieDetail, MovieEntry};

enum RankingBehavior {
    Entries(Vec<MovieEntry>),
    Empty,
    NetworkFailure,
}

struct FakeSource {
    ranking: RankingBehavior,
    detail: Option<MovieDetail>,
    ranking_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeSource {
    fn new(ranking: RankingBehavior) -> Self {
        Self {
            ranking,
            detail: None,
            ranking_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[async_trait]
impl BoxOfficeSource for FakeSource {
    async fn fetch_ranking(&self, date: &DateKey) -> Result<Dataset> {
        self.ranking_calls.fetch_add(1, Ordering::SeqCst);
        match &self.ranking {
            RankingBehavior::Entries(entries) => Ok(Dataset {
                date: date.clone(),
                entries: entries.clone(),
            }),
            RankingBehavior::Empty => Ok(Dataset {
                date: date.clone(),
                entries: Vec::new(),
            }),
            RankingBehavior::NetworkFailure => Err(BoxOfficeError::Network {
                details: "connection refused".to_string(),
            }),
        }
    }

    async fn fetch_detail(&self, _movie_cd: &str) -> Result<Option<MovieDetail>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.detail.clone())
    }
}

fn entry(rank: u32, title: &str, daily_gross: u64) -> MovieEntry {
    MovieEntry {
        rank,
        movie_cd: format!("2023{:04}", rank),
        title: title.to_string(),
        daily_gross,
        cumulative_gross: daily_gross * 3,
        screen_count: 100,
        show_count: 400,
        daily_audience: daily_gross / 10,
    }
}

fn alpha_beta() -> Vec<MovieEntry> {
    vec![entry(1, "Alpha", 700), entry(2, "Beta", 300)]
}

async fn loaded_engine(source: FakeSource) -> QueryEngine<FakeSource> {
    let mut engine = QueryEngine::new(source);
    engine.select_date("20250614").unwrap();
    engine.load_dataset().await.unwrap();
    engine
}

#[tokio::test]
async fn seven_digit_date_is_rejected_before_any_fetch() {
    let source = FakeSource::new(RankingBehavior::Entries(alpha_beta()));
    let mut engine = QueryEngine::new(source);

    let err = engine.select_date("2025061").unwrap_err();
    assert_eq!(err.category(), "validation");

    // Still NoDate: loading must fail locally, and nothing hit the source
    let err = engine.load_dataset().await.unwrap_err();
    assert_eq!(err.category(), "validation");
    assert_eq!(engine.source().ranking_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn queries_before_load_report_not_loaded() {
    let source = FakeSource::new(RankingBehavior::Entries(alpha_beta()));
    let mut engine = QueryEngine::new(source);
    engine.select_date("20250614").unwrap();

    assert!(matches!(
        engine.ranking_view().unwrap_err(),
        BoxOfficeError::NotLoaded
    ));
    assert!(matches!(
        engine.metrics_for("alpha").unwrap_err(),
        BoxOfficeError::NotLoaded
    ));
}

#[tokio::test]
async fn empty_day_loads_successfully_and_ranking_is_empty() {
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Empty)).await;
    // Loaded-but-empty is distinct from the network-failure path below
    assert!(engine.is_loaded());
    assert!(engine.ranking_view().unwrap().is_empty());
}

#[tokio::test]
async fn empty_day_load_outcome_is_reported_as_empty() {
    let mut engine = QueryEngine::new(FakeSource::new(RankingBehavior::Empty));
    engine.select_date("20250614").unwrap();
    assert_eq!(engine.load_dataset().await.unwrap(), LoadOutcome::Empty);
}

#[tokio::test]
async fn network_failure_keeps_engine_unloaded() {
    let mut engine = QueryEngine::new(FakeSource::new(RankingBehavior::NetworkFailure));
    engine.select_date("20250614").unwrap();

    let err = engine.load_dataset().await.unwrap_err();
    assert_eq!(err.category(), "network");
    assert!(err.is_recoverable());

    // Never transitioned to Loaded, so the ranking view is unreachable
    assert!(!engine.is_loaded());
    assert!(matches!(
        engine.ranking_view().unwrap_err(),
        BoxOfficeError::NotLoaded
    ));

    // The date is still selected; the caller may simply retry
    assert_eq!(engine.selected_date().unwrap().as_str(), "20250614");
}

#[tokio::test]
async fn ranking_view_pairs_rank_with_title_only() {
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(alpha_beta()))).await;
    let rows = engine.ranking_view().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].title, "Alpha");
    assert_eq!(rows[1].rank, 2);
    assert_eq!(rows[1].title, "Beta");
}

#[tokio::test]
async fn metrics_for_alpha_yields_seventy_percent_share() {
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(alpha_beta()))).await;
    match engine.metrics_for("alpha").unwrap() {
        TitleLookup::Found(metrics) => {
            assert_eq!(metrics.title, "Alpha");
            assert_eq!(metrics.share_percent, "70.00");
            assert_eq!(metrics.daily_gross, "700원");
        }
        other => panic!("expected a single match, got {:?}", discriminant_name(&other)),
    }
}

#[tokio::test]
async fn unmatched_title_is_not_found_not_an_error() {
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(alpha_beta()))).await;
    assert!(matches!(
        engine.metrics_for("zeta").unwrap(),
        TitleLookup::NotFound
    ));
}

#[tokio::test]
async fn ambiguous_match_surfaces_candidates_in_rank_order() {
    let entries = vec![
        entry(1, "Movie A Part 1", 500),
        entry(2, "Movie A Part 2", 500),
    ];
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(entries))).await;

    let candidates = match engine.metrics_for("movie a").unwrap() {
        TitleLookup::Ambiguous(candidates) => candidates,
        other => panic!("expected ambiguity, got {:?}", discriminant_name(&other)),
    };
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].title, "Movie A Part 1");
    assert_eq!(candidates[1].title, "Movie A Part 2");

    // 1-based selection: 1 and 2 resolve, 0 and 3 are rejected
    assert_eq!(
        engine.select_candidate(&candidates, 1).unwrap().title,
        "Movie A Part 1"
    );
    assert_eq!(
        engine.select_candidate(&candidates, 2).unwrap().title,
        "Movie A Part 2"
    );
    assert!(engine.select_candidate(&candidates, 0).is_err());
    assert!(engine.select_candidate(&candidates, 3).is_err());

    let code = engine.select_candidate(&candidates, 2).unwrap().movie_cd.clone();
    let metrics = engine.metrics_for_code(&code).unwrap();
    assert_eq!(metrics.title, "Movie A Part 2");
    assert_eq!(metrics.share_percent, "50.00");
}

#[tokio::test]
async fn detail_for_matched_title_fetches_by_code() {
    let detail = MovieDetail {
        title: "Alpha".to_string(),
        directors: vec!["Director Kim".to_string()],
        actors: vec!["Actor Lee".to_string()],
        runtime_minutes: Some(129),
        release_date: Some(DateKey::parse("20230614").unwrap()),
    };
    let source =
        FakeSource::new(RankingBehavior::Entries(alpha_beta())).with_detail(detail.clone());
    let engine = loaded_engine(source).await;

    match engine.detail_for("alpha").await.unwrap() {
        TitleLookup::Found(DetailOutcome::Found(found)) => assert_eq!(found, detail),
        other => panic!("expected detail, got {:?}", discriminant_name(&other)),
    }
}

#[tokio::test]
async fn detail_unavailable_is_distinct_from_title_not_found() {
    let engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(alpha_beta()))).await;

    // Title matches, but the source has no info block for it
    assert!(matches!(
        engine.detail_for("alpha").await.unwrap(),
        TitleLookup::Found(DetailOutcome::Unavailable)
    ));
    // Title does not match at all
    assert!(matches!(
        engine.detail_for("zeta").await.unwrap(),
        TitleLookup::NotFound
    ));
}

#[tokio::test]
async fn ambiguous_detail_lookup_does_not_hit_the_detail_endpoint() {
    let entries = vec![
        entry(1, "Movie A Part 1", 500),
        entry(2, "Movie A Part 2", 500),
    ];
    let source = FakeSource::new(RankingBehavior::Entries(entries));
    let engine = loaded_engine(source).await;

    assert!(matches!(
        engine.detail_for("movie a").await.unwrap(),
        TitleLookup::Ambiguous(_)
    ));
    assert_eq!(engine.source().detail_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn selecting_a_new_date_discards_the_loaded_dataset() {
    let mut engine = loaded_engine(FakeSource::new(RankingBehavior::Entries(alpha_beta()))).await;
    assert!(engine.is_loaded());

    engine.select_date("20250615").unwrap();
    assert!(!engine.is_loaded());
    assert!(matches!(
        engine.ranking_view().unwrap_err(),
        BoxOfficeError::NotLoaded
    ));

    engine.load_dataset().await.unwrap();
    assert!(engine.is_loaded());
}

fn discriminant_name<T>(lookup: &TitleLookup<T>) -> &'static str {
    match lookup {
        TitleLookup::NotFound => "NotFound",
        TitleLookup::Ambiguous(_) => "Ambiguous",
        TitleLookup::Found(_) => "Found",
    }
}
