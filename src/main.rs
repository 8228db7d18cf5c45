//! # Box-Office Explorer CLI
//!
//! ## Purpose
//! Interactive terminal front end for the box-office query engine: date
//! selection, top-list view, per-title metrics and detail lookup, and review
//! search, driven by a numbered menu.
//!
//! ## Input/Output Specification
//! - **Input**: Command line arguments, configuration file, menu choices
//! - **Output**: Formatted listings on stdout
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging
//! 3. Construct the KOBIS client (and review client when configured)
//! 4. Select the target date and load its dataset
//! 5. Run the menu loop until the user exits
//!
//! All interactive retry loops (bad menu choices, ambiguous title picks)
//! live here; the engine only validates one input at a time.

use anyhow::Context;
use clap::{Arg, Command};
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use boxoffice_explorer::{
    client::KobisClient,
    config::Config,
    engine::{DetailOutcome, LoadOutcome, QueryEngine, TitleLookup},
    errors::BoxOfficeError,
    review::ReviewSearchClient,
    text_processing, DateKey,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("boxoffice-cli")
        .version("0.1.0")
        .about("Interactive client for the KOBIS daily box-office open API")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("boxoffice.toml"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("KOBIS API key (overrides config and environment)"),
        )
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .value_name("YYYYMMDD")
                .help("Target date; defaults to yesterday"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;
    if let Some(key) = matches.get_one::<String>("api-key") {
        config.api.key = key.clone();
    }

    init_logging(&config)?;
    config.validate().context("invalid configuration")?;

    let timeout = Duration::from_secs(config.http.timeout_seconds);
    let client = KobisClient::with_base_url(&config.api.base_url, &config.api.key, Some(timeout))?;

    let mut engine = QueryEngine::new(client);
    if config.validate_review().is_ok() {
        let review_client = ReviewSearchClient::new(
            &config.review.endpoint,
            &config.review.client_id,
            &config.review.client_secret,
            config.review.max_results,
            Some(timeout),
        )?;
        engine = engine.with_review_client(review_client);
    } else {
        debug!("review-search credentials not set, menu entry will be unavailable");
    }

    let initial_date = match matches.get_one::<String>("date") {
        Some(raw) => raw.clone(),
        None => DateKey::yesterday().as_str().to_string(),
    };
    select_and_load(&mut engine, &initial_date).await;

    run_menu(&mut engine).await;
    println!("Bye! 👋");
    Ok(())
}

/// Initialize logging from the configured level, overridable via RUST_LOG
fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

/// Select a date and load its dataset, reporting failures without aborting
async fn select_and_load<S: boxoffice_explorer::client::BoxOfficeSource>(
    engine: &mut QueryEngine<S>,
    raw_date: &str,
) {
    match engine.select_date(raw_date) {
        Ok(date) => println!("\n📅 Target date: {}", date),
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    }
    match engine.load_dataset().await {
        Ok(LoadOutcome::Loaded(n)) => println!("✅ Loaded {} titles.", n),
        Ok(LoadOutcome::Empty) => println!("ℹ️ No box-office data for this date."),
        Err(e) => println!("❌ Failed to load: {} (you can retry or change the date)", e),
    }
}

async fn run_menu<S: boxoffice_explorer::client::BoxOfficeSource>(engine: &mut QueryEngine<S>) {
    loop {
        println!("\n==== 🎬 Box-Office Menu ====");
        println!("1: Daily ranking");
        println!("2: Ticket-sales metrics for a title");
        println!("3: Extended detail for a title");
        println!("4: Review links for a title");
        println!("5: Change date");
        println!("0: Exit");

        let choice = prompt("Choice: ");
        match choice.trim() {
            "0" => break,
            "1" => show_ranking(engine),
            "2" => show_metrics(engine),
            "3" => show_detail(engine).await,
            "4" => show_reviews(engine).await,
            "5" => {
                let raw = prompt("New date (YYYYMMDD): ");
                select_and_load(engine, raw.trim()).await;
            }
            _ => println!("❌ Please enter a number between 0 and 5."),
        }
    }
}

fn show_ranking<S: boxoffice_explorer::client::BoxOfficeSource>(engine: &QueryEngine<S>) {
    match engine.ranking_view() {
        Ok(rows) if rows.is_empty() => println!("ℹ️ No data for this date."),
        Ok(rows) => {
            println!("\n🏆 Daily ranking");
            for row in rows {
                println!("{:>3}. {}", row.rank, row.title);
            }
        }
        Err(e) => println!("❌ {}", e),
    }
}

fn show_metrics<S: boxoffice_explorer::client::BoxOfficeSource>(engine: &QueryEngine<S>) {
    let query = prompt("Title to look up: ");
    match engine.metrics_for(query.trim()) {
        Ok(TitleLookup::NotFound) => println!("❌ No title matches '{}'.", query.trim()),
        Ok(TitleLookup::Found(metrics)) => print_metrics(&metrics),
        Ok(TitleLookup::Ambiguous(candidates)) => {
            if let Some(code) = disambiguate(engine, &candidates) {
                match engine.metrics_for_code(&code) {
                    Ok(metrics) => print_metrics(&metrics),
                    Err(e) => println!("❌ {}", e),
                }
            }
        }
        Err(e) => println!("❌ {}", e),
    }
}

fn print_metrics(metrics: &boxoffice_explorer::metrics::MovieMetrics) {
    println!("\n✅ {} (rank {})", metrics.title, metrics.rank);
    println!("- Ticket-sales share: {}%", metrics.share_percent);
    println!("- Daily gross:        {}", metrics.daily_gross);
    println!("- Cumulative gross:   {}", metrics.cumulative_gross);
    println!("- Screens / showings: {} / {}", metrics.screen_count, metrics.show_count);
    println!("- Daily audience:     {}", metrics.daily_audience);
}

async fn show_detail<S: boxoffice_explorer::client::BoxOfficeSource>(engine: &QueryEngine<S>) {
    let query = prompt("Title to look up: ");
    match engine.detail_for(query.trim()).await {
        Ok(TitleLookup::NotFound) => println!("❌ No title matches '{}'.", query.trim()),
        Ok(TitleLookup::Found(outcome)) => print_detail(outcome),
        Ok(TitleLookup::Ambiguous(candidates)) => {
            if let Some(code) = disambiguate(engine, &candidates) {
                match engine.detail_for_code(&code).await {
                    Ok(outcome) => print_detail(outcome),
                    Err(e) => println!("❌ {}", e),
                }
            }
        }
        Err(e) => println!("❌ {}", e),
    }
}

fn print_detail(outcome: DetailOutcome) {
    match outcome {
        DetailOutcome::Unavailable => println!("ℹ️ Detail unavailable for this title."),
        DetailOutcome::Found(detail) => {
            println!("\n✅ {}", detail.title);
            let directors = if detail.directors.is_empty() {
                "unknown".to_string()
            } else {
                detail.directors.join(", ")
            };
            let actors = if detail.actors.is_empty() {
                "unknown".to_string()
            } else {
                detail.actors.join(", ")
            };
            println!("- Directors: {}", directors);
            println!("- Actors:    {}", actors);
            match detail.runtime_minutes {
                Some(minutes) => println!("- Runtime:   {} min", minutes),
                None => println!("- Runtime:   unknown"),
            }
            match detail.release_date {
                Some(date) => println!("- Released:  {}", date),
                None => println!("- Released:  unknown"),
            }
        }
    }
}

async fn show_reviews<S: boxoffice_explorer::client::BoxOfficeSource>(engine: &QueryEngine<S>) {
    let query = prompt("Search reviews for: ");
    match engine.search_reviews(query.trim()).await {
        Ok(items) if items.is_empty() => println!("ℹ️ No review links found."),
        Ok(items) => {
            for item in items {
                println!("\n📝 {}", text_processing::strip_markup(&item.title));
                println!("🔗 {}", item.link);
                if !item.snippet.is_empty() {
                    let snippet = text_processing::strip_markup(&item.snippet);
                    println!("   {}", text_processing::truncate(&snippet, 120));
                }
                if !item.author.is_empty() {
                    println!("   by {} ({})", item.author, item.date);
                }
            }
        }
        Err(e) => println!("❌ {}", e),
    }
}

/// Print the candidate list and prompt until a valid 1-based pick is made.
/// Returns the chosen movie code, or `None` if the user backs out.
fn disambiguate<S: boxoffice_explorer::client::BoxOfficeSource>(
    engine: &QueryEngine<S>,
    candidates: &[boxoffice_explorer::engine::Candidate],
) -> Option<String> {
    println!("\nSeveral titles match:");
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{:>3}. {} (rank {})", i + 1, candidate.title, candidate.rank);
    }

    loop {
        let raw = prompt("Pick a number (or 'q' to cancel): ");
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("q") {
            return None;
        }
        let index = match raw.parse::<usize>() {
            Ok(i) => i,
            Err(_) => {
                println!("❌ Not a number, try again.");
                continue;
            }
        };
        match engine.select_candidate(candidates, index) {
            Ok(candidate) => return Some(candidate.movie_cd.clone()),
            Err(BoxOfficeError::Validation { reason, .. }) => println!("❌ {}", reason),
            Err(e) => {
                println!("❌ {}", e);
                return None;
            }
        }
    }
}

fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return "0".to_string();
    }
    line
}
