//! # Metrics Calculator Module
//!
//! ## Purpose
//! Derives secondary figures from a day's raw entries: each title's share of
//! the day's total gross, and display formatting for currency and count
//! fields.
//!
//! ## Input/Output Specification
//! - **Input**: A loaded dataset, raw integer KRW/count values
//! - **Output**: Share percentages keyed by movie code, grouped display
//!   strings with unit suffixes
//!
//! Formatting is purely presentational; it never alters the underlying
//! values used for computation, and grouped strings parse back to the
//! original integer.

use crate::errors::{BoxOfficeError, Result};
use crate::{Dataset, MovieEntry};
use serde::Serialize;
use std::collections::HashMap;

/// Currency suffix for KRW amounts
pub const CURRENCY_SUFFIX: &str = "원";

/// Unit suffix for admission counts
pub const AUDIENCE_SUFFIX: &str = "명";

/// Fully formatted metrics record for one matched title
#[derive(Debug, Clone, Serialize)]
pub struct MovieMetrics {
    pub rank: u32,
    pub title: String,
    /// Ticket-sales share of the day's total gross, e.g. "70.00"
    pub share_percent: String,
    /// Day's gross, grouped with the currency suffix
    pub daily_gross: String,
    /// Running total gross, grouped with the currency suffix
    pub cumulative_gross: String,
    pub screen_count: u64,
    pub show_count: u64,
    /// Day's admissions, grouped with the audience suffix
    pub daily_audience: String,
}

/// Compute every entry's ticket-sales share of the day's total gross,
/// keyed by movie code. Shares are rounded to 2 decimal places; when the
/// dataset total is 0 every share is exactly 0 (division-by-zero guard).
pub fn compute_share(dataset: &Dataset) -> HashMap<String, f64> {
    let total: u64 = dataset.entries.iter().map(|e| e.daily_gross).sum();

    dataset
        .entries
        .iter()
        .map(|entry| {
            let share = if total == 0 {
                0.0
            } else {
                round2(entry.daily_gross as f64 / total as f64 * 100.0)
            };
            (entry.movie_cd.clone(), share)
        })
        .collect()
}

/// Build the formatted metrics record for one entry of a dataset
pub fn metrics_for_entry(dataset: &Dataset, entry: &MovieEntry) -> MovieMetrics {
    let shares = compute_share(dataset);
    let share = shares.get(&entry.movie_cd).copied().unwrap_or(0.0);

    MovieMetrics {
        rank: entry.rank,
        title: entry.title.clone(),
        share_percent: format!("{:.2}", share),
        daily_gross: format_currency(entry.daily_gross),
        cumulative_gross: format_currency(entry.cumulative_gross),
        screen_count: entry.screen_count,
        show_count: entry.show_count,
        daily_audience: format_audience(entry.daily_audience),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render an integer with thousands grouping, e.g. `1234567` → `"1,234,567"`
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Grouped KRW amount with the currency suffix
pub fn format_currency(value: u64) -> String {
    format!("{}{}", format_grouped(value), CURRENCY_SUFFIX)
}

/// Grouped admission count with the audience suffix
pub fn format_audience(value: u64) -> String {
    format!("{}{}", format_grouped(value), AUDIENCE_SUFFIX)
}

/// Parse a grouped, optionally suffixed display string back to the raw
/// integer, recovering exactly what the formatters rendered.
pub fn parse_grouped(text: &str) -> Result<u64> {
    let digits: String = text
        .trim()
        .trim_end_matches(CURRENCY_SUFFIX)
        .trim_end_matches(AUDIENCE_SUFFIX)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    digits.parse::<u64>().map_err(|e| BoxOfficeError::Validation {
        field: "grouped_number".to_string(),
        reason: format!("'{}': {}", text, e),
    })
}
