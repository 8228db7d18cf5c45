//! # Title Matcher Module
//!
//! ## Purpose
//! Locates entries in a dataset whose title matches a free-text query, and
//! validates a user's pick when several candidates match.
//!
//! ## Input/Output Specification
//! - **Input**: A loaded dataset and a free-text query
//! - **Output**: Zero, one, or many candidate entries in rank order
//! - **Matching**: Substring containment over normalized titles; case- and
//!   whitespace-insensitive. Zero results means "not found", not an error.
//!
//! The interactive retry loop around an ambiguous match belongs to the
//! presentation layer; this module only validates one selection at a time.

use crate::errors::{BoxOfficeError, Result};
use crate::text_processing::normalize;
use crate::{Dataset, MovieEntry};

/// Find every entry whose normalized title contains the normalized query as
/// a substring, in dataset (rank) order.
pub fn find_candidates<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a MovieEntry> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }
    dataset
        .entries
        .iter()
        .filter(|entry| normalize(&entry.title).contains(&needle))
        .collect()
}

/// Validate a 1-based selection index against a candidate list, returning
/// the chosen element or a validation error the caller can re-prompt on.
/// Generic so it works both on matched entries and on the engine's
/// disambiguation candidates.
pub fn validate_selection<T>(candidates: &[T], index: usize) -> Result<&T> {
    if index == 0 || index > candidates.len() {
        return Err(BoxOfficeError::Validation {
            field: "selection".to_string(),
            reason: format!(
                "index {} out of range; pick between 1 and {}",
                index,
                candidates.len()
            ),
        });
    }
    Ok(&candidates[index - 1])
}
