//! Classify a single query

use super::CliError;
use crate::classify::{classify, Category};

/// Classify a query given on the command line or read from stdin.
///
/// A trailing newline (as left by `echo`) is not part of the query.
pub fn classify_input(input: Option<&str>) -> Result<Category, CliError> {
    input
        .map(|q| q.trim_end_matches(['\n', '\r']))
        .filter(|q| !q.trim().is_empty())
        .map(classify)
        .ok_or(CliError::NoInput)
}
