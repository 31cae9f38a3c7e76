//! CLI support for spider-conformance
//!
//! Startup checks, command execution and logging setup, kept out of
//! `main.rs` so they can be exercised from tests.

mod categories;
mod classify;
mod logging;
mod run;

pub use categories::get_categories_overview;
pub use classify::classify_input;
pub use logging::init_logging;
pub use run::{execute_run, preflight, HarnessPaths, RunOptions, DEFAULT_CORPUS, DEFAULT_ORACLE};

use crate::corpus::CorpusError;
use crate::oracle::OracleError;
use std::io;
use std::path::PathBuf;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Corpus file does not exist
    CorpusMissing(PathBuf),
    /// Parser binary does not exist
    OracleMissing(PathBuf),
    /// Corpus file could not be loaded
    Corpus(CorpusError),
    /// Parser process could not be driven
    Oracle(OracleError),
    /// IO error
    Io(io::Error),
    /// No query provided to classify
    NoInput,
    /// Log filter could not be parsed
    Logging(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::CorpusMissing(path) => write!(
                f,
                "Error: Spider data not found at {}\nRun: ./scripts/download-spider.sh",
                path.display()
            ),
            CliError::OracleMissing(path) => write!(
                f,
                "Error: Parser not found at {}\nRun: lake build sqlinlean",
                path.display()
            ),
            CliError::Corpus(e) => write!(f, "Corpus error: {}", e),
            CliError::Oracle(e) => write!(f, "Oracle error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No query provided. Pass it as an argument or pipe it to stdin.")
            }
            CliError::Logging(e) => write!(f, "Invalid log filter: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Corpus(e) => Some(e),
            CliError::Oracle(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CorpusError> for CliError {
    fn from(e: CorpusError) -> Self {
        CliError::Corpus(e)
    }
}

impl From<OracleError> for CliError {
    fn from(e: OracleError) -> Self {
        CliError::Oracle(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
