//! Loading the query corpus.
//!
//! A corpus file is a JSON array of records. Only the `query` field of each
//! record is read; Spider records also carry the question, database id and
//! tokenised forms, which are ignored.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// One corpus entry: the raw SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Query { text: text.into() }
    }
}

#[derive(Deserialize)]
struct Record {
    query: Option<serde_json::Value>,
}

/// Errors that can occur while reading a corpus
#[derive(Debug)]
pub enum CorpusError {
    /// The file could not be read
    Io(io::Error),
    /// The file is not a JSON array of objects
    Json(serde_json::Error),
    /// Record at this index has no string `query` field
    MissingQuery(usize),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::Io(e) => write!(f, "IO error: {}", e),
            CorpusError::Json(e) => write!(f, "Invalid corpus JSON: {}", e),
            CorpusError::MissingQuery(idx) => {
                write!(f, "Corpus record {} has no string 'query' field", idx)
            }
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorpusError::Io(e) => Some(e),
            CorpusError::Json(e) => Some(e),
            CorpusError::MissingQuery(_) => None,
        }
    }
}

impl From<io::Error> for CorpusError {
    fn from(e: io::Error) -> Self {
        CorpusError::Io(e)
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(e: serde_json::Error) -> Self {
        CorpusError::Json(e)
    }
}

/// Parse corpus records from a JSON string, preserving their order.
pub fn parse_corpus(json: &str) -> Result<Vec<Query>, CorpusError> {
    let records: Vec<Record> = serde_json::from_str(json)?;

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| match record.query {
            Some(serde_json::Value::String(text)) => Ok(Query { text }),
            _ => Err(CorpusError::MissingQuery(idx)),
        })
        .collect()
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &Path) -> Result<Vec<Query>, CorpusError> {
    let json = fs::read_to_string(path)?;
    let queries = parse_corpus(&json)?;
    tracing::debug!(path = %path.display(), queries = queries.len(), "corpus loaded");
    Ok(queries)
}
