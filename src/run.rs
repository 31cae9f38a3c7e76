//! Driving a corpus through the oracle.

use crate::classify::Histogram;
use crate::corpus::Query;
use crate::oracle::{Oracle, OracleError};

/// A progress report is emitted after every this many queries.
pub const PROGRESS_INTERVAL: usize = 100;

/// Default number of corpus entries to test.
pub const DEFAULT_LIMIT: usize = 500;

/// Options for a corpus run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Test at most this many queries from the start of the corpus
    pub limit: usize,
    /// Classify failures into a histogram
    pub categorize: bool,
    /// List sample failures
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            limit: DEFAULT_LIMIT,
            categorize: false,
            verbose: false,
        }
    }
}

/// Cumulative counts at a progress checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub tested: usize,
    pub limit: usize,
    pub passed: usize,
}

/// Outcome of a run.
///
/// Passing queries are only counted; failing queries are kept in the
/// order they were tested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<String>,
}

impl Summary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn record(&mut self, query: &Query, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failures.push(query.text.clone());
        }
    }

    /// Classify the retained failures.
    pub fn histogram(&self) -> Histogram {
        Histogram::from_failures(&self.failures)
    }
}

/// Test the first `limit` queries of the corpus, one at a time.
///
/// `on_progress` is called after every [`PROGRESS_INTERVAL`] queries.
pub fn run_corpus<O, F>(
    corpus: &[Query],
    limit: usize,
    oracle: &mut O,
    mut on_progress: F,
) -> Result<Summary, OracleError>
where
    O: Oracle + ?Sized,
    F: FnMut(Progress),
{
    let limit = limit.min(corpus.len());
    tracing::info!(limit, corpus = corpus.len(), "starting corpus run");

    let mut summary = Summary::default();
    for (idx, query) in corpus[..limit].iter().enumerate() {
        let passed = oracle.parses(&query.text)?;
        tracing::debug!(index = idx, passed, "oracle verdict");
        summary.record(query, passed);

        if summary.total % PROGRESS_INTERVAL == 0 {
            on_progress(Progress {
                tested: summary.total,
                limit,
                passed: summary.passed,
            });
        }
    }

    tracing::info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed(),
        "corpus run finished"
    );
    Ok(summary)
}
