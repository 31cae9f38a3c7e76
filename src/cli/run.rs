//! Run the corpus against the parser

use super::CliError;
use crate::corpus::load_corpus;
use crate::oracle::ProcessOracle;
use crate::report::render_progress;
use crate::run::{run_corpus, RunConfig, Summary};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Corpus location relative to the project root.
pub const DEFAULT_CORPUS: &str = "tests/data/spider/train_spider.json";

/// Parser binary location relative to the project root.
pub const DEFAULT_ORACLE: &str = ".lake/build/bin/sqlinlean";

/// Where the corpus and the parser live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessPaths {
    pub corpus: PathBuf,
    pub oracle: PathBuf,
}

impl HarnessPaths {
    /// Default layout under a project root.
    pub fn under(root: &Path) -> Self {
        HarnessPaths {
            corpus: root.join(DEFAULT_CORPUS),
            oracle: root.join(DEFAULT_ORACLE),
        }
    }
}

/// Options for the run command
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub paths: HarnessPaths,
    pub config: RunConfig,
    /// Kill a parser process that runs longer than this
    pub timeout: Option<Duration>,
}

/// Check that the corpus and the parser exist before anything runs.
pub fn preflight(paths: &HarnessPaths) -> Result<(), CliError> {
    if !paths.corpus.exists() {
        return Err(CliError::CorpusMissing(paths.corpus.clone()));
    }
    if !paths.oracle.exists() {
        return Err(CliError::OracleMissing(paths.oracle.clone()));
    }
    Ok(())
}

/// Execute a corpus run, handing each progress line to `emit`.
pub fn execute_run<F>(options: &RunOptions, mut emit: F) -> Result<Summary, CliError>
where
    F: FnMut(&str),
{
    preflight(&options.paths)?;

    let corpus = load_corpus(&options.paths.corpus)?;
    let mut oracle = ProcessOracle::new(&options.paths.oracle).with_timeout(options.timeout);

    let summary = run_corpus(&corpus, options.config.limit, &mut oracle, |progress| {
        emit(&render_progress(&progress))
    })?;
    Ok(summary)
}
