pub mod classify;
pub mod corpus;
pub mod oracle;
pub mod report;
pub mod run;

#[cfg(feature = "cli")]
pub mod cli;

pub use classify::{classify, Category, Histogram, QueryText, Rule, RULES};
pub use corpus::{load_corpus, parse_corpus, CorpusError, Query};
pub use oracle::{Oracle, OracleError, ProcessOracle};
pub use report::{render_report, truncate_sample};
pub use run::{run_corpus, Progress, RunConfig, Summary};
