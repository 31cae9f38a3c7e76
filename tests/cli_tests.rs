// tests/cli_tests.rs
#![cfg(feature = "cli")]

use spider_conformance::classify::Category;
use spider_conformance::cli::{
    classify_input, execute_run, get_categories_overview, preflight, CliError, HarnessPaths,
    RunOptions, DEFAULT_CORPUS, DEFAULT_ORACLE,
};
use spider_conformance::run::RunConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_corpus(dir: &Path, queries: &[&str]) -> PathBuf {
    let records: Vec<serde_json::Value> = queries
        .iter()
        .map(|q| serde_json::json!({ "db_id": "test", "query": q }))
        .collect();
    let path = dir.join("corpus.json");
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
    path
}

/// A binary that exits with the given status whatever its input.
#[cfg(unix)]
fn exit_binary(succeed: bool) -> PathBuf {
    let name = if succeed { "true" } else { "false" };
    ["/bin", "/usr/bin"]
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .find(|p| p.exists())
        .expect("coreutils true/false")
}

// ============================================================================
// Preflight
// ============================================================================

#[test]
fn test_default_layout_under_root() {
    let paths = HarnessPaths::under(Path::new("/work/sqlinlean"));
    assert_eq!(paths.corpus, Path::new("/work/sqlinlean").join(DEFAULT_CORPUS));
    assert_eq!(paths.oracle, Path::new("/work/sqlinlean").join(DEFAULT_ORACLE));
    assert!(paths.corpus.ends_with("tests/data/spider/train_spider.json"));
    assert!(paths.oracle.ends_with(".lake/build/bin/sqlinlean"));
}

#[test]
fn test_missing_corpus_is_reported_first() {
    let dir = tempdir().unwrap();
    let paths = HarnessPaths::under(dir.path());

    let err = preflight(&paths).unwrap_err();

    assert!(matches!(&err, CliError::CorpusMissing(p) if *p == paths.corpus));
    let message = err.to_string();
    assert!(message.contains("Spider data not found"));
    assert!(message.contains("./scripts/download-spider.sh"));
}

#[test]
fn test_missing_oracle() {
    let dir = tempdir().unwrap();
    let paths = HarnessPaths {
        corpus: write_corpus(dir.path(), &["SELECT 1"]),
        oracle: dir.path().join("no-such-parser"),
    };

    let err = preflight(&paths).unwrap_err();

    assert!(matches!(&err, CliError::OracleMissing(_)));
    assert!(err.to_string().contains("lake build sqlinlean"));
}

#[test]
fn test_setup_failure_runs_nothing() {
    let dir = tempdir().unwrap();
    let options = RunOptions {
        paths: HarnessPaths::under(dir.path()),
        config: RunConfig::default(),
        timeout: None,
    };
    let mut lines = Vec::new();

    let result = execute_run(&options, |line| lines.push(line.to_string()));

    assert!(matches!(result, Err(CliError::CorpusMissing(_))));
    assert!(lines.is_empty());
}

#[test]
fn test_malformed_corpus() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus.json");
    fs::write(&corpus, "[{\"question\": \"no query\"}]").unwrap();
    let oracle = dir.path().join("parser");
    fs::write(&oracle, "").unwrap();
    let options = RunOptions {
        paths: HarnessPaths { corpus, oracle },
        config: RunConfig::default(),
        timeout: None,
    };

    let result = execute_run(&options, |_| {});

    assert!(matches!(result, Err(CliError::Corpus(_))));
}

// ============================================================================
// Runs
// ============================================================================

#[cfg(unix)]
#[test]
fn test_run_with_passing_oracle() {
    let dir = tempdir().unwrap();
    let queries: Vec<String> = (0..150).map(|i| format!("SELECT {}", i)).collect();
    let refs: Vec<&str> = queries.iter().map(String::as_str).collect();
    let options = RunOptions {
        paths: HarnessPaths {
            corpus: write_corpus(dir.path(), &refs),
            oracle: exit_binary(true),
        },
        config: RunConfig { limit: 120, categorize: true, verbose: true },
        timeout: None,
    };
    let mut lines = Vec::new();

    let summary = execute_run(&options, |line| lines.push(line.to_string())).unwrap();

    assert_eq!(summary.total, 120);
    assert_eq!(summary.passed, 120);
    assert!(summary.failures.is_empty());
    assert_eq!(lines, vec!["Tested 100/120... (100 passed, 100.0%)"]);
}

#[cfg(unix)]
#[test]
fn test_run_with_failing_oracle() {
    let dir = tempdir().unwrap();
    let options = RunOptions {
        paths: HarnessPaths {
            corpus: write_corpus(
                dir.path(),
                &["SELECT a FROM b UNION SELECT a FROM c", "SELECT a || b FROM t"],
            ),
            oracle: exit_binary(false),
        },
        config: RunConfig { limit: 500, categorize: true, verbose: false },
        timeout: None,
    };

    let summary = execute_run(&options, |_| {}).unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 0);
    let hist = summary.histogram();
    assert_eq!(hist.count(Category::Union), 1);
    assert_eq!(hist.count(Category::StringConcat), 1);
}

#[cfg(unix)]
#[test]
fn test_run_with_empty_corpus() {
    let dir = tempdir().unwrap();
    let options = RunOptions {
        paths: HarnessPaths {
            corpus: write_corpus(dir.path(), &[]),
            oracle: exit_binary(true),
        },
        config: RunConfig::default(),
        timeout: None,
    };

    let summary = execute_run(&options, |_| {}).unwrap();

    assert_eq!(summary.total, 0);
}

// ============================================================================
// Classify and Categories
// ============================================================================

#[test]
fn test_classify_input() {
    assert_eq!(
        classify_input(Some("SELECT a || b FROM t\n")).unwrap(),
        Category::StringConcat
    );
    assert_eq!(
        classify_input(Some("SELECT COUNT(*) FROM singer WHERE age > 20")).unwrap(),
        Category::Other
    );
}

#[test]
fn test_classify_keeps_inner_spacing() {
    // Trailing "CASE " only matches if the space survives.
    assert_eq!(classify_input(Some("SELECT CASE ")).unwrap(), Category::CaseWhen);
}

#[test]
fn test_classify_without_input() {
    assert!(matches!(classify_input(None), Err(CliError::NoInput)));
    assert!(matches!(classify_input(Some("  \n")), Err(CliError::NoInput)));
}

#[test]
fn test_categories_overview_lists_rules_in_order() {
    let overview = get_categories_overview();
    let positions: Vec<usize> = Category::ALL
        .iter()
        .map(|c| overview.find(&format!(". {}", c.label())).unwrap())
        .collect();

    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
    assert!(overview.contains("8. Other"));
}
