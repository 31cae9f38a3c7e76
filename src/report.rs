//! Plain-text rendering of run results.
//!
//! Every renderer returns a `String` and leaves printing to the caller, so
//! the report layout can be tested without capturing stdout.
//!
//! Percentages are shown to one decimal place. A zero denominator (an
//! empty corpus, or a histogram with no failures) renders as `0.0%`.

use crate::classify::Histogram;
use crate::run::{Progress, RunConfig, Summary};
use std::fmt::Write;

/// At most this many failing queries are listed in verbose mode.
pub const SAMPLE_LIMIT: usize = 20;

/// Sample failures are cut to this many characters.
pub const SAMPLE_WIDTH: usize = 100;

const RULE_WIDTH: usize = 50;

/// `part` as a percentage of `whole`, or 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

pub fn render_progress(progress: &Progress) -> String {
    format!(
        "Tested {}/{}... ({} passed, {:.1}%)",
        progress.tested,
        progress.limit,
        progress.passed,
        percent(progress.passed, progress.tested)
    )
}

fn heading(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = write!(out, "\n{}\n{}\n{}\n", rule, title, rule);
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    heading(&mut out, "Spider Corpus Test Results");
    let _ = writeln!(out, "Total:  {}", summary.total);
    let _ = writeln!(
        out,
        "Passed: {} ({:.1}%)",
        summary.passed,
        percent(summary.passed, summary.total)
    );
    let _ = writeln!(
        out,
        "Failed: {} ({:.1}%)",
        summary.failed(),
        percent(summary.failed(), summary.total)
    );
    out
}

/// Category counts, most frequent first, as shares of the failures.
pub fn render_histogram(histogram: &Histogram) -> String {
    let mut out = String::new();
    heading(&mut out, "Failure Categories");
    for (category, count) in histogram.ranked() {
        let _ = writeln!(
            out,
            "  {}: {} ({:.1}% of failures)",
            category,
            count,
            percent(count, histogram.total())
        );
    }
    out
}

/// Cut a query to [`SAMPLE_WIDTH`] characters, marking the cut with `...`.
pub fn truncate_sample(query: &str) -> String {
    match query.char_indices().nth(SAMPLE_WIDTH) {
        Some((cut, _)) => format!("{}...", &query[..cut]),
        None => query.to_string(),
    }
}

pub fn render_samples(failures: &[String]) -> String {
    let mut out = String::new();
    heading(&mut out, "Sample Failures (first 20)");
    for query in failures.iter().take(SAMPLE_LIMIT) {
        let _ = writeln!(out, "  - {}", truncate_sample(query));
    }
    out
}

/// Everything printed after the run: summary, then the histogram and
/// sample listing when requested and there is at least one failure.
pub fn render_report(summary: &Summary, config: &RunConfig) -> String {
    let mut out = render_summary(summary);
    if summary.failures.is_empty() {
        return out;
    }
    if config.categorize {
        out.push_str(&render_histogram(&summary.histogram()));
    }
    if config.verbose {
        out.push_str(&render_samples(&summary.failures));
    }
    out
}
