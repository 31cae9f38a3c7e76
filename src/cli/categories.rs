//! Listing of the failure taxonomy

use crate::classify::{Category, RULES};
use std::fmt::Write;

/// The classification rules in the order they are tried.
pub fn get_categories_overview() -> String {
    let mut out = String::from("FAILURE CATEGORIES\n\n");
    out.push_str("Rules are tried top to bottom; the first match wins.\n");
    out.push_str("Keyword rules ignore case. Quote rules look at the original text.\n\n");

    for (idx, rule) in RULES.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<24}{}",
            idx + 1,
            rule.category.label(),
            rule.description
        );
    }
    let _ = writeln!(
        out,
        "  {}. {:<24}anything else",
        RULES.len() + 1,
        Category::Other.label()
    );

    out.push_str("\nRun 'spider-conformance classify <QUERY>' to classify one query.\n");
    out
}
