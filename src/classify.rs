//! Heuristic classification of parser failures.
//!
//! A failing query is matched against an ordered table of rules. The first
//! rule whose predicate holds decides the [`Category`]; a query that matches
//! nothing is [`Category::Other`]. The rules look at surface features of the
//! SQL text only, so a category is a hint about what the parser likely
//! choked on, not a diagnosis.
//!
//! # Examples
//!
//! ```
//! use spider_conformance::classify::{classify, Category};
//!
//! assert_eq!(classify("SELECT a || b FROM t"), Category::StringConcat);
//! assert_eq!(classify("SELECT COUNT(*) FROM singer"), Category::Other);
//! ```

use std::fmt;

/// Failure categories, in rule evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A `SELECT` appears after the first opening parenthesis
    Subquery,
    Except,
    Union,
    Intersect,
    CaseWhen,
    /// `||` string concatenation
    StringConcat,
    /// Empty `""` pair or an unbalanced double quote
    DoubleQuotedStrings,
    /// Nothing recognisable
    Other,
}

impl Category {
    /// Every category, in the order the classifier tries them.
    pub const ALL: [Category; 8] = [
        Category::Subquery,
        Category::Except,
        Category::Union,
        Category::Intersect,
        Category::CaseWhen,
        Category::StringConcat,
        Category::DoubleQuotedStrings,
        Category::Other,
    ];

    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Category::Subquery => "Subquery",
            Category::Except => "EXCEPT",
            Category::Union => "UNION",
            Category::Intersect => "INTERSECT",
            Category::CaseWhen => "CASE/WHEN",
            Category::StringConcat => "String concat (||)",
            Category::DoubleQuotedStrings => "Double-quoted strings",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two views of a query the rules need.
///
/// Keyword rules match against `upper`; quote rules must see `raw`.
#[derive(Debug, Clone)]
pub struct QueryText<'a> {
    raw: &'a str,
    upper: String,
}

impl<'a> QueryText<'a> {
    pub fn new(raw: &'a str) -> Self {
        QueryText {
            raw,
            upper: raw.to_uppercase(),
        }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn upper(&self) -> &str {
        &self.upper
    }
}

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub description: &'static str,
    predicate: fn(&QueryText<'_>) -> bool,
}

impl Rule {
    pub fn matches(&self, text: &QueryText<'_>) -> bool {
        (self.predicate)(text)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("category", &self.category)
            .field("description", &self.description)
            .finish()
    }
}

/// Classification rules, tried top to bottom. `Other` has no rule.
pub const RULES: &[Rule] = &[
    Rule {
        category: Category::Subquery,
        description: "SELECT appears again after the first '('",
        predicate: has_select_after_first_paren,
    },
    Rule {
        category: Category::Except,
        description: "contains ' EXCEPT '",
        predicate: |t: &QueryText<'_>| t.upper().contains(" EXCEPT "),
    },
    Rule {
        category: Category::Union,
        description: "contains ' UNION '",
        predicate: |t: &QueryText<'_>| t.upper().contains(" UNION "),
    },
    Rule {
        category: Category::Intersect,
        description: "contains ' INTERSECT '",
        predicate: |t: &QueryText<'_>| t.upper().contains(" INTERSECT "),
    },
    Rule {
        category: Category::CaseWhen,
        description: "contains 'CASE ' or ' WHEN '",
        predicate: |t: &QueryText<'_>| {
            t.upper().contains("CASE ") || t.upper().contains(" WHEN ")
        },
    },
    Rule {
        category: Category::StringConcat,
        description: "contains ' || '",
        predicate: |t: &QueryText<'_>| t.upper().contains(" || "),
    },
    Rule {
        category: Category::DoubleQuotedStrings,
        description: "contains '\"\"' or an odd number of '\"'",
        predicate: has_suspicious_double_quotes,
    },
];

// Scans to the end of the text, not to the matching ')'. Over-matching is
// intentional; tightening it would shift historical category counts.
fn has_select_after_first_paren(text: &QueryText<'_>) -> bool {
    let upper = text.upper();
    if !upper.contains("SELECT") {
        return false;
    }
    match upper.find('(') {
        Some(idx) => upper[idx + 1..].contains("SELECT"),
        None => false,
    }
}

fn has_suspicious_double_quotes(text: &QueryText<'_>) -> bool {
    let raw = text.raw();
    raw.contains("\"\"") || raw.matches('"').count() % 2 != 0
}

/// Assign a failing query to its category.
pub fn classify(query: &str) -> Category {
    let text = QueryText::new(query);
    RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map_or(Category::Other, |rule| rule.category)
}

/// Failure counts per category.
///
/// Entries keep first-encountered order, so ranking by count with a stable
/// sort breaks ties the same way every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    entries: Vec<(Category, usize)>,
    total: usize,
}

impl Histogram {
    /// Classify every query and tally the results.
    pub fn from_failures<I, S>(failures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        failures
            .into_iter()
            .map(|q| classify(q.as_ref()))
            .fold(Histogram::default(), |mut hist, category| {
                hist.record(category);
                hist
            })
    }

    pub fn record(&mut self, category: Category) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((category, 1)),
        }
        self.total += 1;
    }

    pub fn count(&self, category: Category) -> usize {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, count)| *count)
    }

    /// Number of classified failures.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Categories with their counts, most frequent first.
    pub fn ranked(&self) -> Vec<(Category, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
