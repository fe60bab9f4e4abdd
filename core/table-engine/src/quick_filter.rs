//! FILENAME: core/table-engine/src/quick_filter.rs
//! PURPOSE: Free-text quick filter matched across all column values of a row.
//! CONTEXT: The row's display values are joined with single spaces into one
//! search string. A query of the form `/pattern/flags` is a regular
//! expression; anything else (including an invalid regex) goes through the
//! token language in the `query-parser` crate.

use query_parser::{parse_lenient, Term};
use regex::{Regex, RegexBuilder};

use crate::cell::CellValue;
use crate::column::Column;
use crate::row::Row;
use crate::{log_debug, log_warn};

/// Flags accepted after the closing slash. `g`, `u` and `y` are accepted but have no effect.
const REGEX_FLAGS: &str = "gimsuxy";

#[derive(Debug, Clone)]
enum Matcher {
    All,
    Pattern(Regex),
    /// Lowercased terms, all of which must hold.
    Terms(Vec<Term>),
}

/// A compiled quick-filter query.
#[derive(Debug, Clone)]
pub struct QuickFilter {
    source: String,
    matcher: Matcher,
}

impl Default for QuickFilter {
    fn default() -> Self {
        QuickFilter { source: String::new(), matcher: Matcher::All }
    }
}

impl QuickFilter {
    pub fn new(query: &str) -> Self {
        let trimmed = query.trim();
        let matcher = if trimmed.is_empty() {
            Matcher::All
        } else if let Some(regex) = compile_regex(trimmed) {
            Matcher::Pattern(regex)
        } else {
            let parsed = parse_lenient(trimmed);
            if parsed.is_empty() {
                Matcher::All
            } else {
                Matcher::Terms(parsed.terms.into_iter().map(lowercase_term).collect())
            }
        };
        QuickFilter { source: query.to_string(), matcher }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.matcher, Matcher::All)
    }

    pub fn is_regex(&self) -> bool {
        matches!(self.matcher, Matcher::Pattern(_))
    }

    /// Tests an already joined search string.
    pub fn matches_text(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Pattern(regex) => regex.is_match(text),
            Matcher::Terms(terms) => {
                let haystack = text.to_lowercase();
                terms.iter().all(|term| match term {
                    Term::Include(needle) => haystack.contains(needle.as_str()),
                    Term::Exclude(needle) => !haystack.contains(needle.as_str()),
                    Term::AnyOf(parts) => parts.iter().any(|p| haystack.contains(p.as_str())),
                })
            }
        }
    }

    pub fn matches_row(&self, row: &Row, columns: &[Column]) -> bool {
        if self.is_empty() {
            return true;
        }
        self.matches_text(&row_search_text(row, columns))
    }
}

/// Display values of every column, joined with spaces. Blank cells are skipped.
pub fn row_search_text(row: &Row, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.value(row))
        .filter(|v| !matches!(v, CellValue::Empty))
        .map(|v| v.display_value())
        .collect::<Vec<_>>()
        .join(" ")
}

fn lowercase_term(term: Term) -> Term {
    match term {
        Term::Include(s) => Term::Include(s.to_lowercase()),
        Term::Exclude(s) => Term::Exclude(s.to_lowercase()),
        Term::AnyOf(parts) => Term::AnyOf(parts.into_iter().map(|p| p.to_lowercase()).collect()),
    }
}

/// `None` when the query is not in `/pattern/flags` form or does not compile.
fn compile_regex(query: &str) -> Option<Regex> {
    let body = query.strip_prefix('/')?;
    let close = body.rfind('/')?;
    let (pattern, flags) = (&body[..close], &body[close + 1..]);
    if pattern.is_empty() || !flags.chars().all(|f| REGEX_FLAGS.contains(f)) {
        return None;
    }

    let mut builder = RegexBuilder::new(pattern);
    builder
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'));
    match builder.build() {
        Ok(regex) => {
            log_debug!("FILTER", "quick filter compiled as regex /{}/{}", pattern, flags);
            Some(regex)
        }
        Err(e) => {
            log_warn!("FILTER", "invalid quick filter regex '{}': {}; using token match", pattern, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        assert!(QuickFilter::new("   ").is_empty());
        assert!(QuickFilter::new("").matches_text("anything"));
    }

    #[test]
    fn negation_excludes_rows() {
        let q = QuickFilter::new("-foo");
        assert!(!q.matches_text("has foo inside"));
        assert!(q.matches_text("bar"));
    }

    #[test]
    fn all_terms_must_match_case_insensitively() {
        let q = QuickFilter::new("North Widget");
        assert!(q.matches_text("widget sold in the NORTH"));
        assert!(!q.matches_text("widget sold in the south"));
    }

    #[test]
    fn alternatives_match_any_part() {
        let q = QuickFilter::new("red|blue");
        assert!(q.matches_text("Blue car"));
        assert!(!q.matches_text("green car"));
    }

    #[test]
    fn quoted_phrases_are_atomic() {
        let q = QuickFilter::new("\"new york\"");
        assert!(q.matches_text("Flights to New York"));
        assert!(!q.matches_text("york is new"));
    }

    #[test]
    fn regex_queries() {
        let q = QuickFilter::new("/^ab+c$/");
        assert!(q.is_regex());
        assert!(q.matches_text("abbbc"));
        assert!(!q.matches_text("ABC"));
        assert!(QuickFilter::new("/^ab+c$/i").matches_text("ABC"));
    }

    #[test]
    fn invalid_regex_falls_back_to_tokens() {
        let q = QuickFilter::new("/a(b/");
        assert!(!q.is_regex());
        assert!(q.matches_text("x /a(b/ y"));
        assert!(!q.matches_text("ab"));
    }

    #[test]
    fn unknown_flags_are_not_a_regex() {
        assert!(!QuickFilter::new("/usr/bin").is_regex());
    }

    #[test]
    fn row_text_joins_column_values() {
        let row = Row::new().with("a", "alpha").with("b", 2).with("c", true);
        let columns = vec![Column::new("a"), Column::new("b"), Column::new("c"), Column::new("d")];
        assert_eq!(row_search_text(&row, &columns), "alpha 2 true");
        assert!(QuickFilter::new("alpha 2").matches_row(&row, &columns));
    }
}
