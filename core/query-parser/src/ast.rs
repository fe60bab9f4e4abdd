//! FILENAME: core/query-parser/src/ast.rs
//! PURPOSE: Defines the syntax tree for quick-filter queries.
//! CONTEXT: After the Lexer tokenizes a query string, the Parser converts
//! those tokens into a flat list of terms. The table engine then matches
//! every term against the joined text of a row.
//!
//! SUPPORTED TERMS:
//! - Plain word or quoted phrase: `north`, `"new york"` (must appear)
//! - Negation: `-north`, `-"new york"` (must not appear)
//! - Alternatives: `north|south|"far east"` (any part may appear)

/// A single term of a quick-filter query. Needles keep their original case;
/// matching is case-insensitive and done by the caller.
#[derive(Debug, PartialEq, Clone)]
pub enum Term {
    /// The text must appear in the row.
    Include(String),
    /// The text must not appear in the row.
    Exclude(String),
    /// At least one of the parts must appear in the row.
    AnyOf(Vec<String>),
}

impl Term {
    /// All needles referenced by this term.
    pub fn needles(&self) -> Vec<&str> {
        match self {
            Term::Include(s) | Term::Exclude(s) => vec![s.as_str()],
            Term::AnyOf(parts) => parts.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Term::Exclude(_))
    }
}

/// A parsed query: every term must hold (AND semantics).
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Query {
    pub terms: Vec<Term>,
}

impl Query {
    pub fn new(terms: Vec<Term>) -> Self {
        Query { terms }
    }

    /// An empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn write_needle(f: &mut std::fmt::Formatter<'_>, needle: &str) -> std::fmt::Result {
    if needle.chars().any(|c| c.is_whitespace() || c == '|') {
        write!(f, "\"{}\"", needle)
    } else {
        write!(f, "{}", needle)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Include(s) => write_needle(f, s),
            Term::Exclude(s) => {
                write!(f, "-")?;
                write_needle(f, s)
            }
            Term::AnyOf(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write_needle(f, part)?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}
