//! FILENAME: core/query-parser/src/lib.rs
//! PURPOSE: Library root for the grid quick-filter query parser.
//! CONTEXT: This module exposes the lexer, parser, and AST components
//! needed to convert a free-text quick-filter query into a list of terms.
//!
//! PIPELINE: Query String --> Lexer --> Tokens --> Parser --> Query --> Matcher (table-engine)
//!
//! SUPPORTED FEATURES:
//! - Whitespace-separated terms, all of which must match
//! - Quoted phrases: "new york", 'new york'
//! - Negation: -word, -"some phrase"
//! - Alternatives: north|south
//!
//! The `/pattern/flags` regular-expression form is recognized by the
//! matcher before this parser runs, since it needs a regex engine.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;


pub use ast::{Query, Term};
pub use lexer::Lexer;
pub use parser::{parse, parse_lenient, ParseError, ParseResult, Parser};
pub use token::Token;
