//! FILENAME: core/query-parser/src/token.rs
//! PURPOSE: Token definitions for the quick-filter lexer.
//! CONTEXT: Tokens are the atomic units produced by the lexer and consumed by the parser.

/// Tokens recognized by the quick-filter lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Literals
    /// Bare run of text up to whitespace or '|'
    Word(String),
    /// Quoted phrase ("..." or '...'), kept as one atomic token
    Phrase(String),
    /// Quoted phrase that ran into end of input before its closing quote
    UnterminatedPhrase(String),

    // Operators
    /// Leading '-' of a term (negation)
    Minus,
    /// Alternative separator inside a term: a|b
    Pipe,

    // Delimiters
    /// One or more whitespace characters between terms
    Whitespace,

    // Special
    EOF,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(s) => write!(f, "{}", s),
            Token::Phrase(s) => write!(f, "\"{}\"", s),
            Token::UnterminatedPhrase(s) => write!(f, "\"{}", s),
            Token::Minus => write!(f, "-"),
            Token::Pipe => write!(f, "|"),
            Token::Whitespace => write!(f, " "),
            Token::EOF => write!(f, "EOF"),
        }
    }
}
