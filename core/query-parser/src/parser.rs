//! FILENAME: core/query-parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into a Query.
//! CONTEXT: This is the second stage of the parsing pipeline. It groups
//! tokens into whitespace-separated terms and classifies each term.
//!
//! GRAMMAR:
//!   query        --> WS? ( term ( WS term )* )? WS? EOF
//!   term         --> "-" negated | alternatives
//!   negated      --> ( atom | "|" )+          // the whole remainder, pipes kept literally
//!   alternatives --> atom? ( "|" atom? )*     // empty parts are dropped
//!   atom         --> ( WORD | PHRASE )+       // adjacent pieces are concatenated

use crate::ast::{Query, Term};
use crate::lexer::Lexer;
use crate::token::Token;

/// Parser errors with descriptive messages.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

/// The Parser struct holds the lexer and current token state.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    /// When false, an unterminated quote is an error instead of a phrase
    /// running to the end of the input.
    lenient: bool,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from an input string.
    /// Automatically advances to the first token.
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
            lenient: false,
        }
    }

    /// Accept unterminated quotes as phrases that run to the end of input.
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Parses the entire input and returns the query.
    pub fn parse(&mut self) -> ParseResult<Query> {
        let mut terms = Vec::new();

        loop {
            match self.current_token {
                Token::EOF => break,
                Token::Whitespace => self.advance(),
                _ => {
                    if let Some(term) = self.parse_term()? {
                        terms.push(term);
                    }
                }
            }
        }

        Ok(Query::new(terms))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    fn at_term_end(&self) -> bool {
        matches!(self.current_token, Token::Whitespace | Token::EOF)
    }

    /// Parses one whitespace-delimited term. Returns None for terms that
    /// carry no text (e.g. a bare "|").
    fn parse_term(&mut self) -> ParseResult<Option<Term>> {
        if self.current_token == Token::Minus {
            self.advance();
            return self.parse_negated();
        }
        self.parse_alternatives()
    }

    /// Everything after the '-' is taken literally, including pipes.
    fn parse_negated(&mut self) -> ParseResult<Option<Term>> {
        let mut text = String::new();
        while !self.at_term_end() {
            match self.current_token.clone() {
                Token::Pipe => {
                    text.push('|');
                    self.advance();
                }
                _ => text.push_str(&self.parse_atom()?),
            }
        }
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(Term::Exclude(text)))
    }

    fn parse_alternatives(&mut self) -> ParseResult<Option<Term>> {
        let mut parts = vec![String::new()];
        let mut saw_pipe = false;

        while !self.at_term_end() {
            if self.current_token == Token::Pipe {
                saw_pipe = true;
                parts.push(String::new());
                self.advance();
                continue;
            }
            let atom = self.parse_atom()?;
            if let Some(last) = parts.last_mut() {
                last.push_str(&atom);
            }
        }

        parts.retain(|p| !p.is_empty());

        Ok(match parts.len() {
            0 => None,
            1 if !saw_pipe => parts.pop().map(Term::Include),
            _ => Some(Term::AnyOf(parts)),
        })
    }

    /// Parses one atom: a word or a phrase.
    fn parse_atom(&mut self) -> ParseResult<String> {
        match self.current_token.clone() {
            Token::Word(s) | Token::Phrase(s) => {
                self.advance();
                Ok(s)
            }
            Token::UnterminatedPhrase(s) => {
                if !self.lenient {
                    return Err(ParseError::new(format!("Unterminated quoted phrase: {}", s)));
                }
                self.advance();
                Ok(s)
            }
            // A '-' that is not at the start of a term is plain text
            Token::Minus => {
                self.advance();
                Ok("-".to_string())
            }
            other => Err(ParseError::new(format!("Unexpected token: {:?}", other))),
        }
    }
}

/// Convenience function to parse a query string strictly.
pub fn parse(input: &str) -> ParseResult<Query> {
    let mut parser = Parser::new(input);
    parser.parse()
}

/// Parses a query, treating an unterminated quote as a phrase that runs to
/// the end of the input. Never fails.
pub fn parse_lenient(input: &str) -> Query {
    let mut parser = Parser::new(input).lenient();
    parser.parse().unwrap_or_default()
}
