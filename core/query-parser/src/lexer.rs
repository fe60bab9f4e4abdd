//! FILENAME: core/query-parser/src/lexer.rs
//! PURPOSE: Scans a raw quick-filter query and produces a stream of Tokens.
//! CONTEXT: This is the first stage of the parsing pipeline. It collapses
//! whitespace runs into a single separator token, reads quoted phrases as
//! atomic tokens, and recognizes the term-level operators '-' and '|'.
//!
//! RULES:
//! - A quote only opens a phrase at the start of an atom (start of a term,
//!   right after '-' or right after '|'). Quotes inside a word are literal,
//!   so `don't` stays one word.
//! - '-' is only an operator at the start of a term and only when something
//!   follows it. A lone `-` is a word.

use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    /// True when the next character begins a new term
    at_term_start: bool,
    /// True when the next character begins a new atom (word or phrase)
    at_atom_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
            at_term_start: true,
            at_atom_start: true,
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        let Some(&ch) = self.input.peek() else {
            return Token::EOF;
        };

        if ch.is_whitespace() {
            self.skip_whitespace();
            self.at_term_start = true;
            self.at_atom_start = true;
            return Token::Whitespace;
        }

        if ch == '|' {
            self.input.next();
            self.at_term_start = false;
            self.at_atom_start = true;
            return Token::Pipe;
        }

        if ch == '-' && self.at_term_start {
            self.input.next();
            // Only an operator if the term continues after it
            let continues = matches!(self.input.peek(), Some(&next) if !next.is_whitespace());
            self.at_term_start = false;
            if continues {
                self.at_atom_start = true;
                return Token::Minus;
            }
            self.at_atom_start = false;
            return Token::Word("-".to_string());
        }

        let atom_start = self.at_atom_start;
        self.at_term_start = false;
        self.at_atom_start = false;

        if atom_start && (ch == '"' || ch == '\'') {
            self.input.next();
            return self.read_phrase(ch);
        }

        self.read_word()
    }

    /// Collects every remaining token, including the trailing EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token == Token::EOF;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.input.next();
        }
    }

    /// Reads a quoted phrase. The opening quote was already consumed.
    fn read_phrase(&mut self, quote: char) -> Token {
        let mut result = String::new();
        for ch in self.input.by_ref() {
            if ch == quote {
                return Token::Phrase(result);
            }
            result.push(ch);
        }
        Token::UnterminatedPhrase(result)
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(&ch) = self.input.peek() {
            if ch.is_whitespace() || ch == '|' {
                break;
            }
            word.push(ch);
            self.input.next();
        }
        Token::Word(word)
    }
}
