// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hand-written scanner.
//!
//! The input is first split into *raw tokens*: maximal runs of word
//! characters, or single special characters, with line/column tracking.
//! Classification then runs per raw token, in priority order: comment
//! stripping, the closed keyword/operator/punctuation/bracket maps,
//! numeric validation, identifiers. Two-character operators (`<>`, `<=`,
//! `>=`, `==`) and real numbers (`3 . 14` → `3.14`) are assembled with one
//! raw token of lookahead through a pushback cursor.
//!
//! The scanner never aborts on a defect: every lexical error is
//! accumulated and returned next to the token sequence, and the caller
//! decides success by checking that the error list is empty.

use std::str::CharIndices;

use lazy_static::lazy_static;
use regex::Regex;
use unicode_xid::UnicodeXID;

use crate::common::ErrorCode::*;
use crate::common::{ErrorCode, LexicalError};
use crate::symtab::SymbolTable;
use crate::token::{self, NumKind, Operator, Token, TokenKind};


/// Lexeme of the synthetic end-of-input token.
pub const EOF_LEXEME: &str = "$";

fn is_word_char(c: char) -> bool {
    // '/' and '*' ride along word runs so comment markers arrive as words
    c == '_' || c == '/' || c == '*' || c.is_ascii_digit() || UnicodeXID::is_xid_continue(c)
}

/// A raw token: either a run of word characters or one special character.
#[derive(Clone, Copy, Debug)]
struct RawTok<'input> {
    text: &'input str,
    line: u32,
    column: u32,
    word: bool,
}

/// Splits the source into raw tokens, tracking line and column.
struct RawScanner<'input> {
    text: &'input str,
    chars: CharIndices<'input>,
    lookahead: Option<(usize, char)>,
    line: u32,
    column: u32,
}

impl<'input> RawScanner<'input> {
    fn new(text: &'input str) -> Self {
        let mut scanner = RawScanner {
            text,
            chars: text.char_indices(),
            lookahead: None,
            line: 1,
            column: 1,
        };
        scanner.lookahead = scanner.chars.next();
        scanner
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        if let Some((_, c)) = self.lookahead {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.lookahead = self.chars.next();
        self.lookahead
    }

    fn take_while<F>(&mut self, mut keep_going: F) -> Option<usize>
    where
        F: FnMut(char) -> bool,
    {
        loop {
            match self.lookahead {
                None => {
                    return None;
                }
                Some((idx, c)) => {
                    if keep_going(c) {
                        self.bump();
                    } else {
                        return Some(idx);
                    }
                }
            }
        }
    }

    fn next_raw(&mut self) -> Option<RawTok<'input>> {
        while let Some((_, c)) = self.lookahead {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }

        let (start, c) = self.lookahead?;
        let (line, column) = (self.line, self.column);

        if is_word_char(c) {
            let text = match self.take_while(is_word_char) {
                Some(end) => &self.text[start..end],
                None => &self.text[start..],
            };
            Some(RawTok {
                text,
                line,
                column,
                word: true,
            })
        } else {
            self.bump();
            let end = match self.lookahead {
                Some((idx, _)) => idx,
                None => self.text.len(),
            };
            Some(RawTok {
                text: &self.text[start..end],
                line,
                column,
                word: false,
            })
        }
    }
}

lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"^(0|[1-9][0-9]*)$").unwrap();
}

/// The scanner proper. Per-parse state: construct one per source text.
pub struct Lexer<'input, 'st> {
    scanner: RawScanner<'input>,
    /// One-raw-token pushback cursor; lookahead state is structural, not a
    /// mode flag.
    pushback: Option<RawTok<'input>>,
    symtab: &'st mut SymbolTable,
    errors: Vec<LexicalError>,
}

impl<'input, 'st> Lexer<'input, 'st> {
    pub fn new(source: &'input str, symtab: &'st mut SymbolTable) -> Self {
        Lexer {
            scanner: RawScanner::new(source),
            pushback: None,
            symtab,
            errors: Vec::new(),
        }
    }

    /// Scans the whole input eagerly. The token sequence always ends with
    /// a single EOF token; the error list is the only error channel.
    pub fn scan(mut self) -> (Vec<Token>, Vec<LexicalError>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            match tok.kind {
                TokenKind::Eof => {
                    tokens.push(tok);
                    break;
                }
                // defects are reported through the error list; a failed
                // lookahead guess is discarded without a trace
                TokenKind::Error | TokenKind::Backtrack => continue,
                TokenKind::Ident => {
                    self.symtab.add_symbol(&tok);
                    tokens.push(tok);
                }
                _ => tokens.push(tok),
            }
        }
        (tokens, self.errors)
    }

    fn bump_raw(&mut self) -> Option<RawTok<'input>> {
        match self.pushback.take() {
            Some(raw) => Some(raw),
            None => self.scanner.next_raw(),
        }
    }

    fn peek_raw(&mut self) -> Option<&RawTok<'input>> {
        if self.pushback.is_none() {
            self.pushback = self.scanner.next_raw();
        }
        self.pushback.as_ref()
    }

    fn error(&mut self, code: ErrorCode, token: Token) {
        log::debug!("lexical error {code} at line {}: [{}]", token.line, token.lexeme);
        self.errors.push(LexicalError::new(code, token));
    }

    fn next_token(&mut self) -> Token {
        loop {
            let raw = match self.bump_raw() {
                Some(raw) => raw,
                None => {
                    return Token::new(
                        EOF_LEXEME.to_string(),
                        self.scanner.line,
                        self.scanner.column,
                        TokenKind::Eof,
                    );
                }
            };

            // comment stripping, by hand
            if raw.word {
                if raw.text == "/**/" {
                    continue;
                }
                if raw.text.starts_with("/*") {
                    if !self.skip_comment() {
                        let token =
                            Token::new(EOF_LEXEME.to_string(), raw.line, raw.column, TokenKind::Error);
                        self.error(UnexpectedEof, token);
                    }
                    continue;
                }
                if raw.text.starts_with("*/") {
                    let token =
                        Token::new(raw.text.to_string(), raw.line, raw.column, TokenKind::Error);
                    self.error(ExtraClosingComment, token);
                    continue;
                }
            }

            // exact-match closed maps: keywords, operators, punctuation,
            // brackets
            if let Some(kind) = token::classify(raw.text) {
                if let TokenKind::Operator(op) = kind {
                    if matches!(op, Operator::Lt | Operator::Gt | Operator::Assign) {
                        return self.ambiguous_operator(raw, op);
                    }
                }
                return Token::new(raw.text.to_string(), raw.line, raw.column, kind);
            }

            // numeric literals
            if raw.text.starts_with(|c: char| c.is_ascii_digit()) {
                return self.number(raw);
            }

            // remaining word runs are identifiers
            if raw.word {
                return Token::new(raw.text.to_string(), raw.line, raw.column, TokenKind::Ident);
            }

            // anything else is not part of the alphabet
            let token = Token::new(raw.text.to_string(), raw.line, raw.column, TokenKind::Error);
            self.error(InvalidChar, token);
        }
    }

    /// Consumes raw tokens until a closing comment marker. Returns whether
    /// the terminator was found before input exhaustion.
    fn skip_comment(&mut self) -> bool {
        loop {
            match self.bump_raw() {
                None => return false,
                Some(raw) if raw.word && raw.text.starts_with("*/") => return true,
                Some(_) => continue,
            }
        }
    }

    /// `<`, `>`, and `=` may start a two-character operator; one raw token
    /// of lookahead decides. A failed guess leaves the lookahead in the
    /// pushback cursor to be re-lexed normally.
    fn ambiguous_operator(&mut self, raw: RawTok<'input>, op: Operator) -> Token {
        let merged = match (op, self.peek_raw().map(|r| r.text)) {
            (Operator::Lt, Some(">")) => Some(Operator::Ne),
            (Operator::Lt, Some("=")) => Some(Operator::Le),
            (Operator::Gt, Some("=")) => Some(Operator::Ge),
            (Operator::Assign, Some("=")) => Some(Operator::Eq),
            _ => None,
        };

        match merged {
            Some(two_char) => {
                let second = self.bump_raw().unwrap();
                Token::new(
                    format!("{}{}", raw.text, second.text),
                    raw.line,
                    raw.column,
                    TokenKind::Operator(two_char),
                )
            }
            None => Token::new(
                raw.text.to_string(),
                raw.line,
                raw.column,
                TokenKind::Operator(op),
            ),
        }
    }

    /// Validates an integer-looking word, then assembles a real number if
    /// a `.` and a numeric fractional part follow.
    fn number(&mut self, raw: RawTok<'input>) -> Token {
        let value = match validate_integer(raw.text) {
            Ok(value) => value,
            Err(code) => {
                let token = Token::new(raw.text.to_string(), raw.line, raw.column, TokenKind::Error);
                self.error(code, token.clone());
                return token;
            }
        };

        if self.peek_raw().map(|r| r.text) != Some(".") {
            return Token::new(
                raw.text.to_string(),
                raw.line,
                raw.column,
                TokenKind::Num(NumKind::Integer),
            )
            .with_value(value);
        }

        // integer '.' something: commit to assembling a real number
        self.bump_raw();
        match self.bump_raw() {
            Some(frac) if frac.text.starts_with(|c: char| c.is_ascii_digit()) => {
                match validate_fraction(frac.text) {
                    Ok(()) => {
                        let lexeme = format!("{}.{}", raw.text, frac.text);
                        let mut token = Token::new(
                            lexeme,
                            raw.line,
                            raw.column,
                            TokenKind::Num(NumKind::Real),
                        );
                        if let Ok(value) = token.lexeme.parse::<f64>() {
                            token = token.with_value(value);
                        }
                        token
                    }
                    Err(code) => {
                        let lexeme = format!("{}.{}", raw.text, frac.text);
                        let token =
                            Token::new(lexeme, raw.line, raw.column, TokenKind::Error);
                        self.error(code, token.clone());
                        token
                    }
                }
            }
            Some(other) => {
                // the lookahead is not a fractional part; it is swallowed
                // into the faulting lexeme
                let lexeme = format!("{}.{}", raw.text, other.text);
                let token = Token::new(lexeme, raw.line, raw.column, TokenKind::Error);
                self.error(BadReal, token.clone());
                token
            }
            None => {
                let lexeme = format!("{}.", raw.text);
                let token = Token::new(lexeme, raw.line, raw.column, TokenKind::Error);
                self.error(BadReal, token.clone());
                token
            }
        }
    }
}

/// Integer validation: no leading zeros (the literal `0` itself is fine),
/// digits only, and within range.
fn validate_integer(text: &str) -> Result<f64, ErrorCode> {
    if text.starts_with('0') && text.len() > 1 {
        return Err(LeadingZeros);
    }
    if !INTEGER_RE.is_match(text) {
        return Err(InvalidNumberFormat);
    }
    match text.parse::<i64>() {
        Ok(value) => Ok(value as f64),
        Err(_) => Err(InvalidNumberFormat),
    }
}

/// Fractional-part validation: must not start with a letter, must not end
/// in a redundant zero, and must be digits only.
fn validate_fraction(text: &str) -> Result<(), ErrorCode> {
    if text.starts_with(|c: char| c.is_alphabetic()) {
        return Err(InvalidNumberFormat);
    }
    if text.ends_with('0') && text.len() > 1 {
        return Err(TrailingZeros);
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(InvalidNumberFormat);
    }
    Ok(())
}
