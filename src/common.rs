// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Error codes shared by the lexical and syntactic taxonomies.
///
/// A single flat enum instead of an error-class hierarchy; the category a
/// code belongs to is decided by the error struct that carries it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    NoError, // will never be produced
    // lexical
    InvalidChar,
    LeadingZeros,
    TrailingZeros,
    BadReal,
    InvalidNumberFormat,
    UnexpectedEof,
    ExtraClosingComment,
    // syntactic
    GeneralSyntaxError,
    MismatchedParens,
    NoProgramEntryPoint,
    MissingSemicolon,
    // either
    Custom,
}

impl ErrorCode {
    /// Canonical one-line description, used in the diagnostic format.
    pub fn message(&self) -> &'static str {
        use ErrorCode::*;
        match self {
            NoError => "OK",
            InvalidChar => "Invalid character encountered",
            LeadingZeros => "Illegal leading zero(s) encountered",
            TrailingZeros => "Illegal trailing zero(s) encountered",
            BadReal => "Badly formed real number",
            InvalidNumberFormat => "Invalid number format (number either too big or has non-digits)",
            UnexpectedEof => "Unexpected end of file, possibly an unterminated comment",
            ExtraClosingComment => "Unmatched terminating comment",
            GeneralSyntaxError => "Syntax error",
            MismatchedParens => "Mismatched parenthesis",
            NoProgramEntryPoint => "No main 'program' has been found",
            MissingSemicolon => "Missing semicolon at the end of a statement",
            Custom => "Custom error message",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            InvalidChar => "invalid_char",
            LeadingZeros => "leading_zeros",
            TrailingZeros => "trailing_zeros",
            BadReal => "bad_real",
            InvalidNumberFormat => "invalid_number_format",
            UnexpectedEof => "unexpected_eof",
            ExtraClosingComment => "extra_closing_comment",
            GeneralSyntaxError => "general_syntax_error",
            MismatchedParens => "mismatched_parens",
            NoProgramEntryPoint => "no_program_entry_point",
            MissingSemicolon => "missing_semicolon",
            Custom => "custom",
        };

        write!(f, "{name}")
    }
}

/// A defect found while scanning. The scanner accumulates these and keeps
/// going; the list is the only error channel.
#[derive(Clone, Debug, PartialEq)]
pub struct LexicalError {
    pub code: ErrorCode,
    pub line: u32,
    pub token: Token,
    pub details: Option<String>,
}

impl LexicalError {
    pub fn new(code: ErrorCode, token: Token) -> Self {
        LexicalError {
            code,
            line: token.line,
            token,
            details: None,
        }
    }

    pub fn custom(token: Token, details: String) -> Self {
        LexicalError {
            code: ErrorCode::Custom,
            line: token.line,
            token,
            details: Some(details),
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(
                f,
                "Lexical Error (line {}): {} - {}: {}, faulting token: [{}]",
                self.line,
                self.code,
                self.code.message(),
                details,
                self.token.lexeme
            ),
            None => write!(
                f,
                "Lexical Error (line {}): {} - {}, faulting token: [{}]",
                self.line,
                self.code,
                self.code.message(),
                self.token.lexeme
            ),
        }
    }
}

/// A defect found while parsing. Table cells carry token-less syntax
/// errors; the parser fills in the faulting token when it records one.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub line: u32,
    pub token: Option<Token>,
    pub details: Option<String>,
}

impl SyntaxError {
    pub fn new(code: ErrorCode) -> Self {
        SyntaxError {
            code,
            line: 0,
            token: None,
            details: None,
        }
    }

    pub fn at_token(code: ErrorCode, token: Token) -> Self {
        SyntaxError {
            code,
            line: token.line,
            token: Some(token),
            details: None,
        }
    }

    pub fn custom(details: String) -> Self {
        SyntaxError {
            code: ErrorCode::Custom,
            line: 0,
            token: None,
            details: Some(details),
        }
    }

    /// The info might not be available when the error is first built (as
    /// in a transition-table cell); attach it once it is.
    pub fn with_token(mut self, token: Token) -> Self {
        self.line = token.line;
        self.token = Some(token);
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lexeme = self.token.as_ref().map(|t| t.lexeme.as_str()).unwrap_or("");
        match self.details {
            Some(ref details) => write!(
                f,
                "Syntax Error (line {}): {} - {}: {}, faulting token: [{}]",
                self.line,
                self.code,
                self.code.message(),
                details,
                lexeme
            ),
            None => write!(
                f,
                "Syntax Error (line {}): {} - {}, faulting token: [{}]",
                self.line,
                self.code,
                self.code.message(),
                lexeme
            ),
        }
    }
}

/// Top-level error for the crate boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum CompilerError {
    Lexical(LexicalError),
    Syntax(SyntaxError),
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::Lexical(e) => write!(f, "{e}"),
            CompilerError::Syntax(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for CompilerError {}

impl From<LexicalError> for CompilerError {
    fn from(err: LexicalError) -> Self {
        CompilerError::Lexical(err)
    }
}

impl From<SyntaxError> for CompilerError {
    fn from(err: SyntaxError) -> Self {
        CompilerError::Syntax(err)
    }
}

pub type Result<T> = result::Result<T, CompilerError>;
