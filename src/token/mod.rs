// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Token model: the closed set of token kinds and subkinds, the `Token`
//! record produced by the scanner, and the static classification maps for
//! keywords, operators, punctuation, and brackets.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

#[cfg(test)]
mod test;

/// Keyword subkinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    And,
    Class,
    Do,
    Else,
    If,
    Integer,
    Not,
    Or,
    Program,
    Read,
    Real,
    Return,
    Then,
    This,
    While,
    Write,
}

/// Operator subkinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Plus,
    Minus,
    Mul,
    Div,
    Assign,
    Member,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Punctuation {
    Comma,
    Semicolon,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bracket {
    ParenOpen,
    ParenClose,
    CurlyOpen,
    CurlyClose,
    SquareOpen,
    SquareClose,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumKind {
    Integer,
    Real,
}

/// Token kind carrying its subkind, flattening the old type/subtype split
/// into one tagged union.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Operator(Operator),
    Punctuation(Punctuation),
    Bracket(Bracket),
    Num(NumKind),
    Ident,
    Unknown,
    Eof,
    Error,
    /// Pseudo-token emitted when a lookahead guess fails; never appears in
    /// scan output.
    Backtrack,
}

impl TokenKind {
    /// Category name, as it appears in the lexical log.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "KEYWORD",
            TokenKind::Operator(_) => "OPERATOR",
            TokenKind::Punctuation(_) => "PUNCT",
            TokenKind::Bracket(_) => "BRACKET",
            TokenKind::Num(_) => "NUM",
            TokenKind::Ident => "ID",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "ERROR",
            TokenKind::Backtrack => "BACKTRACK",
        }
    }

    /// Subkind name, as it appears in the lexical log. Kinds without a
    /// subkind report `UNKNOWN`.
    pub fn subkind_name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(kw) => match kw {
                Keyword::And => "AND",
                Keyword::Class => "CLASS",
                Keyword::Do => "DO",
                Keyword::Else => "ELSE",
                Keyword::If => "IF",
                Keyword::Integer => "INTEGER",
                Keyword::Not => "NOT",
                Keyword::Or => "OR",
                Keyword::Program => "PROGRAM",
                Keyword::Read => "READ",
                Keyword::Real => "REAL",
                Keyword::Return => "RETURN",
                Keyword::Then => "THEN",
                Keyword::This => "THIS",
                Keyword::While => "WHILE",
                Keyword::Write => "WRITE",
            },
            TokenKind::Operator(op) => match op {
                Operator::Eq => "OP_EQ",
                Operator::Ne => "OP_NE",
                Operator::Lt => "OP_LT",
                Operator::Gt => "OP_GT",
                Operator::Le => "OP_LE",
                Operator::Ge => "OP_GE",
                Operator::Plus => "OP_PLUS",
                Operator::Minus => "OP_MINUS",
                Operator::Mul => "OP_MULT",
                Operator::Div => "OP_DIV",
                Operator::Assign => "OP_ASIGN",
                Operator::Member => "OP_MEMB",
            },
            TokenKind::Punctuation(p) => match p {
                Punctuation::Comma => "COMMA",
                Punctuation::Semicolon => "SEMICOLON",
            },
            TokenKind::Bracket(b) => match b {
                Bracket::ParenOpen => "PAREN_OP",
                Bracket::ParenClose => "PAREN_CL",
                Bracket::CurlyOpen => "CURLY_OP",
                Bracket::CurlyClose => "CURLY_CL",
                Bracket::SquareOpen => "SQR_OP",
                Bracket::SquareClose => "SQR_CL",
            },
            TokenKind::Num(n) => match n {
                NumKind::Integer => "INTEGER",
                NumKind::Real => "REAL",
            },
            _ => "UNKNOWN",
        }
    }
}

/// One scanned token. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub kind: TokenKind,
    /// Numerical value, set for `Num` tokens.
    pub value: Option<f64>,
}

impl Token {
    pub fn new(lexeme: String, line: u32, column: u32, kind: TokenKind) -> Self {
        Token {
            lexeme,
            line,
            column,
            kind,
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// One line of the lexical log: `<line>: <kind>, [ <lexeme> ], <subkind>`.
    pub fn log_line(&self) -> String {
        format!(
            "{}: {}, [ {} ], {}",
            self.line,
            self.kind.name(),
            self.lexeme,
            self.kind.subkind_name()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.log_line())
    }
}

lazy_static! {
    pub static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        use Keyword::*;
        HashMap::from([
            ("and", And),
            ("class", Class),
            ("do", Do),
            ("else", Else),
            ("if", If),
            ("integer", Integer),
            ("not", Not),
            ("or", Or),
            ("program", Program),
            ("read", Read),
            ("real", Real),
            ("return", Return),
            ("then", Then),
            ("this", This),
            ("while", While),
            ("write", Write),
        ])
    };
    pub static ref OPERATORS: HashMap<&'static str, Operator> = {
        use Operator::*;
        HashMap::from([
            ("==", Eq),
            ("<>", Ne),
            ("<", Lt),
            (">", Gt),
            ("<=", Le),
            (">=", Ge),
            ("+", Plus),
            ("-", Minus),
            ("*", Mul),
            ("/", Div),
            ("=", Assign),
            (".", Member),
        ])
    };
    pub static ref PUNCTUATION: HashMap<&'static str, Punctuation> = {
        use Punctuation::*;
        HashMap::from([(",", Comma), (";", Semicolon)])
    };
    pub static ref BRACKETS: HashMap<&'static str, Bracket> = {
        use Bracket::*;
        HashMap::from([
            ("(", ParenOpen),
            (")", ParenClose),
            ("{", CurlyOpen),
            ("}", CurlyClose),
            ("[", SquareOpen),
            ("]", SquareClose),
        ])
    };
}

/// Classify a lexeme against the closed maps, in priority order: keyword,
/// operator, punctuation, bracket. `None` means the lexeme is none of
/// these (a number, an identifier, or garbage).
pub fn classify(lexeme: &str) -> Option<TokenKind> {
    if let Some(kw) = KEYWORDS.get(lexeme) {
        return Some(TokenKind::Keyword(*kw));
    }
    if let Some(op) = OPERATORS.get(lexeme) {
        return Some(TokenKind::Operator(*op));
    }
    if let Some(p) = PUNCTUATION.get(lexeme) {
        return Some(TokenKind::Punctuation(*p));
    }
    if let Some(b) = BRACKETS.get(lexeme) {
        return Some(TokenKind::Bracket(*b));
    }
    None
}
