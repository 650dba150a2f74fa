// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use super::*;

#[test]
fn keywords_classify() {
    assert_eq!(classify("if"), Some(TokenKind::Keyword(Keyword::If)));
    assert_eq!(classify("program"), Some(TokenKind::Keyword(Keyword::Program)));
    assert_eq!(classify("class"), Some(TokenKind::Keyword(Keyword::Class)));
    // case-sensitive, like the source language
    assert_eq!(classify("If"), None);
}

#[test]
fn operators_classify() {
    assert_eq!(classify("<="), Some(TokenKind::Operator(Operator::Le)));
    assert_eq!(classify("<>"), Some(TokenKind::Operator(Operator::Ne)));
    assert_eq!(classify("=="), Some(TokenKind::Operator(Operator::Eq)));
    assert_eq!(classify("="), Some(TokenKind::Operator(Operator::Assign)));
    assert_eq!(classify("."), Some(TokenKind::Operator(Operator::Member)));
}

#[test]
fn punctuation_and_brackets_classify() {
    assert_eq!(classify(";"), Some(TokenKind::Punctuation(Punctuation::Semicolon)));
    assert_eq!(classify(","), Some(TokenKind::Punctuation(Punctuation::Comma)));
    assert_eq!(classify("{"), Some(TokenKind::Bracket(Bracket::CurlyOpen)));
    assert_eq!(classify("]"), Some(TokenKind::Bracket(Bracket::SquareClose)));
}

#[test]
fn classification_is_stable() {
    // repeated classification over every table entry is deterministic
    for (lexeme, kw) in KEYWORDS.iter() {
        for _ in 0..3 {
            assert_eq!(classify(lexeme), Some(TokenKind::Keyword(*kw)));
        }
    }
    for (lexeme, op) in OPERATORS.iter() {
        for _ in 0..3 {
            assert_eq!(classify(lexeme), Some(TokenKind::Operator(*op)));
        }
    }
    for (lexeme, p) in PUNCTUATION.iter() {
        assert_eq!(classify(lexeme), Some(TokenKind::Punctuation(*p)));
    }
    for (lexeme, b) in BRACKETS.iter() {
        assert_eq!(classify(lexeme), Some(TokenKind::Bracket(*b)));
    }
}

#[test]
fn unclassified_lexemes() {
    assert_eq!(classify("foo"), None);
    assert_eq!(classify("42"), None);
    assert_eq!(classify("<=>"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn log_line_shape() {
    let tok = Token::new("while".to_string(), 12, 4, TokenKind::Keyword(Keyword::While));
    assert_eq!(tok.log_line(), "12: KEYWORD, [ while ], WHILE");

    let tok = Token::new("3.14".to_string(), 2, 1, TokenKind::Num(NumKind::Real)).with_value(3.14);
    assert_eq!(tok.log_line(), "2: NUM, [ 3.14 ], REAL");
    assert_eq!(tok.value, Some(3.14));

    let tok = Token::new("$".to_string(), 9, 1, TokenKind::Eof);
    assert_eq!(tok.log_line(), "9: EOF, [ $ ], UNKNOWN");
}
