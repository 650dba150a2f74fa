// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Deterministic table-driven predictive parser.
//!
//! A symbol-stack rewriting engine driven by the transition table and a
//! scanned token stream. The parser's state is the pair (stack contents,
//! current lookahead); the stack starts as `[EOF, start]` and the parse
//! accepts when the stack has reduced to `[EOF]` with the lookahead at the
//! EOF token and no errors accumulated.
//!
//! On a defect the parser records a syntax error and keeps going with
//! panic-mode recovery: one further token of lookahead decides between
//! popping the offending stack symbol (when the lookahead is EOF or in
//! the FOLLOW set of the non-terminal on top) and skipping the current
//! lookahead. Every recovery step either shrinks the stack or advances
//! the input, so the loop terminates on any finite input.

use crate::common::{CompilerError, ErrorCode, LexicalError, SyntaxError};
use crate::grammar::Symbol;
use crate::grammar::table::{TableEntry, TransitionTable};
use crate::lexer::{EOF_LEXEME, Lexer};
use crate::symtab::SymbolTable;
use crate::token::{Token, TokenKind};

#[cfg(test)]
mod tests;

/// Everything a finished parse reports.
#[derive(Clone, Debug)]
pub struct ParseOutcome {
    pub success: bool,
    pub lexical_errors: Vec<LexicalError>,
    pub syntax_errors: Vec<SyntaxError>,
    /// One line per reduction: `R<id>: <rule text>`.
    pub trace: Vec<String>,
    pub symtab: SymbolTable,
}

/// Per-parse state; construct one per token stream.
pub struct Parser<'g> {
    table: &'g TransitionTable,
    tokens: Vec<Token>,
    pos: usize,
    stack: Vec<Symbol>,
    lexical_errors: Vec<LexicalError>,
    syntax_errors: Vec<SyntaxError>,
    trace: Vec<String>,
}

impl<'g> Parser<'g> {
    /// The token stream must come from a completed scan: non-empty and
    /// ending with the EOF token. Lexical errors from that scan count
    /// against the parse verdict.
    pub fn new(
        table: &'g TransitionTable,
        mut tokens: Vec<Token>,
        lexical_errors: Vec<LexicalError>,
    ) -> Self {
        if tokens.last().map(|t| t.is_eof()) != Some(true) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(EOF_LEXEME.to_string(), line, 1, TokenKind::Eof));
        }
        Parser {
            table,
            tokens,
            pos: 0,
            stack: Vec::new(),
            lexical_errors,
            syntax_errors: Vec::new(),
            trace: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// One token beyond the current lookahead; saturates at EOF.
    fn peek_next(&self) -> &Token {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Three-way terminal match: exact lexeme, or the distinguished ID /
    /// NUM classes.
    fn terminal_matches(&self, terminal: usize, token: &Token) -> bool {
        let name = &self.table.terminal(terminal).name;
        if *name == token.lexeme {
            return true;
        }
        match token.kind {
            TokenKind::Ident => name == "ID",
            TokenKind::Num(_) => name == "NUM",
            _ => false,
        }
    }

    fn record_error(&mut self, code: ErrorCode) {
        let err = SyntaxError::at_token(code, self.current().clone());
        log::debug!("{err}");
        self.syntax_errors.push(err);
    }

    /// Panic-mode recovery. Fetch one further lookahead: if it is EOF or
    /// in the FOLLOW set of the non-terminal on top of the stack, pop the
    /// offending symbol (synchronize on FOLLOW) without touching the
    /// token that triggered recovery; otherwise discard the current
    /// lookahead and retry the same stack top on the next one.
    fn recover(&mut self) {
        let next = self.peek_next();
        let synchronized = next.is_eof()
            || match self.stack.last() {
                Some(Symbol::NonTerminal(n)) => match self.table.terminal_for(next) {
                    Some(t) => self.table.nonterminal(*n).follow.contains(&t),
                    None => false,
                },
                _ => false,
            };

        if synchronized {
            let popped = self.stack.pop();
            log::debug!("recovery: popping {popped:?} to synchronize");
        } else {
            log::debug!("recovery: skipping [{}]", self.current().lexeme);
            self.advance();
        }
    }

    /// Semantic-action hook. No concrete actions are wired up in this
    /// core; the marker is popped and noted.
    fn run_action(&mut self, name: &str) {
        log::debug!("semantic action [{name}]");
    }

    /// Runs the transition loop to completion. `Ok(true)` means the input
    /// was consumed in lockstep with the stack and no lexical or syntax
    /// errors were accumulated. `Err` is reserved for the hard failure of
    /// a token that matches no terminal column at all, which means the
    /// scanner and the table were built for different languages.
    pub fn parse(&mut self) -> Result<bool, CompilerError> {
        let eof = self.table.eof_terminal();
        self.stack.clear();
        self.stack.push(Symbol::Terminal(eof));
        self.stack.push(Symbol::NonTerminal(self.table.start_nonterminal()));

        loop {
            let top = match self.stack.last() {
                Some(symbol) => symbol.clone(),
                None => break,
            };
            if top == Symbol::Terminal(eof) {
                break;
            }
            log::trace!(
                "stack depth {}, top {top:?}, lookahead [{}]",
                self.stack.len(),
                self.current().lexeme
            );

            match top {
                Symbol::Action(name) => {
                    self.stack.pop();
                    self.run_action(&name);
                }
                Symbol::Epsilon => {
                    // epsilon is never pushed; popped harmlessly if present
                    self.stack.pop();
                }
                Symbol::Terminal(terminal) => {
                    if self.terminal_matches(terminal, self.current()) {
                        self.stack.pop();
                        self.advance();
                    } else {
                        self.record_error(ErrorCode::GeneralSyntaxError);
                        self.recover();
                    }
                }
                Symbol::NonTerminal(nonterminal) => {
                    let entry = match self.table.entry_for(nonterminal, self.current()) {
                        Some(entry) => entry.clone(),
                        None => {
                            // a missing column is not a recoverable user
                            // error: the scanner and table disagree
                            let err = SyntaxError::custom(format!(
                                "no transition entry for [{}, {}]; scanner and transition \
                                 table are out of sync",
                                self.table.nonterminal(nonterminal).name,
                                self.current().lexeme
                            ))
                            .with_token(self.current().clone());
                            return Err(err.into());
                        }
                    };
                    match entry {
                        TableEntry::Rule(rule_id) => {
                            self.trace.push(format!(
                                "{}: {}",
                                self.table.rule(rule_id).abbr(),
                                self.table.rule_text(rule_id)
                            ));
                            self.stack.pop();
                            // push RHS in reverse so the leftmost symbol
                            // ends on top; an epsilon RHS pushes nothing
                            for symbol in self.table.rule(rule_id).rhs.iter().rev() {
                                if *symbol != Symbol::Epsilon {
                                    self.stack.push(symbol.clone());
                                }
                            }
                        }
                        TableEntry::Error(code) => {
                            self.record_error(code);
                            self.recover();
                        }
                    }
                }
            }
        }

        Ok(self.current().is_eof()
            && self.syntax_errors.is_empty()
            && self.lexical_errors.is_empty())
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.syntax_errors
    }

    pub fn lexical_errors(&self) -> &[LexicalError] {
        &self.lexical_errors
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }

    fn into_outcome(self, success: bool, symtab: SymbolTable) -> ParseOutcome {
        ParseOutcome {
            success,
            lexical_errors: self.lexical_errors,
            syntax_errors: self.syntax_errors,
            trace: self.trace,
            symtab,
        }
    }
}

/// Scans and parses a source text against a table: fresh symbol table,
/// fresh lexer, fresh parser, no shared state.
pub fn parse_source(table: &TransitionTable, source: &str) -> Result<ParseOutcome, CompilerError> {
    let mut symtab = SymbolTable::default();
    let (tokens, lexical_errors) = Lexer::new(source, &mut symtab).scan();
    let mut parser = Parser::new(table, tokens, lexical_errors);
    let success = parser.parse()?;
    Ok(parser.into_outcome(success, symtab))
}
