// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The transition table driving the deterministic parser: an immutable,
//! grammar-derived 2-D table `[NonTerminal][Terminal] -> Rule | error`.
//! Built by an external grammar compiler and ingested here (JSON), or
//! assembled programmatically through the builder API. Every cell holds
//! something once the table is built; there are no empty cells.

use serde::{Deserialize, Serialize};

use crate::common::{CompilerError, ErrorCode, SyntaxError};
use crate::grammar::{NonTerminal, Rule, Symbol, Terminal};
use crate::token::{Token, TokenKind};

/// Name of the end-of-input terminal.
pub const EOF_TERMINAL_NAME: &str = "$";
/// Default name of the start non-terminal, used when a lossy
/// deserialization carries no explicit start id.
pub const DEFAULT_START_NAME: &str = "<prog>";
/// Name of the distinguished terminal matching any identifier token.
pub const ID_TERMINAL_NAME: &str = "ID";
/// Name of the distinguished terminal matching any number token.
pub const NUM_TERMINAL_NAME: &str = "NUM";

/// One cell of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEntry {
    /// Expand this rule (index into the table's rule list).
    Rule(usize),
    /// The (non-terminal, terminal) pair is a syntax error of this kind.
    Error(ErrorCode),
}

#[derive(Clone, Debug, Serialize)]
pub struct TransitionTable {
    terminals: Vec<Terminal>,
    nonterminals: Vec<NonTerminal>,
    rules: Vec<Rule>,
    /// Row-major: `cells[nonterminal * terminals.len() + terminal]`.
    cells: Vec<TableEntry>,
    eof_terminal: usize,
    start_nonterminal: usize,
}

/// Serialized form, as produced by the external grammar compiler. The
/// EOF/start ids may be missing after a lossy round-trip; they are then
/// recovered once by name lookup and cached in the built table.
#[derive(Deserialize)]
struct TableData {
    terminals: Vec<Terminal>,
    nonterminals: Vec<NonTerminal>,
    rules: Vec<Rule>,
    cells: Vec<TableEntry>,
    #[serde(default)]
    eof_terminal: Option<usize>,
    #[serde(default)]
    start_nonterminal: Option<usize>,
    #[serde(default)]
    start_symbol: Option<String>,
}

fn ingest_err(msg: String) -> CompilerError {
    CompilerError::Syntax(SyntaxError::custom(msg))
}

impl TransitionTable {
    /// Builds an empty table over the given elements: every cell starts as
    /// a general syntax error, so the table is total by construction.
    pub fn new(
        terminals: Vec<Terminal>,
        nonterminals: Vec<NonTerminal>,
        rules: Vec<Rule>,
        eof_terminal: usize,
        start_nonterminal: usize,
    ) -> Result<Self, CompilerError> {
        let cells = vec![
            TableEntry::Error(ErrorCode::GeneralSyntaxError);
            nonterminals.len() * terminals.len()
        ];
        let table = TransitionTable {
            terminals,
            nonterminals,
            rules,
            cells,
            eof_terminal,
            start_nonterminal,
        };
        table.validate()?;
        Ok(table)
    }

    /// Deserialization entry point for a grammar-compiler-produced table.
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        let data: TableData = serde_json::from_str(json)
            .map_err(|e| ingest_err(format!("transition table deserialization failed: {e}")))?;

        let eof_terminal = match data.eof_terminal {
            Some(id) => id,
            None => {
                log::debug!("EOF terminal id missing from serialized table, recovering by name");
                data.terminals
                    .iter()
                    .position(|t| t.name == EOF_TERMINAL_NAME)
                    .ok_or_else(|| {
                        ingest_err(format!("no {EOF_TERMINAL_NAME} terminal to recover EOF id from"))
                    })?
            }
        };
        let start_nonterminal = match data.start_nonterminal {
            Some(id) => id,
            None => {
                let name = data.start_symbol.as_deref().unwrap_or(DEFAULT_START_NAME);
                log::debug!("start non-terminal id missing from serialized table, recovering [{name}]");
                data.nonterminals
                    .iter()
                    .position(|n| n.name == name)
                    .ok_or_else(|| {
                        ingest_err(format!("no {name} non-terminal to recover start id from"))
                    })?
            }
        };

        let table = TransitionTable {
            terminals: data.terminals,
            nonterminals: data.nonterminals,
            rules: data.rules,
            cells: data.cells,
            eof_terminal,
            start_nonterminal,
        };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), CompilerError> {
        for (i, terminal) in self.terminals.iter().enumerate() {
            if terminal.id != i {
                return Err(ingest_err(format!(
                    "terminal ids must be dense: [{}] has id {}",
                    terminal.name, terminal.id
                )));
            }
        }
        for (i, nonterminal) in self.nonterminals.iter().enumerate() {
            if nonterminal.id != i {
                return Err(ingest_err(format!(
                    "non-terminal ids must be dense: [{}] has id {}",
                    nonterminal.name, nonterminal.id
                )));
            }
            if let Some(t) = nonterminal.follow.iter().find(|t| **t >= self.terminals.len()) {
                return Err(ingest_err(format!(
                    "follow set of [{}] references unknown terminal {t}",
                    nonterminal.name
                )));
            }
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.id != i {
                return Err(ingest_err(format!("rule ids must be dense: R{} at index {i}", rule.id)));
            }
            if rule.lhs >= self.nonterminals.len() {
                return Err(ingest_err(format!("rule R{} has unknown LHS {}", rule.id, rule.lhs)));
            }
            for symbol in &rule.rhs {
                let in_range = match symbol {
                    Symbol::Terminal(t) => *t < self.terminals.len(),
                    Symbol::NonTerminal(n) => *n < self.nonterminals.len(),
                    Symbol::Epsilon | Symbol::Action(_) => true,
                };
                if !in_range {
                    return Err(ingest_err(format!(
                        "rule R{} references an unknown grammar element",
                        rule.id
                    )));
                }
            }
        }
        if self.cells.len() != self.nonterminals.len() * self.terminals.len() {
            return Err(ingest_err(format!(
                "cell count {} does not match {} non-terminals x {} terminals",
                self.cells.len(),
                self.nonterminals.len(),
                self.terminals.len()
            )));
        }
        for cell in &self.cells {
            if let TableEntry::Rule(r) = cell {
                if *r >= self.rules.len() {
                    return Err(ingest_err(format!("cell references unknown rule {r}")));
                }
            }
        }
        if self.eof_terminal >= self.terminals.len() {
            return Err(ingest_err("EOF terminal id out of range".to_string()));
        }
        if self.start_nonterminal >= self.nonterminals.len() {
            return Err(ingest_err("start non-terminal id out of range".to_string()));
        }
        Ok(())
    }

    fn idx(&self, nonterminal: usize, terminal: usize) -> usize {
        nonterminal * self.terminals.len() + terminal
    }

    /// Places a rule in the cell for (non-terminal, terminal).
    pub fn set_rule(&mut self, nonterminal: usize, terminal: usize, rule: usize) {
        let idx = self.idx(nonterminal, terminal);
        self.cells[idx] = TableEntry::Rule(rule);
    }

    /// Places a specific syntax-error kind in the cell.
    pub fn set_error(&mut self, nonterminal: usize, terminal: usize, code: ErrorCode) {
        let idx = self.idx(nonterminal, terminal);
        self.cells[idx] = TableEntry::Error(code);
    }

    /// Direct (row, column) lookup; total once the table is built.
    pub fn entry_at(&self, nonterminal: usize, terminal: usize) -> &TableEntry {
        &self.cells[self.idx(nonterminal, terminal)]
    }

    /// Classifies a token into a terminal column: exact lexeme match takes
    /// priority; failing that, identifier tokens match the distinguished
    /// `ID` terminal and number tokens match `NUM`. `None` means the token
    /// matches no column (the scanner and the table are out of sync).
    pub fn terminal_for(&self, token: &Token) -> Option<usize> {
        if let Some(terminal) = self.terminals.iter().find(|t| t.name == token.lexeme) {
            return Some(terminal.id);
        }
        let class_name = match token.kind {
            TokenKind::Ident => ID_TERMINAL_NAME,
            TokenKind::Num(_) => NUM_TERMINAL_NAME,
            _ => return None,
        };
        self.terminals
            .iter()
            .find(|t| t.name == class_name)
            .map(|t| t.id)
    }

    /// Table lookup by (non-terminal, token).
    pub fn entry_for(&self, nonterminal: usize, token: &Token) -> Option<&TableEntry> {
        let terminal = self.terminal_for(token)?;
        Some(self.entry_at(nonterminal, terminal))
    }

    pub fn terminal(&self, id: usize) -> &Terminal {
        &self.terminals[id]
    }

    pub fn nonterminal(&self, id: usize) -> &NonTerminal {
        &self.nonterminals[id]
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[NonTerminal] {
        &self.nonterminals
    }

    pub fn rule(&self, id: usize) -> &Rule {
        &self.rules[id]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_text(&self, id: usize) -> String {
        self.rules[id].text(&self.terminals, &self.nonterminals)
    }

    pub fn eof_terminal(&self) -> usize {
        self.eof_terminal
    }

    pub fn start_nonterminal(&self) -> usize {
        self.start_nonterminal
    }
}
