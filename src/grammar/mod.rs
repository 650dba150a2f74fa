// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Grammar data model: terminals, non-terminals with FOLLOW sets,
//! production rules, and the symbols that appear on rule right-hand sides
//! and on the parser stack.
//!
//! Element ids are dense (`0..N-1`), assigned at grammar-compile time by
//! the external grammar compiler, and used directly as array indices for
//! the lifetime of a table or grammar.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod cnf;
pub mod table;

/// A terminal symbol of the grammar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: usize,
    pub name: String,
}

impl Terminal {
    pub fn new(id: usize, name: &str) -> Self {
        Terminal {
            id,
            name: name.to_string(),
        }
    }
}

/// A non-terminal symbol, owning its FOLLOW set (terminal ids). FOLLOW
/// sets are computed by the external grammar compiler and consumed here
/// for panic-mode synchronization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonTerminal {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub follow: BTreeSet<usize>,
}

impl NonTerminal {
    pub fn new(id: usize, name: &str) -> Self {
        NonTerminal {
            id,
            name: name.to_string(),
            follow: BTreeSet::new(),
        }
    }

    pub fn with_follow<I: IntoIterator<Item = usize>>(mut self, follow: I) -> Self {
        self.follow = follow.into_iter().collect();
        self
    }
}

/// One symbol on a rule right-hand side or on the parser stack. Epsilon
/// and semantic-action markers are explicit variants rather than
/// specially-named terminals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Terminal(usize),
    NonTerminal(usize),
    Epsilon,
    Action(String),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

/// A production rule: one LHS non-terminal and an ordered RHS (possibly
/// the single epsilon marker).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: usize,
    pub lhs: usize,
    pub rhs: SmallVec<[Symbol; 4]>,
}

impl Rule {
    pub fn new<I: IntoIterator<Item = Symbol>>(id: usize, lhs: usize, rhs: I) -> Self {
        Rule {
            id,
            lhs,
            rhs: rhs.into_iter().collect(),
        }
    }

    /// Abbreviated name used in the parse trace.
    pub fn abbr(&self) -> String {
        format!("R{}", self.id)
    }

    /// Human-readable production, resolving ids against the element lists.
    pub fn text(&self, terminals: &[Terminal], nonterminals: &[NonTerminal]) -> String {
        let mut out = String::new();
        out.push_str(&nonterminals[self.lhs].name);
        out.push_str(" ->");
        for symbol in &self.rhs {
            out.push(' ');
            match symbol {
                Symbol::Terminal(t) => out.push_str(&terminals[*t].name),
                Symbol::NonTerminal(n) => out.push_str(&nonterminals[*n].name),
                Symbol::Epsilon => out.push('&'),
                Symbol::Action(name) => {
                    out.push('@');
                    out.push_str(name);
                }
            }
        }
        out
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}){}", self.id, self.name)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}){}", self.id, self.name)
    }
}
