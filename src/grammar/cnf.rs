// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Probabilistic grammar in Chomsky Normal Form, as consumed by the CYK
//! parser. Production and training of the grammar are external; this
//! module ingests one, validates the CNF restriction up front, and builds
//! the lookup indices the dynamic program needs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::{CompilerError, SyntaxError};
use crate::grammar::NonTerminal;

/// Right-hand side of a CNF rule: `A -> B C` or `A -> word`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CnfRhs {
    Binary(usize, usize),
    Unary(String),
}

/// A CNF rule with its probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticRule {
    pub id: usize,
    pub lhs: usize,
    pub rhs: CnfRhs,
    pub probability: f64,
}

impl ProbabilisticRule {
    pub fn binary(id: usize, lhs: usize, left: usize, right: usize, probability: f64) -> Self {
        ProbabilisticRule {
            id,
            lhs,
            rhs: CnfRhs::Binary(left, right),
            probability,
        }
    }

    pub fn unary(id: usize, lhs: usize, word: &str, probability: f64) -> Self {
        ProbabilisticRule {
            id,
            lhs,
            rhs: CnfRhs::Unary(word.to_string()),
            probability,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CnfGrammar {
    nonterminals: Vec<NonTerminal>,
    rules: Vec<ProbabilisticRule>,
    start: usize,
    /// word -> ids of unary rules producing it
    unary_index: HashMap<String, Vec<usize>>,
    /// (B, C) -> ids of binary rules `A -> B C`
    binary_index: HashMap<(usize, usize), Vec<usize>>,
}

#[derive(Deserialize)]
struct CnfGrammarData {
    nonterminals: Vec<NonTerminal>,
    rules: Vec<ProbabilisticRule>,
    #[serde(default)]
    start: usize,
}

fn ingest_err(msg: String) -> CompilerError {
    CompilerError::Syntax(SyntaxError::custom(msg))
}

impl CnfGrammar {
    /// Builds a grammar, rejecting anything not in CNF and probabilities
    /// outside `[0, 1]`. The start non-terminal is the one with id
    /// `start`.
    pub fn new(
        nonterminals: Vec<NonTerminal>,
        rules: Vec<ProbabilisticRule>,
        start: usize,
    ) -> Result<Self, CompilerError> {
        for (i, nonterminal) in nonterminals.iter().enumerate() {
            if nonterminal.id != i {
                return Err(ingest_err(format!(
                    "non-terminal ids must be dense: [{}] has id {}",
                    nonterminal.name, nonterminal.id
                )));
            }
        }
        if start >= nonterminals.len() {
            return Err(ingest_err("start non-terminal id out of range".to_string()));
        }
        for (i, rule) in rules.iter().enumerate() {
            if rule.id != i {
                return Err(ingest_err(format!("rule ids must be dense: R{} at index {i}", rule.id)));
            }
            if rule.lhs >= nonterminals.len() {
                return Err(ingest_err(format!("rule R{} has unknown LHS {}", rule.id, rule.lhs)));
            }
            match &rule.rhs {
                CnfRhs::Binary(left, right) => {
                    if *left >= nonterminals.len() || *right >= nonterminals.len() {
                        return Err(ingest_err(format!(
                            "rule R{} is not in Chomsky Normal Form: unknown non-terminal on RHS",
                            rule.id
                        )));
                    }
                }
                CnfRhs::Unary(word) => {
                    if word.is_empty() {
                        return Err(ingest_err(format!(
                            "rule R{} is not in Chomsky Normal Form: empty terminal",
                            rule.id
                        )));
                    }
                }
            }
            if !(0.0..=1.0).contains(&rule.probability) || rule.probability.is_nan() {
                return Err(ingest_err(format!(
                    "rule R{} has probability {} outside [0, 1]",
                    rule.id, rule.probability
                )));
            }
        }

        let mut unary_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut binary_index: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for rule in &rules {
            match &rule.rhs {
                CnfRhs::Unary(word) => {
                    unary_index.entry(word.clone()).or_default().push(rule.id)
                }
                CnfRhs::Binary(left, right) => binary_index
                    .entry((*left, *right))
                    .or_default()
                    .push(rule.id),
            }
        }

        Ok(CnfGrammar {
            nonterminals,
            rules,
            start,
            unary_index,
            binary_index,
        })
    }

    /// Deserialization entry point for an externally trained grammar.
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        let data: CnfGrammarData = serde_json::from_str(json)
            .map_err(|e| ingest_err(format!("grammar deserialization failed: {e}")))?;
        CnfGrammar::new(data.nonterminals, data.rules, data.start)
    }

    /// Whether any unary rule anywhere in the grammar produces this word.
    /// The CYK parser fails fast on the first uncovered word.
    pub fn covers(&self, word: &str) -> bool {
        self.unary_index.contains_key(word)
    }

    /// Ids of the unary rules `A -> word`.
    pub fn unary_rules(&self, word: &str) -> &[usize] {
        self.unary_index.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of the binary rules `A -> B C` for a (B, C) pair.
    pub fn binary_rules(&self, left: usize, right: usize) -> &[usize] {
        self.binary_index
            .get(&(left, right))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rule(&self, id: usize) -> &ProbabilisticRule {
        &self.rules[id]
    }

    pub fn rules(&self) -> &[ProbabilisticRule] {
        &self.rules
    }

    pub fn nonterminal(&self, id: usize) -> &NonTerminal {
        &self.nonterminals[id]
    }

    pub fn nonterminal_count(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }
}
