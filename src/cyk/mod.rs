// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Probabilistic CYK parser.
//!
//! Dynamic-programming maximum-likelihood parsing over a probabilistic
//! grammar in Chomsky Normal Form, with parse-tree reconstruction from
//! backpointers. O(n^3 * |N|^3) time and O(n^2 * |N|) space; callers
//! bound the input length, and there is no incremental mode.

use std::fmt;

use crate::grammar::cnf::CnfGrammar;


/// The children of a parse node: a single covered word (terminal
/// production) or the two sub-spans of a binary rule.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseChildren {
    Leaf(String),
    Pair(Box<ParseNode>, Box<ParseNode>),
}

/// One node of the reconstructed maximum-probability parse tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseNode {
    pub nonterminal: usize,
    pub label: String,
    pub probability: f64,
    /// Word span covered by this node, inclusive.
    pub span: (usize, usize),
    pub children: ParseChildren,
}

impl ParseNode {
    fn words<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.children {
            ParseChildren::Leaf(word) => out.push(word),
            ParseChildren::Pair(left, right) => {
                left.words(out);
                right.words(out);
            }
        }
    }

    fn dump(&self, f: &mut fmt::Formatter, level: usize) -> fmt::Result {
        let mut words = Vec::new();
        self.words(&mut words);
        writeln!(
            f,
            "{}{} ({}) [ {}-{}: {} ]",
            "\t".repeat(level),
            self.label,
            self.probability,
            self.span.0,
            self.span.1,
            words.join(" ")
        )?;
        if let ParseChildren::Pair(left, right) = &self.children {
            left.dump(f, level + 1)?;
            right.dump(f, level + 1)?;
        }
        Ok(())
    }
}

/// A successful parse: the root probability and the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseTree {
    pub probability: f64,
    pub root: ParseNode,
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.root.dump(f, 0)
    }
}

/// The parser borrows a fully built grammar; the grammar stays immutable
/// for the duration of any parse.
pub struct CykParser<'g> {
    grammar: &'g CnfGrammar,
}

impl<'g> CykParser<'g> {
    pub fn new(grammar: &'g CnfGrammar) -> Self {
        CykParser { grammar }
    }

    /// Parses an ordered word sequence. `None` means the sentence has no
    /// parse under the grammar; an incomplete grammar is indistinguishable
    /// from an ungrammatical sentence, both land here.
    pub fn parse(&self, words: &[&str]) -> Option<ParseTree> {
        let n = words.len();
        if n == 0 {
            return None;
        }

        // fail fast before building the DP table: every word must be
        // covered by some unary rule
        for word in words {
            if !self.grammar.covers(word) {
                log::debug!("word [{word}] not covered by any unary rule");
                return None;
            }
        }

        let nt = self.grammar.nonterminal_count();
        let idx = |i: usize, j: usize, a: usize| (i * n + j) * nt + a;

        let mut score = vec![0.0f64; n * n * nt];
        let mut back: Vec<Option<(usize, usize, usize)>> = vec![None; n * n * nt];

        // base case: unary rules over single words
        for (i, word) in words.iter().enumerate() {
            for &rule_id in self.grammar.unary_rules(word) {
                let rule = self.grammar.rule(rule_id);
                if rule.probability > score[idx(i, i, rule.lhs)] {
                    score[idx(i, i, rule.lhs)] = rule.probability;
                }
            }
        }

        // spans of increasing length; every split point; every binary rule
        // applicable to the pair of sub-span non-terminals
        for span in 2..=n {
            for begin in 0..=(n - span) {
                let end = begin + span - 1;
                for m in begin..end {
                    for b in 0..nt {
                        let left_score = score[idx(begin, m, b)];
                        if left_score == 0.0 {
                            continue;
                        }
                        for c in 0..nt {
                            let right_score = score[idx(m + 1, end, c)];
                            if right_score == 0.0 {
                                continue;
                            }
                            for &rule_id in self.grammar.binary_rules(b, c) {
                                let rule = self.grammar.rule(rule_id);
                                let candidate = left_score * right_score * rule.probability;
                                if candidate > score[idx(begin, end, rule.lhs)] {
                                    score[idx(begin, end, rule.lhs)] = candidate;
                                    back[idx(begin, end, rule.lhs)] = Some((m, b, c));
                                }
                            }
                        }
                    }
                }
            }
        }

        let start = self.grammar.start();
        let probability = score[idx(0, n - 1, start)];
        if probability == 0.0 {
            return None;
        }

        let root = self.build_node(words, &score, &back, n, 0, n - 1, start);
        Some(ParseTree { probability, root })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_node(
        &self,
        words: &[&str],
        score: &[f64],
        back: &[Option<(usize, usize, usize)>],
        n: usize,
        i: usize,
        j: usize,
        a: usize,
    ) -> ParseNode {
        let nt = self.grammar.nonterminal_count();
        let idx = (i * n + j) * nt + a;
        let children = match back[idx] {
            // no backpointer: a leaf spanning one word
            None => ParseChildren::Leaf(words[i].to_string()),
            Some((m, b, c)) => {
                let left = self.build_node(words, score, back, n, i, m, b);
                let right = self.build_node(words, score, back, n, m + 1, j, c);
                ParseChildren::Pair(Box::new(left), Box::new(right))
            }
        };
        ParseNode {
            nonterminal: a,
            label: self.grammar.nonterminal(a).name.clone(),
            probability: score[idx],
            span: (i, j),
            children,
        }
    }
}
