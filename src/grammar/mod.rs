/*
    This module is for storing and looking up grammars
*/

use std::collections::HashMap;
use std::fmt::Display;

use itertools::Itertools;

// The base unit in a grammar rule. Terminal text is stored without quotes.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Symbol {
    Terminal(String),
    Nonterminal(String),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Symbol::Terminal(t) | Symbol::Nonterminal(t) => t
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "'{}'", t),
            Symbol::Nonterminal(n) => write!(f, "{}", n),
        }
    }
}

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

/// A single rewrite rule `lhs -> rhs`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Production {
    lhs: String,
    rhs: Alternative,
}

impl Production {
    pub fn new(lhs: impl Into<String>, rhs: Alternative) -> Self {
        Production {
            lhs: lhs.into(),
            rhs
        }
    }

    pub fn lhs(&self) -> &str {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
    }
}

/// A start symbol plus the productions of a context-free grammar, in
/// declaration order. Immutable once built.
#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    start: String,
    productions: Vec<Production>,
    // Indices into `productions`, keyed by lhs, in declaration order
    lhs_index: HashMap<String, Vec<usize>>,
}

impl Grammar {
    pub fn new(start: impl Into<String>, productions: Vec<Production>) -> Self {
        let lhs_index = productions.iter()
            .enumerate()
            .map(|(i, production)| (production.lhs.clone(), i))
            .into_group_map();

        Grammar {
            start: start.into(),
            productions,
            lhs_index
        }
    }

    /// Returns the same rules with a different start symbol.
    pub fn with_start(self, start: impl Into<String>) -> Self {
        Grammar::new(start, self.productions)
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Productions whose left-hand side is `lhs`, in declaration order.
    pub fn productions_for<'a>(&'a self, lhs: &str) -> impl DoubleEndedIterator<Item = &'a Production> + 'a {
        self.lhs_index
            .get(lhs)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.productions[i])
    }

    pub fn is_defined(&self, nonterminal: &str) -> bool {
        self.lhs_index.contains_key(nonterminal)
    }

    // Left-hand symbols in the order they were first declared
    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.productions.iter().map(Production::lhs).unique()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Grammar starting with \"{}\"", self.start)?;
        for production in &self.productions {
            write!(f, "\n{}", production)?;
        }
        Ok(())
    }
}
