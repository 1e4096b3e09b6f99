/*
    This module generates random derivations
*/

use rand::seq::IteratorRandom;
use rand::Rng;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::*;
use crate::tree::{Child, Tree};

// How deep a derivation may nest before generation gives up
pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum GenerateErrorType {
    // An undefined nonterminal was used
    #[error("No definition for nonterminal `{0}`")]
    UndefinedNonterminal(String),
    // The derivation kept nesting, usually because of recursive rules
    #[error("Derivation nested deeper than {0} levels")]
    DepthExceeded(usize),
}

impl ErrorType for GenerateErrorType {}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<Tree, GenerateErrorType>;

pub fn generate(grammar: &Grammar, rng: &mut impl Rng) -> GenResult {
    generate_with_override(grammar, grammar.start(), rng)
}

// Generates a derivation in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: &str, rng: &mut impl Rng) -> GenResult {
    generate_with_depth(grammar, start, DEFAULT_MAX_DEPTH, rng)
}

pub fn generate_with_depth(grammar: &Grammar, start: &str, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    generate_nonterminal(start, grammar, 0, max_depth, rng)
}

// Joins the leaves of a derivation into a sentence
pub fn sentence(tree: &Tree) -> String {
    tree.leaves().join(" ")
}

fn generate_nonterminal(nonterminal: &str, grammar: &Grammar, depth: usize, max_depth: usize, rng: &mut impl Rng) -> GenResult {
    if depth >= max_depth {
        return Err(GenerateErrorType::DepthExceeded(max_depth));
    }

    let production = grammar.productions_for(nonterminal)
        .choose(rng)
        .ok_or_else(|| GenerateErrorType::UndefinedNonterminal(nonterminal.to_string()))?;

    let children = production.rhs().iter()
        .map(|symbol| generate_symbol(symbol, grammar, depth, max_depth, rng))
        .collect::<Result<Vec<_>, _>>()?;

    return Ok(Tree::new(nonterminal, children));
}

fn generate_symbol(symbol: &Symbol, grammar: &Grammar, depth: usize, max_depth: usize, rng: &mut impl Rng) -> Result<Child, GenerateErrorType> {
    match symbol {
        Symbol::Nonterminal(n) => generate_nonterminal(n, grammar, depth + 1, max_depth, rng).map(Child::from),
        Symbol::Terminal(t) => Ok(Child::Terminal(t.clone())),
    }
}
