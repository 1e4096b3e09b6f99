use itertools::Itertools;

use crate::grammar::{Grammar, Symbol};

// Nonterminals that appear on a right-hand side but have no production of
// their own, in order of first use. Expansion treats these as dead ends, so
// they are reported but never rejected.
pub fn undefined_nonterminals(grammar: &Grammar) -> Vec<&str> {
    grammar.productions().iter()
        .flat_map(|production| production.rhs())
        .filter(|symbol| !symbol.is_terminal())
        .map(Symbol::text)
        .filter(|symbol| !grammar.is_defined(symbol))
        .unique()
        .collect()
}
