/*
    This module parses sentences against a grammar, top-down
*/

use std::iter::FusedIterator;

use thiserror::Error;

use crate::grammar::Grammar;
use crate::tokenizer::tokenize;
use crate::tree::{Position, Subtree, Tree};

/// Positions of a partial derivation that still need expanding or matching,
/// leftmost first.
pub type Frontier = Vec<Position>;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum ParseError {
    #[error("tokens can't be empty")]
    EmptyTokens,
    #[error("frontier requires at least one position")]
    EmptyFrontier,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Exhaustive, backtracking, depth-first top-down parser.
///
/// Every derivation of the input is produced, in the order the grammar
/// declares its alternatives. Grammars with left recursion or cycles that
/// consume no input make the search run forever.
#[derive(Debug, Clone, Copy)]
pub struct TopDownParser<'g> {
    grammar: &'g Grammar,
}

// A point in the search: a partial derivation, what is left to resolve in it,
// and how many tokens it has consumed
#[derive(Debug, Clone)]
struct State {
    tree: Tree,
    frontier: Frontier,
    cursor: usize,
}

impl<'g> TopDownParser<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        TopDownParser { grammar }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Lazily produces every derivation of the grammar's start symbol whose
    /// leaves read exactly as `tokens`, each paired with its (empty) frontier.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> ParseResult<Parses<'g>> {
        if tokens.is_empty() {
            return Err(ParseError::EmptyTokens);
        }

        let root = Tree::leaf(self.grammar.start());
        Ok(self.parse_from(tokens, &root, &[Position::new()]))
    }

    /// Tokenizes `text` and parses the words.
    pub fn parse_sentence(&self, text: &str) -> ParseResult<Parses<'g>> {
        self.parse(&tokenize(text))
    }

    /// Continues the search from a partial derivation.
    pub fn parse_from<S: AsRef<str>>(&self, tokens: &[S], tree: &Tree, frontier: &[Position]) -> Parses<'g> {
        let state = State {
            tree: tree.clone(),
            frontier: frontier.to_vec(),
            cursor: 0,
        };
        Parses::new(self.grammar, tokens, vec![state])
    }

    /// Matches the terminal at the first frontier position against the first
    /// token and continues the search if they agree.
    pub fn match_terminal<S: AsRef<str>>(&self, tokens: &[S], tree: &Tree, frontier: &[Position]) -> ParseResult<Parses<'g>> {
        if tokens.is_empty() {
            return Err(ParseError::EmptyTokens);
        }
        if frontier.is_empty() {
            return Err(ParseError::EmptyFrontier);
        }

        let mut parses = Parses::new(self.grammar, tokens, Vec::new());
        let state = State {
            tree: tree.clone(),
            frontier: frontier.to_vec(),
            cursor: 0,
        };
        let next = parses.matched(&state);
        parses.stack.extend(next);
        Ok(parses)
    }

    /// Expands the nonterminal at the first frontier position with every
    /// matching production and continues the search from each.
    pub fn expand<S: AsRef<str>>(&self, tokens: &[S], tree: &Tree, frontier: &[Position]) -> ParseResult<Parses<'g>> {
        if frontier.is_empty() {
            return Err(ParseError::EmptyFrontier);
        }

        let mut parses = Parses::new(self.grammar, tokens, Vec::new());
        let state = State {
            tree: tree.clone(),
            frontier: frontier.to_vec(),
            cursor: 0,
        };
        parses.push_expansions(&state);
        Ok(parses)
    }
}

/// The lazy sequence of derivations returned by [`TopDownParser`].
///
/// Pending search states sit on a stack; the next derivation is found by
/// resuming the depth-first search from its top. Dropping the iterator
/// abandons the search.
#[derive(Debug, Clone)]
pub struct Parses<'g> {
    grammar: &'g Grammar,
    tokens: Vec<String>,
    stack: Vec<State>,
}

impl<'g> Parses<'g> {
    fn new<S: AsRef<str>>(grammar: &'g Grammar, tokens: &[S], stack: Vec<State>) -> Self {
        Parses {
            grammar,
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            stack,
        }
    }

    // Pushes one state per production for the nonterminal at the first
    // frontier position. They are pushed last-to-first so the first declared
    // alternative is searched first.
    fn push_expansions(&mut self, state: &State) {
        let grammar = self.grammar;
        let position = &state.frontier[0];
        let label = match state.tree.get(position) {
            Ok(Subtree::Node(node)) => node.label(),
            Ok(Subtree::Terminal(_)) => return,
            Err(e) => {
                log::warn!("cannot expand {}: {}", state.tree, e);
                return;
            }
        };
        log::trace!("expanding `{}` at {:?} in {}", label, position, state.tree);

        for production in grammar.productions_for(label).rev() {
            let subtree = Tree::from_production(production);
            let tree = if position.is_empty() {
                subtree
            } else {
                let mut tree = state.tree.clone();
                if let Err(e) = tree.set(position, subtree.into()) {
                    log::warn!("cannot expand {}: {}", state.tree, e);
                    continue;
                }
                tree
            };

            let frontier = (0..production.rhs().len())
                .map(|i| position.iter().copied().chain([i]).collect())
                .chain(state.frontier[1..].iter().cloned())
                .collect();

            self.stack.push(State {
                tree,
                frontier,
                cursor: state.cursor,
            });
        }
    }

    // The state after consuming the next token, if it matches the terminal
    // at the first frontier position
    fn matched(&self, state: &State) -> Option<State> {
        let token = self.tokens.get(state.cursor)?;
        let position = state.frontier.first()?;

        match state.tree.get(position) {
            Ok(Subtree::Terminal(terminal)) if terminal == token.as_str() => {
                log::trace!("matched `{}` at {:?}", token, position);
                Some(State {
                    tree: state.tree.clone(),
                    frontier: state.frontier[1..].to_vec(),
                    cursor: state.cursor + 1,
                })
            }
            Ok(Subtree::Terminal(terminal)) => {
                log::trace!("`{}` does not match `{}` at {:?}", token, terminal, position);
                None
            }
            _ => None,
        }
    }
}

impl Iterator for Parses<'_> {
    type Item = (Tree, Frontier);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(state) = self.stack.pop() {
            let tokens_left = state.cursor < self.tokens.len();

            match (tokens_left, state.frontier.is_empty()) {
                (false, true) => {
                    log::debug!("found derivation {}", state.tree);
                    return Some((state.tree, state.frontier));
                }
                (true, true) | (false, false) => {
                    log::trace!("dead end at {} with frontier {:?}", state.tree, state.frontier);
                }
                (true, false) => match state.tree.get(&state.frontier[0]) {
                    Ok(Subtree::Node(_)) => self.push_expansions(&state),
                    Ok(Subtree::Terminal(_)) => {
                        if let Some(next) = self.matched(&state) {
                            self.stack.push(next);
                        }
                    }
                    Err(e) => log::warn!("abandoning {}: {}", state.tree, e),
                },
            }
        }

        None
    }
}

impl FusedIterator for Parses<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;
    use crate::tree::Child;

    fn node(label: &str, children: Vec<Child>) -> Child {
        Tree::new(label, children).into()
    }

    fn terminal(text: &str) -> Child {
        Child::Terminal(text.to_string())
    }

    fn sentences() -> Grammar {
        read_str("
            S -> NP VP
            NP -> N | D N | Adj N | D Adj N
            VP -> V NP | V | V NP NP
            N -> 'fall' | 'spring' | 'leaves'
            V -> 'spring' | 'leaves' | 'fall'
            D -> 'the'
            Adj -> 'fall' | 'spring' | 'purple'
        ").unwrap()
    }

    fn noun_phrases() -> Grammar {
        read_str("
            NP -> N | D N
            N -> 'fall' | 'spring' | 'leaves'
            D -> 'the'
        ").unwrap()
    }

    fn trees(parses: Parses<'_>) -> Vec<Tree> {
        parses.map(|(tree, _)| tree).collect()
    }

    #[test]
    fn parse_empty_tokens() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);
        let tokens: [&str; 0] = [];

        assert_eq!(parser.parse(&tokens).unwrap_err(), ParseError::EmptyTokens);
        assert_eq!(parser.parse_sentence("").unwrap_err(), ParseError::EmptyTokens);
    }

    #[test]
    fn parse_non_parsable() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);

        assert!(parser.parse(&["hello", "world"]).unwrap().next().is_none());
    }

    #[test]
    fn parse_unknown_word() {
        let grammar = read_str("N -> 'fall'").unwrap();
        let parser = TopDownParser::new(&grammar);

        assert_eq!(parser.parse(&["hello"]).unwrap().count(), 0);
    }

    #[test]
    fn parse_one() {
        let grammar = read_str("
            S -> NP VP
            NP -> N
            VP -> V
            N -> 'fall'
            V -> 'leaves'
        ").unwrap();
        let parser = TopDownParser::new(&grammar);

        let parses = parser.parse(&["fall", "leaves"]).unwrap().collect::<Vec<_>>();

        assert_eq!(parses, vec![(
            Tree::new("S", vec![
                node("NP", vec![node("N", vec![terminal("fall")])]),
                node("VP", vec![node("V", vec![terminal("leaves")])]),
            ]),
            Frontier::new()
        )]);
    }

    #[test]
    fn parse_first_of_many() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);

        let first = parser.parse(&["fall", "leaves"]).unwrap().next().unwrap();

        assert_eq!(first.0, Tree::new("S", vec![
            node("NP", vec![node("N", vec![terminal("fall")])]),
            node("VP", vec![node("V", vec![terminal("leaves")])]),
        ]));
    }

    #[test]
    fn parse_fixed_positions() {
        let grammar = read_str("
            S -> N V
            N -> 'fall' | 'spring'
            V -> 'fall' | 'spring'
        ").unwrap();
        let parser = TopDownParser::new(&grammar);

        assert_eq!(parser.parse(&["fall", "spring"]).unwrap().count(), 1);
    }

    #[test]
    fn parse_ambiguous_in_declaration_order() {
        let grammar = read_str("
            S -> NP VP
            NP -> N | Adj N
            VP -> V | V NP
            N -> 'fall' | 'leaves'
            Adj -> 'fall'
            V -> 'leaves' | 'fall'
        ").unwrap();
        let parser = TopDownParser::new(&grammar);

        let parses = trees(parser.parse(&["fall", "leaves", "fall"]).unwrap());

        assert_eq!(parses, vec![
            Tree::new("S", vec![
                node("NP", vec![node("N", vec![terminal("fall")])]),
                node("VP", vec![
                    node("V", vec![terminal("leaves")]),
                    node("NP", vec![node("N", vec![terminal("fall")])]),
                ]),
            ]),
            Tree::new("S", vec![
                node("NP", vec![
                    node("Adj", vec![terminal("fall")]),
                    node("N", vec![terminal("leaves")]),
                ]),
                node("VP", vec![node("V", vec![terminal("fall")])]),
            ]),
        ]);
    }

    #[test]
    fn parses_read_as_tokens() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);
        let tokens = ["the", "fall", "leaves", "fall"];

        let parses = parser.parse(&tokens).unwrap().collect::<Vec<_>>();

        assert!(!parses.is_empty());
        for (tree, frontier) in parses {
            assert_eq!(tree.leaves(), tokens);
            assert!(frontier.is_empty());
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);
        let tokens = ["fall", "leaves", "fall"];

        let first = trees(parser.parse(&tokens).unwrap());
        let second = trees(parser.parse(&tokens).unwrap());

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn parse_sentence_tokenizes() {
        let grammar = sentences();
        let parser = TopDownParser::new(&grammar);

        assert_eq!(
            trees(parser.parse_sentence("Fall leaves fall.").unwrap()),
            trees(parser.parse(&["fall", "leaves", "fall"]).unwrap())
        );
    }

    #[test]
    fn parse_undefined_nonterminal() {
        let grammar = read_str("
            S -> NP | N
            N -> 'fall'
        ").unwrap();
        let parser = TopDownParser::new(&grammar);

        assert_eq!(trees(parser.parse(&["fall"]).unwrap()), vec![
            Tree::new("S", vec![node("N", vec![terminal("fall")])])
        ]);
    }

    #[test]
    fn parse_from_final_match() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("N", vec![terminal("fall")]);

        let (new_tree, new_frontier) = parser.parse_from(&["fall"], &tree, &[vec![0]]).next().unwrap();

        assert_eq!(new_tree, tree);
        assert!(new_frontier.is_empty());
    }

    #[test]
    fn parse_from_unresolved_position() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("N", vec![])]);
        let frontiers = vec![
            vec![vec![3]],
            vec![vec![1]],
            vec![vec![0, 2]]
        ];

        for frontier in frontiers {
            assert_eq!(parser.parse_from(&["fall"], &tree, &frontier).count(), 0, "{:?}", frontier);
        }
    }

    #[test]
    fn parser_keeps_grammar() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);

        assert!(std::ptr::eq(parser.grammar(), &grammar));
        assert_eq!(parser.grammar().start(), "NP");
    }

    #[test]
    fn match_empty_arguments() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![]), node("N", vec![])]);
        let tokens: [&str; 0] = [];

        assert_eq!(parser.match_terminal(&tokens, &tree, &[vec![0], vec![1]]).unwrap_err(), ParseError::EmptyTokens);
        assert_eq!(parser.match_terminal(&["the", "fall"], &tree, &[]).unwrap_err(), ParseError::EmptyFrontier);
    }

    #[test]
    fn match_mismatch() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![terminal("a")]), node("N", vec![])]);

        let mut parses = parser.match_terminal(&["the", "fall"], &tree, &[vec![0, 0], vec![1]]).unwrap();

        assert!(parses.next().is_none());
    }

    #[test]
    fn match_then_continue() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![terminal("the")]), node("N", vec![])]);

        let parses = trees(parser.match_terminal(&["the", "fall"], &tree, &[vec![0, 0], vec![1]]).unwrap());

        assert_eq!(parses, vec![Tree::new("NP", vec![
            node("D", vec![terminal("the")]),
            node("N", vec![terminal("fall")]),
        ])]);
    }

    #[test]
    fn expand_empty_frontier() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);

        assert_eq!(parser.expand(&["hello"], &Tree::leaf("S"), &[]).unwrap_err(), ParseError::EmptyFrontier);
    }

    #[test]
    fn expand_non_expandable() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![terminal("the")]), node("N", vec![])]);

        let mut parses = parser.expand(&["hello", "world"], &tree, &[vec![0, 0], vec![1]]).unwrap();

        assert!(parses.next().is_none());
    }

    #[test]
    fn expand_every_alternative() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![]), node("N", vec![])]);

        let parses = trees(parser.expand(&["the", "spring"], &tree, &[vec![0], vec![1]]).unwrap());

        assert_eq!(parses, vec![Tree::new("NP", vec![
            node("D", vec![terminal("the")]),
            node("N", vec![terminal("spring")]),
        ])]);
    }

    #[test]
    fn expand_keeps_input_tree() {
        let grammar = noun_phrases();
        let parser = TopDownParser::new(&grammar);
        let tree = Tree::new("NP", vec![node("D", vec![]), node("N", vec![])]);
        let before = tree.clone();

        assert_eq!(parser.expand(&["the", "leaves"], &tree, &[vec![0], vec![1]]).unwrap().count(), 1);
        assert_eq!(tree, before);
    }
}
