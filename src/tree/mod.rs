/*
    This module holds derivation trees and their positional addressing
*/

use std::fmt::Display;
use std::rc::Rc;

use itertools::Itertools;
use thiserror::Error;

use crate::grammar::{Production, Symbol};

/// A path from a root to one of its descendants, one child index per step.
/// The empty position is the root itself.
pub type Position = Vec<usize>;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum TreeError {
    #[error("cannot assign to the empty position")]
    EmptyPosition,
    #[error("position {0:?} is out of range")]
    OutOfRange(Position),
    #[error("position {0:?} steps into a terminal")]
    NotANode(Position),
}

/// A child of a tree node: either another node or a terminal string.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Child {
    Node(Rc<Tree>),
    Terminal(String),
}

impl From<Tree> for Child {
    fn from(tree: Tree) -> Self {
        Child::Node(Rc::new(tree))
    }
}

/// What is found at a position of a tree.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Subtree<'a> {
    Node(&'a Tree),
    Terminal(&'a str),
}

/// A labelled, ordered tree.
///
/// Children are reference counted, so cloning a tree only copies the root.
/// Writes through [`Tree::set`] copy the nodes along the written position
/// that are shared with another tree and leave every other subtree shared.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Tree {
    label: String,
    children: Vec<Child>,
}

impl Tree {
    pub fn new(label: impl Into<String>, children: Vec<Child>) -> Self {
        Tree {
            label: label.into(),
            children
        }
    }

    pub fn leaf(label: impl Into<String>) -> Self {
        Tree::new(label, Vec::new())
    }

    /// Builds the one-level tree a production describes: a placeholder node
    /// for every nonterminal and the literal text for every terminal.
    pub fn from_production(production: &Production) -> Self {
        let children = production.rhs().iter()
            .map(|symbol| match symbol {
                Symbol::Nonterminal(n) => Tree::leaf(n.clone()).into(),
                Symbol::Terminal(t) => Child::Terminal(t.clone()),
            })
            .collect();

        Tree::new(production.lhs(), children)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, position: &[usize]) -> Result<Subtree<'_>, TreeError> {
        let mut current = Subtree::Node(self);

        for (depth, &index) in position.iter().enumerate() {
            let node = match current {
                Subtree::Node(node) => node,
                Subtree::Terminal(_) => return Err(TreeError::NotANode(position[..depth].to_vec())),
            };
            current = match node.children.get(index) {
                Some(Child::Node(child)) => Subtree::Node(child),
                Some(Child::Terminal(t)) => Subtree::Terminal(t),
                None => return Err(TreeError::OutOfRange(position[..=depth].to_vec())),
            };
        }

        Ok(current)
    }

    /// Replaces whatever is stored at `position` with `child`.
    pub fn set(&mut self, position: &[usize], child: Child) -> Result<(), TreeError> {
        let (&last, path) = position.split_last().ok_or(TreeError::EmptyPosition)?;

        let mut node = self;
        for (depth, &index) in path.iter().enumerate() {
            node = match node.children.get_mut(index) {
                Some(Child::Node(next)) => Rc::make_mut(next),
                Some(Child::Terminal(_)) => return Err(TreeError::NotANode(position[..=depth].to_vec())),
                None => return Err(TreeError::OutOfRange(position[..=depth].to_vec())),
            };
        }

        match node.children.get_mut(last) {
            Some(slot) => {
                *slot = child;
                Ok(())
            }
            None => Err(TreeError::OutOfRange(position.to_vec())),
        }
    }

    /// The terminal values under this tree, left to right. A node without
    /// children contributes its own label.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        if self.is_leaf() {
            leaves.push(&self.label);
            return;
        }

        for child in &self.children {
            match child {
                Child::Node(node) => node.collect_leaves(leaves),
                Child::Terminal(t) => leaves.push(t),
            }
        }
    }
}

impl Display for Child {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Child::Node(node) => write!(f, "{}", node),
            Child::Terminal(t) => write!(f, "'{}'", t),
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_leaf() {
            write!(f, "({})", self.label)
        } else {
            write!(f, "({}, {})", self.label, self.children.iter().join(", "))
        }
    }
}
