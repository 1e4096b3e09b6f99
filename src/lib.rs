pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod reader;
pub mod tokenizer;
pub mod tree;

pub use grammar::{Grammar, Production, Symbol};
pub use parser::{Frontier, ParseError, Parses, TopDownParser};
pub use tree::{Child, Position, Subtree, Tree};
