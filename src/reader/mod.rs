/*
    This module reads grammars written as text, one rule per line:

        NP -> N | D N | Adj N
        N -> 'fall' | 'leaves'
*/

mod lexer;
mod verifier;

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::*;
pub use verifier::undefined_nonterminals;

#[derive(Debug, Error)]
pub enum ReadErrorType {
    // A line which should contain a rule has no arrow after its symbol
    #[error("Expected `->` after nonterminal")]
    MissingArrow,
    // A rule has multiple arrows
    #[error("Unexpected `->` encountered")]
    UnexpectedArrow,
    // The user starts a rule line with something other than a nonterminal
    #[error("Tried to define something other than a nonterminal")]
    MissingNonterminal,
    // There is an unclosed quote
    #[error("Unmatched quotes")]
    UnmatchedQuote,
    // A character that cannot start any token
    #[error("Unexpected character `{0}`")]
    UnexpectedCharacter(char),
    // An alternative with no symbols, e.g. `A -> B |`
    #[error("Empty alternative")]
    EmptyAlternative,
    // Somehow a line was not split at `|` before its alternatives were read
    // This is a problem with topdown, not the grammar
    #[error("Alternatives were not fully split (this is a problem with topdown, not the grammar)")]
    UnsplitAlternatives,
    // A blank line got too deep into the reader
    // This is a problem with topdown, not the grammar
    #[error("Blank line encountered in rule reader (this is a problem with topdown, not the grammar)")]
    UnexpectedBlankLine,
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for ReadErrorType {}

impl PartialEq for ReadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReadErrorType::FileError(a), ReadErrorType::FileError(b)) => a.kind() == b.kind(),
            (ReadErrorType::UnexpectedCharacter(a), ReadErrorType::UnexpectedCharacter(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other)
        }
    }
}

pub type ReadError = Error<ReadErrorType>;
pub type ReadErrors = Errors<ReadErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> ReadError {
    ReadError {
        location: Location {
            file: file.to_path_buf(),
            line: 0
        },
        error: ReadErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, ReadErrorType>;
pub type LineResult<T> = std::result::Result<T, ReadError>;
pub type FileResult<T> = std::result::Result<T, ReadErrors>;

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    if tokens.is_empty() {
        return Err(ReadErrorType::EmptyAlternative);
    }

    tokens.iter().map(|t| match t {
        Token::Arrow => Err(ReadErrorType::UnexpectedArrow),
        Token::Or => Err(ReadErrorType::UnsplitAlternatives),
        Token::Nonterminal(s) => Ok(Symbol::Nonterminal(s.clone())),
        Token::Terminal(s) => Ok(Symbol::Terminal(s.clone()))
    }).collect()
}

fn parse_line(tokens: &[Token]) -> Result<Vec<Production>> {
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(s)) => Ok(s),
        Some(_) => Err(ReadErrorType::MissingNonterminal),
        None => Err(ReadErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(ReadErrorType::MissingArrow)
    }

    tokens[2..]
        .split(|t| *t == Token::Or)
        .map(|alternative| parse_alternative(alternative).map(|rhs| Production::new(symbol.clone(), rhs)))
        .collect()
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Vec<Production>> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line))
        .map_err(|error| ReadError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

// Reads numbered lines into a grammar, collecting the errors of every line
fn read_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, file: &Path) -> FileResult<Grammar> {
    let (rules, errors): (Vec<_>, Vec<_>) = lines
        .filter(|(_, line)| line.as_ref().map_or(true, |line| is_rule_line(line)))
        .map(|(num, line_res)| {
            line_res.and_then(|line| parse_lex_line(&line, Location {
                file: file.to_path_buf(),
                line: num
            }))
        })
        .partition_result();

    if !errors.is_empty() {
        return Err(errors);
    }

    let productions = rules.into_iter().flatten().collect_vec();
    let start_symbol = productions.first()
        .map(|production| production.lhs().to_string())
        .unwrap_or_default();

    let grammar = Grammar::new(start_symbol, productions);
    log::debug!(
        "read {} productions for {} nonterminals from {}, starting with `{}`",
        grammar.productions().len(),
        grammar.nonterminals().count(),
        Location { file: file.to_path_buf(), line: 0 },
        grammar.start()
    );
    for symbol in undefined_nonterminals(&grammar) {
        log::warn!("nonterminal `{}` is used but never defined", symbol);
    }

    return Ok(grammar);
}

// Reads a grammar from text. The first rule's left-hand side is the start
// symbol.
pub fn read_str(text: &str) -> FileResult<Grammar> {
    let lines = text.lines()
        .enumerate()
        .map(|(num, line)| (num + 1, Ok(line.to_string())));

    read_lines(lines, Path::new(""))
}

pub fn read_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path)])?;
    let lines = std::io::BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| io_error(e, path)))
        .enumerate()
        .map(|(num, line)| (num + 1, line));

    read_lines(lines, path)
}
