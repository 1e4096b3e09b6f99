use itertools::structs::MultiPeek;
use itertools::{Itertools, PeekingNext};

use super::{ReadErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Nonterminal(String),
    Terminal(String)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '-'
}

pub fn lex_terminal(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    // Consume the open quote, the close quote has to be the same character
    let quote = line.next();
    let token_text = line.peeking_take_while(|&c| Some(c) != quote).collect();

    if line.next() != quote {
        return Err(ReadErrorType::UnmatchedQuote);
    }

    Ok(Token::Terminal(token_text))
}

pub fn lex_nonterminal(line: &mut MultiPeek<impl Iterator<Item = char>>) -> Result<Token> {
    let mut name = String::new();

    // A `-` belongs to the name unless it starts an arrow
    loop {
        line.reset_peek();
        match line.peek().copied() {
            Some('-') if line.peek() == Some(&'>') => break,
            Some(c) if is_name_char(c) => {
                name.push(c);
                line.next();
            }
            _ => break
        }
    }
    line.reset_peek();

    return Ok(Token::Nonterminal(name));
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().multipeek();

    loop {
        // Lookahead past the first character is only needed for `->`
        line_chars.reset_peek();
        let Some(&c) = line_chars.peek() else {
            break;
        };

        if c == '-' && line_chars.peek() == Some(&'>') {
            line_chars.next();
            line_chars.next();
            tokens.push(Token::Arrow);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c == '\'' || c == '"' {
            tokens.push(lex_terminal(&mut line_chars)?);
        } else if is_name_char(c) {
            tokens.push(lex_nonterminal(&mut line_chars)?);
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            return Err(ReadErrorType::UnexpectedCharacter(c));
        }
    }

    return Ok(tokens);
}
