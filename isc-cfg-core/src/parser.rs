use std::fs;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::lexer::{tokenize, Spanned, Token};
use crate::tree::CfgNode;

/// Errors that can occur while parsing config text into a [`CfgNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A quoted string was still open at end of input.
    #[error("unterminated string starting on line {line}")]
    UnterminatedString { line: usize },
    /// A token appeared where the grammar does not allow it.
    #[error("unexpected {found} on line {line}")]
    Unexpected { found: String, line: usize },
    /// A `}` had no matching `{`, or a block was still open at end of input.
    #[error("unbalanced braces: {0}")]
    UnbalancedBraces(String),
    /// Trailing words at end of a block or the document were not terminated.
    #[error("statement starting on line {line} is missing ';'")]
    MissingTerminator { line: usize },
    /// Failed to read input.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse config text into a [`CfgNode`] tree.
pub fn parse(input: &str) -> Result<CfgNode, ParseError> {
    let tokens = tokenize(input)?;
    let mut pos = 0;
    let root = parse_block(&tokens, &mut pos, None)?;
    if let Some(extra) = tokens.get(pos) {
        return Err(ParseError::UnbalancedBraces(format!(
            "unmatched '}}' on line {}",
            extra.line
        )));
    }
    Ok(root)
}

/// Read everything from `reader` and parse it.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<CfgNode, ParseError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    parse(&raw)
}

/// Parse a config file into a [`CfgNode`] tree.
pub fn parse_file(path: &Path) -> Result<CfgNode, ParseError> {
    let raw = fs::read_to_string(path)?;
    parse(&raw)
}

fn parse_block(
    tokens: &[Spanned],
    pos: &mut usize,
    opened_on: Option<usize>,
) -> Result<CfgNode, ParseError> {
    let mut node = CfgNode::new();
    let mut words: Vec<String> = Vec::new();
    let mut values: Option<Vec<String>> = None;
    let mut start_line = 0;

    loop {
        let Some(spanned) = tokens.get(*pos) else {
            if let Some(line) = opened_on {
                return Err(ParseError::UnbalancedBraces(format!(
                    "block opened on line {line} is never closed"
                )));
            }
            if !words.is_empty() || values.is_some() {
                return Err(ParseError::MissingTerminator { line: start_line });
            }
            return Ok(node);
        };
        *pos += 1;

        match &spanned.token {
            Token::Word(text) | Token::Quoted(text) => {
                if words.is_empty() && values.is_none() {
                    start_line = spanned.line;
                }
                match values.as_mut() {
                    Some(list) => list.push(text.clone()),
                    None => words.push(text.clone()),
                }
            }
            Token::Comma => {
                if values.is_none() {
                    let Some(last) = words.pop() else {
                        return Err(unexpected(spanned));
                    };
                    values = Some(vec![last]);
                }
            }
            Token::Semicolon => {
                insert_statement(&mut node, &mut words, values.take());
            }
            Token::OpenBrace => {
                if words.is_empty() || values.is_some() {
                    return Err(unexpected(spanned));
                }
                let body = parse_block(tokens, pos, Some(spanned.line))?;
                node.ensure_path_mut(words.as_slice()).merge(body);
                words.clear();
            }
            Token::CloseBrace => {
                if opened_on.is_none() {
                    // Leave the brace for the caller to report.
                    *pos -= 1;
                    if !words.is_empty() || values.is_some() {
                        return Err(ParseError::MissingTerminator { line: start_line });
                    }
                    return Ok(node);
                }
                if !words.is_empty() || values.is_some() {
                    return Err(ParseError::MissingTerminator { line: start_line });
                }
                return Ok(node);
            }
        }
    }
}

fn insert_statement(node: &mut CfgNode, words: &mut Vec<String>, values: Option<Vec<String>>) {
    match values {
        Some(list) => node.ensure_path_mut(words.as_slice()).push_values(list),
        None => {
            if let Some(last) = words.pop() {
                node.ensure_path_mut(words.as_slice()).push_values([last]);
            }
        }
    }
    words.clear();
}

fn unexpected(spanned: &Spanned) -> ParseError {
    ParseError::Unexpected {
        found: spanned.token.describe(),
        line: spanned.line,
    }
}
