use crate::parser::ParseError;

/// A lexical token of the ISC config dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word or unquoted value.
    Word(String),
    /// Double-quoted string, quotes stripped and escapes resolved.
    Quoted(String),
    Semicolon,
    Comma,
    OpenBrace,
    CloseBrace,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Word(word) => format!("word '{word}'"),
            Token::Quoted(text) => format!("string \"{text}\""),
            Token::Semicolon => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::OpenBrace => "'{'".to_string(),
            Token::CloseBrace => "'}'".to_string(),
        }
    }
}

/// Token together with the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

fn ends_word(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | ',' | '{' | '}' | '"' | '#')
}

/// Return `true` when `text` reads back as a single [`Token::Word`] without
/// quoting.
pub fn is_bare_word(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(ends_word)
}

/// Split config text into tokens, dropping whitespace and `#` comments.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ';' | ',' | '{' | '}' => {
                chars.next();
                let token = match c {
                    ';' => Token::Semicolon,
                    ',' => Token::Comma,
                    '{' => Token::OpenBrace,
                    _ => Token::CloseBrace,
                };
                tokens.push(Spanned { token, line });
            }
            '"' => {
                let start = line;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some(escaped) => {
                                if escaped == '\n' {
                                    line += 1;
                                }
                                text.push(escaped);
                            }
                            None => break,
                        },
                        '\n' => {
                            line += 1;
                            text.push(c);
                        }
                        _ => text.push(c),
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedString { line: start });
                }
                tokens.push(Spanned {
                    token: Token::Quoted(text),
                    line: start,
                });
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if ends_word(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Spanned {
                    token: Token::Word(word),
                    line,
                });
            }
        }
    }

    Ok(tokens)
}
