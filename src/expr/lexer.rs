//! Expression tokenization

use super::SyntaxError;

/// Token types for directive expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    And,
    Or,
    Not,
    In,
    Is,
    True,
    False,
    None,

    // Identifiers and literals
    Identifier(String),
    StringLiteral(String),
    IntegerLiteral(i64),
    FloatLiteral(f64),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Punctuation
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Eof,
}

fn keyword(word: &str) -> Option<Token> {
    let token = match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "in" => Token::In,
        "is" => Token::Is,
        "True" | "true" => Token::True,
        "False" | "false" => Token::False,
        "None" | "null" => Token::None,
        _ => return None,
    };
    Some(token)
}

/// Tokenize an expression. The token list always ends with [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = start;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let word = &input[start..end];
            tokens.push(keyword(word).unwrap_or_else(|| Token::Identifier(word.to_string())));
            continue;
        }

        if c.is_ascii_digit() {
            let mut end = start;
            let mut is_float = false;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_digit() || c == '_' {
                    end = i + 1;
                    chars.next();
                } else if c == '.' && !is_float {
                    // `1.items()` is not a float; look past the dot
                    let next_is_digit = input[i + 1..]
                        .chars()
                        .next()
                        .map_or(false, |n| n.is_ascii_digit());
                    if !next_is_digit {
                        break;
                    }
                    is_float = true;
                    end = i + 1;
                    chars.next();
                } else {
                    break;
                }
            }
            let text: String = input[start..end].chars().filter(|c| *c != '_').collect();
            let token = if is_float {
                text.parse::<f64>()
                    .map(Token::FloatLiteral)
                    .map_err(|e| SyntaxError::new(format!("invalid number '{}': {}", text, e)))?
            } else {
                text.parse::<i64>()
                    .map(Token::IntegerLiteral)
                    .map_err(|e| SyntaxError::new(format!("invalid number '{}': {}", text, e)))?
            };
            tokens.push(token);
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, ch)) = chars.next() {
                if ch == c {
                    closed = true;
                    break;
                }
                if ch == '\\' {
                    match chars.next() {
                        Some((_, 'n')) => text.push('\n'),
                        Some((_, 't')) => text.push('\t'),
                        Some((_, other)) => text.push(other),
                        None => break,
                    }
                } else {
                    text.push(ch);
                }
            }
            if !closed {
                return Err(SyntaxError::new("unterminated string literal"));
            }
            tokens.push(Token::StringLiteral(text));
            continue;
        }

        chars.next();
        let next = chars.peek().map(|&(_, c)| c);
        let token = match (c, next) {
            ('=', Some('=')) => {
                chars.next();
                Token::Eq
            }
            ('!', Some('=')) => {
                chars.next();
                Token::NotEq
            }
            ('<', Some('=')) => {
                chars.next();
                Token::LtEq
            }
            ('>', Some('=')) => {
                chars.next();
                Token::GtEq
            }
            ('/', Some('/')) => {
                chars.next();
                Token::DoubleSlash
            }
            ('<', _) => Token::Lt,
            ('>', _) => Token::Gt,
            ('+', _) => Token::Plus,
            ('-', _) => Token::Minus,
            ('*', _) => Token::Star,
            ('/', _) => Token::Slash,
            ('%', _) => Token::Percent,
            (',', _) => Token::Comma,
            ('.', _) => Token::Dot,
            ('(', _) => Token::LParen,
            (')', _) => Token::RParen,
            ('[', _) => Token::LBracket,
            (']', _) => Token::RBracket,
            _ => return Err(SyntaxError::new(format!("unexpected character '{}'", c))),
        };
        tokens.push(token);
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}
