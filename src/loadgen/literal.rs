//! Parser for list literals stored in CSV cells, e.g. `['6109.10', '6205.20']`
//! or `[10, 2.5]`.
//!
//! Accepts single or double quoted strings, integers, floats, `True`,
//! `False`, `None` and a trailing comma. Nested lists are not supported.

use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("expected '[' at position {0}")]
    ExpectedOpen(usize),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at position {position}")]
    Unexpected { found: char, position: usize },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("trailing characters after list at position {0}")]
    Trailing(usize),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn list(&mut self) -> Result<Vec<Value>, LiteralError> {
        self.skip_ws();
        if self.peek() != Some('[') {
            return Err(LiteralError::ExpectedOpen(self.pos));
        }
        self.pos += 1;

        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }

            items.push(self.item()?);

            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                Some(found) => {
                    return Err(LiteralError::Unexpected {
                        found,
                        position: self.pos - 1,
                    })
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }

        self.skip_ws();
        if self.pos < self.chars.len() {
            return Err(LiteralError::Trailing(self.pos));
        }
        Ok(items)
    }

    fn item(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                self.string(quote).map(Value::String)
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(found) => Err(LiteralError::Unexpected {
                found,
                position: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escaped = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let raw: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();

        if let Ok(int) = raw.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber(raw))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => Err(LiteralError::Unexpected {
                found: self.chars[start],
                position: start,
            }),
        }
    }
}

/// Parse a whole cell as one list literal.
pub fn parse_list(src: &str) -> Result<Vec<Value>, LiteralError> {
    Parser::new(src).list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_list() {
        let items = parse_list("['6109.10', \"6205.20\"]").unwrap();
        assert_eq!(items, vec![json!("6109.10"), json!("6205.20")]);
    }

    #[test]
    fn test_numbers_keep_int_and_float() {
        let items = parse_list("[10, -3, 2.5, 1e2]").unwrap();
        assert_eq!(items, vec![json!(10), json!(-3), json!(2.5), json!(100.0)]);
        assert!(items[0].is_i64());
        assert!(items[2].is_f64());
    }

    #[test]
    fn test_empty_and_trailing_comma() {
        assert!(parse_list("[]").unwrap().is_empty());
        assert!(parse_list("  [ ]  ").unwrap().is_empty());
        assert_eq!(parse_list("['a',]").unwrap(), vec![json!("a")]);
    }

    #[test]
    fn test_quotes_and_escapes_inside_strings() {
        let items = parse_list(r#"["it's", 'say \'hi\'', 'a, b']"#).unwrap();
        assert_eq!(items, vec![json!("it's"), json!("say 'hi'"), json!("a, b")]);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            parse_list("[True, False, None]").unwrap(),
            vec![json!(true), json!(false), Value::Null]
        );
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(parse_list(""), Err(LiteralError::ExpectedOpen(0)));
        assert_eq!(parse_list("nan"), Err(LiteralError::ExpectedOpen(0)));
        assert_eq!(parse_list("['a'"), Err(LiteralError::UnexpectedEnd));
        assert!(matches!(parse_list("['a' 'b']"), Err(LiteralError::Unexpected { found: '\'', .. })));
        assert!(matches!(parse_list("[1] extra"), Err(LiteralError::Trailing(_))));
        assert!(matches!(parse_list("[foo]"), Err(LiteralError::Unexpected { found: 'f', .. })));
    }
}
