//! Genre field decoding.
//!
//! The catalog delivers genres in whatever shape the upstream export produced:
//! a Python-literal string such as `"[{'id': 28, 'name': 'Action'}]"`, a
//! native JSON list of `{name}` objects, or junk. Parsing is fallible and the
//! display path falls back to an empty string.

use serde_json::{Map, Number, Value};
use std::fmt::Display;

/// Successfully decoded genre field
#[derive(Debug, Clone, PartialEq)]
pub enum GenreField {
    /// A list of genre names
    Names(Vec<String>),
    /// A scalar or non-list literal, shown as-is
    Verbatim(String),
    /// No genre information
    Empty,
}

impl Display for GenreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenreField::Names(names) => write!(f, "{}", names.join(", ")),
            GenreField::Verbatim(text) => write!(f, "{}", text),
            GenreField::Empty => Ok(()),
        }
    }
}

/// Reasons a genre field is considered malformed
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenreError {
    #[error("invalid literal at position {position}: {reason}")]
    Syntax {
        position: usize,
        reason: &'static str,
    },

    #[error("genre field is a mapping, expected a list")]
    NotAList,

    #[error("genre entry {0} is not a mapping")]
    NotAMapping(usize),

    #[error("genre entry {0} has no name")]
    MissingName(usize),
}

/// Decodes a raw genre field
pub fn parse_genres(raw: &Value) -> Result<GenreField, GenreError> {
    match raw {
        Value::String(text) => match LiteralParser::new(text).parse_document()? {
            Value::Array(items) => names_from_list(&items).map(GenreField::Names),
            _ => Ok(GenreField::Verbatim(text.clone())),
        },
        Value::Array(items) => names_from_list(items).map(GenreField::Names),
        Value::Null => Ok(GenreField::Empty),
        Value::Number(n) => Ok(GenreField::Verbatim(n.to_string())),
        Value::Bool(b) => Ok(GenreField::Verbatim(
            if *b { "True" } else { "False" }.to_string(),
        )),
        Value::Object(_) => Err(GenreError::NotAList),
    }
}

/// Genre text for display; malformed fields become an empty string
pub fn display_genres(raw: &Value) -> String {
    match parse_genres(raw) {
        Ok(field) => field.to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "Malformed genre field, showing none");
            String::new()
        }
    }
}

fn names_from_list(items: &[Value]) -> Result<Vec<String>, GenreError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry = item.as_object().ok_or(GenreError::NotAMapping(i))?;
            entry
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(GenreError::MissingName(i))
        })
        .collect()
}

/// Recursive-descent parser for the subset of Python literals found in
/// exported data: lists, dicts, quoted strings, numbers, `True`, `False`, `None`.
struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn parse_document(mut self) -> Result<Value, GenreError> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos != self.chars.len() {
            return Err(self.error("trailing characters"));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, reason: &'static str) -> GenreError {
        GenreError::Syntax {
            position: self.pos,
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<Value, GenreError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.parse_list(),
            Some('{') => self.parse_dict(),
            Some(quote @ ('\'' | '"')) => self.parse_string(quote).map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_alphabetic() => self.parse_keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_list(&mut self) -> Result<Value, GenreError> {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.pos += 1;
                break;
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }

        Ok(Value::Array(items))
    }

    fn parse_dict(&mut self) -> Result<Value, GenreError> {
        self.pos += 1;
        let mut entries = Map::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }

            let key = match self.parse_value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(self.error("unsupported key")),
            };

            self.skip_whitespace();
            if self.bump() != Some(':') {
                return Err(self.error("expected ':'"));
            }

            let value = self.parse_value()?;
            entries.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }

        Ok(Value::Object(entries))
    }

    fn parse_string(&mut self, quote: char) -> Result<String, GenreError> {
        self.pos += 1;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some('x') => out.push(self.parse_code_point(2)?),
                    Some('u') => out.push(self.parse_code_point(4)?),
                    Some('U') => out.push(self.parse_code_point(8)?),
                    Some('\n') => {}
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Reads exactly `digits` hex digits of an `\x`, `\u` or `\U` escape
    fn parse_code_point(&mut self, digits: usize) -> Result<char, GenreError> {
        let end = self.pos + digits;
        let hex: String = self
            .chars
            .get(self.pos..end)
            .ok_or_else(|| self.error("truncated escape"))?
            .iter()
            .collect();

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(self.error("invalid escape"));
        }

        let code = u32::from_str_radix(&hex, 16).map_err(|_| self.error("invalid escape"))?;
        let c = char::from_u32(code).ok_or_else(|| self.error("invalid code point"))?;
        self.pos = end;
        Ok(c)
    }

    fn parse_number(&mut self) -> Result<Value, GenreError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();

        let number = if text.contains(['.', 'e', 'E']) {
            text.parse::<f64>().ok().and_then(Number::from_f64)
        } else {
            text.parse::<i64>().ok().map(Number::from)
        };

        number
            .map(Value::Number)
            .ok_or_else(|| self.error("invalid number"))
    }

    fn parse_keyword(&mut self) -> Result<Value, GenreError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        match word.as_str() {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => {
                self.pos = start;
                Err(self.error("unknown identifier"))
            }
        }
    }
}
