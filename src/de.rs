//! xCDN parsing.
//!
//! This module provides the [`Parser`] that turns xCDN text into a
//! [`Document`], and the value deserializer behind [`from_value`](crate::from_value).
//!
//! ## Overview
//!
//! - **Single pass**: O(n) character scan; the only lookahead is the short
//!   `key :` probe that decides whether the body is an implicit object
//! - **Typed literals**: `d"..."`, `b"..."`, `t"..."`, `r"..."` and `u"..."`
//!   are decoded and validated while parsing, so a loaded document never holds
//!   a malformed decimal, timestamp or UUID
//! - **Error reporting**: 1-based line/column plus the offending source line
//!
//! ## Syntax
//!
//! ```text
//! // line comments and /* block comments */ are trivia
//! $schema: "https://example.org/schema/v1",   // prolog directives come first
//!
//! name: "demo",                               // implicit top-level object
//! ids: [1, 2, 3,],                            // trailing commas are fine
//! payload: #secret @mime("text/plain") b"aGVsbG8=",
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use xcdn::{parse_str, Value};
//!
//! let doc = parse_str("price: d\"19.99\", retries: 3, ratio: 3.0").unwrap();
//! assert!(doc.get("price").unwrap().value.is_decimal());
//! assert_eq!(doc.get("retries").unwrap().value, Value::Int(3));
//! assert_eq!(doc.get("ratio").unwrap().value, Value::Float(3.0));
//! ```

use crate::{Annotation, Array, Directive, Document, Error, Node, Object, Result, Tag, Value};
use base64::prelude::*;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, SecondsFormat};
use log::debug;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use std::str::FromStr;
use uuid::Uuid;

/// Maximum nesting of arrays, objects and annotation arguments.
pub const MAX_DEPTH: usize = 128;

/// The xCDN text parser.
///
/// Created via [`Parser::from_str`]; [`Parser::parse_document`] consumes the
/// whole input.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
}

#[derive(Clone, Copy)]
struct Checkpoint {
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    /// Parses the complete input: prolog directives, then the body.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`], [`Error::UnexpectedEof`] or [`Error::InvalidLiteral`]
    /// at the first offending position.
    pub fn parse_document(&mut self) -> Result<Document> {
        let mut doc = Document::new();

        self.skip_trivia()?;
        while self.peek_char() == Some('$') {
            self.next_char();
            let name = self.parse_identifier()?;
            self.skip_trivia()?;
            self.expect_char(':', "':' after directive name")?;
            self.skip_trivia()?;
            let value = self.parse_value()?;
            doc.push_directive(Directive { name, value });
            self.skip_separator()?;
        }

        if self.at_key() {
            let object = self.parse_members(None)?;
            doc.push(object);
        } else {
            while !self.at_end() {
                if self.peek_char() == Some('$') {
                    return Err(self.misplaced_directive());
                }
                let node = self.parse_node()?;
                doc.push(node);
                self.skip_separator()?;
            }
        }

        debug!(
            "parsed xCDN document: {} directives, {} top-level values, {} lines",
            doc.prolog.len(),
            doc.values.len(),
            self.line
        );
        Ok(doc)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    fn current_line(&self) -> &'a str {
        self.input.lines().nth(self.line - 1).unwrap_or("")
    }

    fn syntax_error(&self, msg: &str) -> Error {
        Error::syntax_with_context(self.line, self.column, msg, self.current_line(), None)
    }

    fn eof_error(&self, expected: &str) -> Error {
        Error::unexpected_eof(self.line, self.column, expected, self.current_line())
    }

    /// Error for a missing token: end of input or a wrong character.
    fn unexpected(&self, expected: &str) -> Error {
        match self.peek_char() {
            None => self.eof_error(expected),
            Some(ch) => self.syntax_error(&format!("expected {}, found '{}'", expected, ch)),
        }
    }

    fn misplaced_directive(&self) -> Error {
        self.syntax_error("directives must precede all values")
    }

    /// Runs `parse` one nesting level deeper, failing past [`MAX_DEPTH`].
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.syntax_error(&format!(
                "nesting too deep, the limit is {} levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expect_char(&mut self, expected: char, description: &str) -> Result<()> {
        if self.peek_char() == Some(expected) {
            self.next_char();
            Ok(())
        } else {
            Err(self.unexpected(description))
        }
    }

    /// Skips whitespace, `// line` and `/* block */` comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.next_char();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(ch) = self.next_char() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.next_char();
                    self.next_char();
                    loop {
                        if self.rest().starts_with("*/") {
                            self.next_char();
                            self.next_char();
                            break;
                        }
                        if self.next_char().is_none() {
                            return Err(self.eof_error("end of block comment '*/'"));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Trivia, then an optional `,`, then trivia.
    fn skip_separator(&mut self) -> Result<()> {
        self.skip_trivia()?;
        if self.peek_char() == Some(',') {
            self.next_char();
            self.skip_trivia()?;
        }
        Ok(())
    }

    fn parse_identifier(&mut self) -> Result<String> {
        match self.peek_char() {
            Some(ch) if is_identifier_start(ch) => {}
            _ => return Err(self.unexpected("identifier")),
        }
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if is_identifier_continue(ch) {
                self.next_char();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.position].to_string())
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek_char() {
            Some('"') => self.parse_string_literal(),
            Some('$') => Err(self.misplaced_directive()),
            Some(ch) if is_identifier_start(ch) => self.parse_identifier(),
            _ => Err(self.unexpected("object key")),
        }
    }

    /// True when the input continues with `key :`. Never consumes input.
    fn at_key(&mut self) -> bool {
        let start = self.checkpoint();
        let found = self.parse_key().is_ok()
            && self.skip_trivia().is_ok()
            && self.peek_char() == Some(':');
        self.rewind(start);
        found
    }

    /// Parses `key: node` members up to `closing`, or to the end of input for
    /// the implicit top-level object.
    ///
    /// Inside braces members must be separated by `,`; at the top level the
    /// comma is optional.
    fn parse_members(&mut self, closing: Option<char>) -> Result<Object> {
        let mut object = Object::new();

        loop {
            self.skip_trivia()?;
            match (self.peek_char(), closing) {
                (Some(ch), Some(close)) if ch == close => {
                    self.next_char();
                    return Ok(object);
                }
                (None, None) => return Ok(object),
                (None, Some(close)) => return Err(self.eof_error(&format!("'{}'", close))),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_trivia()?;
            self.expect_char(':', "':' after object key")?;
            self.skip_trivia()?;
            let node = self.parse_node()?;
            if object.contains(&key) {
                debug!(
                    "duplicate key '{}' at line {}, later value replaces earlier",
                    key, self.line
                );
            }
            object.set(key, node);

            self.skip_trivia()?;
            match (self.peek_char(), closing) {
                (Some(','), _) => {
                    self.next_char();
                }
                (None, _) | (_, None) => {}
                (Some(ch), Some(close)) if ch == close => {}
                (Some(_), Some(close)) => {
                    return Err(self.unexpected(&format!("',' or '{}'", close)));
                }
            }
        }
    }

    fn parse_array(&mut self) -> Result<Array> {
        self.expect_char('[', "'['")?;
        let mut array = Array::new();

        loop {
            self.skip_trivia()?;
            match self.peek_char() {
                Some(']') => {
                    self.next_char();
                    return Ok(array);
                }
                None => return Err(self.eof_error("']'")),
                _ => {}
            }

            array.append(self.parse_node()?);

            self.skip_trivia()?;
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(']') | None => {}
                Some(_) => return Err(self.unexpected("',' or ']'")),
            }
        }
    }

    /// Parses `(` value, ... `)` after an annotation name.
    fn parse_arguments(&mut self) -> Result<Vec<Value>> {
        self.expect_char('(', "'('")?;
        let mut args = Vec::new();

        loop {
            self.skip_trivia()?;
            match self.peek_char() {
                Some(')') => {
                    self.next_char();
                    return Ok(args);
                }
                None => return Err(self.eof_error("')'")),
                _ => {}
            }

            args.push(self.parse_value()?);

            self.skip_trivia()?;
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(')') | None => {}
                Some(_) => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    /// Parses leading `#tag` / `@annotation(...)` metadata and the value.
    fn parse_node(&mut self) -> Result<Node> {
        let mut node = Node::default();

        loop {
            self.skip_trivia()?;
            match self.peek_char() {
                Some('#') => {
                    self.next_char();
                    let name = self.parse_identifier()?;
                    node.tags.push(Tag::new(name));
                }
                Some('@') => {
                    self.next_char();
                    let mut annotation = Annotation::new(self.parse_identifier()?);
                    self.skip_trivia()?;
                    if self.peek_char() == Some('(') {
                        annotation.args = self.nested(Self::parse_arguments)?;
                    }
                    node.annotations.push(annotation);
                }
                _ => break,
            }
        }

        node.value = self.parse_value()?;
        Ok(node)
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek_char() {
            None => Err(self.eof_error("a value")),
            Some('{') => self.nested(|parser| {
                parser.next_char();
                parser.parse_members(Some('}')).map(Value::Object)
            }),
            Some('[') => self.nested(|parser| parser.parse_array().map(Value::Array)),
            Some('"') => Ok(Value::String(self.parse_string_literal()?)),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if is_identifier_start(ch) => self.parse_word(),
            Some(ch) => Err(self.syntax_error(&format!("unexpected character '{}'", ch))),
        }
    }

    /// Keywords, or a typed literal when a prefix letter touches a quote.
    fn parse_word(&mut self) -> Result<Value> {
        if let (Some(prefix), Some('"')) = (self.peek_char(), self.peek_second()) {
            if matches!(prefix, 'd' | 'b' | 't' | 'r' | 'u') {
                return self.parse_typed(prefix);
            }
        }

        let (line, col) = (self.line, self.column);
        let word = self.parse_identifier()?;
        match word.as_str() {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(Error::syntax_with_context(
                line,
                col,
                &format!("unexpected identifier '{}'", word),
                self.current_line(),
                Some(&format!("strings must be quoted: \"{}\"", word)),
            )),
        }
    }

    fn parse_typed(&mut self, prefix: char) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        self.next_char();
        let text = self.parse_string_literal()?;
        let invalid = |kind: &str, msg: &str| Error::invalid_literal(line, col, kind, msg);

        match prefix {
            'd' => BigDecimal::from_str(&text)
                .map(Value::Decimal)
                .map_err(|e| invalid("decimal", &e.to_string())),
            'b' => decode_base64(&text)
                .map(Value::Bytes)
                .ok_or_else(|| invalid("bytes", "payload is not valid Base64")),
            't' => DateTime::parse_from_rfc3339(&text)
                .map(Value::DateTime)
                .map_err(|e| invalid("datetime", &e.to_string())),
            'r' if is_iso8601_duration(&text) => Ok(Value::Duration(text)),
            'r' => Err(invalid(
                "duration",
                &format!("'{}' is not an ISO 8601 duration such as PT30S", text),
            )),
            'u' => Uuid::parse_str(&text)
                .map(Value::Uuid)
                .map_err(|e| invalid("uuid", &e.to_string())),
            other => Err(self.syntax_error(&format!("unknown literal prefix '{}'", other))),
        }
    }

    fn consume_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.next_char();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn parse_number(&mut self) -> Result<Value> {
        let (line, col) = (self.line, self.column);
        let start = self.position;

        if self.peek_char() == Some('-') {
            self.next_char();
        }
        if self.consume_digits() == 0 {
            return Err(self.unexpected("digit"));
        }

        let mut is_float = false;
        if self.peek_char() == Some('.') {
            self.next_char();
            if self.consume_digits() == 0 {
                return Err(self.unexpected("digit after '.'"));
            }
            is_float = true;
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            self.next_char();
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.next_char();
            }
            if self.consume_digits() == 0 {
                return Err(self.unexpected("exponent digit"));
            }
            is_float = true;
        }

        if let Some(ch) = self.peek_char() {
            if is_identifier_continue(ch) {
                return Err(self.syntax_error(&format!("invalid character '{}' in number", ch)));
            }
        }

        let text = &self.input[start..self.position];
        if is_float {
            match text.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                Ok(_) => Err(Error::invalid_literal(
                    line,
                    col,
                    "float",
                    &format!("{} is out of range for a 64-bit float", text),
                )),
                Err(e) => Err(Error::invalid_literal(line, col, "float", &e.to_string())),
            }
        } else {
            text.parse::<i64>().map(Value::Int).map_err(|_| {
                Error::invalid_literal(
                    line,
                    col,
                    "integer",
                    &format!("{} does not fit in a 64-bit signed integer", text),
                )
            })
        }
    }

    fn parse_string_literal(&mut self) -> Result<String> {
        if self.rest().starts_with("\"\"\"") {
            return self.parse_raw_string();
        }
        self.expect_char('"', "'\"'")?;

        let mut result = String::new();
        loop {
            match self.next_char() {
                None => return Err(self.eof_error("closing '\"'")),
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('"') => result.push('"'),
                    Some('\\') => result.push('\\'),
                    Some('/') => result.push('/'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('u') => result.push(self.parse_unicode_escape()?),
                    Some(other) => {
                        // Unknown escape - preserve literally (lenient parsing)
                        result.push('\\');
                        result.push(other);
                    }
                    None => return Err(self.eof_error("escape sequence")),
                },
                Some(ch) => result.push(ch),
            }
        }
    }

    /// `"""..."""`: no escapes, newlines kept.
    fn parse_raw_string(&mut self) -> Result<String> {
        for _ in 0..3 {
            self.next_char();
        }
        let Some(end) = self.rest().find("\"\"\"") else {
            return Err(self.eof_error("closing '\"\"\"'"));
        };
        let text = self.rest()[..end].to_string();
        for _ in 0..text.chars().count() + 3 {
            self.next_char();
        }
        Ok(text)
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| {
                    self.syntax_error("invalid unicode escape (expected 4 hex digits)")
                })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Decodes the digits after `\u`, combining UTF-16 surrogate pairs.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.rest().starts_with("\\u") {
                    return Err(self.syntax_error("unpaired high surrogate in unicode escape"));
                }
                self.next_char();
                self.next_char();
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(self.syntax_error("invalid low surrogate in unicode escape"));
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(self.syntax_error("unpaired low surrogate in unicode escape"));
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| self.syntax_error("invalid unicode code point"))
    }
}

#[inline]
pub(crate) const fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

#[inline]
pub(crate) const fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')
}

/// True for text the parser accepts as a bare identifier.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

/// Accepts standard and URL-safe alphabets, padded or not; whitespace is ignored.
fn decode_base64(text: &str) -> Option<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    [
        &BASE64_STANDARD,
        &BASE64_URL_SAFE,
        &BASE64_STANDARD_NO_PAD,
        &BASE64_URL_SAFE_NO_PAD,
    ]
    .iter()
    .find_map(|engine| engine.decode(&compact).ok())
}

/// Checks `PnYnMnWnDTnHnMnS` with designators in order, at least one
/// component, and an optional fraction on any number.
pub(crate) fn is_iso8601_duration(text: &str) -> bool {
    let Some(body) = text.strip_prefix('P') else {
        return false;
    };
    let (date, time) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };
    match time {
        Some(time) => !time.is_empty() && duration_part(date, "YMWD") && duration_part(time, "HMS"),
        None => !date.is_empty() && duration_part(date, "YMWD"),
    }
}

fn duration_part(part: &str, designators: &str) -> bool {
    let mut remaining = designators;
    let mut digits = 0;
    let mut after_digit = false;
    let mut has_fraction = false;

    for ch in part.chars() {
        if ch.is_ascii_digit() {
            digits += 1;
            after_digit = true;
        } else if matches!(ch, '.' | ',') && after_digit && !has_fraction {
            has_fraction = true;
            after_digit = false;
        } else if after_digit {
            match remaining.find(ch) {
                Some(index) => remaining = &remaining[index + ch.len_utf8()..],
                None => return false,
            }
            digits = 0;
            after_digit = false;
            has_fraction = false;
        } else {
            return false;
        }
    }

    digits == 0
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Node>,
}

impl SeqDeserializer {
    fn new(array: Array) -> Self {
        SeqDeserializer {
            iter: array.into_vec().into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed.deserialize(ValueDeserializer::new(node.value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Node>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(object: Object) -> Self {
        MapDeserializer {
            iter: object.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, node)) => {
                self.value = Some(node.value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(object) => visitor.visit_map(MapDeserializer::new(object)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

/// Drives a `Deserialize` impl from an owned [`Value`].
///
/// Typed scalars without a serde counterpart (Decimal, DateTime, Duration,
/// Uuid) are offered as strings, except integral decimals that fit `u64`.
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Int(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Decimal(d) => match d.to_u64() {
                Some(u) if d.is_integer() => visitor.visit_u64(u),
                _ => visitor.visit_string(d.to_string()),
            },
            Value::String(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::DateTime(dt) => {
                visitor.visit_string(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Duration(d) => visitor.visit_string(d),
            Value::Uuid(u) => visitor.visit_string(u.hyphenated().to_string()),
            Value::Array(array) => visitor.visit_seq(SeqDeserializer::new(array)),
            Value::Object(object) => visitor.visit_map(MapDeserializer::new(object)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(object) if object.len() == 1 => {
                let mut entries = object.into_iter();
                match entries.next() {
                    Some((variant, node)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: node.value,
                    }),
                    None => Err(Error::custom("Expected enum variant")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document> {
        Parser::from_str(input).parse_document()
    }

    #[test]
    fn test_implicit_root_object() {
        let doc = parse("name: \"demo\"\nids: [1, 2, 3,]").unwrap();
        assert_eq!(doc.values.len(), 1);
        let root = doc.root_object().unwrap();
        assert_eq!(root.keys().cloned().collect::<Vec<_>>(), vec!["name", "ids"]);
        assert_eq!(root.get("ids").unwrap().len().unwrap(), 3);
    }

    #[test]
    fn test_value_sequence_body() {
        let doc = parse("1, \"two\" [3] {four: 4}").unwrap();
        assert_eq!(doc.values.len(), 4);
        assert_eq!(doc.values[0].value, Value::Int(1));
        assert_eq!(doc.values[1].value, "two");
        assert!(doc.values[2].value.is_array());
        assert!(doc.values[3].value.is_object());
    }

    #[test]
    fn test_prolog_directives() {
        let doc = parse("$schema: \"v1\", $version: 2\nkey: true").unwrap();
        assert_eq!(doc.prolog.len(), 2);
        assert_eq!(doc.prolog[1].name, "version");
        assert_eq!(doc.prolog[1].value, Value::Int(2));
        assert_eq!(doc.get("key").unwrap().value, Value::Bool(true));

        assert!(matches!(
            parse("a: 1\n$late: 2"),
            Err(Error::Syntax { line: 2, .. })
        ));
        assert!(matches!(parse("1 $late: 2"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_numbers_keep_their_kind() {
        let doc = parse("[3, 3.0, -2, 1e3, 2.5E-1, d\"3.0\"]").unwrap();
        let array = doc.values[0].value.as_array().unwrap();
        assert_eq!(array.get(0).unwrap().value, Value::Int(3));
        assert_eq!(array.get(1).unwrap().value, Value::Float(3.0));
        assert_eq!(array.get(2).unwrap().value, Value::Int(-2));
        assert_eq!(array.get(3).unwrap().value, Value::Float(1000.0));
        assert_eq!(array.get(4).unwrap().value, Value::Float(0.25));
        assert_eq!(
            array.get(5).unwrap().value,
            Value::Decimal(BigDecimal::from_str("3.0").unwrap())
        );
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            parse("n: 9223372036854775808"),
            Err(Error::InvalidLiteral { ref kind, .. }) if kind == "integer"
        ));
        assert_eq!(
            parse("n: -9223372036854775808").unwrap().get("n").unwrap().value,
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_metadata_follows_the_key() {
        let doc = parse(
            "$schema: \"https://example.org/schema/v1\",\n\
             name: \"demo\",\n\
             ids: [1, 2, 3,],\n\
             payload: #secret @mime(\"text/plain\") b\"aGVsbG8=\",\n",
        )
        .unwrap();
        let payload = doc.get("payload").unwrap();
        assert!(payload.has_tag("secret"));
        assert!(payload.annotation("mime").is_some());
        assert_eq!(payload.value, Value::Bytes(b"hello".to_vec()));

        assert!(matches!(
            parse("#secret payload: b\"aGVsbG8=\""),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn test_float_overflow() {
        assert!(matches!(
            parse("x: 1e400"),
            Err(Error::InvalidLiteral { line: 1, col: 4, ref kind, .. }) if kind == "float"
        ));
        assert!(matches!(
            parse("[-1.5e999]"),
            Err(Error::InvalidLiteral { ref kind, .. }) if kind == "float"
        ));
        assert_eq!(
            parse("x: 1e300").unwrap().get("x").unwrap().value,
            Value::Float(1e300)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(parse(&at_limit).is_ok());

        let too_deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert!(matches!(
            parse(&too_deep),
            Err(Error::Syntax { ref msg, .. }) if msg.contains("nesting too deep")
        ));

        assert!(parse(&"[".repeat(10_000)).is_err());
        assert!(parse(&"{a:".repeat(200_000)).is_err());
        assert!(parse(&"[@a(".repeat(200_000)).is_err());

        let balanced = "[".repeat(200_000) + &"]".repeat(200_000);
        assert!(parse(&balanced).is_err());
    }

    #[test]
    fn test_typed_literals() {
        let doc = parse(concat!(
            "timeout: r\"PT30S\", id: u\"550e8400-e29b-41d4-a716-446655440000\",\n",
            "created_at: t\"2025-12-07T10:00:00Z\", payload: b\"aGVsbG8=\",\n",
            "url_safe: b\"_-8\", price: d\"19.99\""
        ))
        .unwrap();
        assert_eq!(doc.get("timeout").unwrap().value.as_duration(), Some("PT30S"));
        assert!(doc.get("id").unwrap().value.is_uuid());
        assert!(doc.get("created_at").unwrap().value.is_datetime());
        assert_eq!(
            doc.get("payload").unwrap().value.as_bytes(),
            Some(&b"hello"[..])
        );
        assert_eq!(
            doc.get("url_safe").unwrap().value.as_bytes(),
            Some(&[0xff, 0xef][..])
        );
        assert!(doc.get("price").unwrap().value.is_decimal());
    }

    #[test]
    fn test_invalid_typed_literals() {
        for (input, kind) in [
            ("d\"abc\"", "decimal"),
            ("b\"@@@\"", "bytes"),
            ("t\"yesterday\"", "datetime"),
            ("r\"30 seconds\"", "duration"),
            ("u\"not-a-uuid\"", "uuid"),
        ] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLiteral { kind: ref k, .. } if k == kind),
                "{} produced {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_tags_and_annotations() {
        let doc =
            parse("payload: #secret @mime(\"text/plain\", 2) @inline b\"aGk=\"").unwrap();
        let node = doc.get("payload").unwrap();
        assert!(node.has_tag("secret"));
        assert_eq!(node.annotations.len(), 2);
        let mime = node.annotation("mime").unwrap();
        assert_eq!(mime.args, vec![Value::from("text/plain"), Value::Int(2)]);
        assert!(node.annotation("inline").unwrap().args.is_empty());
        assert_eq!(node.value.as_bytes(), Some(&b"hi"[..]));
    }

    #[test]
    fn test_string_escapes() {
        let doc = parse(r#"s: "a\"b\\c\/d\n\t\u00e9\ud83d\ude00\q""#).unwrap();
        assert_eq!(
            doc.get("s").unwrap().value,
            "a\"b\\c/d\n\té\u{1F600}\\q"
        );
        assert!(parse(r#"s: "\ude00""#).is_err());
        assert!(parse(r#"s: "\u12""#).is_err());
    }

    #[test]
    fn test_raw_strings() {
        let doc = parse("text: \"\"\"line one\nline \"two\" \\n\"\"\", next: 1").unwrap();
        assert_eq!(
            doc.get("text").unwrap().value,
            "line one\nline \"two\" \\n"
        );
        assert_eq!(doc.get("next").unwrap().value, Value::Int(1));
    }

    #[test]
    fn test_comments_are_trivia() {
        let doc = parse("// header\na: 1, /* inline */ b: [2 /* two */, 3] // tail").unwrap();
        assert_eq!(doc.get("b").unwrap().len().unwrap(), 2);
        assert!(matches!(
            parse("a: 1 /* never closed"),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_duplicate_keys_replace_in_place() {
        let doc = parse("{a: 1, b: 2, a: 3}").unwrap();
        let object = doc.values[0].value.as_object().unwrap();
        let items: Vec<_> = object
            .items()
            .map(|(k, n)| (k.as_str(), n.value.clone()))
            .collect();
        assert_eq!(items, vec![("a", Value::Int(3)), ("b", Value::Int(2))]);
    }

    #[test]
    fn test_quoted_keys() {
        let doc = parse("\"with space\": 1, {\"x-y\": 2}").unwrap_err();
        assert!(matches!(doc, Error::Syntax { .. }));

        let doc = parse("\"with space\": 1, plain: 2").unwrap();
        assert_eq!(doc.get("with space").unwrap().value, Value::Int(1));
    }

    #[test]
    fn test_error_positions() {
        match parse("a: 1\nb: demo") {
            Err(Error::Syntax {
                line,
                col,
                context,
                suggestion,
                ..
            }) => {
                assert_eq!((line, col), (2, 4));
                assert_eq!(context, "b: demo");
                assert!(suggestion.contains("\"demo\""));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }

        assert!(matches!(
            parse("config: { ids: [1, 2"),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(parse("{a: 1 b: 2}"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("[1 2]"), Err(Error::Syntax { .. })));
        assert!(matches!(parse("n: 12abc"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_empty_and_trivia_only_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  // nothing here\n").unwrap().is_empty());
        assert_eq!(parse("{}").unwrap().values.len(), 1);
    }

    #[test]
    fn test_duration_validation() {
        for valid in ["PT30S", "P1Y2M3DT4H5M6S", "P2W", "PT0.5S", "P1D", "PT1H30M"] {
            assert!(is_iso8601_duration(valid), "{}", valid);
        }
        for invalid in ["", "P", "PT", "30S", "P1S", "PT1Y", "P1DT", "PT1M1H", "P1.5.5D", "PTS"] {
            assert!(!is_iso8601_duration(invalid), "{}", invalid);
        }
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private.v2-beta"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("with space"));
        assert!(!is_identifier(""));
    }
}
