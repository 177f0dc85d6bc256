//! xCDN serialization.
//!
//! This module provides the [`Serializer`] that renders a [`Document`] back to
//! xCDN text, and [`ValueSerializer`], the serde serializer behind
//! [`to_value`](crate::to_value).
//!
//! ## Overview
//!
//! - **Order preserving**: directives, top-level values, object keys, tags and
//!   annotations are written in the order they are stored
//! - **Kind preserving**: every scalar uses its own literal form, so a Float
//!   always re-parses as a Float and a Decimal as a Decimal
//! - **Compact or pretty**: see [`XcdnOptions`]
//!
//! ## Usage
//!
//! ```rust
//! use xcdn::{parse_str, to_string, to_string_pretty};
//!
//! let doc = parse_str("$v: 1, ratio: 3.0, tags: [#x \"a\"]").unwrap();
//!
//! assert_eq!(to_string(&doc).unwrap(), "$v:1,ratio:3.0,tags:[#x \"a\"]");
//! assert_eq!(
//!     to_string_pretty(&doc).unwrap(),
//!     "$v: 1\nratio: 3.0\ntags: [\n  #x \"a\"\n]"
//! );
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use xcdn::{Serializer, Value, XcdnOptions};
//!
//! let mut serializer = Serializer::new(XcdnOptions::new());
//! serializer.serialize_value(&Value::duration("PT30S")).unwrap();
//! assert_eq!(serializer.into_inner(), "r\"PT30S\"");
//! ```

use crate::de::{is_identifier, is_iso8601_duration};
use crate::{Array, Document, Error, Node, Object, Result, Value, XcdnOptions};
use base64::prelude::*;
use bigdecimal::BigDecimal;
use chrono::SecondsFormat;
use log::debug;
use serde::ser::Impossible;
use serde::{ser, Serialize};

/// The xCDN text serializer.
///
/// Created via [`Serializer::new`]; output accumulates across calls and is
/// taken with [`Serializer::into_inner`].
pub struct Serializer {
    output: String,
    options: XcdnOptions,
    indent_level: usize,
}

impl Serializer {
    pub fn new(options: XcdnOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes the prolog, then the body.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedValue`] for a value or name that has no xCDN text
    /// form: a non-finite float, an invalid duration, or a directive, tag or
    /// annotation name that is not an identifier.
    pub fn serialize_document(&mut self, doc: &Document) -> Result<()> {
        let start = self.output.len();
        let mut first = true;

        for directive in &doc.prolog {
            self.write_top_level_separator(&mut first);
            self.write_name('$', &directive.name, "directive")?;
            self.write_key_separator();
            self.serialize_value(&directive.value)?;
        }

        match self.implicit_root(doc) {
            Some(object) => {
                for (key, node) in object {
                    self.write_top_level_separator(&mut first);
                    self.write_key(key);
                    self.write_key_separator();
                    self.serialize_node(node)?;
                }
            }
            None => {
                for node in &doc.values {
                    self.write_top_level_separator(&mut first);
                    self.serialize_node(node)?;
                }
            }
        }

        debug!(
            "serialized xCDN document: {} directives, {} top-level values, {} bytes",
            doc.prolog.len(),
            doc.values.len(),
            self.output.len() - start
        );
        Ok(())
    }

    /// Writes tags and annotations, each followed by a space, then the value.
    pub fn serialize_node(&mut self, node: &Node) -> Result<()> {
        for tag in &node.tags {
            self.write_name('#', &tag.name, "tag")?;
            self.output.push(' ');
        }
        for annotation in &node.annotations {
            self.write_name('@', &annotation.name, "annotation")?;
            if !annotation.args.is_empty() {
                self.output.push('(');
                for (i, arg) in annotation.args.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                        if self.options.pretty {
                            self.output.push(' ');
                        }
                    }
                    self.serialize_value(arg)?;
                }
                self.output.push(')');
            }
            self.output.push(' ');
        }
        self.serialize_value(&node.value)
    }

    pub fn serialize_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => self.output.push_str(&i.to_string()),
            Value::Float(f) => self.write_float(*f)?,
            Value::Decimal(d) => self.write_typed('d', &d.to_string()),
            Value::String(s) => self.write_string(s),
            Value::Bytes(b) => self.write_typed('b', &BASE64_STANDARD.encode(b)),
            Value::DateTime(dt) => {
                self.write_typed('t', &dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Duration(d) => {
                if !is_iso8601_duration(d) {
                    return Err(Error::unsupported_value(&format!(
                        "'{}' is not an ISO 8601 duration",
                        d
                    )));
                }
                self.write_typed('r', d)
            }
            Value::Uuid(u) => self.write_typed('u', &u.hyphenated().to_string()),
            Value::Array(array) => self.write_array(array)?,
            Value::Object(object) => self.write_object(object)?,
        }
        Ok(())
    }

    /// The object to write as bare top-level members, if the document qualifies.
    fn implicit_root<'d>(&self, doc: &'d Document) -> Option<&'d Object> {
        if !self.options.implicit_root || doc.values.len() != 1 {
            return None;
        }
        let node = &doc.values[0];
        if !node.tags.is_empty() || !node.annotations.is_empty() {
            return None;
        }
        node.value.as_object().filter(|object| !object.is_empty())
    }

    fn write_top_level_separator(&mut self, first: &mut bool) {
        if !*first {
            self.output.push(if self.options.pretty { '\n' } else { ',' });
        }
        *first = false;
    }

    fn write_newline_indent(&mut self) {
        if self.options.pretty {
            self.output.push('\n');
            let width = self.indent_level * self.options.indent;
            self.output.extend(std::iter::repeat(' ').take(width));
        }
    }

    fn write_key_separator(&mut self) {
        self.output.push_str(if self.options.pretty { ": " } else { ":" });
    }

    /// Closes a non-empty container opened at the previous indent level.
    fn write_closing(&mut self, closing: char) {
        self.indent_level -= 1;
        if self.options.pretty {
            if self.options.trailing_commas {
                self.output.push(',');
            }
            self.write_newline_indent();
        }
        self.output.push(closing);
    }

    fn write_name(&mut self, sigil: char, name: &str, kind: &str) -> Result<()> {
        if !is_identifier(name) {
            return Err(Error::unsupported_value(&format!(
                "{} name '{}' is not an identifier",
                kind, name
            )));
        }
        self.output.push(sigil);
        self.output.push_str(name);
        Ok(())
    }

    fn write_key(&mut self, key: &str) {
        if is_identifier(key) {
            self.output.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    fn write_float(&mut self, f: f64) -> Result<()> {
        if !f.is_finite() {
            return Err(Error::unsupported_value(&format!(
                "{} has no xCDN literal form",
                f
            )));
        }
        // Debug keeps a fractional part or exponent, so the text stays a Float.
        self.output.push_str(&format!("{:?}", f));
        Ok(())
    }

    fn write_typed(&mut self, prefix: char, text: &str) {
        self.output.push(prefix);
        self.write_string(text);
    }

    #[inline]
    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                c if c.is_control() && (c as u32) < 0x20 => {
                    self.output.push_str(&format!("\\u{:04x}", c as u32));
                }
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    fn write_array(&mut self, array: &Array) -> Result<()> {
        if array.is_empty() {
            self.output.push_str("[]");
            return Ok(());
        }
        self.output.push('[');
        self.indent_level += 1;
        for (i, node) in array.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline_indent();
            self.serialize_node(node)?;
        }
        self.write_closing(']');
        Ok(())
    }

    fn write_object(&mut self, object: &Object) -> Result<()> {
        if object.is_empty() {
            self.output.push_str("{}");
            return Ok(());
        }
        self.output.push('{');
        self.indent_level += 1;
        for (i, (key, node)) in object.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline_indent();
            self.write_key(key);
            self.write_key_separator();
            self.serialize_node(node)?;
        }
        self.write_closing('}');
        Ok(())
    }
}

/// Serde serializer producing a [`Value`] tree.
///
/// Integers above `i64::MAX` become [`Value::Decimal`], byte slices become
/// [`Value::Bytes`], and newtype variants become single-entry objects.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Node>,
}

pub struct SerializeMap {
    map: Object,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = Impossible<Value, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = Impossible<Value, Error>;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) => Ok(Value::Decimal(BigDecimal::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut object = Object::new();
        object.set(variant, to_value_node(value)?);
        Ok(Value::Object(object))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_value("tuple variants"))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_value("struct variants"))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new(capacity: usize) -> Self {
        SerializeMap {
            map: Object::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(Array::from(self.vec)))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.set(key, to_value_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.set(key, to_value_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

fn to_value_node<T: Serialize + ?Sized>(value: &T) -> Result<Node> {
    value.serialize(ValueSerializer).map(Node::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_str, Annotation, Directive};
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn compact(doc: &Document) -> String {
        let mut serializer = Serializer::new(XcdnOptions::new());
        serializer.serialize_document(doc).unwrap();
        serializer.into_inner()
    }

    fn render(value: Value) -> String {
        let mut serializer = Serializer::new(XcdnOptions::new());
        serializer.serialize_value(&value).unwrap();
        serializer.into_inner()
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(render(Value::Null), "null");
        assert_eq!(render(Value::Bool(false)), "false");
        assert_eq!(render(Value::Int(-7)), "-7");
        assert_eq!(render(Value::Float(3.0)), "3.0");
        assert_eq!(render(Value::Float(1e300)), "1e300");
        assert_eq!(
            render(Value::Decimal(BigDecimal::from_str("19.99").unwrap())),
            "d\"19.99\""
        );
        assert_eq!(render(Value::from("a\"b\n")), "\"a\\\"b\\n\"");
        assert_eq!(render(Value::from(b"hello".to_vec())), "b\"aGVsbG8=\"");
        assert_eq!(
            render(Value::from(Utc.with_ymd_and_hms(2025, 12, 7, 10, 0, 0).unwrap())),
            "t\"2025-12-07T10:00:00Z\""
        );
        assert_eq!(render(Value::duration("PT30S")), "r\"PT30S\"");
        assert_eq!(
            render(Value::Uuid(
                Uuid::parse_str("550E8400-E29B-41D4-A716-446655440000").unwrap()
            )),
            "u\"550e8400-e29b-41d4-a716-446655440000\""
        );
        assert_eq!(render(Value::from("\u{1}")), "\"\\u0001\"");
    }

    #[test]
    fn test_unrepresentable_values() {
        let mut serializer = Serializer::new(XcdnOptions::new());
        assert!(matches!(
            serializer.serialize_value(&Value::Float(f64::NAN)),
            Err(Error::UnsupportedValue(_))
        ));
        assert!(matches!(
            serializer.serialize_value(&Value::duration("thirty seconds")),
            Err(Error::UnsupportedValue(_))
        ));
        assert!(matches!(
            serializer.serialize_node(&Node::new(1).with_tag("not valid")),
            Err(Error::UnsupportedValue(_))
        ));

        let mut doc = Document::new();
        doc.push_directive(Directive::new("bad name", 1));
        assert!(Serializer::new(XcdnOptions::new())
            .serialize_document(&doc)
            .is_err());
    }

    #[test]
    fn test_metadata_and_keys() {
        let mut object = Object::new();
        object.set(
            "payload",
            Node::new(b"hi".to_vec())
                .with_tag("secret")
                .with_annotation(Annotation::new("mime").with_arg("text/plain"))
                .with_annotation(Annotation::new("inline")),
        );
        object.set("with space", 1);
        let doc = Document::from(vec![Node::new(object)]);

        assert_eq!(
            compact(&doc),
            "payload:#secret @mime(\"text/plain\") @inline b\"aGk=\",\"with space\":1"
        );
    }

    #[test]
    fn test_implicit_root_rules() {
        let tagged = Document::from(vec![Node::new(Object::from_iter([(
            "a".to_string(),
            Node::new(1),
        )]))
        .with_tag("root")]);
        assert_eq!(compact(&tagged), "#root {a:1}");

        let empty = Document::from(vec![Node::new(Object::new())]);
        assert_eq!(compact(&empty), "{}");

        let two: Document = vec![Node::new(Object::new()), Node::new(2)].into();
        assert_eq!(compact(&two), "{},2");
    }

    #[test]
    fn test_pretty_layout() {
        let doc = parse_str("$schema: \"v1\"\nconfig: {name: \"demo\", ids: [1, 2], empty: []}")
            .unwrap();
        let options = XcdnOptions::pretty().with_indent(4).with_trailing_commas(true);
        let mut serializer = Serializer::new(options);
        serializer.serialize_document(&doc).unwrap();
        assert_eq!(
            serializer.into_inner(),
            concat!(
                "$schema: \"v1\"\n",
                "config: {\n",
                "    name: \"demo\",\n",
                "    ids: [\n",
                "        1,\n",
                "        2,\n",
                "    ],\n",
                "    empty: [],\n",
                "}"
            )
        );
    }

    #[test]
    fn test_value_serializer() {
        assert_eq!(u64::MAX.serialize(ValueSerializer).unwrap().type_name(), "Decimal");
        assert_eq!(7u64.serialize(ValueSerializer).unwrap(), Value::Int(7));
        assert_eq!(
            serde_bytes_like().serialize(ValueSerializer).unwrap(),
            Value::Bytes(vec![1, 2])
        );
        assert_eq!(
            Some("x").serialize(ValueSerializer).unwrap(),
            Value::from("x")
        );
        assert!(None::<i32>.serialize(ValueSerializer).unwrap().is_null());
    }

    struct Raw(Vec<u8>);

    impl Serialize for Raw {
        fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
            s.serialize_bytes(&self.0)
        }
    }

    fn serde_bytes_like() -> Raw {
        Raw(vec![1, 2])
    }
}
