//! # xcdn
//!
//! A document model, parser and serializer for xCDN, a human-writable,
//! JSON-superset configuration and data-interchange language.
//!
//! ## What is xCDN?
//!
//! xCDN extends JSON with the things configuration files keep reinventing:
//!
//! - **Typed literals**: `d"19.99"` (decimal), `b"aGVsbG8="` (bytes),
//!   `t"2025-12-07T10:00:00Z"` (datetime), `r"PT30S"` (duration) and
//!   `u"550e8400-e29b-41d4-a716-446655440000"` (UUID)
//! - **Metadata**: `#tags` and `@annotations(args)` attached to any value
//! - **Prolog directives**: `$schema: "..."` entries ahead of the body
//! - **Comments, bare keys and trailing commas**
//!
//! ## Key Features
//!
//! - **Round-trip fidelity**: object key order survives parse → serialize, and
//!   `3`, `3.0` and `d"3.0"` stay an Int, a Float and a Decimal
//! - **Three-layer navigation**: [`Document`] → [`Node`] → [`Value`], with
//!   typed errors instead of panics
//! - **Serde bridge**: [`to_value`], [`from_value`] and [`from_str`] for plain
//!   Rust types
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use xcdn::{parse_str, to_string_pretty, Value};
//!
//! let text = r#"
//! $schema: "https://gslf.github.io/xCDN/schemas/v1/meta.xcdn",
//!
//! config: {
//!   name: "demo",
//!   ids: [1, 2, 3,],
//!   timeout: r"PT30S",
//!   payload: #secret b"aGVsbG8=",
//! }
//! "#;
//!
//! let mut doc = parse_str(text).unwrap();
//! let config = doc.get("config").unwrap();
//! assert_eq!(config.get("name").unwrap().value, "demo");
//! assert_eq!(config.get("ids").unwrap().get(2).unwrap().value, Value::Int(3));
//! assert!(config.get("payload").unwrap().has_tag("secret"));
//!
//! doc.get_mut("config").unwrap().set("name", "renamed").unwrap();
//! let text = to_string_pretty(&doc).unwrap();
//! assert!(text.contains("name: \"renamed\""));
//! ```
//!
//! ### Building Documents
//!
//! ```rust
//! use xcdn::{to_string, Document, Node, Object};
//!
//! let mut doc = Document::new();
//! doc.set("name", "demo").unwrap();
//! doc.set("port", Node::new(8080).with_tag("required")).unwrap();
//!
//! assert_eq!(to_string(&doc).unwrap(), "name:\"demo\",port:#required 8080");
//! ```
//!
//! ### Serde Interop
//!
//! ```rust
//! use serde::Deserialize;
//! use xcdn::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     name: String,
//!     ids: Vec<u32>,
//! }
//!
//! let config: Config = from_str("name: \"demo\", ids: [1, 2]").unwrap();
//! assert_eq!(config, Config { name: "demo".into(), ids: vec![1, 2] });
//! ```
//!
//! ## Logging
//!
//! The crate emits `debug!`/`trace!` records through the [`log`] facade at
//! parse and serialize boundaries and installs no logger of its own.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All container indexing is bounds-checked and returns [`Error`]
//! - Failed operations leave the model unchanged

pub mod access;
pub mod array;
pub mod de;
pub mod document;
pub mod error;
pub mod macros;
pub mod node;
pub mod object;
pub mod options;
pub mod ser;
pub mod value;

pub use access::{IntoKey, Key, MapLike, Members, SeqLike};
pub use array::Array;
pub use de::Parser;
pub use document::{Directive, Document};
pub use error::{Error, Result};
pub use node::{Annotation, Node, Tag};
pub use object::Object;
pub use options::XcdnOptions;
pub use ser::{Serializer, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parse xCDN text into a [`Document`].
///
/// # Examples
///
/// ```rust
/// use xcdn::parse_str;
///
/// let doc = parse_str("name: \"demo\"").unwrap();
/// assert_eq!(doc.get("name").unwrap().value, "demo");
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid xCDN. Error messages include
/// line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(s: &str) -> Result<Document> {
    Parser::from_str(s).parse_document()
}

/// Parse xCDN text from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid xCDN.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(v: &[u8]) -> Result<Document> {
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    parse_str(s)
}

/// Parse xCDN text from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use xcdn::parse_reader;
/// use std::io::Cursor;
///
/// let doc = parse_reader(Cursor::new(b"ids: [1, 2]")).unwrap();
/// assert_eq!(doc.get("ids").unwrap().len().unwrap(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the input is not valid xCDN.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(mut reader: R) -> Result<Document>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    parse_str(&string)
}

/// Serialize a [`Document`] to compact xCDN text.
///
/// # Errors
///
/// Returns an error if the document holds a value with no xCDN text form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(doc: &Document) -> Result<String> {
    to_string_with_options(doc, XcdnOptions::default())
}

/// Serialize a [`Document`] to pretty-printed xCDN text.
///
/// # Errors
///
/// Returns an error if the document holds a value with no xCDN text form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty(doc: &Document) -> Result<String> {
    to_string_with_options(doc, XcdnOptions::pretty())
}

/// Serialize a [`Document`] with custom options.
///
/// # Examples
///
/// ```rust
/// use xcdn::{parse_str, to_string_with_options, XcdnOptions};
///
/// let doc = parse_str("ids: [1, 2]").unwrap();
/// let options = XcdnOptions::pretty().with_trailing_commas(true);
/// let text = to_string_with_options(&doc, options).unwrap();
/// assert_eq!(text, "ids: [\n  1,\n  2,\n]");
/// ```
///
/// # Errors
///
/// Returns an error if the document holds a value with no xCDN text form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(doc: &Document, options: XcdnOptions) -> Result<String> {
    let mut serializer = Serializer::new(options);
    serializer.serialize_document(doc)?;
    Ok(serializer.into_inner())
}

/// Serialize a single [`Value`] to compact xCDN text.
///
/// # Examples
///
/// ```rust
/// use xcdn::{value_to_string, Value};
///
/// assert_eq!(value_to_string(&Value::Float(3.0)).unwrap(), "3.0");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no xCDN text form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn value_to_string(value: &Value) -> Result<String> {
    let mut serializer = Serializer::new(XcdnOptions::default());
    serializer.serialize_value(value)?;
    Ok(serializer.into_inner())
}

/// Serialize a [`Document`] to a writer as compact xCDN text.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, doc: &Document) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, doc, XcdnOptions::default())
}

/// Serialize a [`Document`] to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, doc: &Document, options: XcdnOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(doc, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use xcdn::to_value;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.get("x").unwrap().value, 1);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented (tuple and struct
/// enum variants, non-string map keys).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(de::ValueDeserializer::new(value))
}

/// Deserialize an instance of type `T` from xCDN text.
///
/// Directives are ignored. A body with one value deserializes that value, an
/// empty body deserializes as null, and several values as an array.
///
/// # Errors
///
/// Returns an error if the input is not valid xCDN or does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut values = parse_str(s)?.into_body();
    let body = match values.len() {
        0 => Value::Null,
        1 => values.remove(0).value,
        _ => Value::Array(Array::from(values)),
    };
    from_value(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Point,
        Circle(f64),
    }

    #[test]
    fn test_round_trip_through_value() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let value = to_value(&user).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "active", "tags"]);

        let mut doc = Document::new();
        doc.push(value);
        let text = to_string(&doc).unwrap();
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_from_str_body_shapes() {
        let many: Vec<i64> = from_str("1, 2, 3").unwrap();
        assert_eq!(many, vec![1, 2, 3]);

        let nothing: Option<i64> = from_str("$only: \"directives\"").unwrap();
        assert_eq!(nothing, None);

        let one: String = from_str("\"solo\"").unwrap();
        assert_eq!(one, "solo");
    }

    #[test]
    fn test_enums() {
        assert_eq!(to_value(&Shape::Point).unwrap(), Value::from("Point"));
        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        assert_eq!(circle.get("Circle").unwrap().value, Value::Float(1.5));

        assert_eq!(from_value::<Shape>(circle).unwrap(), Shape::Circle(1.5));
        assert_eq!(from_value::<Shape>(Value::from("Point")).unwrap(), Shape::Point);
    }

    #[test]
    fn test_typed_scalars_deserialize_as_text() {
        let doc = parse_str("id: u\"550e8400-e29b-41d4-a716-446655440000\", big: d\"18446744073709551615\"")
            .unwrap();
        let id: String = from_value(doc.get("id").unwrap().value.clone()).unwrap();
        assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
        let big: u64 = from_value(doc.get("big").unwrap().value.clone()).unwrap();
        assert_eq!(big, u64::MAX);
    }

    #[test]
    fn test_writer_and_reader() {
        let doc = parse_str("a: 1, b: [true, null]").unwrap();
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &doc).unwrap();
        assert_eq!(parse_slice(&buffer).unwrap(), doc);
        assert_eq!(parse_reader(buffer.as_slice()).unwrap(), doc);

        assert!(matches!(parse_slice(&[0xff, 0xfe]), Err(Error::Io(_))));
    }
}
