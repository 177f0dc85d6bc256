//! Top-level xCDN documents.
//!
//! A [`Document`] is an ordered list of `$directive: value` prolog entries
//! followed by an ordered list of top-level [`Node`]s. Indexing a document
//! works on two levels:
//!
//! - a position selects a top-level value directly
//! - a name looks into the *root object*, the first top-level value when it is
//!   an object; a document with no root object has no named members
//!
//! ```rust
//! use xcdn::{parse_str, Value};
//!
//! let doc = parse_str("$schema: \"v1\"\nname: \"demo\"").unwrap();
//! assert_eq!(doc.directive("schema").unwrap().value, "v1");
//! assert_eq!(doc.get("name").unwrap().value, "demo");
//! assert!(doc.get(0).unwrap().value.is_object());
//! assert!(doc.get(1).is_err());
//! ```

use crate::access::{IntoKey, Key};
use crate::{Error, Node, Object, Result, Value};
use log::trace;
use std::fmt;

/// A prolog entry such as `$schema: "https://example.org/schema"`.
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    /// Name without the leading `$`.
    pub name: String,
    pub value: Value,
}

impl Directive {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Directive {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}: {}", self.name, self.value)
    }
}

/// A parsed or programmatically built xCDN document.
///
/// # Examples
///
/// ```rust
/// use xcdn::{Document, Error};
///
/// let mut doc = Document::new();
/// doc.set("a", 1).unwrap();
/// assert_eq!(doc.values.len(), 1);
/// assert_eq!(doc.get("a").unwrap().value, 1);
///
/// doc.push(2);
/// assert!(matches!(doc.set(5, 0), Err(Error::IndexOutOfRange { .. })));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    pub prolog: Vec<Directive>,
    pub values: Vec<Node>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Document::default()
    }

    /// True when the document has neither directives nor values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prolog.is_empty() && self.values.is_empty()
    }

    /// Appends a top-level value, wrapping raw payloads.
    pub fn push(&mut self, value: impl Into<Node>) {
        self.values.push(value.into());
    }

    pub fn push_directive(&mut self, directive: Directive) {
        self.prolog.push(directive);
    }

    /// First directive named `name` (without the `$`).
    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.prolog.iter().find(|d| d.name == name)
    }

    /// The first top-level value, when it is an object.
    #[must_use]
    pub fn root_object(&self) -> Option<&Object> {
        self.values.first().and_then(|node| node.value.as_object())
    }

    fn root_object_mut(&mut self) -> Option<&mut Object> {
        self.values
            .first_mut()
            .and_then(|node| node.value.as_object_mut())
    }

    /// Returns a top-level value by position, or a root-object entry by name.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for a position past the last value, and
    /// [`Error::KeyNotFound`] for a name when there is no root object or the
    /// root object lacks the key.
    pub fn get<'k>(&self, key: impl IntoKey<'k>) -> Result<&Node> {
        match key.into_key() {
            Key::Index(index) => self
                .values
                .get(index)
                .ok_or_else(|| Error::index_out_of_range(index, self.values.len())),
            Key::Name(name) => self
                .root_object()
                .and_then(|object| object.get(name).ok())
                .ok_or_else(|| Error::key_not_found(name, "document")),
        }
    }

    pub fn get_mut<'k>(&mut self, key: impl IntoKey<'k>) -> Result<&mut Node> {
        match key.into_key() {
            Key::Index(index) => {
                let len = self.values.len();
                self.values
                    .get_mut(index)
                    .ok_or_else(|| Error::index_out_of_range(index, len))
            }
            Key::Name(name) => self
                .root_object_mut()
                .and_then(|object| object.get_mut(name).ok())
                .ok_or_else(|| Error::key_not_found(name, "document")),
        }
    }

    /// Replaces a top-level value by position, or sets a root-object entry by name.
    ///
    /// Writing a name into an empty document first creates an empty root
    /// object. Positions never grow the document: use [`Document::push`].
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for a position past the last value, and
    /// [`Error::TypeMismatch`] for a name when the first value is not an
    /// object. Nothing is modified on error.
    pub fn set<'k>(&mut self, key: impl IntoKey<'k>, value: impl Into<Node>) -> Result<()> {
        match key.into_key() {
            Key::Index(index) => {
                let len = self.values.len();
                let slot = self
                    .values
                    .get_mut(index)
                    .ok_or_else(|| Error::index_out_of_range(index, len))?;
                *slot = value.into();
                Ok(())
            }
            Key::Name(name) => {
                if self.values.is_empty() {
                    trace!("creating root object for key '{}'", name);
                    self.values.push(Node::new(Object::new()));
                }
                let first = &mut self.values[0];
                let found = first.value.type_name();
                match first.value.as_object_mut() {
                    Some(object) => {
                        object.set(name, value);
                        Ok(())
                    }
                    None => Err(Error::type_mismatch(
                        "index the document root by key",
                        found,
                    )),
                }
            }
        }
    }

    /// Membership test: a position within bounds, or a root-object key.
    #[must_use]
    pub fn contains_key<'k>(&self, key: impl IntoKey<'k>) -> bool {
        match key.into_key() {
            Key::Index(index) => index < self.values.len(),
            Key::Name(name) => self.root_object().is_some_and(|o| o.contains(name)),
        }
    }

    /// Indexes with a runtime [`Value`]: a non-negative `Int` or a `String`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::{Document, Error, Value};
    ///
    /// let mut doc = Document::new();
    /// doc.push("first");
    /// assert_eq!(doc.lookup(&Value::Int(0)).unwrap().value, "first");
    /// assert!(matches!(doc.lookup(&Value::Bool(true)), Err(Error::InvalidKeyType(_))));
    /// ```
    pub fn lookup(&self, key: &Value) -> Result<&Node> {
        self.get(Key::try_from(key)?)
    }

    pub fn lookup_mut(&mut self, key: &Value) -> Result<&mut Node> {
        self.get_mut(Key::try_from(key)?)
    }

    /// Consumes the document, keeping only its top-level values.
    #[must_use]
    pub fn into_body(self) -> Vec<Node> {
        self.values
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document({} directives, {} values)",
            self.prolog.len(),
            self.values.len()
        )
    }
}

impl From<Vec<Node>> for Document {
    fn from(values: Vec<Node>) -> Self {
        Document {
            prolog: Vec::new(),
            values,
        }
    }
}

impl FromIterator<Node> for Document {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Document::from(iter.into_iter().collect::<Vec<_>>())
    }
}
