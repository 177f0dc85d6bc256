//! Configuration options for xCDN serialization.
//!
//! [`XcdnOptions`] controls how a [`Document`](crate::Document) is rendered:
//! compact or pretty, the indentation width, trailing commas, and whether a
//! lone top-level object is written as bare `key: value` pairs.
//!
//! ## Examples
//!
//! ```rust
//! use xcdn::{parse_str, to_string_with_options, XcdnOptions};
//!
//! let doc = parse_str("name: \"demo\", ids: [1, 2]").unwrap();
//!
//! let compact = to_string_with_options(&doc, XcdnOptions::new()).unwrap();
//! assert_eq!(compact, "name:\"demo\",ids:[1,2]");
//!
//! let braced = XcdnOptions::new().with_implicit_root(false);
//! assert_eq!(
//!     to_string_with_options(&doc, braced).unwrap(),
//!     "{name:\"demo\",ids:[1,2]}"
//! );
//! ```

/// Configuration options for xCDN serialization.
///
/// # Examples
///
/// ```rust
/// use xcdn::XcdnOptions;
///
/// // Default compact options
/// let options = XcdnOptions::new();
///
/// // Pretty-printed with 2-space indentation
/// let options = XcdnOptions::pretty();
///
/// // Custom configuration
/// let options = XcdnOptions::pretty()
///     .with_indent(4)
///     .with_trailing_commas(true);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XcdnOptions {
    pub indent: usize,
    pub pretty: bool,
    pub trailing_commas: bool,
    pub implicit_root: bool,
}

impl Default for XcdnOptions {
    fn default() -> Self {
        XcdnOptions {
            indent: 2,
            pretty: false,
            trailing_commas: false,
            implicit_root: true,
        }
    }
}

impl XcdnOptions {
    /// Creates default options (compact, 2-space indent, implicit root).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::XcdnOptions;
    ///
    /// let options = XcdnOptions::new();
    /// assert_eq!(options.indent, 2);
    /// assert!(!options.pretty);
    /// assert!(options.implicit_root);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        XcdnOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Emits a `,` after the last member of every multi-line array or object.
    ///
    /// Only affects pretty-printed output.
    #[must_use]
    pub fn with_trailing_commas(mut self, trailing_commas: bool) -> Self {
        self.trailing_commas = trailing_commas;
        self
    }

    /// Writes a document whose only value is an untagged, non-empty object as
    /// top-level `key: value` pairs instead of a braced object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::XcdnOptions;
    ///
    /// let options = XcdnOptions::new().with_implicit_root(false);
    /// assert!(!options.implicit_root);
    /// ```
    #[must_use]
    pub fn with_implicit_root(mut self, implicit_root: bool) -> Self {
        self.implicit_root = implicit_root;
        self
    }
}
