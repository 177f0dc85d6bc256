//! Error types for the xCDN document model, parser and serializer.
//!
//! ## Error Categories
//!
//! - **Model errors**: navigating or mutating a [`Document`](crate::Document),
//!   [`Node`](crate::Node) or [`Value`](crate::Value) the wrong way
//!   (type mismatches, missing keys, out-of-range positions)
//! - **Syntax errors**: malformed xCDN text, with line/column information
//! - **Literal errors**: a typed literal (`d"..."`, `b"..."`, `t"..."`, `r"..."`,
//!   `u"..."`) whose payload does not decode
//! - **I/O errors**: reader/writer failures
//!
//! ## Examples
//!
//! ```rust
//! use xcdn::{parse_str, Error};
//!
//! let result = parse_str("config: { ids: [1, 2");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Syntax error with detailed context
    #[error("Syntax error at line {line}, column {col}:\n{context}\n{msg}{suggestion}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
        suggestion: String,
    },

    /// A typed literal whose payload could not be decoded
    #[error("Invalid {kind} literal at line {line}, column {col}: {msg}")]
    InvalidLiteral {
        line: usize,
        col: usize,
        kind: String,
        msg: String,
    },

    /// Unexpected end of input
    #[error(
        "Unexpected end of input at line {line}, column {col}\n{context}\nExpected: {expected}"
    )]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
        context: String,
    },

    /// A container operation was applied to a value of the wrong kind
    #[error("Type mismatch: cannot {operation} on {found} value")]
    TypeMismatch { operation: String, found: String },

    /// A strict key lookup found no entry
    #[error("Key '{key}' not found in {scope}")]
    KeyNotFound { key: String, scope: String },

    /// Positional access outside `[0, len)`
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Indexing with a key that is neither a position nor a name
    #[error("Invalid key type: expected a non-negative integer or a string, found {0}")]
    InvalidKeyType(String),

    /// A map-only or sequence-only operation on the wrong variant
    #[error("Unsupported operation: {variant} value does not support {operation}")]
    UnsupportedOperation { operation: String, variant: String },

    /// A value that cannot be written as xCDN text
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Error;
    ///
    /// let err = Error::syntax(10, 5, "unexpected token");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: String::new(),
            suggestion: String::new(),
        }
    }

    /// Creates a syntax error with the offending source line and an optional suggestion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Error;
    ///
    /// let err = Error::syntax_with_context(
    ///     1,
    ///     7,
    ///     "unexpected identifier 'demo'",
    ///     "name: demo",
    ///     Some("strings must be quoted: \"demo\""),
    /// );
    /// assert!(err.to_string().contains("Help:"));
    /// ```
    pub fn syntax_with_context(
        line: usize,
        col: usize,
        msg: &str,
        context: &str,
        suggestion: Option<&str>,
    ) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
            suggestion: suggestion
                .map(|s| format!("\nHelp: {}", s))
                .unwrap_or_default(),
        }
    }

    /// Creates an error for a typed literal whose payload does not decode.
    pub fn invalid_literal(line: usize, col: usize, kind: &str, msg: &str) -> Self {
        Error::InvalidLiteral {
            line,
            col,
            kind: kind.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-file error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str, context: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates a type mismatch error for `operation` attempted on a `found` value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Error;
    ///
    /// let err = Error::type_mismatch("index by key", "Array");
    /// assert_eq!(err.to_string(), "Type mismatch: cannot index by key on Array value");
    /// ```
    pub fn type_mismatch(operation: &str, found: &str) -> Self {
        Error::TypeMismatch {
            operation: operation.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a missing-key error; `scope` names what was searched.
    pub fn key_not_found(key: &str, scope: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
            scope: scope.to_string(),
        }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    pub fn invalid_key_type(found: &str) -> Self {
        Error::InvalidKeyType(found.to_string())
    }

    /// Creates an error for a map-only or sequence-only operation on the wrong variant.
    pub fn unsupported_operation(variant: &str, operation: &str) -> Self {
        Error::UnsupportedOperation {
            operation: operation.to_string(),
            variant: variant.to_string(),
        }
    }

    pub fn unsupported_value(msg: &str) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_messages() {
        let err = Error::key_not_found("missing", "object");
        assert_eq!(err.to_string(), "Key 'missing' not found in object");

        let err = Error::index_out_of_range(3, 3);
        assert_eq!(err.to_string(), "Index 3 out of range for length 3");

        let err = Error::unsupported_operation("Int", "append");
        assert!(err.to_string().contains("Int value does not support append"));

        let err = Error::invalid_key_type("Bool");
        assert!(err.to_string().ends_with("found Bool"));
    }

    #[test]
    fn test_syntax_error_without_suggestion() {
        let err = Error::syntax_with_context(2, 4, "expected ':'", "  name \"x\"", None);
        let msg = err.to_string();
        assert!(msg.contains("line 2, column 4"));
        assert!(msg.contains("  name \"x\""));
        assert!(!msg.contains("Help:"));
    }

    #[test]
    fn test_serde_custom_errors() {
        let err = <Error as serde::de::Error>::custom("bad field");
        assert!(matches!(err, Error::Custom(ref m) if m == "bad field"));
    }
}
