//! Error types for schema compilation and data validation.
//!
//! Two disjoint families: [`SchemaError`] means the schema document itself is
//! ill-formed, [`ValidationError`] means the data does not conform. Both carry
//! a [`Location`] rooted at the top-level value. [`Error`] joins them for the
//! one-shot [`validate`](crate::validate) entry point.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::types::{Location, PathSegment, ValueKind};

/// Displays a location, rendering the empty location as `root`.
struct At<'a>(&'a Location);

impl fmt::Display for At<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_root() {
            f.write_str("root")
        } else {
            write!(f, "'{}'", self.0)
        }
    }
}

/// What is wrong with a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaErrorKind {
    /// A `<...>` type expression names something other than
    /// `str`, `int`, `float` or `bool`.
    #[error("invalid type identifier '{identifier}'")]
    InvalidTypeIdentifier { identifier: String },
    /// A list pattern does not declare exactly one element pattern.
    #[error("list schema must declare exactly one element pattern, found {len}")]
    InvalidListPattern { len: usize },
    /// A default value has no primitive kind to infer a type from.
    #[error("default value must be a str, int, float or bool, found {actual}")]
    InvalidDefaultKind { actual: ValueKind },
    /// A `*` key whose value is neither a type expression, an object, nor a
    /// list pattern.
    #[error(
        "type-required key must specify a type expression, nested object, or list pattern, found {actual}"
    )]
    MissingTypeExpression { actual: ValueKind },
    /// A key whose annotation cannot be interpreted.
    #[error("malformed annotation on key '{key}': {reason}")]
    MalformedAnnotation { key: String, reason: &'static str },
    /// Schema nesting exceeds the compilation depth limit.
    #[error("schema nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl SchemaErrorKind {
    /// Stable machine-readable tag for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTypeIdentifier { .. } => "invalid_type_identifier",
            Self::InvalidListPattern { .. } => "invalid_list_pattern",
            Self::InvalidDefaultKind { .. } => "invalid_default_kind",
            Self::MissingTypeExpression { .. } => "missing_type_expression",
            Self::MalformedAnnotation { .. } => "malformed_annotation",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
        }
    }
}

/// The schema document is ill-formed, independent of any data.
///
/// # Examples
///
/// ```
/// use jval_core::{Schema, SchemaErrorKind};
/// use serde_json::json;
///
/// let err = Schema::compile(&json!({"*x": "<weird>"})).unwrap_err();
/// assert_eq!(err.location.to_string(), "x");
/// assert!(matches!(err.kind, SchemaErrorKind::InvalidTypeIdentifier { .. }));
/// assert_eq!(err.to_string(), "schema error at 'x': invalid type identifier 'weird'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema error at {}: {kind}", At(.location))]
pub struct SchemaError {
    pub location: Location,
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    pub(crate) fn new(kind: SchemaErrorKind) -> Self {
        Self {
            location: Location::root(),
            kind,
        }
    }

    pub(crate) fn in_key(mut self, name: &str) -> Self {
        self.location.prepend(PathSegment::Key(name.to_string()));
        self
    }

    pub(crate) fn in_index(mut self, index: usize) -> Self {
        self.location.prepend(PathSegment::Index(index));
        self
    }
}

/// How the data fails to conform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    /// A required key is absent. The error location points at the key.
    #[error("missing required key '{name}'")]
    MissingKey { name: String },
    /// The object carries a key the schema does not declare. The error
    /// location points at the enclosing object.
    #[error("unexpected key '{name}' not defined in schema")]
    UnexpectedKey { name: String },
    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("expected literal {expected}, found {actual}")]
    LiteralMismatch { expected: Value, actual: Value },
}

impl ValidationErrorKind {
    /// Stable machine-readable tag for the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingKey { .. } => "missing_key",
            Self::UnexpectedKey { .. } => "unexpected_key",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::LiteralMismatch { .. } => "literal_mismatch",
        }
    }
}

/// The data does not conform to the schema.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation error at {}: {kind}", At(.location))]
pub struct ValidationError {
    pub location: Location,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind) -> Self {
        Self {
            location: Location::root(),
            kind,
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<ValueKind>, actual: &Value) -> Self {
        Self::new(ValidationErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: ValueKind::of(actual),
        })
    }

    pub(crate) fn in_key(mut self, name: &str) -> Self {
        self.location.prepend(PathSegment::Key(name.to_string()));
        self
    }

    pub(crate) fn in_index(mut self, index: usize) -> Self {
        self.location.prepend(PathSegment::Index(index));
        self
    }
}

/// Either failure family, as returned by [`validate`](crate::validate).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Returns `true` when the schema, not the data, is at fault.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    pub fn location(&self) -> &Location {
        match self {
            Self::Schema(err) => &err.location,
            Self::Validation(err) => &err.location,
        }
    }

    /// Stable tag of the underlying variant, e.g. `type_mismatch`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Schema(err) => err.kind.code(),
            Self::Validation(err) => err.kind.code(),
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
