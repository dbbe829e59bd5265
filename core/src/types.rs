//! Value kinds and location paths shared by the resolver and the validator.
//!
//! Kinds describe the shape of a JSON value as the annotation language sees
//! it (`str`, `int`, `float`, `bool`, plus the structural `null`, `object`
//! and `array`). Locations identify where inside the input tree a problem
//! was found and render as `addresses[0].number`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kind named by a type expression or inferred from a default.
///
/// # Examples
///
/// ```
/// use jval_core::PrimitiveKind;
///
/// assert_eq!(PrimitiveKind::from_identifier("int"), Some(PrimitiveKind::Int));
/// assert_eq!(PrimitiveKind::from_identifier("integer"), None);
/// assert_eq!(PrimitiveKind::Float.to_string(), "float");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Str,
    Int,
    Float,
    Bool,
}

impl PrimitiveKind {
    /// Parses the identifier found between `<` and `>`.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Infers the primitive kind of a value, if it has one.
    ///
    /// `null`, arrays and objects have no primitive kind.
    pub fn of(value: &Value) -> Option<Self> {
        match ValueKind::of(value) {
            ValueKind::Str => Some(Self::Str),
            ValueKind::Int => Some(Self::Int),
            ValueKind::Float => Some(Self::Float),
            ValueKind::Bool => Some(Self::Bool),
            ValueKind::Null | ValueKind::Object | ValueKind::Array => None,
        }
    }

    /// Returns `true` if `value` is of this kind.
    pub fn matches(self, value: &Value) -> bool {
        ValueKind::of(value) == ValueKind::from(self)
    }

    pub fn as_str(self) -> &'static str {
        ValueKind::from(self).as_str()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed kind of any JSON value.
///
/// Numbers representable as `i64` or `u64` are `Int`; every other number is
/// `Float`. The two are never interchangeable.
///
/// # Examples
///
/// ```
/// use jval_core::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(ValueKind::of(&json!(3)), ValueKind::Int);
/// assert_eq!(ValueKind::of(&json!(3.0)), ValueKind::Float);
/// assert_eq!(ValueKind::of(&json!({"a": 1})), ValueKind::Object);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Null,
    Object,
    Array,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::Str,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int,
            Value::Number(_) => Self::Float,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl From<PrimitiveKind> for ValueKind {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Str => Self::Str,
            PrimitiveKind::Int => Self::Int,
            PrimitiveKind::Float => Self::Float,
            PrimitiveKind::Bool => Self::Bool,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step into a JSON tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Object member, by annotation-stripped name.
    Key(String),
    /// Array element, by position.
    Index(usize),
}

/// Location of a value inside the input tree, rooted at the top-level value.
///
/// The root itself is the empty location. Rendering joins keys with `.` and
/// wraps indices in brackets.
///
/// # Examples
///
/// ```
/// use jval_core::{Location, PathSegment};
///
/// let location = Location::root()
///     .child(PathSegment::Key("addresses".into()))
///     .child(PathSegment::Index(0))
///     .child(PathSegment::Key("number".into()));
/// assert_eq!(location.to_string(), "addresses[0].number");
/// assert!(Location::root().is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location(Vec<PathSegment>);

impl Location {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns a new location one step deeper.
    pub fn child(mut self, segment: PathSegment) -> Self {
        self.0.push(segment);
        self
    }

    /// Prepends an enclosing segment. Used while an error propagates outward.
    pub(crate) fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl From<Vec<PathSegment>> for Location {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if i == 0 => f.write_str(name)?,
                PathSegment::Key(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
