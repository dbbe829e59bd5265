//! Resolution of raw schema values into [`SchemaNode`] trees.
//!
//! Each schema value is inspected once, together with the [`KeyDescriptor`]
//! of the key it sits under, and turned into one of five node kinds. The
//! resulting tree is immutable and can be shared across validations.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::annotation::{KeyDescriptor, KeyMode, parse_key};
use crate::error::{SchemaError, SchemaErrorKind};
use crate::types::{PrimitiveKind, ValueKind};

/// Maximum nesting of objects and list patterns in a schema.
pub const MAX_SCHEMA_DEPTH: usize = 128;

const TYPE_START: char = '<';
const TYPE_END: char = '>';
const NULLABLE: char = '?';

/// A resolved schema value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// Input must deep-equal the value.
    Literal(Value),
    /// Input must be of the primitive kind, or `null` when `nullable`.
    TypeExpr { kind: PrimitiveKind, nullable: bool },
    /// Input, when present, must be of `kind`; when absent `default` is
    /// substituted.
    DefaultTyped { default: Value, kind: PrimitiveKind },
    /// Input must be an object; fields are kept in declaration order.
    NestedObject(Vec<FieldSpec>),
    /// Input must be an array whose every element matches the pattern.
    NestedList(Box<SchemaNode>),
}

impl SchemaNode {
    /// Short human-readable description of the node kind.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::TypeExpr { .. } => "type expression",
            Self::DefaultTyped { .. } => "default-typed value",
            Self::NestedObject(_) => "object",
            Self::NestedList(_) => "list",
        }
    }
}

/// A named member of a [`SchemaNode::NestedObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Annotation-stripped key.
    pub name: String,
    pub optional: bool,
    pub node: SchemaNode,
}

/// Resolves the value found under `descriptor`'s key.
///
/// Errors are located relative to the value itself; callers resolving an
/// object member prefix the member name.
///
/// # Examples
///
/// ```
/// use jval_core::{PrimitiveKind, SchemaNode, parse_key, resolve};
/// use serde_json::json;
///
/// let node = resolve(&parse_key("*age"), &json!("<int>")).unwrap();
/// assert_eq!(node, SchemaNode::TypeExpr { kind: PrimitiveKind::Int, nullable: false });
///
/// let node = resolve(&parse_key("?_active"), &json!(true)).unwrap();
/// assert!(matches!(node, SchemaNode::DefaultTyped { kind: PrimitiveKind::Bool, .. }));
///
/// assert!(resolve(&parse_key("*tags"), &json!([])).is_err());
/// ```
pub fn resolve(descriptor: &KeyDescriptor<'_>, raw: &Value) -> Result<SchemaNode, SchemaError> {
    resolve_mode(descriptor.mode, raw, 0)
}

fn resolve_mode(mode: KeyMode, raw: &Value, depth: usize) -> Result<SchemaNode, SchemaError> {
    match mode {
        KeyMode::Literal => Ok(SchemaNode::Literal(raw.clone())),
        KeyMode::Default => resolve_default(raw),
        KeyMode::Typed => resolve_typed(raw, depth),
    }
}

fn resolve_default(raw: &Value) -> Result<SchemaNode, SchemaError> {
    match PrimitiveKind::of(raw) {
        Some(kind) => Ok(SchemaNode::DefaultTyped {
            default: raw.clone(),
            kind,
        }),
        None => Err(SchemaError::new(SchemaErrorKind::InvalidDefaultKind {
            actual: ValueKind::of(raw),
        })),
    }
}

fn resolve_typed(raw: &Value, depth: usize) -> Result<SchemaNode, SchemaError> {
    if depth > MAX_SCHEMA_DEPTH {
        return Err(SchemaError::new(SchemaErrorKind::NestingTooDeep {
            limit: MAX_SCHEMA_DEPTH,
        }));
    }

    match raw {
        Value::String(text) => match type_expression(text) {
            Some(inner) => resolve_type_identifier(inner),
            None => Err(SchemaError::new(SchemaErrorKind::MissingTypeExpression {
                actual: ValueKind::Str,
            })),
        },
        Value::Object(map) => Ok(SchemaNode::NestedObject(resolve_fields(map, depth + 1)?)),
        Value::Array(items) => match items.as_slice() {
            [pattern] => {
                let element = resolve_typed(pattern, depth + 1).map_err(|e| e.in_index(0))?;
                Ok(SchemaNode::NestedList(Box::new(element)))
            }
            _ => Err(SchemaError::new(SchemaErrorKind::InvalidListPattern {
                len: items.len(),
            })),
        },
        other => Err(SchemaError::new(SchemaErrorKind::MissingTypeExpression {
            actual: ValueKind::of(other),
        })),
    }
}

/// Returns the text between the type delimiters, if `text` is enclosed in them.
fn type_expression(text: &str) -> Option<&str> {
    text.strip_prefix(TYPE_START)?.strip_suffix(TYPE_END)
}

fn resolve_type_identifier(inner: &str) -> Result<SchemaNode, SchemaError> {
    let (nullable, identifier) = match inner.strip_prefix(NULLABLE) {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    match PrimitiveKind::from_identifier(identifier) {
        Some(kind) => Ok(SchemaNode::TypeExpr { kind, nullable }),
        None => Err(SchemaError::new(SchemaErrorKind::InvalidTypeIdentifier {
            identifier: inner.to_string(),
        })),
    }
}

fn resolve_fields(map: &Map<String, Value>, depth: usize) -> Result<Vec<FieldSpec>, SchemaError> {
    let mut fields = Vec::with_capacity(map.len());
    let mut seen: HashSet<&str> = HashSet::new();

    for (raw_key, raw_value) in map {
        let descriptor = parse_key(raw_key);

        if descriptor.is_annotated() && descriptor.name.is_empty() {
            return Err(SchemaError::new(SchemaErrorKind::MalformedAnnotation {
                key: raw_key.clone(),
                reason: "annotation is not followed by a key name",
            }));
        }
        if !seen.insert(descriptor.name) {
            return Err(SchemaError::new(SchemaErrorKind::MalformedAnnotation {
                key: raw_key.clone(),
                reason: "another key in this object has the same name",
            }));
        }

        let node = resolve_mode(descriptor.mode, raw_value, depth)
            .map_err(|e| e.in_key(descriptor.name))?;
        fields.push(FieldSpec {
            name: descriptor.name.to_string(),
            optional: descriptor.optional,
            node,
        });
    }

    Ok(fields)
}

/// A compiled schema, ready to validate any number of values.
///
/// Compilation resolves every key annotation and type expression up front, so
/// schema errors are reported regardless of the data later validated. The
/// compiled tree is immutable and can be shared across threads.
///
/// # Examples
///
/// ```
/// use jval_core::{Schema, ValidateOptions};
/// use serde_json::json;
///
/// let schema = Schema::compile(&json!({"*name": "<str>", "?_admin": false})).unwrap();
/// let output = schema
///     .validate(&json!({"name": "Alice"}), &ValidateOptions::default())
///     .unwrap();
/// assert_eq!(output, json!({"name": "Alice", "admin": false}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    /// Compiles a raw schema document.
    ///
    /// The root is resolved as a type-required value: an object, a
    /// one-element list pattern, or a type expression.
    pub fn compile(raw: &Value) -> Result<Self, SchemaError> {
        let root = resolve_typed(raw, 0)?;
        debug!(root = root.describe(), "compiled schema");
        Ok(Self { root })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(raw: &Value) -> Result<Self, Self::Error> {
        Self::compile(raw)
    }
}
