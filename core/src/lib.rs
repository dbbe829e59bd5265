//! Validation and normalization of JSON values against annotated schemas.
//!
//! A schema is itself a JSON document. Key prefixes say how each member is
//! checked, and type expressions name primitive kinds:
//!
//! - `"version": "1.0"` — literal, the value must equal `"1.0"`.
//! - `"*name": "<str>"` — required, must be a string.
//! - `"?*nick": "<str>"` — optional, must be a string when present.
//! - `"?_active": true` — optional bool, defaults to `true` when absent.
//! - `"*tags": ["<str>"]` — required list, every element a string.
//! - `"*owner": {...}` — required nested object, checked recursively.
//!
//! The pipeline has three stages: [`parse_key`] splits annotations off key
//! names, [`resolve`] turns raw schema values into [`SchemaNode`]s (wrapped
//! by [`Schema::compile`]), and [`Schema::validate`] walks the input. Schema
//! problems surface as [`SchemaError`], data problems as [`ValidationError`].
//!
//! # Example
//!
//! ```
//! use jval_core::*;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "version": "1.0",
//!     "*name": "<str>",
//!     "?_has_pets": false,
//!     "*addresses": [{"*street": "<str>", "*number": "<int>"}],
//! });
//! let data = json!({
//!     "version": "1.0",
//!     "name": "Alice",
//!     "addresses": [{"street": "Main", "number": 4}],
//! });
//!
//! let output = validate(&data, &schema, &ValidateOptions::default()).unwrap();
//! assert_eq!(output["has_pets"], json!(false));
//!
//! let bad = json!({
//!     "version": "1.0",
//!     "name": "Alice",
//!     "addresses": [{"street": "Main", "number": "4"}],
//! });
//! let err = validate(&bad, &schema, &ValidateOptions::default()).unwrap_err();
//! assert!(!err.is_schema_error());
//! assert_eq!(err.location().to_string(), "addresses[0].number");
//! ```

mod annotation;
mod error;
mod options;
mod resolve;
mod types;
mod validate;

pub use annotation::{KeyDescriptor, KeyMode, parse_key};
pub use error::{
    Error, Result, SchemaError, SchemaErrorKind, ValidationError, ValidationErrorKind,
};
pub use options::ValidateOptions;
pub use resolve::{FieldSpec, MAX_SCHEMA_DEPTH, Schema, SchemaNode, resolve};
pub use types::{Location, PathSegment, PrimitiveKind, ValueKind};
pub use validate::validate;
