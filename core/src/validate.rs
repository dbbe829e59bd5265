//! Walking input values against compiled schemas.
//!
//! The walk is depth-first in schema declaration order and stops at the first
//! violation. On success it returns a freshly built value: conforming input
//! plus injected defaults, minus dropped extra keys.
//!
//! # Examples
//!
//! ```
//! use jval_core::{ValidateOptions, ValidationErrorKind, ValueKind, validate, Error};
//! use serde_json::json;
//!
//! let schema = json!({"*tags": ["<str>"]});
//! let err = validate(&json!({"tags": ["a", 2]}), &schema, &ValidateOptions::default())
//!     .unwrap_err();
//! let Error::Validation(err) = err else { panic!("expected a data error") };
//! assert_eq!(err.location.to_string(), "tags[1]");
//! assert_eq!(
//!     err.kind,
//!     ValidationErrorKind::TypeMismatch { expected: ValueKind::Str, actual: ValueKind::Int },
//! );
//! ```

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Error, ValidationError, ValidationErrorKind};
use crate::options::ValidateOptions;
use crate::resolve::{FieldSpec, Schema, SchemaNode};
use crate::types::ValueKind;

/// Per-call walk state. Locations are not tracked here; errors collect their
/// enclosing segments as they propagate back up.
struct ValidationContext<'a> {
    options: &'a ValidateOptions,
}

impl ValidationContext<'_> {
    fn check(&self, node: &SchemaNode, input: &Value) -> Result<Value, ValidationError> {
        match node {
            SchemaNode::Literal(expected) => {
                if input == expected {
                    Ok(input.clone())
                } else {
                    Err(ValidationError::new(ValidationErrorKind::LiteralMismatch {
                        expected: expected.clone(),
                        actual: input.clone(),
                    }))
                }
            }
            SchemaNode::TypeExpr { kind, nullable } => {
                if kind.matches(input) || (*nullable && input.is_null()) {
                    Ok(input.clone())
                } else {
                    Err(ValidationError::type_mismatch(*kind, input))
                }
            }
            SchemaNode::DefaultTyped { kind, .. } => {
                if kind.matches(input) {
                    Ok(input.clone())
                } else {
                    Err(ValidationError::type_mismatch(*kind, input))
                }
            }
            SchemaNode::NestedObject(fields) => match input {
                Value::Object(map) => self.check_object(fields, map),
                other => Err(ValidationError::type_mismatch(ValueKind::Object, other)),
            },
            SchemaNode::NestedList(element) => match input {
                Value::Array(items) => self.check_list(element, items),
                other => Err(ValidationError::type_mismatch(ValueKind::Array, other)),
            },
        }
    }

    fn check_object(
        &self,
        fields: &[FieldSpec],
        input: &Map<String, Value>,
    ) -> Result<Value, ValidationError> {
        let mut output = Map::with_capacity(fields.len());

        for field in fields {
            match input.get(&field.name) {
                Some(value) => {
                    let checked = self
                        .check(&field.node, value)
                        .map_err(|e| e.in_key(&field.name))?;
                    output.insert(field.name.clone(), checked);
                }
                None if field.optional => {
                    if let SchemaNode::DefaultTyped { default, .. } = &field.node {
                        output.insert(field.name.clone(), default.clone());
                    }
                }
                None => {
                    return Err(ValidationError::new(ValidationErrorKind::MissingKey {
                        name: field.name.clone(),
                    })
                    .in_key(&field.name));
                }
            }
        }

        for key in input.keys() {
            if fields.iter().any(|field| field.name == *key) {
                continue;
            }
            if !self.options.drop_extra_keys {
                return Err(ValidationError::new(ValidationErrorKind::UnexpectedKey {
                    name: key.clone(),
                }));
            }
            trace!(key = %key, "dropping key not defined in schema");
        }

        Ok(Value::Object(output))
    }

    fn check_list(&self, element: &SchemaNode, items: &[Value]) -> Result<Value, ValidationError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.check(element, item).map_err(|e| e.in_index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}

impl Schema {
    /// Validates `data` and returns its normalized form.
    ///
    /// The input is never modified; the result is a new value.
    pub fn validate(
        &self,
        data: &Value,
        options: &ValidateOptions,
    ) -> Result<Value, ValidationError> {
        ValidationContext { options }.check(self.root(), data)
    }
}

/// Compiles `schema` and validates `data` against it in one step.
///
/// Schema errors take precedence: an ill-formed schema is reported no matter
/// what `data` contains. Callers validating many values against one schema
/// should [`Schema::compile`] once instead.
///
/// # Examples
///
/// ```
/// use jval_core::{ValidateOptions, validate};
/// use serde_json::json;
///
/// let schema = json!({"*name": "<str>"});
/// let data = json!({"name": "Alice", "extra": 1});
///
/// assert!(validate(&data, &schema, &ValidateOptions::default()).is_err());
///
/// let options = ValidateOptions::default().drop_extra_keys(true);
/// assert_eq!(validate(&data, &schema, &options).unwrap(), json!({"name": "Alice"}));
/// ```
pub fn validate(data: &Value, schema: &Value, options: &ValidateOptions) -> Result<Value, Error> {
    let schema = Schema::compile(schema)?;
    Ok(schema.validate(data, options)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::PrimitiveKind;

    fn strict() -> ValidateOptions {
        ValidateOptions::default()
    }

    fn data_err(data: Value, schema: Value) -> ValidationError {
        match validate(&data, &schema, &strict()) {
            Err(Error::Validation(err)) => err,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_typed_field_passes_through() {
        let output = validate(&json!({"name": "Alice"}), &json!({"*name": "<str>"}), &strict());
        assert_eq!(output.unwrap(), json!({"name": "Alice"}));
    }

    #[test]
    fn test_default_injected_when_absent() {
        let schema = json!({"?_has_pets": false});
        assert_eq!(
            validate(&json!({}), &schema, &strict()).unwrap(),
            json!({"has_pets": false})
        );
        assert_eq!(
            validate(&json!({"has_pets": true}), &schema, &strict()).unwrap(),
            json!({"has_pets": true})
        );

        let err = data_err(json!({"has_pets": "yes"}), schema);
        assert_eq!(err.location.to_string(), "has_pets");
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: ValueKind::Bool,
                actual: ValueKind::Str,
            }
        );
    }

    #[test]
    fn test_float_default_rejects_int() {
        let err = data_err(json!({"ratio": 2}), json!({"?_ratio": 0.5}));
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: ValueKind::Float,
                actual: ValueKind::Int,
            }
        );
    }

    #[test]
    fn test_literal_mismatch() {
        let err = data_err(json!({"version": "2.0"}), json!({"version": "1.0"}));
        assert_eq!(err.location.to_string(), "version");
        assert_eq!(
            err.kind,
            ValidationErrorKind::LiteralMismatch {
                expected: json!("1.0"),
                actual: json!("2.0"),
            }
        );
    }

    #[test]
    fn test_literal_objects_compare_structurally() {
        let schema = json!({"meta": {"b": [1, 2], "a": null}});
        let output = validate(&json!({"meta": {"a": null, "b": [1, 2]}}), &schema, &strict());
        assert!(output.is_ok());

        let err = data_err(json!({"meta": {"a": null, "b": [2, 1]}}), schema);
        assert_eq!(err.kind.code(), "literal_mismatch");
        assert_eq!(err.location.to_string(), "meta");
    }

    #[test]
    fn test_missing_required_key_points_at_key() {
        let schema = json!({"*user": {"*address": {"*city": "<str>"}}});
        let err = data_err(json!({"user": {"address": {}}}), schema);
        assert_eq!(err.location.to_string(), "user.address.city");
        assert_eq!(
            err.kind,
            ValidationErrorKind::MissingKey {
                name: "city".to_string(),
            }
        );

        let err = data_err(json!({}), json!({"version": "1.0"}));
        assert_eq!(err.location.to_string(), "version");
    }

    #[test]
    fn test_optional_keys_may_be_absent() {
        let schema = json!({"?*nick": "<str>", "?mode": "fast"});
        assert_eq!(validate(&json!({}), &schema, &strict()).unwrap(), json!({}));

        let err = data_err(json!({"mode": "slow"}), schema);
        assert_eq!(err.kind.code(), "literal_mismatch");
    }

    #[test]
    fn test_optional_typed_key_rejects_null() {
        let err = data_err(json!({"nick": null}), json!({"?*nick": "<str>"}));
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: ValueKind::Str,
                actual: ValueKind::Null,
            }
        );
    }

    #[test]
    fn test_nullable_type_accepts_null() {
        let schema = json!({"*parent": "<?int>"});
        assert_eq!(
            validate(&json!({"parent": null}), &schema, &strict()).unwrap(),
            json!({"parent": null})
        );
        assert!(validate(&json!({"parent": 4}), &schema, &strict()).is_ok());
        let err = data_err(json!({"parent": "4"}), schema);
        assert_eq!(err.kind.code(), "type_mismatch");
    }

    #[test]
    fn test_unexpected_key_reported_at_enclosing_object() {
        let schema = json!({"*name": "<str>"});
        let err = data_err(json!({"name": "Alice", "extra": 1}), schema.clone());
        assert!(err.location.is_root());
        assert_eq!(
            err.kind,
            ValidationErrorKind::UnexpectedKey {
                name: "extra".to_string(),
            }
        );

        let nested = json!({"*owner": schema});
        let err = data_err(json!({"owner": {"name": "Bob", "age": 3}}), nested);
        assert_eq!(err.location.to_string(), "owner");
    }

    #[test]
    fn test_drop_extra_keys_applies_at_every_level() {
        let schema = json!({"*people": [{"*name": "<str>"}]});
        let data = json!({"people": [{"name": "Ann", "age": 30}], "source": "import"});
        let options = strict().drop_extra_keys(true);
        assert_eq!(
            validate(&data, &schema, &options).unwrap(),
            json!({"people": [{"name": "Ann"}]})
        );
    }

    #[test]
    fn test_list_element_failure_is_indexed() {
        let schema = json!({"*addresses": [{"*number": "<int>"}]});
        let data = json!({"addresses": [{"number": 1}, {"number": "two"}]});
        let err = data_err(data, schema);
        assert_eq!(err.location.to_string(), "addresses[1].number");
    }

    #[test]
    fn test_structural_mismatch_names_expected_shape() {
        let err = data_err(json!({"tags": "a"}), json!({"*tags": ["<str>"]}));
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: ValueKind::Array,
                actual: ValueKind::Str,
            }
        );

        let err = data_err(json!([]), json!({"*a": "<int>"}));
        assert!(err.location.is_root());
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: ValueKind::Object,
                actual: ValueKind::Array,
            }
        );
    }

    #[test]
    fn test_output_follows_schema_order() {
        let schema = json!({"*b": "<int>", "?_c": "x", "*a": "<int>"});
        let output = validate(&json!({"a": 1, "b": 2}), &schema, &strict()).unwrap();
        let keys: Vec<&String> = output.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_first_error_in_schema_order_wins() {
        let schema = json!({"*a": "<int>", "*b": "<int>"});
        let err = data_err(json!({"b": "x", "a": "y"}), schema);
        assert_eq!(err.location.to_string(), "a");
    }

    #[test]
    fn test_schema_error_wins_over_data() {
        let err = validate(&json!({"x": 1}), &json!({"*x": "<weird>"}), &strict()).unwrap_err();
        assert!(err.is_schema_error());
        assert_eq!(err.location().to_string(), "x");
    }

    #[test]
    fn test_compiled_schema_is_reusable() {
        let schema = Schema::compile(&json!(["<int>"])).unwrap();
        assert_eq!(
            schema.validate(&json!([1, 2]), &strict()).unwrap(),
            json!([1, 2])
        );
        let err = schema.validate(&json!([1, 2.5]), &strict()).unwrap_err();
        assert_eq!(err.location.to_string(), "[1]");
        assert_eq!(
            err.kind,
            ValidationErrorKind::TypeMismatch {
                expected: PrimitiveKind::Int.into(),
                actual: ValueKind::Float,
            }
        );
    }
}
