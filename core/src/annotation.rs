//! Schema key annotations.
//!
//! A schema key carries its requirement mode in a short prefix:
//!
//! | prefix | optional | mode      |
//! |--------|----------|-----------|
//! | (none) | no       | literal   |
//! | `*`    | no       | typed     |
//! | `?`    | yes      | literal   |
//! | `?*`   | yes      | typed     |
//! | `?_`   | yes      | default   |
//!
//! Recognition is strictly prefix-based and order-sensitive. Any other
//! placement of `?`, `*` or `_` is part of the name: `_internal` is a literal
//! key named `_internal`, and `*?x` is a typed key named `?x`.

const OPTIONAL: char = '?';
const TYPED: char = '*';
const DEFAULT: char = '_';

/// How the value under a schema key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// The value is matched by deep equality.
    Literal,
    /// The value is a type expression, nested object, or list pattern.
    Typed,
    /// The value is a default whose primitive kind is the type constraint.
    Default,
}

/// A schema key split into its annotation and its bare name.
///
/// # Examples
///
/// ```
/// use jval_core::{KeyDescriptor, KeyMode, parse_key};
///
/// let key = parse_key("?_has_pets");
/// assert_eq!(key, KeyDescriptor { optional: true, mode: KeyMode::Default, name: "has_pets" });
///
/// // `_` without a leading `?` is an ordinary character.
/// let key = parse_key("_internal");
/// assert_eq!(key.mode, KeyMode::Literal);
/// assert_eq!(key.name, "_internal");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptor<'a> {
    pub optional: bool,
    pub mode: KeyMode,
    pub name: &'a str,
}

impl KeyDescriptor<'_> {
    /// Returns `true` if the raw key carried any annotation prefix.
    pub fn is_annotated(&self) -> bool {
        self.optional || self.mode != KeyMode::Literal
    }
}

/// Splits a raw schema key into its annotation and bare name.
///
/// Never fails; ill-formed combinations surface during resolution.
pub fn parse_key(raw: &str) -> KeyDescriptor<'_> {
    if let Some(rest) = raw.strip_prefix(OPTIONAL) {
        if let Some(name) = rest.strip_prefix(TYPED) {
            return KeyDescriptor {
                optional: true,
                mode: KeyMode::Typed,
                name,
            };
        }
        if let Some(name) = rest.strip_prefix(DEFAULT) {
            return KeyDescriptor {
                optional: true,
                mode: KeyMode::Default,
                name,
            };
        }
        return KeyDescriptor {
            optional: true,
            mode: KeyMode::Literal,
            name: rest,
        };
    }

    if let Some(name) = raw.strip_prefix(TYPED) {
        return KeyDescriptor {
            optional: false,
            mode: KeyMode::Typed,
            name,
        };
    }

    KeyDescriptor {
        optional: false,
        mode: KeyMode::Literal,
        name: raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(optional: bool, mode: KeyMode, name: &str) -> KeyDescriptor<'_> {
        KeyDescriptor {
            optional,
            mode,
            name,
        }
    }

    #[test]
    fn test_parse_key_recognizes_every_prefix() {
        assert_eq!(parse_key("name"), descriptor(false, KeyMode::Literal, "name"));
        assert_eq!(parse_key("*name"), descriptor(false, KeyMode::Typed, "name"));
        assert_eq!(parse_key("?name"), descriptor(true, KeyMode::Literal, "name"));
        assert_eq!(parse_key("?*name"), descriptor(true, KeyMode::Typed, "name"));
        assert_eq!(parse_key("?_name"), descriptor(true, KeyMode::Default, "name"));
    }

    #[test]
    fn test_parse_key_only_strips_prefix_positions() {
        assert_eq!(
            parse_key("_internal"),
            descriptor(false, KeyMode::Literal, "_internal")
        );
        assert_eq!(parse_key("*?x"), descriptor(false, KeyMode::Typed, "?x"));
        assert_eq!(parse_key("*_x"), descriptor(false, KeyMode::Typed, "_x"));
        assert_eq!(parse_key("?*_x"), descriptor(true, KeyMode::Typed, "_x"));
        assert_eq!(parse_key("??x"), descriptor(true, KeyMode::Literal, "?x"));
        assert_eq!(parse_key("a?b*"), descriptor(false, KeyMode::Literal, "a?b*"));
    }

    #[test]
    fn test_parse_key_keeps_type_delimiters_in_names() {
        assert_eq!(parse_key("<x>"), descriptor(false, KeyMode::Literal, "<x>"));
    }

    #[test]
    fn test_parse_key_bare_markers_strip_to_empty() {
        assert_eq!(parse_key("?"), descriptor(true, KeyMode::Literal, ""));
        assert_eq!(parse_key("?_"), descriptor(true, KeyMode::Default, ""));
        assert!(parse_key("*").is_annotated());
        assert!(!parse_key("").is_annotated());
    }
}
