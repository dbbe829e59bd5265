use serde::{Deserialize, Serialize};

/// Knobs for a validation run.
///
/// Deserializes from a document with any subset of fields; missing fields
/// take their strict defaults.
///
/// # Examples
///
/// ```
/// use jval_core::ValidateOptions;
///
/// let options: ValidateOptions = serde_json::from_str("{}").unwrap();
/// assert!(!options.drop_extra_keys);
///
/// let options = ValidateOptions::default().drop_extra_keys(true);
/// assert!(options.drop_extra_keys);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateOptions {
    /// Silently omit input keys the schema does not declare instead of
    /// reporting them as unexpected.
    pub drop_extra_keys: bool,
}

impl ValidateOptions {
    pub fn drop_extra_keys(mut self, drop: bool) -> Self {
        self.drop_extra_keys = drop;
        self
    }
}
