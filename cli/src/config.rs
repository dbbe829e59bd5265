//! Validation settings file.
//!
//! A YAML document mapping onto [`ValidateOptions`]; every field is optional.
//!
//! ```yaml
//! drop_extra_keys: true
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use jval_core::ValidateOptions;

/// Loads options from a YAML file.
pub fn load_options(path: &Path) -> Result<ValidateOptions, String> {
    let file = File::open(path)
        .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
    let reader = BufReader::new(file);
    let options: Option<ValidateOptions> = serde_yaml::from_reader(reader)
        .map_err(|err| format!("Invalid config '{}': {err}", path.display()))?;
    // An empty document deserializes to `None`.
    Ok(options.unwrap_or_default())
}
