//! Registry construction from the `--config` options file

use anyhow::{Context, Result};
use kingbase_sql_mapping::{MappingOptions, TypeMappingRegistry};
use log::debug;
use std::fs;
use std::path::Path;

/// Read mapping options from a JSON file, or defaults when no file is given
pub fn load_options(path: Option<&Path>) -> Result<MappingOptions> {
    let Some(path) = path else {
        return Ok(MappingOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {}", path.display()))?;
    let options = MappingOptions::from_json(&content)
        .with_context(|| format!("Invalid options file: {}", path.display()))?;
    debug!(
        "Loaded {} user range(s) and {} enum(s) from {}",
        options.user_ranges.len(),
        options.enums.len(),
        path.display()
    );
    Ok(options)
}

/// Build a registry from an optional options file
pub fn load_registry(path: Option<&Path>) -> Result<TypeMappingRegistry> {
    let options = load_options(path)?;
    Ok(TypeMappingRegistry::new(options)?)
}
