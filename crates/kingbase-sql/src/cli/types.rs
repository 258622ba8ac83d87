//! Types command implementation

use super::{config, output};
use anyhow::Result;
use kingbase_sql_mapping::TypeMappingRegistry;
use serde_json::{Value, json};
use std::path::Path;

/// One row per registered store type, with the host types it maps to
pub fn list(registry: &TypeMappingRegistry) -> Value {
    let mut names: Vec<&str> = registry.store_type_names().collect();
    names.sort_unstable();
    names.dedup();

    let rows = names
        .into_iter()
        .map(|name| {
            let mappings = registry.mappings_for_store_type(name);
            let host_types: Vec<String> = mappings.iter().map(|m| m.host_type().to_string()).collect();
            let db_type = mappings
                .first()
                .map(|m| m.db_type().to_string())
                .unwrap_or_default();
            json!({
                "store_type": name,
                "db_type": db_type,
                "host_types": host_types.join(", "),
            })
        })
        .collect();
    Value::Array(rows)
}

/// Run the types command
pub fn run(options_file: Option<&Path>, format: output::OutputFormat) -> Result<()> {
    let registry = config::load_registry(options_file)?;
    output::print_output(&list(&registry), format)
}
