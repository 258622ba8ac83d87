//! Literal command implementation

use super::{config, output};
use anyhow::{Context, Result};
use kingbase_sql_mapping::{MappingRequest, TypeMappingRegistry};
use kingbase_sql_types::{HostType, HostValue};
use serde_json::{Value, json};
use std::path::PathBuf;

/// Configuration for literal command
#[derive(Debug, Default)]
pub struct LiteralConfig {
    pub store_type: Option<String>,
    pub host_type: Option<String>,
    /// Host value in its tagged JSON form, e.g. `{"type":"Int32","value":5}`
    pub value: String,
    pub options_file: Option<PathBuf>,
    pub output_format: output::OutputFormat,
}

/// Render a value with the mapping selected by store and host type
///
/// Without an explicit host type, the host type of the value is used.
pub fn render(registry: &TypeMappingRegistry, config: &LiteralConfig) -> Result<Value> {
    let value: HostValue = serde_json::from_str(&config.value)
        .with_context(|| format!("Invalid host value: {}", config.value))?;

    let host_type = match config.host_type.as_deref() {
        Some(raw) => Some(raw.parse::<HostType>()?),
        None => value.host_type(),
    };
    let request = MappingRequest {
        store_type: config.store_type.clone(),
        host_type,
        ..MappingRequest::default()
    };
    let mapping = registry.require_mapping(&request)?;

    Ok(json!({
        "store_type": mapping.store_type(),
        "toplevel": mapping.render_toplevel(&value)?,
        "embedded": mapping.render_embedded(&value)?,
    }))
}

/// Run the literal command
pub fn run(config: LiteralConfig) -> Result<()> {
    let registry = config::load_registry(config.options_file.as_deref())?;
    let value = render(&registry, &config)?;
    output::print_output(&value, config.output_format)
}
