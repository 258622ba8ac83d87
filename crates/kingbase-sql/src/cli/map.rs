//! Map command implementation

use super::{config, describe, output};
use anyhow::{Result, bail};
use kingbase_sql_mapping::{MappingRequest, TypeMappingRegistry};
use kingbase_sql_types::HostType;
use serde_json::Value;
use std::path::PathBuf;

/// Configuration for map command
#[derive(Debug, Default)]
pub struct MapConfig {
    pub store_type: Option<String>,
    pub host_type: Option<String>,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub fixed_length: bool,
    pub unicode: Option<bool>,
    pub key: bool,
    pub options_file: Option<PathBuf>,
    pub output_format: output::OutputFormat,
}

impl MapConfig {
    /// Build the registry request from the command-line arguments
    pub fn request(&self) -> Result<MappingRequest> {
        if self.store_type.is_none() && self.host_type.is_none() {
            bail!("At least one of --store-type and --host-type is required");
        }
        let host_type = self
            .host_type
            .as_deref()
            .map(str::parse::<HostType>)
            .transpose()?;
        Ok(MappingRequest {
            store_type: self.store_type.clone(),
            host_type,
            is_unicode: self.unicode,
            size: self.size,
            precision: self.precision,
            scale: self.scale,
            fixed_length: self.fixed_length.then_some(true),
            is_key_or_index: self.key,
        })
    }
}

/// Resolve a mapping and describe it
pub fn resolve(registry: &TypeMappingRegistry, config: &MapConfig) -> Result<Value> {
    let request = config.request()?;
    let mapping = registry.require_mapping(&request)?;
    Ok(describe::describe_mapping(&mapping))
}

/// Run the map command
pub fn run(config: MapConfig) -> Result<()> {
    let registry = config::load_registry(config.options_file.as_deref())?;
    let value = resolve(&registry, &config)?;
    output::print_output(&value, config.output_format)
}
