//! Parse-type command implementation

use super::{describe, output};
use anyhow::Result;
use kingbase_sql_mapping::parse_store_type;

/// Parse a raw store type name and print its parts
pub fn run(raw: &str, format: output::OutputFormat) -> Result<()> {
    let parsed = parse_store_type(raw);
    output::print_output(&describe::describe_parsed(&parsed), format)
}
