//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use kingbase_sql_diagnostics::KbError;
use serde_json::Value;
use std::io::IsTerminal;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Pretty,
    Table,
}

/// Color mode options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
///
/// Mapping and translation errors are rendered as diagnostics with their
/// code, subject and help text.
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<KbError>() {
        Some(kb) => kb.to_diagnostic().to_colored_string(),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

#[derive(Tabled)]
struct KeyValue {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Format value as table (if possible)
///
/// Objects become key/value tables; arrays of objects become one row per item
/// with the keys of the first item as columns.
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => {
            let rows = obj.iter().map(|(k, v)| KeyValue {
                key: k.clone(),
                value: format_value(v),
            });
            Some(Table::new(rows).with(Style::modern()).to_string())
        }
        Value::Array(items) => {
            let Some(Value::Object(first)) = items.first() else {
                return items.is_empty().then(|| "(empty list)".to_string());
            };
            let keys: Vec<&String> = first.keys().collect();
            let mut builder = Builder::default();
            builder.push_record(keys.iter().map(|k| k.to_string()));
            for item in items {
                let Value::Object(obj) = item else {
                    return None;
                };
                builder.push_record(keys.iter().map(|k| obj.get(*k).map(format_value).unwrap_or_default()));
            }
            Some(builder.build().with(Style::modern()).to_string())
        }
        _ => None,
    }
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => match obj.get("store_type") {
            Some(Value::String(store_type)) => store_type.clone(),
            _ => format!("{{}} with {} fields", obj.len()),
        },
    }
}

/// Print output in the specified format
pub fn print_output(value: &Value, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => format_json(value, false)?,
        OutputFormat::Pretty => format_json(value, true)?,
        OutputFormat::Table => match format_as_table(value) {
            Some(table) => table,
            None => format_json(value, true)?,
        },
    };
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_table_lists_keys() {
        let table = format_as_table(&json!({"store_type": "integer", "size": null})).unwrap();
        assert!(table.contains("store_type"));
        assert!(table.contains("integer"));
    }

    #[test]
    fn test_array_table_has_one_row_per_item() {
        let value = json!([
            {"store_type": "integer", "db_type": "integer"},
            {"store_type": "text", "db_type": "text"},
        ]);
        let table = format_as_table(&value).unwrap();
        assert!(table.contains("db_type"));
        assert!(table.contains("text"));
    }

    #[test]
    fn test_scalar_has_no_table() {
        assert!(format_as_table(&json!(5)).is_none());
    }
}
