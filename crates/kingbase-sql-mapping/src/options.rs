//! Mapping options
//!
//! Behaviour switches and declarations threaded into the registry at
//! construction. Options deserialize from JSON with every field optional.

use indexmap::IndexMap;
use kingbase_sql_diagnostics::{ErrorBuilder, KB0303, Result};
use kingbase_sql_types::HostType;
use serde::{Deserialize, Serialize};

/// A user-defined range type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRangeDefinition {
    /// Range type name, e.g. `floatrange`
    pub range_name: String,
    /// Schema of the range type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Host type of the range subtype
    pub subtype: HostType,
    /// Store type of the range subtype; the host default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_store_type: Option<String>,
}

impl UserRangeDefinition {
    pub fn new(range_name: impl Into<String>, subtype: HostType) -> Self {
        Self {
            range_name: range_name.into(),
            schema: None,
            subtype,
            subtype_store_type: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_subtype_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.subtype_store_type = Some(store_type.into());
        self
    }

    /// Store type name, schema-qualified when a schema is set
    pub fn qualified_name(&self) -> String {
        qualify(self.schema.as_deref(), &self.range_name)
    }
}

/// A database enum and the labels of its host variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Enum type name in the database
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Host enum name; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Host variant name to database label, in declaration order
    pub labels: IndexMap<String, String>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>, labels: IndexMap<String, String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            host_name: None,
            labels,
        }
    }

    /// Store type name, schema-qualified when a schema is set
    pub fn qualified_name(&self) -> String {
        qualify(self.schema.as_deref(), &self.name)
    }

    /// Host enum name
    pub fn host_name(&self) -> &str {
        self.host_name.as_deref().unwrap_or(&self.name)
    }
}

fn qualify(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) => format!("{}.{}", schema, name),
        None => name.to_string(),
    }
}

/// Options for the type-mapping registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    /// Map UTC date-times to `timestamp without time zone` and accept any
    /// offset for `timestamp with time zone`
    pub legacy_timestamp_behavior: bool,
    /// Render minimum/maximum date-times literally instead of as infinity
    pub disable_date_time_infinity_conversions: bool,
    /// Default size for string and bit-string key or index members
    pub key_string_default_size: Option<u32>,
    /// User-defined ranges
    pub user_ranges: Vec<UserRangeDefinition>,
    /// Enums registered at construction
    pub enums: Vec<EnumDefinition>,
}

impl MappingOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_legacy_timestamp_behavior(mut self, enabled: bool) -> Self {
        self.legacy_timestamp_behavior = enabled;
        self
    }

    pub fn with_infinity_conversions_disabled(mut self, disabled: bool) -> Self {
        self.disable_date_time_infinity_conversions = disabled;
        self
    }

    pub fn with_key_string_default_size(mut self, size: u32) -> Self {
        self.key_string_default_size = Some(size);
        self
    }

    pub fn with_user_range(mut self, range: UserRangeDefinition) -> Self {
        self.user_ranges.push(range);
        self
    }

    pub fn with_enum(mut self, definition: EnumDefinition) -> Self {
        self.enums.push(definition);
        self
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| {
            ErrorBuilder::new(KB0303, format!("Invalid mapping options: {}", e)).configuration()
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Check option values that serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.key_string_default_size == Some(0) {
            return Err(ErrorBuilder::new(KB0303, "key_string_default_size must be positive")
                .context("Remove the option to keep key columns unbounded")
                .configuration());
        }
        for definition in &self.enums {
            if definition.labels.is_empty() {
                return Err(ErrorBuilder::new(
                    KB0303,
                    format!("Enum {} declares no labels", definition.qualified_name()),
                )
                .configuration());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_json_defaults() {
        let options = MappingOptions::from_json("{}").unwrap();
        assert_eq!(options, MappingOptions::default());
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "legacy_timestamp_behavior": true,
            "key_string_default_size": 256,
            "user_ranges": [{"range_name": "floatrange", "subtype": "Float64", "subtype_store_type": "double precision"}],
            "enums": [{"name": "mood", "schema": "app", "labels": {"Happy": "happy", "Sad": "sad"}}]
        }"#;
        let options = MappingOptions::from_json(json).unwrap();
        assert!(options.legacy_timestamp_behavior);
        assert_eq!(options.key_string_default_size, Some(256));
        assert_eq!(options.user_ranges[0].subtype, HostType::Float64);
        assert_eq!(options.enums[0].qualified_name(), "app.mood");
        assert_eq!(options.enums[0].host_name(), "mood");
    }

    #[test]
    fn test_invalid_options() {
        assert_eq!(
            MappingOptions::from_json(r#"{"key_string_default_size": 0}"#).unwrap_err().code(),
            KB0303
        );
        assert!(MappingOptions::from_json("[").is_err());
    }
}
