//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - KB0001-KB0099: Mapping errors (type resolution)
//! - KB0100-KB0199: Translation errors (expression lowering)
//! - KB0200-KB0299: Literal errors (literal generation)
//! - KB0300-KB0399: Configuration errors (declarations, options)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a mapping error (0001-0099)
    pub const fn is_mapping_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a translation error (0100-0199)
    pub const fn is_translation_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a literal error (0200-0299)
    pub const fn is_literal_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a configuration error (0300-0399)
    pub const fn is_configuration_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KB{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Mapping errors (0001-0099)
    map.insert(1, ErrorInfo::new("No mapping for store type and host type combination"));
    map.insert(2, ErrorInfo::new("Unknown store type name"));
    map.insert(3, ErrorInfo::new("Unknown host type name"));
    map.insert(
        4,
        ErrorInfo::new("Nested array mappings are not supported")
            .with_help("KingbaseES arrays are flattened; map the element type instead"),
    );

    // Translation errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Operation could not be translated")
            .with_help("Evaluate the operation outside the database or rewrite the query"),
    );
    map.insert(101, ErrorInfo::new("Constant argument required"));
    map.insert(102, ErrorInfo::new("Row value length mismatch"));
    map.insert(103, ErrorInfo::new("Operation not supported for the operand store type"));
    map.insert(104, ErrorInfo::new("Null-propagation vector length does not match operand count"));
    map.insert(105, ErrorInfo::new("Unexpected argument shape"));

    // Literal errors (0200-0299)
    map.insert(200, ErrorInfo::new("Value does not match the mapping's host type"));
    map.insert(
        201,
        ErrorInfo::new("Non-UTC value for a UTC-only store type")
            .with_help("Convert the value to UTC or enable legacy timestamp behavior"),
    );
    map.insert(202, ErrorInfo::new("Unknown enum label"));
    map.insert(203, ErrorInfo::new("Value cannot be represented as a literal"));

    // Configuration errors (0300-0399)
    map.insert(
        300,
        ErrorInfo::new("User-defined range subtype cannot be resolved")
            .with_help("Check the subtype host type and store type of the range definition"),
    );
    map.insert(301, ErrorInfo::new("Duplicate type registration"));
    map.insert(302, ErrorInfo::new("Sequence strategy requires an integer or enum host type"));
    map.insert(303, ErrorInfo::new("Invalid option value"));

    map
});

// Mapping errors
pub const KB0001: ErrorCode = ErrorCode::new(1);
pub const KB0002: ErrorCode = ErrorCode::new(2);
pub const KB0003: ErrorCode = ErrorCode::new(3);
pub const KB0004: ErrorCode = ErrorCode::new(4);

// Translation errors
pub const KB0100: ErrorCode = ErrorCode::new(100);
pub const KB0101: ErrorCode = ErrorCode::new(101);
pub const KB0102: ErrorCode = ErrorCode::new(102);
pub const KB0103: ErrorCode = ErrorCode::new(103);
pub const KB0104: ErrorCode = ErrorCode::new(104);
pub const KB0105: ErrorCode = ErrorCode::new(105);

// Literal errors
pub const KB0200: ErrorCode = ErrorCode::new(200);
pub const KB0201: ErrorCode = ErrorCode::new(201);
pub const KB0202: ErrorCode = ErrorCode::new(202);
pub const KB0203: ErrorCode = ErrorCode::new(203);

// Configuration errors
pub const KB0300: ErrorCode = ErrorCode::new(300);
pub const KB0301: ErrorCode = ErrorCode::new(301);
pub const KB0302: ErrorCode = ErrorCode::new(302);
pub const KB0303: ErrorCode = ErrorCode::new(303);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(KB0001.to_string(), "KB0001");
        assert_eq!(KB0201.to_string(), "KB0201");
    }

    #[test]
    fn test_error_code_ranges() {
        assert!(KB0004.is_mapping_error());
        assert!(KB0102.is_translation_error());
        assert!(KB0201.is_literal_error());
        assert!(KB0300.is_configuration_error());
        assert!(!KB0300.is_mapping_error());
    }

    #[test]
    fn test_error_info_lookup() {
        assert_eq!(KB0102.info().description, "Row value length mismatch");
        assert!(KB0201.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
