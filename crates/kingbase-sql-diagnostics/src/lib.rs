//! KingbaseES mapping diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! type-mapping registry, the expression factory and the translators:
//! error codes, the error taxonomy and diagnostic reporting.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for mapping and translation operations
pub type Result<T> = std::result::Result<T, KbError>;
