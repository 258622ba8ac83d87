//! KingbaseES host type system
//!
//! This crate defines the three vocabularies shared by the mapping registry
//! and the translators:
//! - Host types: the program-side value types that get mapped to store types
//! - Host values: runtime values rendered as SQL literals
//! - Native type tags: the wire type identifiers understood by the client

pub mod db_type;
pub mod host_type;
pub mod value;

pub use db_type::*;
pub use host_type::*;
pub use value::*;
