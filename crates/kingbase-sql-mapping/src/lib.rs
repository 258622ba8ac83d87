//! KingbaseES type mapping
//!
//! This crate resolves, for every host value type, the KingbaseES store type
//! used to hold it and renders host values as SQL literals:
//! - Store type name parsing (`numeric(10,2)`, `varchar(32)[]`)
//! - Type-mapping descriptors with embedded and top-level literal forms
//! - Array, range and multirange container mappings
//! - The type-mapping registry and its resolution algorithm

mod builtin;
pub mod literal;
pub mod mapping;
pub mod options;
pub mod registry;
pub mod store_type;

pub use literal::LiteralOptions;
pub use mapping::{MappingKind, StoreFacets, TypeMapping};
pub use options::{EnumDefinition, MappingOptions, UserRangeDefinition};
pub use registry::{
    ElementNullability, MappingRequest, PropertyInfo, PropertyMapping, TypeMappingRegistry,
    MAX_BOUNDED_SIZE,
};
pub use store_type::{parse_store_type, ParsedStoreType};
