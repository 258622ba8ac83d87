//! Type-mapping registry
//!
//! The registry owns the store-name and host-type tables and resolves a
//! [`MappingRequest`] to a descriptor. Resolution is pure: results are cached
//! per request and populating the cache twice yields equal entries.
//!
//! Resolution order, first match wins:
//! 1. Known store name: the first descriptor (no host type) or the one with
//!    the requested host type; JSON store types accept any host type.
//! 2. Store name with modifiers whose base name is known: resolve the base
//!    and fold the modifiers into the store type.
//! 3. Fixed-width character names with a `Char` host type resolve to
//!    `character(1)`.
//! 4. No store name: host-type default, sized for strings and bit strings.
//! 5. Arrays: resolve the element and wrap it.
//! 6. User-defined ranges.

use indexmap::IndexMap;
use kingbase_sql_diagnostics::{ErrorBuilder, KB0001, KB0300, KB0301, KB0302, Result};
use kingbase_sql_types::HostType;
use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin::{self, FIXED_CHAR_STORE_TYPES, JSON_STORE_TYPES, RANGES};
use crate::{
    parse_store_type, EnumDefinition, LiteralOptions, MappingOptions, StoreFacets, TypeMapping,
    UserRangeDefinition,
};

/// Requested sizes above this degrade to the unbounded store type
pub const MAX_BOUNDED_SIZE: u32 = 10_485_760;

/// Input to the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappingRequest {
    pub store_type: Option<String>,
    pub host_type: Option<HostType>,
    /// Ignored during resolution; KingbaseES character types are always Unicode
    pub is_unicode: Option<bool>,
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub fixed_length: Option<bool>,
    /// Member of a key or index; affects default sizing of strings and bit strings
    pub is_key_or_index: bool,
}

impl MappingRequest {
    /// Request by host type only
    pub fn for_host(host_type: HostType) -> Self {
        Self {
            host_type: Some(host_type),
            ..Self::default()
        }
    }

    /// Request by store type only
    pub fn for_store(store_type: impl Into<String>) -> Self {
        Self {
            store_type: Some(store_type.into()),
            ..Self::default()
        }
    }

    /// Request by store type and host type
    pub fn new(store_type: impl Into<String>, host_type: HostType) -> Self {
        Self {
            store_type: Some(store_type.into()),
            host_type: Some(host_type),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: bool) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.is_unicode = Some(unicode);
        self
    }

    pub fn as_key_or_index(mut self) -> Self {
        self.is_key_or_index = true;
        self
    }

    /// Modifiers carried by the request
    pub fn facets(&self) -> StoreFacets {
        StoreFacets {
            size: self.size,
            precision: self.precision,
            scale: self.scale,
            fixed_length: self.fixed_length.unwrap_or(false),
        }
    }
}

/// Declared nullability of array elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementNullability {
    Nullable,
    NonNullable,
    /// No annotation; value-type elements are non-nullable, others nullable
    #[default]
    Unknown,
}

/// A model property, as seen by the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: String,
    pub host_type: HostType,
    pub store_type: Option<String>,
    pub facets: StoreFacets,
    pub is_unicode: Option<bool>,
    pub is_key_or_index: bool,
    pub element_nullability: ElementNullability,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            name: name.into(),
            host_type,
            store_type: None,
            facets: StoreFacets::default(),
            is_unicode: None,
            is_key_or_index: false,
            element_nullability: ElementNullability::Unknown,
        }
    }

    pub fn with_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.store_type = Some(store_type.into());
        self
    }

    pub fn with_facets(mut self, facets: StoreFacets) -> Self {
        self.facets = facets;
        self
    }

    pub fn with_element_nullability(mut self, nullability: ElementNullability) -> Self {
        self.element_nullability = nullability;
        self
    }

    pub fn as_key_or_index(mut self) -> Self {
        self.is_key_or_index = true;
        self
    }

    /// Registry request for this property
    pub fn request(&self) -> MappingRequest {
        MappingRequest {
            store_type: self.store_type.clone(),
            host_type: Some(self.host_type.clone()),
            is_unicode: self.is_unicode,
            size: self.facets.size,
            precision: self.facets.precision,
            scale: self.facets.scale,
            fixed_length: self.facets.fixed_length.then_some(true),
            is_key_or_index: self.is_key_or_index,
        }
    }
}

/// Result of a property-aware lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMapping {
    pub mapping: Arc<TypeMapping>,
    /// Element nullability, for array mappings
    pub element_nullable: Option<bool>,
}

enum NameLookup {
    Found(Arc<TypeMapping>),
    Incompatible,
    Unknown,
}

/// The type-mapping registry
#[derive(Debug)]
pub struct TypeMappingRegistry {
    options: MappingOptions,
    literal_options: LiteralOptions,
    store_mappings: HashMap<String, Vec<Arc<TypeMapping>>>,
    store_order: Vec<String>,
    host_mappings: HashMap<HostType, Arc<TypeMapping>>,
    char_mapping: Arc<TypeMapping>,
    ranges_by_subtype: HashMap<HostType, Vec<Arc<TypeMapping>>>,
    multiranges_by_subtype: HashMap<HostType, Vec<Arc<TypeMapping>>>,
    user_ranges: Vec<Arc<TypeMapping>>,
    cache: RwLock<HashMap<MappingRequest, Option<Arc<TypeMapping>>>>,
}

impl Default for TypeMappingRegistry {
    fn default() -> Self {
        Self::builtin(MappingOptions::default())
    }
}

impl TypeMappingRegistry {
    /// Create a registry, registering the user ranges and enums declared in `options`
    ///
    /// Fails with a configuration error when a user range subtype cannot be
    /// resolved or a name is declared twice.
    pub fn new(options: MappingOptions) -> Result<Self> {
        options.validate()?;
        let user_ranges = options.user_ranges.clone();
        let enums = options.enums.clone();

        let mut registry = Self::builtin(options);
        for definition in &enums {
            registry.register_enum(definition)?;
        }
        for definition in &user_ranges {
            registry.register_user_range(definition)?;
        }
        Ok(registry)
    }

    /// Create a registry holding the built-in store types only
    fn builtin(options: MappingOptions) -> Self {
        let literal_options = LiteralOptions::from(&options);
        let mut registry = Self {
            char_mapping: Arc::new(builtin::char_mapping(&options)),
            literal_options,
            options,
            store_mappings: HashMap::new(),
            store_order: Vec::new(),
            host_mappings: HashMap::new(),
            ranges_by_subtype: HashMap::new(),
            multiranges_by_subtype: HashMap::new(),
            user_ranges: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        };

        for mapping in builtin::leaf_mappings(&registry.options) {
            registry.add_store_mapping(Arc::new(mapping));
        }
        for (host, store) in builtin::host_defaults(&registry.options) {
            let found = registry
                .store_mappings
                .get(store)
                .and_then(|ms| ms.iter().find(|m| *m.host_type() == host))
                .cloned();
            if let Some(mapping) = found {
                registry.host_mappings.insert(host, mapping);
            }
        }

        for (range_name, multirange_name, subtype_store) in RANGES {
            let Some(subtype) = registry.first_of(subtype_store) else {
                continue;
            };
            let range = Arc::new(TypeMapping::range(*range_name, subtype));
            registry.add_range(Arc::clone(&range));
            if let Ok(multirange) = TypeMapping::multirange(*multirange_name, range) {
                registry.add_multirange(Arc::new(multirange));
            }
        }
        registry
    }

    fn add_store_mapping(&mut self, mapping: Arc<TypeMapping>) {
        let name = mapping.store_type().to_string();
        if !self.store_mappings.contains_key(&name) {
            self.store_order.push(name.clone());
        }
        self.store_mappings.entry(name).or_default().push(mapping);
    }

    fn add_range(&mut self, range: Arc<TypeMapping>) {
        let Some(subtype) = range.subtype() else {
            return;
        };
        self.ranges_by_subtype
            .entry(subtype.host_type().clone())
            .or_default()
            .push(Arc::clone(&range));
        self.host_mappings
            .entry(range.host_type().clone())
            .or_insert_with(|| Arc::clone(&range));
        self.add_store_mapping(range);
    }

    fn add_multirange(&mut self, multirange: Arc<TypeMapping>) {
        let Some(subtype) = multirange.subtype() else {
            return;
        };
        self.multiranges_by_subtype
            .entry(subtype.host_type().clone())
            .or_default()
            .push(Arc::clone(&multirange));
        self.host_mappings
            .entry(multirange.host_type().clone())
            .or_insert_with(|| Arc::clone(&multirange));
        self.add_store_mapping(multirange);
    }

    /// Get the options the registry was built with
    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Registered store type names, in registration order
    pub fn store_type_names(&self) -> impl Iterator<Item = &str> {
        self.store_order
            .iter()
            .map(String::as_str)
            .chain(self.user_ranges.iter().map(|m| m.store_type()))
    }

    /// Descriptors registered under a store type name
    pub fn mappings_for_store_type(&self, store_type: &str) -> &[Arc<TypeMapping>] {
        self.store_mappings
            .get(store_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // === Registration ===

    /// Register a database enum whose labels are given per host variant
    pub fn register_enum_like(
        &mut self,
        name: impl Into<String>,
        labels: IndexMap<String, String>,
    ) -> Result<Arc<TypeMapping>> {
        self.register_enum(&EnumDefinition::new(name, labels))
    }

    /// Register a database enum from its definition
    pub fn register_enum(&mut self, definition: &EnumDefinition) -> Result<Arc<TypeMapping>> {
        let store_type = definition.qualified_name();
        let host_type = HostType::enumeration(definition.host_name());
        if self.store_mappings.contains_key(&store_type) || self.host_mappings.contains_key(&host_type)
        {
            return Err(ErrorBuilder::new(
                KB0301,
                format!("Enum {} is already registered", store_type),
            )
            .configuration());
        }

        let mapping = Arc::new(
            TypeMapping::enumeration(
                store_type.as_str(),
                definition.host_name(),
                definition.labels.clone(),
            )
            .with_literal_options(self.literal_options),
        );
        self.host_mappings.insert(host_type, Arc::clone(&mapping));
        self.add_store_mapping(Arc::clone(&mapping));
        self.cache.get_mut().clear();
        debug!("Registered enum {} with {} labels", store_type, definition.labels.len());
        Ok(mapping)
    }

    /// Register a user-defined range over an already resolvable subtype
    pub fn register_user_range(&mut self, definition: &UserRangeDefinition) -> Result<Arc<TypeMapping>> {
        let store_type = definition.qualified_name();
        if self.store_mappings.contains_key(&store_type)
            || self.user_ranges.iter().any(|m| m.store_type() == store_type)
        {
            return Err(ErrorBuilder::new(
                KB0301,
                format!("Range {} is already registered", store_type),
            )
            .configuration());
        }

        let request = MappingRequest {
            store_type: definition.subtype_store_type.clone(),
            host_type: Some(definition.subtype.clone()),
            ..MappingRequest::default()
        };
        let subtype = self.find_mapping(&request).ok_or_else(|| {
            ErrorBuilder::new(
                KB0300,
                format!(
                    "Could not resolve subtype {} of range {}",
                    definition
                        .subtype_store_type
                        .as_deref()
                        .unwrap_or(definition.subtype.name()),
                    store_type
                ),
            )
            .context(format!("Host type {}", definition.subtype))
            .configuration()
        })?;

        let range = Arc::new(TypeMapping::range(store_type.as_str(), subtype));
        self.ranges_by_subtype
            .entry(definition.subtype.clone())
            .or_default()
            .push(Arc::clone(&range));
        self.user_ranges.push(Arc::clone(&range));
        self.cache.get_mut().clear();
        debug!("Registered user range {} over {}", store_type, definition.subtype);
        Ok(range)
    }

    // === Resolution ===

    /// Resolve a request to a descriptor, or `None` for an unmappable combination
    pub fn find_mapping(&self, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        if let Some(cached) = self.cache.read().get(request) {
            return cached.clone();
        }
        let resolved = self.resolve(request);
        debug!(
            "Caching mapping for store type {:?}, host type {:?}: {}",
            request.store_type,
            request.host_type.as_ref().map(ToString::to_string),
            resolved.as_ref().map_or("none".to_string(), |m| m.store_type().to_string())
        );
        self.cache.write().insert(request.clone(), resolved.clone());
        resolved
    }

    /// Resolve by host type only
    pub fn find_mapping_for_host(&self, host_type: &HostType) -> Option<Arc<TypeMapping>> {
        self.find_mapping(&MappingRequest::for_host(host_type.clone()))
    }

    /// Resolve by store type only
    pub fn find_mapping_for_store(&self, store_type: &str) -> Option<Arc<TypeMapping>> {
        self.find_mapping(&MappingRequest::for_store(store_type))
    }

    /// Resolve a request, failing with a mapping error when no descriptor exists
    pub fn require_mapping(&self, request: &MappingRequest) -> Result<Arc<TypeMapping>> {
        self.find_mapping(request).ok_or_else(|| {
            let store = request.store_type.as_deref().unwrap_or("<none>");
            let host = request
                .host_type
                .as_ref()
                .map_or("<none>".to_string(), ToString::to_string);
            ErrorBuilder::new(
                KB0001,
                format!("No mapping for store type {} and host type {}", store, host),
            )
            .subject(store)
            .mapping()
        })
    }

    /// Resolve a property, deriving array element nullability from its annotation
    pub fn find_mapping_for_property(&self, property: &PropertyInfo) -> Option<PropertyMapping> {
        let mapping = self.find_mapping(&property.request())?;
        let Some(element) = mapping.element() else {
            return Some(PropertyMapping {
                mapping,
                element_nullable: None,
            });
        };

        let nullable = match property.element_nullability {
            ElementNullability::Nullable => true,
            ElementNullability::NonNullable => false,
            ElementNullability::Unknown => default_element_nullability(element.host_type()),
        };
        let mapping = if mapping.element_nullable() == Some(nullable) {
            mapping
        } else {
            Arc::new(mapping.clone_with_element_nullability(nullable))
        };
        Some(PropertyMapping {
            mapping,
            element_nullable: Some(nullable),
        })
    }

    fn resolve(&self, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        let host = request.host_type.as_ref();

        if let Some(store) = request.store_type.as_deref() {
            if let Some(mapping) = self.find_char_mapping(store, request) {
                return Some(mapping);
            }

            match self.find_by_store_name(store, host) {
                NameLookup::Found(mapping) => return Some(self.apply_facets(mapping, request.facets())),
                NameLookup::Incompatible => return None,
                NameLookup::Unknown => {}
            }

            let parsed = parse_store_type(store);
            if parsed.base_name != store {
                match self.find_by_store_name(&parsed.base_name, host) {
                    NameLookup::Found(mapping) => {
                        let facets = StoreFacets {
                            size: parsed.size,
                            precision: parsed.precision,
                            scale: parsed.scale,
                            fixed_length: mapping.is_fixed_length(),
                        }
                        .or(request.facets());
                        debug!("Resolved {} through base store type {}", store, parsed.base_name);
                        return Some(Arc::new(mapping.clone_with_facets(facets)));
                    }
                    NameLookup::Incompatible => return None,
                    NameLookup::Unknown => {}
                }
            }
        } else if let Some(mapping) = host.and_then(|h| self.find_by_host(h, request)) {
            return Some(mapping);
        }

        self.find_array(request).or_else(|| self.find_user_range(request))
    }

    fn find_by_store_name(&self, name: &str, host: Option<&HostType>) -> NameLookup {
        let candidates = match self.store_mappings.get(name) {
            Some(candidates) => candidates,
            None => match self.store_mappings.get(&name.to_ascii_lowercase()) {
                Some(candidates) => candidates,
                None => return NameLookup::Unknown,
            },
        };
        let Some(first) = candidates.first() else {
            return NameLookup::Unknown;
        };
        let Some(host) = host else {
            return NameLookup::Found(Arc::clone(first));
        };

        if let Some(mapping) = candidates.iter().find(|m| m.host_type() == host) {
            return NameLookup::Found(Arc::clone(mapping));
        }
        if JSON_STORE_TYPES.contains(&first.store_type()) {
            debug!("Mapping {} to {} through JSON serialization", host, first.store_type());
            return NameLookup::Found(Arc::new(first.as_ref().clone().with_host_type(host.clone())));
        }
        NameLookup::Incompatible
    }

    /// `Char` host type on a bare or size-1 fixed-width character store type
    fn find_char_mapping(&self, store: &str, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        if request.host_type != Some(HostType::Char) {
            return None;
        }
        let parsed = parse_store_type(store);
        let base = parsed.base_name.to_ascii_lowercase();
        let size = parsed.size.or(request.size);
        (FIXED_CHAR_STORE_TYPES.contains(&base.as_str()) && matches!(size, None | Some(1)))
            .then(|| Arc::clone(&self.char_mapping))
    }

    fn find_by_host(&self, host: &HostType, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        if *host == HostType::Char {
            return Some(Arc::clone(&self.char_mapping));
        }
        let mapping = Arc::clone(self.host_mappings.get(host)?);

        if !matches!(host, HostType::String | HostType::BitString) {
            return Some(self.apply_facets(mapping, request.facets()));
        }

        let fixed = request.fixed_length.unwrap_or(false);
        let size = request.size.or_else(|| {
            request
                .is_key_or_index
                .then_some(self.options.key_string_default_size)
                .flatten()
        });
        let (bounded, unbounded) = match (host, fixed) {
            (HostType::String, false) => ("character varying", "text"),
            (HostType::String, true) => ("character", "text"),
            (_, false) => ("bit varying", "bit varying"),
            (_, true) => ("bit", "bit varying"),
        };

        match size {
            None if fixed => self.first_of(bounded),
            None => Some(mapping),
            Some(size) if size > MAX_BOUNDED_SIZE => {
                warn!(
                    "Requested size {} for {} exceeds {}, using {}",
                    size, host, MAX_BOUNDED_SIZE, unbounded
                );
                self.first_of(unbounded)
            }
            Some(size) => {
                let base = self.first_of(bounded)?;
                let facets = StoreFacets {
                    size: Some(size),
                    fixed_length: fixed,
                    ..StoreFacets::default()
                };
                Some(Arc::new(base.clone_with_facets(facets)))
            }
        }
    }

    fn find_array(&self, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        let element_host = match &request.host_type {
            Some(host) => Some(host.sequence_element()?.clone()),
            None => None,
        };
        let element_store = match request.store_type.as_deref() {
            Some(store) => Some(store.strip_suffix("[]")?.to_string()),
            None => None,
        };
        if element_host.is_none() && element_store.is_none() {
            return None;
        }

        let element_request = MappingRequest {
            store_type: element_store,
            host_type: element_host,
            ..request.clone()
        };
        let element = self.find_mapping(&element_request)?;
        if element.is_array() {
            debug!("Rejecting array of array type {}", element.store_type());
            return None;
        }

        let nullable = default_element_nullability(element.host_type());
        let array = TypeMapping::array(element, request.host_type.clone(), nullable).ok()?;
        debug!("Resolved array type {}", array.store_type());
        Some(Arc::new(array))
    }

    fn find_user_range(&self, request: &MappingRequest) -> Option<Arc<TypeMapping>> {
        let found = self.user_ranges.iter().find(|range| {
            match (request.store_type.as_deref(), request.host_type.as_ref()) {
                (Some(store), host) => {
                    let unqualified = range
                        .store_type()
                        .rsplit_once('.')
                        .map_or(range.store_type(), |(_, name)| name);
                    (range.store_type() == store || unqualified == store)
                        && host.is_none_or(|h| h == range.host_type())
                }
                (None, Some(host)) => host == range.host_type(),
                (None, None) => false,
            }
        })?;
        debug!("Resolved user range {}", found.store_type());
        Some(Arc::clone(found))
    }

    fn apply_facets(&self, mapping: Arc<TypeMapping>, facets: StoreFacets) -> Arc<TypeMapping> {
        if facets.is_empty() || !mapping.accepts_facets() {
            return mapping;
        }
        let facets = facets.or(StoreFacets {
            fixed_length: mapping.is_fixed_length(),
            ..StoreFacets::default()
        });
        Arc::new(mapping.clone_with_facets(facets))
    }

    fn first_of(&self, store_type: &str) -> Option<Arc<TypeMapping>> {
        self.store_mappings.get(store_type)?.first().cloned()
    }

    // === Container inference ===

    /// Range mapping whose subtype store type matches `subtype` exactly
    pub fn find_range_mapping(&self, subtype: &TypeMapping) -> Option<Arc<TypeMapping>> {
        self.ranges_by_subtype
            .get(subtype.host_type())?
            .iter()
            .find(|r| r.subtype().is_some_and(|s| s.store_type() == subtype.store_type()))
            .cloned()
    }

    /// Multirange mapping whose subtype store type matches `subtype` exactly
    pub fn find_multirange_mapping(&self, subtype: &TypeMapping) -> Option<Arc<TypeMapping>> {
        self.multiranges_by_subtype
            .get(subtype.host_type())?
            .iter()
            .find(|r| r.subtype().is_some_and(|s| s.store_type() == subtype.store_type()))
            .cloned()
    }

    /// Array mapping over `element`
    pub fn find_array_mapping(
        &self,
        element: &Arc<TypeMapping>,
        element_nullable: bool,
    ) -> Result<Arc<TypeMapping>> {
        TypeMapping::array(Arc::clone(element), None, element_nullable).map(Arc::new)
    }

    // === Validation ===

    /// Check that a sequence-backed value generation strategy fits `host_type`
    pub fn validate_sequence_strategy(&self, host_type: &HostType) -> Result<()> {
        if host_type.is_integer() || host_type.is_enum() {
            return Ok(());
        }
        Err(ErrorBuilder::new(
            KB0302,
            format!("Sequence value generation requires an integer type, found {}", host_type),
        )
        .context("Use identity generation or map the property to smallint, integer or bigint")
        .configuration())
    }
}

/// Element nullability when nothing is declared
fn default_element_nullability(element: &HostType) -> bool {
    matches!(
        element,
        HostType::String
            | HostType::Bytes
            | HostType::IpAddress
            | HostType::MacAddress
            | HostType::BitString
            | HostType::Json
            | HostType::TsVector
            | HostType::TsQuery
            | HostType::RegConfig
            | HostType::Dictionary
            | HostType::LTree
            | HostType::Array(_)
            | HostType::List(_)
            | HostType::Record(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_host_default_integer() {
        let registry = TypeMappingRegistry::default();
        let mapping = registry.find_mapping_for_host(&HostType::Int32).unwrap();
        assert_eq!(mapping.store_type(), "integer");
    }

    #[test]
    fn test_cache_returns_equal_mapping() {
        let registry = TypeMappingRegistry::default();
        let request = MappingRequest::for_host(HostType::list(HostType::String));
        let first = registry.find_mapping(&request).unwrap();
        let second = registry.find_mapping(&request).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_sequence_strategy_validation() {
        let registry = TypeMappingRegistry::default();
        assert!(registry.validate_sequence_strategy(&HostType::Int64).is_ok());
        assert!(registry.validate_sequence_strategy(&HostType::enumeration("Mood")).is_ok());
        let err = registry.validate_sequence_strategy(&HostType::String).unwrap_err();
        assert_eq!(err.code(), KB0302);
    }

    #[test]
    fn test_duplicate_enum_registration() {
        let mut registry = TypeMappingRegistry::default();
        let mut labels = IndexMap::new();
        labels.insert("A".to_string(), "a".to_string());
        registry.register_enum_like("letters", labels.clone()).unwrap();
        let err = registry.register_enum_like("letters", labels).unwrap_err();
        assert_eq!(err.code(), KB0301);
    }

    #[test]
    fn test_registration_clears_negative_cache() {
        let mut registry = TypeMappingRegistry::default();
        let request = MappingRequest::for_host(HostType::enumeration("letters"));
        assert!(registry.find_mapping(&request).is_none());

        let mut labels = IndexMap::new();
        labels.insert("A".to_string(), "a".to_string());
        registry.register_enum_like("letters", labels).unwrap();
        assert_eq!(registry.find_mapping(&request).unwrap().store_type(), "letters");
    }
}
