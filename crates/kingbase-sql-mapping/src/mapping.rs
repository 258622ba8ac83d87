//! Type-mapping descriptors
//!
//! A [`TypeMapping`] pairs a store type with a host type and a native type
//! tag, and renders host values as SQL literals. Container descriptors
//! (array, range, multirange) share their inner descriptors through `Arc`.

use indexmap::IndexMap;
use kingbase_sql_diagnostics::{ErrorBuilder, KB0001, KB0004, KB0200, KB0202, Result};
use kingbase_sql_types::{HostType, HostValue, KingbaseDbType, RangeBound, RangeValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::literal::{
    needs_element_quoting, quote_element, quote_sql, LiteralOptions, ScalarLiteral,
};

/// Size, precision and scale modifiers of a store type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreFacets {
    pub size: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub fixed_length: bool,
}

impl StoreFacets {
    /// Create facets with a size
    pub fn sized(size: u32) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Create facets with a precision and optional scale
    pub fn precision(precision: u32, scale: Option<u32>) -> Self {
        Self {
            precision: Some(precision),
            scale,
            ..Self::default()
        }
    }

    /// Check if no modifier is set
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.precision.is_none() && self.scale.is_none()
    }

    /// Fill unset modifiers from `other`
    pub fn or(self, other: StoreFacets) -> Self {
        Self {
            size: self.size.or(other.size),
            precision: self.precision.or(other.precision),
            scale: self.scale.or(other.scale),
            fixed_length: self.fixed_length || other.fixed_length,
        }
    }

    /// Modifier text, e.g. `(32)` or `(10,2)`
    fn modifier(&self) -> Option<String> {
        match (self.size, self.precision, self.scale) {
            (Some(size), _, _) => Some(format!("({})", size)),
            (None, Some(p), Some(s)) => Some(format!("({},{})", p, s)),
            (None, Some(p), None) => Some(format!("({})", p)),
            _ => None,
        }
    }

    /// Fold the modifiers into a base store type name
    ///
    /// `timestamp with time zone` + precision 3 gives `timestamp(3) with time zone`.
    pub fn apply_to(&self, base: &str) -> String {
        let Some(modifier) = self.modifier() else {
            return base.to_string();
        };
        let zoned = base.ends_with(" with time zone") || base.ends_with(" without time zone");
        match base.split_once(' ') {
            Some((head, tail)) if zoned => format!("{}{} {}", head, modifier, tail),
            _ => format!("{}{}", base, modifier),
        }
    }
}

/// Shape of a descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum MappingKind {
    /// Leaf store type
    Scalar,
    /// User enum; maps host variant names to database labels
    Enum { labels: IndexMap<String, String> },
    /// Array of an element descriptor
    Array {
        element: Arc<TypeMapping>,
        element_nullable: bool,
    },
    /// Range over a subtype descriptor
    Range { subtype: Arc<TypeMapping> },
    /// Multirange over a range descriptor
    Multirange { range: Arc<TypeMapping> },
}

/// Canonical record describing how one host type maps to one store type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMapping {
    store_type: String,
    base_store_type: String,
    host_type: HostType,
    db_type: KingbaseDbType,
    facets: StoreFacets,
    kind: MappingKind,
    literal_options: LiteralOptions,
}

impl TypeMapping {
    // === Constructors ===

    /// Create a leaf descriptor
    pub fn scalar(
        store_type: impl Into<String>,
        host_type: HostType,
        db_type: KingbaseDbType,
    ) -> Self {
        let store_type = store_type.into();
        Self {
            base_store_type: store_type.clone(),
            store_type,
            host_type,
            db_type,
            facets: StoreFacets::default(),
            kind: MappingKind::Scalar,
            literal_options: LiteralOptions::default(),
        }
    }

    /// Create an enum descriptor (variant name to label)
    pub fn enumeration(
        store_type: impl Into<String>,
        host_name: impl Into<String>,
        labels: IndexMap<String, String>,
    ) -> Self {
        Self {
            kind: MappingKind::Enum { labels },
            ..Self::scalar(store_type, HostType::enumeration(host_name), KingbaseDbType::Enum)
        }
    }

    /// Create an array descriptor over `element`
    ///
    /// Arrays are flat: an element that is itself an array is rejected.
    pub fn array(
        element: Arc<TypeMapping>,
        host_type: Option<HostType>,
        element_nullable: bool,
    ) -> Result<Self> {
        if element.is_array() {
            return Err(ErrorBuilder::new(
                KB0004,
                format!("Cannot create an array of array type {}", element.store_type),
            )
            .subject(element.store_type.clone())
            .mapping());
        }
        let store_type = format!("{}[]", element.store_type);
        Ok(Self {
            base_store_type: format!("{}[]", element.base_store_type),
            store_type,
            host_type: host_type.unwrap_or_else(|| HostType::array(element.host_type.clone())),
            db_type: KingbaseDbType::array(element.db_type.clone()),
            facets: element.facets,
            literal_options: element.literal_options,
            kind: MappingKind::Array {
                element,
                element_nullable,
            },
        })
    }

    /// Create a range descriptor anchored to `store_type`
    pub fn range(store_type: impl Into<String>, subtype: Arc<TypeMapping>) -> Self {
        let store_type = store_type.into();
        Self {
            base_store_type: store_type.clone(),
            store_type,
            host_type: HostType::range(subtype.host_type.clone()),
            db_type: KingbaseDbType::range(subtype.db_type.clone()),
            facets: StoreFacets::default(),
            literal_options: subtype.literal_options,
            kind: MappingKind::Range { subtype },
        }
    }

    /// Create a multirange descriptor over a range descriptor
    pub fn multirange(store_type: impl Into<String>, range: Arc<TypeMapping>) -> Result<Self> {
        let MappingKind::Range { subtype } = &range.kind else {
            return Err(ErrorBuilder::new(
                KB0001,
                format!("{} is not a range type", range.store_type),
            )
            .subject(range.store_type.clone())
            .mapping());
        };
        let store_type = store_type.into();
        Ok(Self {
            base_store_type: store_type.clone(),
            store_type,
            host_type: HostType::multirange(subtype.host_type.clone()),
            db_type: KingbaseDbType::multirange(subtype.db_type.clone()),
            facets: StoreFacets::default(),
            literal_options: range.literal_options,
            kind: MappingKind::Multirange { range },
        })
    }

    /// Set the literal options
    pub fn with_literal_options(mut self, options: LiteralOptions) -> Self {
        self.literal_options = options;
        self
    }

    /// Mark as a fixed-length store type
    pub fn with_fixed_length(mut self) -> Self {
        self.facets.fixed_length = true;
        self
    }

    /// Replace the host type, keeping the store type
    pub fn with_host_type(mut self, host_type: HostType) -> Self {
        self.host_type = host_type;
        self
    }

    /// Clone with new modifiers folded into the store type
    ///
    /// For arrays the modifiers apply to the element and the array store
    /// type is rebuilt as `element[]`. Ranges and multiranges carry no
    /// modifiers of their own and are returned unchanged.
    pub fn clone_with_facets(&self, facets: StoreFacets) -> Self {
        match &self.kind {
            MappingKind::Array {
                element,
                element_nullable,
            } => {
                let element = Arc::new(element.clone_with_facets(facets));
                Self {
                    store_type: format!("{}[]", element.store_type),
                    facets: element.facets,
                    kind: MappingKind::Array {
                        element,
                        element_nullable: *element_nullable,
                    },
                    ..self.clone()
                }
            }
            MappingKind::Range { .. } | MappingKind::Multirange { .. } => self.clone(),
            MappingKind::Scalar | MappingKind::Enum { .. } => Self {
                store_type: facets.apply_to(&self.base_store_type),
                facets,
                ..self.clone()
            },
        }
    }

    /// Clone an array descriptor with a different element nullability
    pub fn clone_with_element_nullability(&self, nullable: bool) -> Self {
        match &self.kind {
            MappingKind::Array { element, .. } => Self {
                kind: MappingKind::Array {
                    element: Arc::clone(element),
                    element_nullable: nullable,
                },
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    // === Accessors ===

    /// Full store type, including modifiers (`varchar(32)`, `integer[]`)
    pub fn store_type(&self) -> &str {
        &self.store_type
    }

    /// Store type without modifiers
    pub fn base_store_type(&self) -> &str {
        &self.base_store_type
    }

    pub fn host_type(&self) -> &HostType {
        &self.host_type
    }

    pub fn db_type(&self) -> &KingbaseDbType {
        &self.db_type
    }

    pub fn facets(&self) -> StoreFacets {
        self.facets
    }

    pub fn size(&self) -> Option<u32> {
        self.facets.size
    }

    pub fn precision(&self) -> Option<u32> {
        self.facets.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.facets.scale
    }

    pub fn is_fixed_length(&self) -> bool {
        self.facets.fixed_length
    }

    pub fn kind(&self) -> &MappingKind {
        &self.kind
    }

    pub fn literal_options(&self) -> LiteralOptions {
        self.literal_options
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, MappingKind::Array { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self.kind, MappingKind::Range { .. })
    }

    pub fn is_multirange(&self) -> bool {
        matches!(self.kind, MappingKind::Multirange { .. })
    }

    /// Element descriptor of an array
    pub fn element(&self) -> Option<&Arc<TypeMapping>> {
        match &self.kind {
            MappingKind::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Element nullability of an array (None for other kinds)
    pub fn element_nullable(&self) -> Option<bool> {
        match &self.kind {
            MappingKind::Array {
                element_nullable, ..
            } => Some(*element_nullable),
            _ => None,
        }
    }

    /// Subtype descriptor of a range or multirange
    pub fn subtype(&self) -> Option<&Arc<TypeMapping>> {
        match &self.kind {
            MappingKind::Range { subtype } => Some(subtype),
            MappingKind::Multirange { range } => range.subtype(),
            _ => None,
        }
    }

    /// Range descriptor of a multirange
    pub fn range_mapping(&self) -> Option<&Arc<TypeMapping>> {
        match &self.kind {
            MappingKind::Multirange { range } => Some(range),
            _ => None,
        }
    }

    // === Literals ===

    /// Render a fully quoted and cast literal, safe to splice into SQL text
    pub fn render_toplevel(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        match &self.kind {
            MappingKind::Scalar => self.scalar_literal().toplevel(value),
            MappingKind::Enum { .. } => Ok(format!(
                "{}::{}",
                quote_sql(&self.enum_label(value)?),
                self.store_type
            )),
            MappingKind::Array { element, .. } => {
                let elements = self.array_elements(value)?;
                let rendered = elements
                    .iter()
                    .map(|e| element.render_uncast(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("ARRAY[{}]::{}", rendered.join(","), self.store_type))
            }
            MappingKind::Range { .. } | MappingKind::Multirange { .. } => Ok(format!(
                "{}::{}",
                quote_sql(&self.render_embedded(value)?),
                self.store_type
            )),
        }
    }

    /// Render an unquoted, uncast fragment for use inside another literal
    pub fn render_embedded(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        match &self.kind {
            MappingKind::Scalar => self.scalar_literal().embedded(value),
            MappingKind::Enum { .. } => {
                let label = self.enum_label(value)?;
                Ok(if needs_element_quoting(&label) {
                    quote_element(&label)
                } else {
                    label
                })
            }
            MappingKind::Array { element, .. } => {
                let elements = self.array_elements(value)?;
                let rendered = elements
                    .iter()
                    .map(|e| element.render_embedded(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{{{}}}", rendered.join(",")))
            }
            MappingKind::Range { subtype } => match value {
                HostValue::Range(range) => render_range(subtype, range),
                other => Err(self.mismatch(other)),
            },
            MappingKind::Multirange { range } => match value {
                HostValue::Multirange(ranges) => {
                    let subtype = range.subtype().ok_or_else(|| self.mismatch(value))?;
                    let rendered = ranges
                        .iter()
                        .map(|r| render_range(subtype, r))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(format!("{{{}}}", rendered.join(", ")))
                }
                other => Err(self.mismatch(other)),
            },
        }
    }

    /// Render the element form used inside an `ARRAY[...]` constructor
    ///
    /// Bare literals stay bare; everything else is single-quoted without a
    /// cast, since the trailing array cast types the elements.
    pub fn render_uncast(&self, value: &HostValue) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        match &self.kind {
            MappingKind::Scalar => self.scalar_literal().uncast(value),
            MappingKind::Enum { .. } => Ok(quote_sql(&self.enum_label(value)?)),
            _ => Ok(quote_sql(&self.render_embedded(value)?)),
        }
    }

    /// Check if the store type takes size, precision or scale modifiers
    pub fn accepts_facets(&self) -> bool {
        match &self.kind {
            MappingKind::Array { element, .. } => element.accepts_facets(),
            MappingKind::Scalar => matches!(
                self.db_type,
                KingbaseDbType::Numeric
                    | KingbaseDbType::Varchar
                    | KingbaseDbType::Char
                    | KingbaseDbType::Bit
                    | KingbaseDbType::Varbit
                    | KingbaseDbType::Timestamp
                    | KingbaseDbType::TimestampTz
                    | KingbaseDbType::Time
                    | KingbaseDbType::TimeTz
                    | KingbaseDbType::Interval
            ),
            _ => false,
        }
    }

    fn scalar_literal(&self) -> ScalarLiteral<'_> {
        ScalarLiteral {
            store_type: &self.store_type,
            host_type: &self.host_type,
            db_type: &self.db_type,
            options: self.literal_options,
        }
    }

    fn enum_label(&self, value: &HostValue) -> Result<String> {
        let (MappingKind::Enum { labels }, HostValue::Enum(variant) | HostValue::String(variant)) =
            (&self.kind, value)
        else {
            return Err(self.mismatch(value));
        };
        if let Some(label) = labels.get(variant) {
            return Ok(label.clone());
        }
        // Labels may also be given directly
        if labels.values().any(|l| l == variant) {
            return Ok(variant.clone());
        }
        Err(ErrorBuilder::new(
            KB0202,
            format!("'{}' is not a label of enum {}", variant, self.store_type),
        )
        .subject(self.store_type.clone())
        .literal())
    }

    fn array_elements<'v>(&self, value: &'v HostValue) -> Result<&'v [HostValue]> {
        match value {
            HostValue::Array(elements) => Ok(elements),
            other => Err(self.mismatch(other)),
        }
    }

    fn mismatch(&self, value: &HostValue) -> kingbase_sql_diagnostics::KbError {
        ErrorBuilder::new(
            KB0200,
            format!("Cannot render {} as a literal of type {}", value, self.store_type),
        )
        .subject(self.store_type.clone())
        .literal()
    }
}

/// Render one range value with the subtype's embedded bound form
fn render_range(subtype: &TypeMapping, range: &RangeValue) -> Result<String> {
    let RangeValue::Bounds { lower, upper } = range else {
        return Ok("empty".to_string());
    };
    let bound = |b: &RangeBound| -> Result<String> {
        match b.value() {
            Some(v) => subtype.render_embedded(v),
            None => Ok(String::new()),
        }
    };
    Ok(format!(
        "{}{},{}{}",
        if lower.is_inclusive() { '[' } else { '(' },
        bound(lower)?,
        bound(upper)?,
        if upper.is_inclusive() { ']' } else { ')' },
    ))
}

impl fmt::Display for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} ({})", self.store_type, self.host_type, self.db_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int4() -> Arc<TypeMapping> {
        Arc::new(TypeMapping::scalar("integer", HostType::Int32, KingbaseDbType::Integer))
    }

    #[test]
    fn test_apply_facets() {
        assert_eq!(StoreFacets::sized(32).apply_to("character varying"), "character varying(32)");
        assert_eq!(StoreFacets::precision(10, Some(2)).apply_to("numeric"), "numeric(10,2)");
        assert_eq!(
            StoreFacets::precision(3, None).apply_to("timestamp with time zone"),
            "timestamp(3) with time zone"
        );
        assert_eq!(StoreFacets::default().apply_to("text"), "text");
    }

    #[test]
    fn test_array_literals() {
        let array = TypeMapping::array(int4(), None, false).unwrap();
        assert_eq!(array.store_type(), "integer[]");
        assert_eq!(array.host_type(), &HostType::array(HostType::Int32));

        let value = HostValue::Array(vec![HostValue::Int32(1), HostValue::Null, HostValue::Int32(3)]);
        assert_eq!(array.render_toplevel(&value).unwrap(), "ARRAY[1,NULL,3]::integer[]");
        assert_eq!(array.render_embedded(&value).unwrap(), "{1,NULL,3}");
        assert_eq!(
            array.render_toplevel(&HostValue::Array(vec![])).unwrap(),
            "ARRAY[]::integer[]"
        );
    }

    #[test]
    fn test_array_of_array_rejected() {
        let array = Arc::new(TypeMapping::array(int4(), None, false).unwrap());
        let err = TypeMapping::array(array, None, false).unwrap_err();
        assert_eq!(err.code(), KB0004);
    }

    #[test]
    fn test_array_clone_with_facets_applies_to_element() {
        let varchar = Arc::new(TypeMapping::scalar(
            "character varying",
            HostType::String,
            KingbaseDbType::Varchar,
        ));
        let array = TypeMapping::array(varchar, None, true).unwrap();
        let sized = array.clone_with_facets(StoreFacets::sized(16));
        assert_eq!(sized.store_type(), "character varying(16)[]");
        assert_eq!(sized.element().unwrap().size(), Some(16));
        assert_eq!(sized.element_nullable(), Some(true));
    }

    #[test]
    fn test_range_and_multirange_literals() {
        let range = Arc::new(TypeMapping::range("int4range", int4()));
        let value = HostValue::Range(RangeValue::closed_open(HostValue::Int32(1), HostValue::Int32(5)));
        assert_eq!(range.render_embedded(&value).unwrap(), "[1,5)");
        assert_eq!(range.render_toplevel(&value).unwrap(), "'[1,5)'::int4range");
        assert_eq!(
            range.render_toplevel(&HostValue::Range(RangeValue::empty())).unwrap(),
            "'empty'::int4range"
        );

        let lower_only = HostValue::Range(RangeValue::new(Some(HostValue::Int32(3)), false, None, false));
        assert_eq!(range.render_embedded(&lower_only).unwrap(), "(3,)");

        let multi = TypeMapping::multirange("int4multirange", range).unwrap();
        let value = HostValue::Multirange(vec![
            RangeValue::closed_open(HostValue::Int32(1), HostValue::Int32(5)),
            RangeValue::closed_open(HostValue::Int32(7), HostValue::Int32(9)),
        ]);
        assert_eq!(
            multi.render_toplevel(&value).unwrap(),
            "'{[1,5), [7,9)}'::int4multirange"
        );
        assert_eq!(multi.host_type(), &HostType::multirange(HostType::Int32));
    }

    #[test]
    fn test_text_range_quotes_bounds() {
        let text = Arc::new(TypeMapping::scalar("text", HostType::String, KingbaseDbType::Text));
        let range = TypeMapping::range("textrange", text);
        let value = HostValue::Range(RangeValue::closed(
            HostValue::string("a b"),
            HostValue::string("it's"),
        ));
        assert_eq!(range.render_embedded(&value).unwrap(), r#"["a b","it's"]"#);
        assert_eq!(range.render_toplevel(&value).unwrap(), r#"'["a b","it''s"]'::textrange"#);
    }

    #[test]
    fn test_enum_labels() {
        let mut labels = IndexMap::new();
        labels.insert("Happy".to_string(), "happy".to_string());
        labels.insert("Sad".to_string(), "sad".to_string());
        let mood = TypeMapping::enumeration("mood", "Mood", labels);

        assert_eq!(mood.render_toplevel(&HostValue::Enum("Happy".into())).unwrap(), "'happy'::mood");
        let err = mood.render_toplevel(&HostValue::Enum("Angry".into())).unwrap_err();
        assert_eq!(err.code(), KB0202);
    }

    #[test]
    fn test_multirange_requires_range() {
        assert_eq!(TypeMapping::multirange("x", int4()).unwrap_err().code(), KB0001);
    }
}
