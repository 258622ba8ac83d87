//! Range and multirange literal tests
//!
//! Embedded range literals are re-parsed with a small reference parser and
//! the boundary facts compared with the rendered value.

use kingbase_sql_mapping::{TypeMapping, TypeMappingRegistry};
use kingbase_sql_types::{multirange_is_non_empty, HostType, HostValue, RangeValue};
use proptest::prelude::*;
use regex::Regex;

/// Boundary facts read back from a literal
#[derive(Debug, PartialEq)]
struct Facts {
    is_empty: bool,
    lower: Option<String>,
    upper: Option<String>,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl Facts {
    fn of(range: &RangeValue, text: impl Fn(&HostValue) -> String) -> Self {
        Self {
            is_empty: range.is_empty(),
            lower: range.lower().map(&text),
            upper: range.upper().map(&text),
            lower_inclusive: range.lower_inclusive(),
            upper_inclusive: range.upper_inclusive(),
        }
    }
}

fn parse_range(literal: &str) -> Facts {
    if literal == "empty" {
        return Facts {
            is_empty: true,
            lower: None,
            upper: None,
            lower_inclusive: false,
            upper_inclusive: false,
        };
    }
    let bound = r#"("(?:[^"\\]|\\.)*"|[^,\[\]()"]*)"#;
    let pattern = Regex::new(&format!(r"^([\[(]){},{}([\])])$", bound, bound)).unwrap();
    let caps = pattern.captures(literal).unwrap_or_else(|| panic!("bad literal {}", literal));
    Facts {
        is_empty: false,
        lower: parse_bound(&caps[2]),
        upper: parse_bound(&caps[3]),
        lower_inclusive: &caps[1] == "[",
        upper_inclusive: &caps[4] == "]",
    }
}

fn parse_bound(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let Some(quoted) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) else {
        return Some(text.to_string());
    };
    let mut out = String::new();
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn int_range() -> impl Strategy<Value = RangeValue> {
    prop_oneof![
        1 => Just(RangeValue::empty()),
        6 => (
            proptest::option::of(any::<i32>()),
            any::<bool>(),
            proptest::option::of(any::<i32>()),
            any::<bool>()
        )
            .prop_map(|(lower, li, upper, ui)| {
                RangeValue::new(lower.map(HostValue::Int32), li, upper.map(HostValue::Int32), ui)
            }),
    ]
}

fn text_range() -> impl Strategy<Value = RangeValue> {
    let text = "[a-z ,()\"\\\\']{0,8}";
    (
        proptest::option::of(text),
        any::<bool>(),
        proptest::option::of(text),
        any::<bool>(),
    )
        .prop_map(|(lower, li, upper, ui)| {
            RangeValue::new(lower.map(HostValue::String), li, upper.map(HostValue::String), ui)
        })
}

fn host_text(value: &HostValue) -> String {
    match value {
        HostValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

proptest! {
    #[test]
    fn int_range_literal_idempotence(range in int_range()) {
        let registry = TypeMappingRegistry::default();
        let mapping = registry.find_mapping_for_store("int4range").unwrap();
        let literal = mapping.render_embedded(&HostValue::Range(range.clone())).unwrap();
        prop_assert_eq!(parse_range(&literal), Facts::of(&range, host_text));
    }

    #[test]
    fn text_range_literal_idempotence(range in text_range()) {
        let registry = TypeMappingRegistry::default();
        let text = registry.find_mapping_for_host(&HostType::String).unwrap();
        let mapping = TypeMapping::range("textrange", text);
        let literal = mapping.render_embedded(&HostValue::Range(range.clone())).unwrap();
        prop_assert_eq!(parse_range(&literal), Facts::of(&range, host_text));
    }

    #[test]
    fn multirange_literal_idempotence(ranges in proptest::collection::vec(int_range(), 0..5)) {
        let registry = TypeMappingRegistry::default();
        let mapping = registry.find_mapping_for_store("int4multirange").unwrap();
        let literal = mapping.render_embedded(&HostValue::Multirange(ranges.clone())).unwrap();

        let inner = literal.strip_prefix('{').and_then(|l| l.strip_suffix('}')).unwrap();
        let parsed: Vec<Facts> = if inner.is_empty() {
            Vec::new()
        } else {
            inner.split(", ").map(parse_range).collect()
        };
        let expected: Vec<Facts> = ranges.iter().map(|r| Facts::of(r, host_text)).collect();
        prop_assert_eq!(parsed.iter().any(|f| !f.is_empty), multirange_is_non_empty(&ranges));
        prop_assert_eq!(parsed, expected);
    }
}

#[test]
fn test_toplevel_range_over_dates() {
    let registry = TypeMappingRegistry::default();
    let mapping = registry
        .find_mapping_for_host(&HostType::range(HostType::Date))
        .unwrap();
    let lower = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let upper = chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let value = HostValue::Range(RangeValue::closed_open(HostValue::Date(lower), HostValue::Date(upper)));
    assert_eq!(
        mapping.render_toplevel(&value).unwrap(),
        "'[2024-01-01,2024-02-01)'::daterange"
    );
}
