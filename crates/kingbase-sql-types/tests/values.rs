//! Host value model tests

use kingbase_sql_types::{HostType, HostValue, IntervalValue, IpNetworkValue, RangeBound, RangeValue};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::net::{IpAddr, Ipv4Addr};

#[test]
fn test_value_serde_shape() {
    let json = serde_json::to_value(HostValue::Int32(5)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "Int32", "value": 5}));

    let parsed: HostValue = serde_json::from_str(r#"{"type": "String", "value": "abc"}"#).unwrap();
    assert_eq!(parsed, HostValue::string("abc"));

    let null: HostValue = serde_json::from_str(r#"{"type": "Null"}"#).unwrap();
    assert!(null.is_null());
}

#[test]
fn test_range_serde_round_trip() {
    let value = HostValue::Range(RangeValue::closed_open(HostValue::Int64(1), HostValue::Int64(10)));
    let text = serde_json::to_string(&value).unwrap();
    let back: HostValue = serde_json::from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[rstest]
#[case(RangeValue::closed(HostValue::Int32(1), HostValue::Int32(2)), true, true)]
#[case(RangeValue::closed_open(HostValue::Int32(1), HostValue::Int32(2)), true, false)]
#[case(RangeValue::open(HostValue::Int32(1), HostValue::Int32(2)), false, false)]
fn test_range_inclusivity(#[case] range: RangeValue, #[case] lower: bool, #[case] upper: bool) {
    assert_eq!(range.lower_inclusive(), lower);
    assert_eq!(range.upper_inclusive(), upper);
    assert!(!range.lower_infinite());
}

#[test]
fn test_range_shape_is_pattern_matchable() {
    let range = RangeValue::new(None, true, Some(HostValue::Int32(9)), true);
    let RangeValue::Bounds { lower, upper } = &range else {
        panic!("expected bounds");
    };
    assert_eq!(lower, &RangeBound::Infinite);
    assert_eq!(upper, &RangeBound::inclusive(HostValue::Int32(9)));
    assert!(range.lower_infinite());
    assert!(!range.lower_inclusive());
}

#[test]
fn test_scalar_host_types() {
    let net = IpNetworkValue::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)), 8);
    assert_eq!(net.to_string(), "10.0.0.0/8");
    assert_eq!(HostValue::IpNetwork(net).host_type(), Some(HostType::IpNetwork));
    assert_eq!(
        HostValue::Interval(IntervalValue::new(1, 0, 0)).host_type(),
        Some(HostType::Interval)
    );
    assert_eq!(
        HostValue::Multirange(vec![RangeValue::empty()]).host_type(),
        None
    );
}
