//! decode(encode(v)) == v for values whose only non-JSON members are timestamps.

use chrono::{DateTime, Utc};
use cloudprobe_core::codec::{decode, encode};
use cloudprobe_core::{Map, Value};
use proptest::prelude::*;

fn timestamp() -> impl Strategy<Value = Value> {
    // 1970..2100, with sub-second precision.
    (0i64..4_102_444_800, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        Value::DateTime(DateTime::<Utc>::from_timestamp(secs, nanos).unwrap())
    })
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        // Identifier-like strings never look like ISO-8601 timestamps.
        "[a-zA-Z][a-zA-Z0-9_./-]{0,16}".prop_map(Value::String),
        timestamp(),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[A-Za-z_]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map>())),
        ]
    })
}

proptest! {
    #[test]
    fn test_roundtrip_property(v in value()) {
        let doc = encode(&v).unwrap();
        prop_assert_eq!(decode(&doc).unwrap(), v);
    }
}
