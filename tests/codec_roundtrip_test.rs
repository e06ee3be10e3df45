// Copyright 2026 NumBridge Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Native codec round-trip tests - scalars, arrays, composites

use numbridge::backend::codec;
use numbridge::backend::{type_ids, FieldDef, NativeTypeId, TypeDescriptor, TypeRegistry};
use numbridge::{ArrayDim, Decoded, Error, Scalar, TypeClass, Value};

fn roundtrip(registry: &TypeRegistry, type_id: NativeTypeId, value: &Decoded) -> Decoded {
    let desc = registry.describe(type_id).expect("descriptor");
    let bytes = codec::encode(registry, desc, value).expect("encode");
    codec::decode(registry, desc, &bytes).expect("decode")
}

#[test]
fn test_scalar_roundtrip_every_class() {
    let registry = TypeRegistry::builtin();
    let cases: Vec<(NativeTypeId, Decoded)> = vec![
        (type_ids::BOOL, Decoded::Scalar(Scalar::Bool(true))),
        (type_ids::BOOL, Decoded::Scalar(Scalar::Bool(false))),
        (type_ids::INT1, Decoded::Scalar(Scalar::Int8(-7))),
        (type_ids::INT2, Decoded::Scalar(Scalar::Int16(-30000))),
        (type_ids::INT4, Decoded::Scalar(Scalar::Int32(i32::MIN))),
        (type_ids::INT8, Decoded::Scalar(Scalar::Int64(i64::MAX))),
        (type_ids::UINT1, Decoded::Scalar(Scalar::UInt8(255))),
        (type_ids::UINT2, Decoded::Scalar(Scalar::UInt16(65535))),
        (type_ids::UINT4, Decoded::Scalar(Scalar::UInt32(u32::MAX))),
        (type_ids::UINT8, Decoded::Scalar(Scalar::UInt64(u64::MAX))),
        (type_ids::FLOAT4, Decoded::Scalar(Scalar::Float32(-0.25))),
        (type_ids::FLOAT8, Decoded::Scalar(Scalar::Float64(1e300))),
        (type_ids::TEXT, Decoded::Scalar(Scalar::Text("héllo wörld".into()))),
        (type_ids::TEXT, Decoded::Scalar(Scalar::Text("".into()))),
        (
            type_ids::BYTEA,
            Decoded::Scalar(Scalar::Bytes(vec![0u8, 255, 1, 254].into())),
        ),
    ];
    for (type_id, value) in cases {
        assert_eq!(roundtrip(registry, type_id, &value), value);
    }
}

#[test]
fn test_float_roundtrip_preserves_special_values() {
    let registry = TypeRegistry::builtin();
    for v in [f64::INFINITY, f64::NEG_INFINITY, f64::MIN_POSITIVE, -0.0] {
        let value = Decoded::Scalar(Scalar::Float64(v));
        assert_eq!(roundtrip(registry, type_ids::FLOAT8, &value), value);
    }
    // NaN compares unequal to itself; check the bit pattern instead
    let desc = registry.describe(type_ids::FLOAT8).expect("float8");
    let nan = Decoded::Scalar(Scalar::Float64(f64::NAN));
    let bytes = codec::encode(registry, desc, &nan).expect("encode");
    match codec::decode(registry, desc, &bytes).expect("decode") {
        Decoded::Scalar(Scalar::Float64(v)) => assert!(v.is_nan()),
        other => panic!("decoded {:?}", other),
    }
}

#[test]
fn test_array_roundtrip_keeps_bounds_and_nulls() {
    let registry = TypeRegistry::builtin();
    let value = Decoded::Array(
        numbridge::ArrayValue::new(
            TypeClass::Int64,
            [ArrayDim::new(-1, 2)],
            vec![
                Some(Decoded::Scalar(Scalar::Int64(10))),
                None,
                Some(Decoded::Scalar(Scalar::Int64(30))),
                Some(Decoded::Scalar(Scalar::Int64(40))),
            ],
        )
        .expect("array"),
    );
    let back = roundtrip(registry, type_ids::INT8_ARRAY, &value);
    assert_eq!(back, value);

    let decoded = Value::owned(back);
    let dims = decoded.array_dims().expect("dims");
    assert_eq!((dims[0].lower, dims[0].upper), (-1, 2));
    assert!(decoded.index(0).expect("null slot").is_null());
    assert_eq!(decoded.index(2).expect("third").get::<i64>().expect("v"), 40);
}

#[test]
fn test_matrix_roundtrip() {
    let registry = TypeRegistry::builtin();
    let elements = (1..=6)
        .map(|v| Some(Decoded::Scalar(Scalar::Float64(f64::from(v)))))
        .collect();
    let value = Decoded::Array(
        numbridge::ArrayValue::new(
            TypeClass::Float64,
            [ArrayDim::new(1, 2), ArrayDim::new(4, 6)],
            elements,
        )
        .expect("matrix"),
    );
    let back = roundtrip(registry, type_ids::FLOAT8_ARRAY, &value);
    assert_eq!(back, value);

    let decoded = Value::owned(back);
    assert_eq!(decoded.element(&[2, 4]).expect("a21").get::<f64>().expect("v"), 4.0);
}

#[test]
fn test_empty_array_roundtrip() {
    let registry = TypeRegistry::builtin();
    let value = Decoded::Array(
        numbridge::ArrayValue::new(TypeClass::Text, [ArrayDim::new(1, 0)], vec![])
            .expect("empty"),
    );
    assert_eq!(roundtrip(registry, type_ids::TEXT_ARRAY, &value), value);
}

#[test]
fn test_composite_roundtrip_with_field_access() {
    let mut registry = TypeRegistry::with_builtins();
    let point = NativeTypeId(16400);
    registry.register(TypeDescriptor::composite(
        point,
        "point",
        vec![
            FieldDef::new("a", type_ids::INT8),
            FieldDef::new("b", type_ids::TEXT),
        ],
    ));

    let value = Value::composite([("a", Value::from(7i64)), ("b", Value::from("x"))])
        .expect("composite")
        .into_decoded()
        .expect("decoded")
        .expect("non-null");

    let back = roundtrip(&registry, point, &value);
    let decoded = Value::owned(back);
    assert_eq!(decoded.index(0).expect("a").get::<i64>().expect("v"), 7);
    assert_eq!(decoded.index(1).expect("b").get::<String>().expect("v"), "x");
    assert_eq!(decoded.field("a").expect("by name").get::<i64>().expect("v"), 7);
    assert_eq!(decoded.field("b").expect("by name").get::<String>().expect("v"), "x");
}

#[test]
fn test_composite_roundtrip_with_null_and_nested_array() {
    let mut registry = TypeRegistry::with_builtins();
    let sample = NativeTypeId(16401);
    registry.register(TypeDescriptor::composite(
        sample,
        "sample",
        vec![
            FieldDef::new("label", type_ids::TEXT),
            FieldDef::new("xs", type_ids::FLOAT8_ARRAY),
        ],
    ));

    let value = Value::composite([
        ("label", Value::null()),
        ("xs", Value::vector([1.5, 2.5]).expect("vector")),
    ])
    .expect("composite")
    .into_decoded()
    .expect("decoded")
    .expect("non-null");

    let back = roundtrip(&registry, sample, &value);
    let decoded = Value::owned(back);
    assert!(decoded.field("label").expect("label").is_null());
    assert_eq!(
        decoded.field("xs").expect("xs").get::<Vec<f64>>().expect("dense"),
        vec![1.5, 2.5]
    );
}

#[test]
fn test_encode_rejects_kind_mismatch() {
    let registry = TypeRegistry::builtin();
    let scalar = Decoded::Scalar(Scalar::Int64(1));
    let array_desc = registry.describe(type_ids::INT8_ARRAY).expect("int8[]");
    assert!(matches!(
        codec::encode(registry, array_desc, &scalar),
        Err(Error::ShapeMismatch(_))
    ));

    let array = Decoded::Array(
        numbridge::ArrayValue::new(
            TypeClass::Int64,
            [ArrayDim::new(1, 1)],
            vec![Some(scalar)],
        )
        .expect("array"),
    );
    let scalar_desc = registry.describe(type_ids::INT8).expect("int8");
    assert!(matches!(
        codec::encode(registry, scalar_desc, &array),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_encode_rejects_element_class_mismatch() {
    let registry = TypeRegistry::builtin();
    let desc = registry.describe(type_ids::FLOAT8_ARRAY).expect("float8[]");
    let ints = Decoded::Array(
        numbridge::ArrayValue::new(
            TypeClass::Int64,
            [ArrayDim::new(1, 1)],
            vec![Some(Decoded::Scalar(Scalar::Int64(1)))],
        )
        .expect("array"),
    );
    assert!(matches!(
        codec::encode(registry, desc, &ints),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_encode_rejects_field_count_mismatch() {
    let mut registry = TypeRegistry::with_builtins();
    let pair = NativeTypeId(16402);
    registry.register(TypeDescriptor::composite(
        pair,
        "pair",
        vec![
            FieldDef::new("a", type_ids::INT8),
            FieldDef::new("b", type_ids::INT8),
        ],
    ));
    let desc = registry.describe(pair).expect("pair");

    let short = Value::composite([("a", Value::from(1i64))])
        .expect("composite")
        .into_decoded()
        .expect("decoded")
        .expect("non-null");
    assert!(matches!(
        codec::encode(&registry, desc, &short),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_unknown_type_fails_at_first_use() {
    let registry = TypeRegistry::builtin();
    assert!(matches!(
        registry.describe(NativeTypeId(4242)),
        Err(Error::UnknownType(4242))
    ));

    // an array whose element id is unregistered fails when touched
    let mut partial = TypeRegistry::new();
    partial.register(TypeDescriptor::array(
        NativeTypeId(17000),
        "ghost[]",
        NativeTypeId(4242),
    ));
    let desc = partial.describe(NativeTypeId(17000)).expect("ghost[]");
    let value = Decoded::Array(
        numbridge::ArrayValue::new(TypeClass::Int64, [ArrayDim::new(1, 0)], vec![])
            .expect("empty"),
    );
    assert!(matches!(
        codec::encode(&partial, desc, &value),
        Err(Error::UnknownType(4242))
    ));
}

#[test]
fn test_decode_rejects_truncated_datum() {
    let registry = TypeRegistry::builtin();
    let desc = registry.describe(type_ids::INT8_ARRAY).expect("int8[]");
    let value = Decoded::Array(
        numbridge::ArrayValue::new(
            TypeClass::Int64,
            [ArrayDim::new(1, 2)],
            vec![
                Some(Decoded::Scalar(Scalar::Int64(1))),
                Some(Decoded::Scalar(Scalar::Int64(2))),
            ],
        )
        .expect("array"),
    );
    let bytes = codec::encode(registry, desc, &value).expect("encode");
    assert!(matches!(
        codec::decode(registry, desc, &bytes[..bytes.len() - 3]),
        Err(Error::MalformedDatum(_))
    ));
}
