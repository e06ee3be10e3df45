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

//! End-to-end UDF invocation tests through the embedded backend

use numbridge::backend::type_ids;
use numbridge::{
    EmbeddedBackend, FieldDef, NativeReturn, NativeTypeId, OwnedDatum, Result, SqlState,
    TypeDescriptor, UdfEntry, Value,
};

#[test]
fn test_add_one_returns_forty_two() {
    let backend = EmbeddedBackend::new();
    let arg = backend
        .datum(type_ids::INT8, Value::from(41i64))
        .expect("datum");

    let ret = backend
        .invoke("add_one", &[arg], type_ids::INT8)
        .expect("invoke");
    assert_eq!(
        ret,
        NativeReturn::Datum {
            type_id: type_ids::INT8,
            bytes: 42i64.to_le_bytes().to_vec(),
        }
    );

    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.get::<i64>().expect("i64"), 42);
}

#[test]
fn test_null_argument_yields_sql_null_not_zero() {
    let backend = EmbeddedBackend::new();
    let ret = backend
        .invoke("add_one", &[OwnedDatum::null(type_ids::INT8)], type_ids::INT8)
        .expect("invoke");
    assert_eq!(ret, NativeReturn::Null);
    assert!(backend.decode_return(&ret).expect("decode").is_null());
}

#[test]
fn test_narrow_argument_widens_into_the_algorithm() {
    // add_one reads i64; an int2 argument widens losslessly on extraction
    let backend = EmbeddedBackend::new();
    let arg = backend
        .datum(type_ids::INT2, Value::from(41i16))
        .expect("datum");
    let ret = backend
        .invoke("add_one", &[arg], type_ids::INT8)
        .expect("invoke");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.get::<i64>().expect("i64"), 42);
}

#[test]
fn test_overflow_surfaces_as_one_diagnostic() {
    let backend = EmbeddedBackend::new();
    let arg = backend
        .datum(type_ids::INT8, Value::from(i64::MAX))
        .expect("datum");
    let diag = backend
        .invoke("add_one", &[arg], type_ids::INT8)
        .expect_err("must fail");
    assert_eq!(diag.state, SqlState::InvalidParameterValue);
    assert_eq!(diag.message, "Function \"add_one\": integer out of range");
    assert_eq!(diag.to_string(), "[22023] Function \"add_one\": integer out of range");
}

#[test]
fn test_vector_sum_over_a_native_array() {
    let backend = EmbeddedBackend::new();
    let arg = backend
        .datum(
            type_ids::FLOAT8_ARRAY,
            Value::vector([1.5, 2.5, 4.0]).expect("vector"),
        )
        .expect("datum");
    let ret = backend
        .invoke("vector_sum", &[arg], type_ids::FLOAT8)
        .expect("invoke");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.get::<f64>().expect("f64"), 8.0);
}

#[test]
fn test_weighted_mean_end_to_end() {
    let backend = EmbeddedBackend::new();
    let values = backend
        .datum(
            type_ids::FLOAT8_ARRAY,
            Value::vector([1.0, 3.0]).expect("vector"),
        )
        .expect("datum");
    let weights = backend
        .datum(
            type_ids::FLOAT8_ARRAY,
            Value::vector([3.0, 1.0]).expect("vector"),
        )
        .expect("datum");

    let ret = backend
        .invoke("weighted_mean", &[values, weights], type_ids::FLOAT8)
        .expect("invoke");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.get::<f64>().expect("f64"), 1.5);
}

#[test]
fn test_weighted_mean_reports_the_recorded_message() {
    let backend = EmbeddedBackend::new();
    let values = backend
        .datum(
            type_ids::FLOAT8_ARRAY,
            Value::vector([1.0, 2.0, 3.0]).expect("vector"),
        )
        .expect("datum");
    let weights = backend
        .datum(type_ids::FLOAT8_ARRAY, Value::vector([1.0]).expect("vector"))
        .expect("datum");

    let diag = backend
        .invoke("weighted_mean", &[values, weights], type_ids::FLOAT8)
        .expect_err("must fail");
    // the context slot's message, not the generic "invalid input"
    assert_eq!(
        diag.message,
        "Function \"weighted_mean\": value and weight vectors must have equal length, got 3 and 1"
    );
}

#[test]
fn test_describe_call_sees_invocation_metadata() {
    let backend = EmbeddedBackend::new();
    let first = backend
        .datum(type_ids::INT8, Value::from(1i64))
        .expect("datum");
    let ret = backend
        .invoke(
            "describe_call",
            &[first, OwnedDatum::null(type_ids::FLOAT8)],
            type_ids::TEXT,
        )
        .expect("invoke");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(
        out.get::<String>().expect("text"),
        "describe_call(int8, NULL::float8)"
    );
}

#[test]
fn test_unknown_symbol_is_undefined_function() {
    let backend = EmbeddedBackend::new();
    let diag = backend
        .invoke("no_such_udf", &[], type_ids::INT8)
        .expect_err("must fail");
    assert_eq!(diag.state, SqlState::UndefinedFunction);
    assert_eq!(diag.state.code(), "42883");
    assert_eq!(diag.message, "function \"no_such_udf\" does not exist");
}

#[test]
fn test_unregistered_argument_type_fails_at_first_use() {
    let backend = EmbeddedBackend::new();
    let arg = OwnedDatum {
        type_id: NativeTypeId(4242),
        bytes: Some(vec![0]),
    };
    let diag = backend
        .invoke("add_one", &[arg], type_ids::INT8)
        .expect_err("must fail");
    assert_eq!(diag.state, SqlState::InvalidParameterValue);
    assert_eq!(
        diag.message,
        "Function \"add_one\": unknown backend type id 4242"
    );
}

#[test]
fn test_composite_return_roundtrips_through_native_form() {
    fn make_point(
        _ctx: &numbridge::CallContext<'_>,
        _args: Value<'_>,
    ) -> Result<Value<'static>> {
        Value::composite([("a", Value::from(7i64)), ("b", Value::from("x"))])
    }
    static UDFS: &[UdfEntry] = &[UdfEntry {
        symbol: "make_point",
        func: make_point,
    }];

    const POINT: NativeTypeId = NativeTypeId(16500);
    let mut backend = EmbeddedBackend::with_udfs(UDFS);
    backend.register_type(TypeDescriptor::composite(
        POINT,
        "point",
        vec![
            FieldDef::new("a", type_ids::INT8),
            FieldDef::new("b", type_ids::TEXT),
        ],
    ));

    let ret = backend.invoke("make_point", &[], POINT).expect("invoke");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.index(0).expect("a").get::<i64>().expect("v"), 7);
    assert_eq!(out.index(1).expect("b").get::<String>().expect("v"), "x");
    assert_eq!(out.field("a").expect("by name").get::<i64>().expect("v"), 7);
}

#[test]
fn test_failed_invocation_leaves_the_backend_usable() {
    let backend = EmbeddedBackend::new();
    let overflow = backend
        .datum(type_ids::INT8, Value::from(i64::MAX))
        .expect("datum");
    backend
        .invoke("add_one", &[overflow], type_ids::INT8)
        .expect_err("must fail");

    // the abort is confined to the failed invocation's scope
    let arg = backend
        .datum(type_ids::INT8, Value::from(1i64))
        .expect("datum");
    let ret = backend
        .invoke("add_one", &[arg], type_ids::INT8)
        .expect("next invocation");
    let out = backend.decode_return(&ret).expect("decode");
    assert_eq!(out.get::<i64>().expect("i64"), 2);
}
