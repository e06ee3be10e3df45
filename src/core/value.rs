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

//! Polymorphic value type for NumBridge
//!
//! This module provides [`Value`], the single container through which
//! algorithm code sees database values: arguments coming in, return values
//! going out, and the elements of arrays and composite records in between.
//! A `Value` is one of {Null, Scalar, Array, Composite}; its kind never
//! changes after construction. Values wrapping backend-native bytes decode
//! on first access and cache the decoded form for the rest of their life.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::backend::descriptor::TypeDescriptor;
use crate::backend::registry::TypeRegistry;
use crate::bridge::context::CallContext;

use super::error::{Error, Result};
use super::types::TypeClass;

/// Maximum number of array dimensions
pub const MAX_ARRAY_DIMS: usize = 6;

/// The four kinds a polymorphic value can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// SQL NULL, no payload
    Null,
    /// A single scalar datum
    Scalar,
    /// Homogeneous array with explicit bounds
    Array,
    /// Ordered, named fields
    Composite,
}

/// A decoded scalar datum
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// UTF-8 text (Arc for cheap cloning)
    Text(Arc<str>),
    /// Opaque byte string (Arc for cheap cloning)
    Bytes(Arc<[u8]>),
}

impl Scalar {
    /// Semantic class of this scalar
    pub fn class(&self) -> TypeClass {
        match self {
            Scalar::Bool(_) => TypeClass::Bool,
            Scalar::Int8(_) => TypeClass::Int8,
            Scalar::Int16(_) => TypeClass::Int16,
            Scalar::Int32(_) => TypeClass::Int32,
            Scalar::Int64(_) => TypeClass::Int64,
            Scalar::UInt8(_) => TypeClass::UInt8,
            Scalar::UInt16(_) => TypeClass::UInt16,
            Scalar::UInt32(_) => TypeClass::UInt32,
            Scalar::UInt64(_) => TypeClass::UInt64,
            Scalar::Float32(_) => TypeClass::Float32,
            Scalar::Float64(_) => TypeClass::Float64,
            Scalar::Text(_) => TypeClass::Text,
            Scalar::Bytes(_) => TypeClass::Bytes,
        }
    }

    /// Lossy view as f64, for numeric scalars only
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int8(v) => Some(f64::from(*v)),
            Scalar::Int16(v) => Some(f64::from(*v)),
            Scalar::Int32(v) => Some(f64::from(*v)),
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::UInt8(v) => Some(f64::from(*v)),
            Scalar::UInt16(v) => Some(f64::from(*v)),
            Scalar::UInt32(v) => Some(f64::from(*v)),
            Scalar::UInt64(v) => Some(*v as f64),
            Scalar::Float32(v) => Some(f64::from(*v)),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

/// Bounds of one array dimension
///
/// Arrays carry explicit declared bounds and are not guaranteed to be
/// zero-based. An empty dimension has `upper == lower - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayDim {
    pub lower: i64,
    pub upper: i64,
}

impl ArrayDim {
    /// Create a dimension from declared bounds
    pub fn new(lower: i64, upper: i64) -> Self {
        ArrayDim { lower, upper }
    }

    /// Number of elements along this dimension
    pub fn len(&self) -> usize {
        let len = i128::from(self.upper) - i128::from(self.lower) + 1;
        if len <= 0 {
            0
        } else {
            len as usize
        }
    }

    /// Returns true if this dimension holds no elements
    pub fn is_empty(&self) -> bool {
        self.upper < self.lower
    }
}

/// Decoded array value: same-typed elements plus a shape
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    elem_class: TypeClass,
    dims: SmallVec<[ArrayDim; 2]>,
    /// Row-major elements; `None` is a NULL element
    elements: Vec<Option<Decoded>>,
}

impl ArrayValue {
    /// Create an array from an element class, declared bounds, and elements
    ///
    /// Fails with ShapeMismatch when the element count disagrees with the
    /// shape, when a non-null element has a different class, or when the
    /// shape itself is unusable (no dimensions, too many, negative length).
    pub fn new(
        elem_class: TypeClass,
        dims: impl IntoIterator<Item = ArrayDim>,
        elements: Vec<Option<Decoded>>,
    ) -> Result<Self> {
        let dims: SmallVec<[ArrayDim; 2]> = dims.into_iter().collect();
        if dims.is_empty() {
            return Err(Error::shape_mismatch("array must have at least one dimension"));
        }
        if dims.len() > MAX_ARRAY_DIMS {
            return Err(Error::shape_mismatch(format!(
                "array has {} dimensions, maximum is {}",
                dims.len(),
                MAX_ARRAY_DIMS
            )));
        }
        let mut expected: usize = 1;
        for dim in &dims {
            if i128::from(dim.upper) - i128::from(dim.lower) + 1 < 0 {
                return Err(Error::shape_mismatch(format!(
                    "invalid bounds [{}, {}]",
                    dim.lower, dim.upper
                )));
            }
            expected = expected
                .checked_mul(dim.len())
                .ok_or_else(|| Error::shape_mismatch("array too large"))?;
        }
        if elements.len() != expected {
            return Err(Error::shape_mismatch(format!(
                "shape holds {} elements, got {}",
                expected,
                elements.len()
            )));
        }
        for element in elements.iter().flatten() {
            if element.class() != elem_class {
                return Err(Error::shape_mismatch(format!(
                    "array of {} cannot hold a {} element",
                    elem_class,
                    element.class()
                )));
            }
        }
        Ok(ArrayValue {
            elem_class,
            dims,
            elements,
        })
    }

    /// Semantic class of the elements
    pub fn elem_class(&self) -> TypeClass {
        self.elem_class
    }

    /// Declared bounds, one entry per dimension
    pub fn dims(&self) -> &[ArrayDim] {
        &self.dims
    }

    /// Row-major elements
    pub fn elements(&self) -> &[Option<Decoded>] {
        &self.elements
    }

    /// Total element count across all dimensions
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the array holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Row-major offset of a full subscript, each checked against its
    /// dimension's declared bounds
    fn offset(&self, subscript: &[i64]) -> Result<usize> {
        if subscript.len() != self.dims.len() {
            return Err(Error::shape_mismatch(format!(
                "array has {} dimensions, got {} subscripts",
                self.dims.len(),
                subscript.len()
            )));
        }
        let mut offset: usize = 0;
        for (index, dim) in subscript.iter().zip(self.dims.iter()) {
            if *index < dim.lower || *index > dim.upper {
                return Err(Error::index_out_of_range(*index, dim.lower, dim.upper));
            }
            offset = offset * dim.len() + (index - dim.lower) as usize;
        }
        Ok(offset)
    }
}

/// One field of a composite record
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeField {
    pub name: Arc<str>,
    /// `None` is a NULL field
    pub value: Option<Decoded>,
}

/// Decoded composite record: ordered, named fields
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValue {
    fields: Vec<CompositeField>,
}

impl CompositeValue {
    /// Create a composite record from ordered fields
    pub fn new(fields: Vec<CompositeField>) -> Self {
        CompositeValue { fields }
    }

    /// Ordered fields
    pub fn fields(&self) -> &[CompositeField] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field lookup by name
    pub fn field(&self, name: &str) -> Option<&CompositeField> {
        self.fields.iter().find(|f| f.name.as_ref() == name)
    }
}

/// Fully decoded host representation of a non-null value
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Scalar(Scalar),
    Array(ArrayValue),
    Composite(CompositeValue),
}

impl Decoded {
    /// Kind of this decoded value
    pub fn kind(&self) -> Kind {
        match self {
            Decoded::Scalar(_) => Kind::Scalar,
            Decoded::Array(_) => Kind::Array,
            Decoded::Composite(_) => Kind::Composite,
        }
    }

    /// Semantic class of this decoded value
    pub fn class(&self) -> TypeClass {
        match self {
            Decoded::Scalar(s) => s.class(),
            Decoded::Array(_) => TypeClass::Array,
            Decoded::Composite(_) => TypeClass::Composite,
        }
    }

    /// Human-readable name used in diagnostics
    pub fn kind_name(&self) -> String {
        self.class().to_string()
    }
}

/// A polymorphic database value
///
/// `Value` erases the backend behind one capability interface: algorithm
/// code never branches on backend identity, only on kind. A `Value` either
/// owns a decoded representation, borrows one, or wraps undecoded
/// backend-native bytes that it decodes on first access (at most once; the
/// decoded form is cached for the value's lifetime). The lifetime ties
/// values wrapping backend memory to the invocation that produced them.
pub struct Value<'a> {
    repr: Repr<'a>,
}

enum Repr<'a> {
    /// SQL NULL
    Null,
    /// Owned decoded representation
    Owned(Decoded),
    /// Borrowed view into another value's decoded representation
    Borrowed(&'a Decoded),
    /// Undecoded backend-native bytes plus the machinery to decode them
    Raw {
        bytes: &'a [u8],
        desc: &'a TypeDescriptor,
        registry: &'a TypeRegistry,
        cache: OnceCell<Decoded>,
    },
    /// Lazy view over an invocation's argument list
    Arguments(&'a CallContext<'a>),
}

impl<'a> Value<'a> {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a NULL value
    pub fn null() -> Value<'static> {
        Value { repr: Repr::Null }
    }

    /// Create a value owning an already-decoded representation
    pub fn owned(decoded: Decoded) -> Value<'static> {
        Value {
            repr: Repr::Owned(decoded),
        }
    }

    /// Create a scalar value
    pub fn scalar(scalar: Scalar) -> Value<'static> {
        Value::owned(Decoded::Scalar(scalar))
    }

    /// Wrap undecoded backend-native bytes
    ///
    /// No decoding happens until the value is actually read.
    pub fn from_raw(
        bytes: &'a [u8],
        desc: &'a TypeDescriptor,
        registry: &'a TypeRegistry,
    ) -> Value<'a> {
        Value {
            repr: Repr::Raw {
                bytes,
                desc,
                registry,
                cache: OnceCell::new(),
            },
        }
    }

    /// Wrap an invocation's argument list as a composite-kinded value
    ///
    /// `value.index(i)` yields argument `i`, wrapped lazily.
    pub fn arguments(ctx: &'a CallContext<'a>) -> Value<'a> {
        Value {
            repr: Repr::Arguments(ctx),
        }
    }

    /// Create an array value from an element class, bounds, and elements
    pub fn array(
        elem_class: TypeClass,
        dims: impl IntoIterator<Item = ArrayDim>,
        elements: Vec<Option<Decoded>>,
    ) -> Result<Value<'static>> {
        Ok(Value::owned(Decoded::Array(ArrayValue::new(
            elem_class, dims, elements,
        )?)))
    }

    /// Create a one-dimensional, 1-based float64 vector
    pub fn vector(values: impl IntoIterator<Item = f64>) -> Result<Value<'static>> {
        let elements: Vec<Option<Decoded>> = values
            .into_iter()
            .map(|v| Some(Decoded::Scalar(Scalar::Float64(v))))
            .collect();
        let upper = elements.len() as i64;
        Value::array(TypeClass::Float64, [ArrayDim::new(1, upper)], elements)
    }

    /// Create a composite record from named values
    pub fn composite<N: Into<Arc<str>>>(
        fields: impl IntoIterator<Item = (N, Value<'static>)>,
    ) -> Result<Value<'static>> {
        let mut out = Vec::new();
        for (name, value) in fields {
            out.push(CompositeField {
                name: name.into(),
                value: value.into_decoded()?,
            });
        }
        Ok(Value::owned(Decoded::Composite(CompositeValue::new(out))))
    }

    // =========================================================================
    // Kind and nullability
    // =========================================================================

    /// Kind of this value; fixed at construction, known without decoding
    pub fn kind(&self) -> Kind {
        match &self.repr {
            Repr::Null => Kind::Null,
            Repr::Owned(d) => d.kind(),
            Repr::Borrowed(d) => d.kind(),
            Repr::Raw { desc, .. } => match desc.class {
                TypeClass::Array => Kind::Array,
                TypeClass::Composite => Kind::Composite,
                _ => Kind::Scalar,
            },
            Repr::Arguments(_) => Kind::Composite,
        }
    }

    /// Returns true if this value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    // =========================================================================
    // Scalar access
    // =========================================================================

    /// Extract this value as a host scalar type
    ///
    /// Fails with TypeMismatch when the kind disagrees or the stored class
    /// does not widen losslessly into `T`. The first extraction from a
    /// raw-wrapped value decodes the native bytes; the decoded form is
    /// cached, so repeated reads decode at most once.
    pub fn get<T: FromValue>(&self) -> Result<T> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch(T::EXPECTED, "NULL")),
            Repr::Arguments(_) => Err(Error::type_mismatch(T::EXPECTED, "argument tuple")),
            _ => T::from_decoded(self.decoded()?),
        }
    }

    // =========================================================================
    // Array and composite access
    // =========================================================================

    /// Number of items reachable by `index`: total elements of an array,
    /// fields of a composite, arguments of an argument tuple
    pub fn len(&self) -> Result<usize> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch("an array or composite record", "NULL")),
            Repr::Arguments(ctx) => Ok(ctx.argument_count()),
            _ => match self.decoded()? {
                Decoded::Array(a) => Ok(a.len()),
                Decoded::Composite(c) => Ok(c.len()),
                Decoded::Scalar(s) => Err(Error::type_mismatch(
                    "an array or composite record",
                    s.class().to_string(),
                )),
            },
        }
    }

    /// Returns true if `len()` is zero
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Index into an array, composite record, or argument tuple
    ///
    /// Arrays index by their declared bounds (a `[3, 5]` array accepts 3, 4
    /// and 5); composites and argument tuples index by zero-based position.
    /// Multi-dimensional arrays are subscripted with [`Value::element`].
    pub fn index(&self, index: i64) -> Result<Value<'_>> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch("an array or composite record", "NULL")),
            Repr::Arguments(ctx) => {
                let count = ctx.argument_count() as i64;
                if index < 0 || index >= count {
                    return Err(Error::index_out_of_range(index, 0, count - 1));
                }
                ctx.argument(index as usize)
            }
            _ => match self.decoded()? {
                Decoded::Array(a) => {
                    if a.dims().len() != 1 {
                        return Err(Error::type_mismatch(
                            "a one-dimensional array",
                            format!("{}-dimensional array", a.dims().len()),
                        ));
                    }
                    let offset = a.offset(&[index])?;
                    Ok(Value::of_element(&a.elements()[offset]))
                }
                Decoded::Composite(c) => {
                    let count = c.len() as i64;
                    if index < 0 || index >= count {
                        return Err(Error::index_out_of_range(index, 0, count - 1));
                    }
                    Ok(Value::of_element(&c.fields()[index as usize].value))
                }
                Decoded::Scalar(s) => Err(Error::type_mismatch(
                    "an array or composite record",
                    s.class().to_string(),
                )),
            },
        }
    }

    /// Subscript a (possibly multi-dimensional) array, one subscript per
    /// dimension, each checked against that dimension's declared bounds
    pub fn element(&self, subscript: &[i64]) -> Result<Value<'_>> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch("an array", "NULL")),
            Repr::Arguments(_) => Err(Error::type_mismatch("an array", "argument tuple")),
            _ => match self.decoded()? {
                Decoded::Array(a) => {
                    let offset = a.offset(subscript)?;
                    Ok(Value::of_element(&a.elements()[offset]))
                }
                other => Err(Error::type_mismatch("an array", other.kind_name())),
            },
        }
    }

    /// Access a composite record's field by name
    pub fn field(&self, name: &str) -> Result<Value<'_>> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch("a composite record", "NULL")),
            Repr::Arguments(_) => Err(Error::type_mismatch(
                "a composite record with named fields",
                "argument tuple",
            )),
            _ => match self.decoded()? {
                Decoded::Composite(c) => match c.field(name) {
                    Some(field) => Ok(Value::of_element(&field.value)),
                    None => Err(Error::FieldNotFound(name.to_string())),
                },
                other => Err(Error::type_mismatch("a composite record", other.kind_name())),
            },
        }
    }

    /// Declared bounds of an array value
    pub fn array_dims(&self) -> Result<SmallVec<[ArrayDim; 2]>> {
        match &self.repr {
            Repr::Null => Err(Error::type_mismatch("an array", "NULL")),
            Repr::Arguments(_) => Err(Error::type_mismatch("an array", "argument tuple")),
            _ => match self.decoded()? {
                Decoded::Array(a) => Ok(a.dims().iter().copied().collect()),
                other => Err(Error::type_mismatch("an array", other.kind_name())),
            },
        }
    }

    // =========================================================================
    // Ownership
    // =========================================================================

    /// Deep-copy into a value independent of backend memory
    ///
    /// Values derived from the call record borrow the backend's
    /// per-invocation allocation scope; anything that must outlive the
    /// invocation goes through here.
    pub fn into_owned(self) -> Result<Value<'static>> {
        match self.into_decoded()? {
            None => Ok(Value::null()),
            Some(d) => Ok(Value::owned(d)),
        }
    }

    /// Consume into the decoded representation; `None` is SQL NULL
    pub fn into_decoded(self) -> Result<Option<Decoded>> {
        match self.repr {
            Repr::Null => Ok(None),
            Repr::Owned(d) => Ok(Some(d)),
            Repr::Borrowed(d) => Ok(Some(d.clone())),
            Repr::Raw {
                bytes,
                desc,
                registry,
                cache,
            } => match cache.into_inner() {
                Some(d) => Ok(Some(d)),
                None => {
                    let convert = registry.converter_for(desc);
                    Ok(Some((convert.decode)(registry, desc, bytes)?))
                }
            },
            Repr::Arguments(ctx) => {
                let mut fields = Vec::new();
                fields.try_reserve(ctx.argument_count())?;
                for i in 0..ctx.argument_count() {
                    let name: Arc<str> = Arc::from(format!("arg{}", i).as_str());
                    fields.push(CompositeField {
                        name,
                        value: ctx.argument(i)?.into_decoded()?,
                    });
                }
                Ok(Some(Decoded::Composite(CompositeValue::new(fields))))
            }
        }
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Borrowed view of the decoded representation, decoding raw bytes on
    /// first use (idempotent; at most one decode per value)
    fn decoded(&self) -> Result<&Decoded> {
        match &self.repr {
            Repr::Owned(d) => Ok(d),
            Repr::Borrowed(d) => Ok(d),
            Repr::Raw {
                bytes,
                desc,
                registry,
                cache,
            } => {
                if let Some(d) = cache.get() {
                    return Ok(d);
                }
                let convert = registry.converter_for(desc);
                let decoded = (convert.decode)(registry, desc, bytes)?;
                Ok(cache.get_or_init(|| decoded))
            }
            Repr::Null => Err(Error::type_mismatch("a non-null value", "NULL")),
            Repr::Arguments(_) => Err(Error::type_mismatch(
                "a materialized value",
                "argument tuple",
            )),
        }
    }

    fn of_element(element: &Option<Decoded>) -> Value<'_> {
        match element {
            None => Value::null(),
            Some(d) => Value {
                repr: Repr::Borrowed(d),
            },
        }
    }
}

// Hand-rolled so undecoded values print without forcing a decode.
impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Null => write!(f, "Value(NULL)"),
            Repr::Owned(d) => write!(f, "Value({:?})", d),
            Repr::Borrowed(d) => write!(f, "Value(&{:?})", d),
            Repr::Raw { desc, cache, .. } => match cache.get() {
                Some(d) => write!(f, "Value({:?})", d),
                None => write!(f, "Value(<undecoded {}>)", desc.name),
            },
            Repr::Arguments(ctx) => {
                write!(f, "Value(<{} arguments>)", ctx.argument_count())
            }
        }
    }
}

// =============================================================================
// Host-literal conversions
// =============================================================================

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value<'static> {
                fn from(v: $ty) -> Self {
                    Value::scalar(Scalar::$variant(v))
                }
            }
        )+
    };
}

impl_value_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl From<&str> for Value<'static> {
    fn from(v: &str) -> Self {
        Value::scalar(Scalar::Text(Arc::from(v)))
    }
}

impl From<String> for Value<'static> {
    fn from(v: String) -> Self {
        Value::scalar(Scalar::Text(Arc::from(v.as_str())))
    }
}

impl From<Vec<u8>> for Value<'static> {
    fn from(v: Vec<u8>) -> Self {
        Value::scalar(Scalar::Bytes(Arc::from(v.as_slice())))
    }
}

// =============================================================================
// Scalar extraction
// =============================================================================

/// Host types extractable from a [`Value`]
///
/// Extraction is strict: the stored class must widen losslessly into the
/// requested type, otherwise TypeMismatch.
pub trait FromValue: Sized {
    /// Class name used in TypeMismatch diagnostics
    const EXPECTED: &'static str;

    fn from_decoded(decoded: &Decoded) -> Result<Self>;
}

macro_rules! impl_from_value_numeric {
    ($ty:ty, $expected:expr, [$($variant:ident),+]) => {
        impl FromValue for $ty {
            const EXPECTED: &'static str = $expected;

            fn from_decoded(decoded: &Decoded) -> Result<Self> {
                match decoded {
                    $(Decoded::Scalar(Scalar::$variant(v)) => Ok(*v as $ty),)+
                    other => Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
                }
            }
        }
    };
}

impl_from_value_numeric!(i8, "a signed 8-bit integer", [Int8]);
impl_from_value_numeric!(i16, "a signed 16-bit integer", [Int8, Int16, UInt8]);
impl_from_value_numeric!(i32, "a signed 32-bit integer", [Int8, Int16, Int32, UInt8, UInt16]);
impl_from_value_numeric!(
    i64,
    "a signed 64-bit integer",
    [Int8, Int16, Int32, Int64, UInt8, UInt16, UInt32]
);
impl_from_value_numeric!(u8, "an unsigned 8-bit integer", [UInt8]);
impl_from_value_numeric!(u16, "an unsigned 16-bit integer", [UInt8, UInt16]);
impl_from_value_numeric!(u32, "an unsigned 32-bit integer", [UInt8, UInt16, UInt32]);
impl_from_value_numeric!(
    u64,
    "an unsigned 64-bit integer",
    [UInt8, UInt16, UInt32, UInt64]
);
impl_from_value_numeric!(f32, "a single-precision float", [Float32]);
impl_from_value_numeric!(f64, "a double-precision float", [Float32, Float64]);

impl FromValue for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_decoded(decoded: &Decoded) -> Result<Self> {
        match decoded {
            Decoded::Scalar(Scalar::Bool(v)) => Ok(*v),
            other => Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_decoded(decoded: &Decoded) -> Result<Self> {
        match decoded {
            Decoded::Scalar(Scalar::Text(s)) => Ok(s.to_string()),
            other => Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
        }
    }
}

impl FromValue for Arc<str> {
    const EXPECTED: &'static str = "text";

    fn from_decoded(decoded: &Decoded) -> Result<Self> {
        match decoded {
            Decoded::Scalar(Scalar::Text(s)) => Ok(Arc::clone(s)),
            other => Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
        }
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "a byte string";

    fn from_decoded(decoded: &Decoded) -> Result<Self> {
        match decoded {
            Decoded::Scalar(Scalar::Bytes(b)) => Ok(b.to_vec()),
            other => Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
        }
    }
}

/// Dense numeric vector view of a one-dimensional numeric array
impl FromValue for Vec<f64> {
    const EXPECTED: &'static str = "a numeric array";

    fn from_decoded(decoded: &Decoded) -> Result<Self> {
        let array = match decoded {
            Decoded::Array(a) if a.elem_class().is_numeric() => a,
            other => return Err(Error::type_mismatch(Self::EXPECTED, other.kind_name())),
        };
        let mut out = Vec::new();
        out.try_reserve(array.len())?;
        for element in array.elements() {
            match element {
                Some(Decoded::Scalar(s)) => match s.as_f64() {
                    Some(v) => out.push(v),
                    None => {
                        return Err(Error::type_mismatch(
                            Self::EXPECTED,
                            s.class().to_string(),
                        ))
                    }
                },
                _ => {
                    return Err(Error::type_mismatch(
                        "a numeric array without NULL elements",
                        "array containing NULL",
                    ))
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_elements(values: &[i64]) -> Vec<Option<Decoded>> {
        values
            .iter()
            .map(|v| Some(Decoded::Scalar(Scalar::Int64(*v))))
            .collect()
    }

    #[test]
    fn test_null_has_no_payload() {
        let v = Value::null();
        assert!(v.is_null());
        assert_eq!(v.kind(), Kind::Null);
        assert!(matches!(
            v.get::<i64>(),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(v.index(0), Err(Error::TypeMismatch { .. })));
        assert!(matches!(v.field("a"), Err(Error::TypeMismatch { .. })));
        assert!(matches!(v.len(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_scalar_widening() {
        let v = Value::from(7i16);
        assert_eq!(v.get::<i16>().expect("exact"), 7);
        assert_eq!(v.get::<i64>().expect("widened"), 7);
        assert!(matches!(v.get::<i8>(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(v.get::<u16>(), Err(Error::TypeMismatch { .. })));

        let v = Value::from(200u8);
        assert_eq!(v.get::<i16>().expect("unsigned into larger signed"), 200);
        assert_eq!(v.get::<u64>().expect("unsigned widening"), 200);

        let v = Value::from(1.5f32);
        assert_eq!(v.get::<f64>().expect("float widening"), 1.5);
        let v = Value::from(1.5f64);
        assert!(matches!(v.get::<f32>(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_array_declared_bounds() {
        let v = Value::array(
            TypeClass::Int64,
            [ArrayDim::new(3, 5)],
            int_elements(&[30, 40, 50]),
        )
        .expect("array");

        assert_eq!(v.kind(), Kind::Array);
        assert_eq!(v.len().expect("len"), 3);
        for (i, want) in [(3, 30), (4, 40), (5, 50)] {
            assert_eq!(v.index(i).expect("in bounds").get::<i64>().expect("elem"), want);
        }
        assert!(matches!(
            v.index(2),
            Err(Error::IndexOutOfRange { index: 2, lower: 3, upper: 5 })
        ));
        assert!(matches!(
            v.index(6),
            Err(Error::IndexOutOfRange { index: 6, lower: 3, upper: 5 })
        ));
    }

    #[test]
    fn test_array_null_element() {
        let mut elements = int_elements(&[1, 2]);
        elements.insert(1, None);
        let v = Value::array(TypeClass::Int64, [ArrayDim::new(1, 3)], elements).expect("array");
        assert!(v.index(2).expect("null element").is_null());
        assert!(!v.index(1).expect("non-null").is_null());
    }

    #[test]
    fn test_array_shape_validation() {
        // count disagrees with bounds
        assert!(matches!(
            Value::array(TypeClass::Int64, [ArrayDim::new(1, 3)], int_elements(&[1])),
            Err(Error::ShapeMismatch(_))
        ));
        // heterogeneous element
        assert!(matches!(
            Value::array(
                TypeClass::Float64,
                [ArrayDim::new(1, 1)],
                int_elements(&[1]),
            ),
            Err(Error::ShapeMismatch(_))
        ));
        // no dimensions
        assert!(matches!(
            Value::array(TypeClass::Int64, [], vec![]),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_multi_dimensional_element() {
        // 2x3 matrix with declared bounds [1,2] x [4,6], row-major
        let elements = int_elements(&[11, 12, 13, 21, 22, 23]);
        let v = Value::array(
            TypeClass::Int64,
            [ArrayDim::new(1, 2), ArrayDim::new(4, 6)],
            elements,
        )
        .expect("matrix");

        assert_eq!(v.element(&[1, 4]).expect("a11").get::<i64>().expect("v"), 11);
        assert_eq!(v.element(&[2, 6]).expect("a23").get::<i64>().expect("v"), 23);
        assert!(matches!(
            v.element(&[1, 7]),
            Err(Error::IndexOutOfRange { index: 7, lower: 4, upper: 6 })
        ));
        assert!(matches!(
            v.element(&[0, 4]),
            Err(Error::IndexOutOfRange { index: 0, lower: 1, upper: 2 })
        ));
        // single-subscript access to a matrix is a kind error, not a flatten
        assert!(matches!(v.index(1), Err(Error::TypeMismatch { .. })));
        // subscript arity must match
        assert!(matches!(v.element(&[1]), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn test_composite_access() {
        let v = Value::composite([("a", Value::from(7i64)), ("b", Value::from("x"))])
            .expect("composite");
        assert_eq!(v.kind(), Kind::Composite);
        assert_eq!(v.len().expect("len"), 2);
        assert_eq!(v.index(0).expect("a").get::<i64>().expect("v"), 7);
        assert_eq!(v.index(1).expect("b").get::<String>().expect("v"), "x");
        assert_eq!(v.field("b").expect("by name").get::<String>().expect("v"), "x");
        assert!(matches!(v.field("c"), Err(Error::FieldNotFound(_))));
        assert!(matches!(
            v.index(2),
            Err(Error::IndexOutOfRange { index: 2, lower: 0, upper: 1 })
        ));
    }

    #[test]
    fn test_vector_constructor_is_one_based() {
        let v = Value::vector([1.0, 2.5, 4.0]).expect("vector");
        let dims = v.array_dims().expect("dims");
        assert_eq!(dims.len(), 1);
        assert_eq!((dims[0].lower, dims[0].upper), (1, 3));
        assert_eq!(v.get::<Vec<f64>>().expect("dense"), vec![1.0, 2.5, 4.0]);
    }

    #[test]
    fn test_into_owned_detaches() {
        let v = Value::composite([("a", Value::from(1i64))]).expect("composite");
        let owned = v.into_owned().expect("owned");
        assert_eq!(owned.index(0).expect("a").get::<i64>().expect("v"), 1);
    }
}
