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

//! Semantic type classes for NumBridge
//!
//! A [`TypeClass`] is the backend-independent notion of a type. Many native
//! backend type ids map onto few classes; algorithm code only ever sees the
//! class side of that mapping.

use std::fmt;

/// Backend-independent semantic type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeClass {
    /// Boolean true/false
    Bool = 0,

    /// 8-bit signed integer
    Int8 = 1,

    /// 16-bit signed integer
    Int16 = 2,

    /// 32-bit signed integer
    Int32 = 3,

    /// 64-bit signed integer
    Int64 = 4,

    /// 8-bit unsigned integer
    UInt8 = 5,

    /// 16-bit unsigned integer
    UInt16 = 6,

    /// 32-bit unsigned integer
    UInt32 = 7,

    /// 64-bit unsigned integer
    UInt64 = 8,

    /// IEEE 754 single-precision float
    Float32 = 9,

    /// IEEE 754 double-precision float
    Float64 = 10,

    /// UTF-8 text string
    Text = 11,

    /// Opaque byte string
    Bytes = 12,

    /// Homogeneous array with explicit per-dimension bounds
    Array = 13,

    /// Composite record with a fixed, named field schema
    Composite = 14,
}

impl TypeClass {
    /// Returns true if this class is a signed or unsigned integer
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeClass::Int8
                | TypeClass::Int16
                | TypeClass::Int32
                | TypeClass::Int64
                | TypeClass::UInt8
                | TypeClass::UInt16
                | TypeClass::UInt32
                | TypeClass::UInt64
        )
    }

    /// Returns true if this class is numeric (integer or float)
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, TypeClass::Float32 | TypeClass::Float64)
    }

    /// Returns true if this class is a scalar (not an array or composite)
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TypeClass::Array | TypeClass::Composite)
    }

    /// Size in bytes of the native encoding, for fixed-width classes
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            TypeClass::Bool | TypeClass::Int8 | TypeClass::UInt8 => Some(1),
            TypeClass::Int16 | TypeClass::UInt16 => Some(2),
            TypeClass::Int32 | TypeClass::UInt32 | TypeClass::Float32 => Some(4),
            TypeClass::Int64 | TypeClass::UInt64 | TypeClass::Float64 => Some(8),
            TypeClass::Text | TypeClass::Bytes | TypeClass::Array | TypeClass::Composite => None,
        }
    }

    /// Returns true if a value of this class converts losslessly to `target`
    ///
    /// Widening never loses range or signedness: an unsigned class widens
    /// into a strictly larger signed class, a float only into a wider float.
    /// Narrowing is never allowed, even when the particular value would fit.
    pub fn widens_to(&self, target: TypeClass) -> bool {
        use TypeClass::*;
        match self {
            Bool => target == Bool,
            Int8 => matches!(target, Int8 | Int16 | Int32 | Int64),
            Int16 => matches!(target, Int16 | Int32 | Int64),
            Int32 => matches!(target, Int32 | Int64),
            Int64 => target == Int64,
            UInt8 => matches!(target, UInt8 | UInt16 | UInt32 | UInt64 | Int16 | Int32 | Int64),
            UInt16 => matches!(target, UInt16 | UInt32 | UInt64 | Int32 | Int64),
            UInt32 => matches!(target, UInt32 | UInt64 | Int64),
            UInt64 => target == UInt64,
            Float32 => matches!(target, Float32 | Float64),
            Float64 => target == Float64,
            Text => target == Text,
            Bytes => target == Bytes,
            Array => target == Array,
            Composite => target == Composite,
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeClass::Bool => "boolean",
            TypeClass::Int8 => "signed 8-bit integer",
            TypeClass::Int16 => "signed 16-bit integer",
            TypeClass::Int32 => "signed 32-bit integer",
            TypeClass::Int64 => "signed 64-bit integer",
            TypeClass::UInt8 => "unsigned 8-bit integer",
            TypeClass::UInt16 => "unsigned 16-bit integer",
            TypeClass::UInt32 => "unsigned 32-bit integer",
            TypeClass::UInt64 => "unsigned 64-bit integer",
            TypeClass::Float32 => "single-precision float",
            TypeClass::Float64 => "double-precision float",
            TypeClass::Text => "text",
            TypeClass::Bytes => "byte string",
            TypeClass::Array => "array",
            TypeClass::Composite => "composite record",
        };
        write!(f, "{}", name)
    }
}
