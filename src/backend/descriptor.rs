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

//! Backend type descriptors
//!
//! A [`TypeDescriptor`] is the backend's runtime notion of one of its types:
//! its catalog id, whether it is fixed- or variable-length, whether it is
//! passed by value, and how it maps onto a semantic [`TypeClass`]. Many
//! native ids map onto few classes. Descriptors live in the
//! [`TypeRegistry`](super::registry::TypeRegistry), are populated once at
//! backend startup, and are read-only afterwards.

use std::fmt;
use std::sync::Arc;

use crate::core::types::TypeClass;

/// Backend catalog identifier of a native type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeTypeId(pub u32);

impl fmt::Display for NativeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-the-wire length discipline of a native type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLength {
    /// Always exactly this many bytes
    Fixed(usize),
    /// Length determined per datum
    Variable,
}

/// One field of a composite type's schema
///
/// Field names live in the catalog, not on the wire; the descriptor is the
/// authority for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Arc<str>,
    pub type_id: NativeTypeId,
}

impl FieldDef {
    pub fn new(name: impl Into<Arc<str>>, type_id: NativeTypeId) -> Self {
        FieldDef {
            name: name.into(),
            type_id,
        }
    }
}

/// The backend's runtime description of one native type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Catalog id the backend reports in call records
    pub type_id: NativeTypeId,
    /// Catalog name, used in diagnostics
    pub name: Arc<str>,
    /// Semantic class the id maps onto
    pub class: TypeClass,
    /// Fixed- or variable-length wire form
    pub length: TypeLength,
    /// Passed by value (small fixed-width) rather than by reference
    pub by_value: bool,
    /// Element type, for array descriptors
    pub element: Option<NativeTypeId>,
    /// Ordered field schema, for composite descriptors
    pub fields: Vec<FieldDef>,
}

impl TypeDescriptor {
    /// Describe a scalar type; length and pass-by-value follow the class
    pub fn scalar(type_id: NativeTypeId, name: impl Into<Arc<str>>, class: TypeClass) -> Self {
        let length = match class.fixed_size() {
            Some(n) => TypeLength::Fixed(n),
            None => TypeLength::Variable,
        };
        TypeDescriptor {
            type_id,
            name: name.into(),
            class,
            length,
            by_value: matches!(length, TypeLength::Fixed(n) if n <= 8),
            element: None,
            fields: Vec::new(),
        }
    }

    /// Describe an array type over the given element type
    pub fn array(type_id: NativeTypeId, name: impl Into<Arc<str>>, element: NativeTypeId) -> Self {
        TypeDescriptor {
            type_id,
            name: name.into(),
            class: TypeClass::Array,
            length: TypeLength::Variable,
            by_value: false,
            element: Some(element),
            fields: Vec::new(),
        }
    }

    /// Describe a composite type with a fixed, named field schema
    pub fn composite(
        type_id: NativeTypeId,
        name: impl Into<Arc<str>>,
        fields: Vec<FieldDef>,
    ) -> Self {
        TypeDescriptor {
            type_id,
            name: name.into(),
            class: TypeClass::Composite,
            length: TypeLength::Variable,
            by_value: false,
            element: None,
            fields,
        }
    }
}

/// Catalog ids of the embedded backend's builtin types
///
/// Scalar and array ids follow the SQL catalog numbering the original
/// connector targets; types that catalog lacks (the unsigned widths and the
/// 1-byte signed integer) use private ids above 16384.
pub mod type_ids {
    use super::NativeTypeId;

    pub const BOOL: NativeTypeId = NativeTypeId(16);
    pub const BYTEA: NativeTypeId = NativeTypeId(17);
    pub const INT8: NativeTypeId = NativeTypeId(20);
    pub const INT2: NativeTypeId = NativeTypeId(21);
    pub const INT4: NativeTypeId = NativeTypeId(23);
    pub const TEXT: NativeTypeId = NativeTypeId(25);
    pub const FLOAT4: NativeTypeId = NativeTypeId(700);
    pub const FLOAT8: NativeTypeId = NativeTypeId(701);

    pub const BOOL_ARRAY: NativeTypeId = NativeTypeId(1000);
    pub const BYTEA_ARRAY: NativeTypeId = NativeTypeId(1001);
    pub const INT2_ARRAY: NativeTypeId = NativeTypeId(1005);
    pub const INT4_ARRAY: NativeTypeId = NativeTypeId(1007);
    pub const TEXT_ARRAY: NativeTypeId = NativeTypeId(1009);
    pub const INT8_ARRAY: NativeTypeId = NativeTypeId(1016);
    pub const FLOAT4_ARRAY: NativeTypeId = NativeTypeId(1021);
    pub const FLOAT8_ARRAY: NativeTypeId = NativeTypeId(1022);

    pub const INT1: NativeTypeId = NativeTypeId(16385);
    pub const UINT1: NativeTypeId = NativeTypeId(16386);
    pub const UINT2: NativeTypeId = NativeTypeId(16387);
    pub const UINT4: NativeTypeId = NativeTypeId(16388);
    pub const UINT8: NativeTypeId = NativeTypeId(16389);
    pub const UINT8_ARRAY: NativeTypeId = NativeTypeId(16390);
}
