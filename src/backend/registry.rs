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

//! Backend type registry
//!
//! Maps native catalog type ids to [`TypeDescriptor`]s and hands out the
//! decode/encode pair for a descriptor. A registry is populated once when
//! the backend connector starts and is read-only for the rest of the
//! process; it may be incomplete — an id nothing ever touches is fine, an
//! unmapped id is a hard failure at its first use.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::core::error::{Error, Result};
use crate::core::types::TypeClass;
use crate::core::value::Decoded;

use super::codec;
use super::descriptor::{type_ids, NativeTypeId, TypeDescriptor};

/// Registry of the backend's native types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_id: FxHashMap<NativeTypeId, TypeDescriptor>,
}

/// Decode/encode pair for one descriptor
///
/// Both sides take the registry so array element types and composite field
/// types resolve through the same catalog.
#[derive(Clone, Copy)]
pub struct Converter {
    pub decode: fn(&TypeRegistry, &TypeDescriptor, &[u8]) -> Result<Decoded>,
    pub encode: fn(&TypeRegistry, &TypeDescriptor, &Decoded) -> Result<Vec<u8>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        TypeRegistry {
            by_id: FxHashMap::default(),
        }
    }

    /// Create a registry pre-populated with the builtin catalog
    pub fn with_builtins() -> Self {
        let mut registry = TypeRegistry::new();
        registry.register_builtins();
        registry
    }

    /// Shared read-only instance of the builtin catalog
    pub fn builtin() -> &'static TypeRegistry {
        static BUILTIN: OnceLock<TypeRegistry> = OnceLock::new();
        BUILTIN.get_or_init(TypeRegistry::with_builtins)
    }

    /// Register a descriptor; startup-time only
    pub fn register(&mut self, desc: TypeDescriptor) {
        self.by_id.insert(desc.type_id, desc);
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no types are registered
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Look up the descriptor for a native type id
    ///
    /// Fails with UnknownType when the backend reports an id this registry
    /// has no mapping for.
    pub fn describe(&self, type_id: NativeTypeId) -> Result<&TypeDescriptor> {
        self.by_id
            .get(&type_id)
            .ok_or(Error::UnknownType(type_id.0))
    }

    /// Conversion pair for a descriptor
    pub fn converter_for(&self, desc: &TypeDescriptor) -> Converter {
        match desc.class {
            TypeClass::Array => Converter {
                decode: codec::decode_array,
                encode: codec::encode_array,
            },
            TypeClass::Composite => Converter {
                decode: codec::decode_composite,
                encode: codec::encode_composite,
            },
            _ => Converter {
                decode: codec::decode_scalar,
                encode: codec::encode_scalar,
            },
        }
    }

    fn register_builtins(&mut self) {
        use TypeClass::*;

        let scalars = [
            (type_ids::BOOL, "bool", Bool),
            (type_ids::BYTEA, "bytea", Bytes),
            (type_ids::INT8, "int8", Int64),
            (type_ids::INT2, "int2", Int16),
            (type_ids::INT4, "int4", Int32),
            (type_ids::TEXT, "text", Text),
            (type_ids::FLOAT4, "float4", Float32),
            (type_ids::FLOAT8, "float8", Float64),
            (type_ids::INT1, "int1", Int8),
            (type_ids::UINT1, "uint1", UInt8),
            (type_ids::UINT2, "uint2", UInt16),
            (type_ids::UINT4, "uint4", UInt32),
            (type_ids::UINT8, "uint8", UInt64),
        ];
        for (id, name, class) in scalars {
            self.register(TypeDescriptor::scalar(id, name, class));
        }

        let arrays = [
            (type_ids::BOOL_ARRAY, "bool[]", type_ids::BOOL),
            (type_ids::BYTEA_ARRAY, "bytea[]", type_ids::BYTEA),
            (type_ids::INT2_ARRAY, "int2[]", type_ids::INT2),
            (type_ids::INT4_ARRAY, "int4[]", type_ids::INT4),
            (type_ids::TEXT_ARRAY, "text[]", type_ids::TEXT),
            (type_ids::INT8_ARRAY, "int8[]", type_ids::INT8),
            (type_ids::FLOAT4_ARRAY, "float4[]", type_ids::FLOAT4),
            (type_ids::FLOAT8_ARRAY, "float8[]", type_ids::FLOAT8),
            (type_ids::UINT8_ARRAY, "uint8[]", type_ids::UINT8),
        ];
        for (id, name, element) in arrays {
            self.register(TypeDescriptor::array(id, name, element));
        }

        tracing::debug!(types = self.by_id.len(), "populated builtin type catalog");
    }
}
