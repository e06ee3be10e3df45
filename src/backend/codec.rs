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

//! Native-format conversion routines
//!
//! Decoding turns backend-native bytes into the host representation
//! ([`Decoded`]); encoding is the exact inverse. The wire layout:
//!
//! - fixed-width scalars: little-endian, exactly `fixed_size()` bytes;
//!   bool is one byte, 0 or 1
//! - text: raw UTF-8; bytea: raw bytes
//! - array: `u8` ndim, then per dimension `i64` lower and `i64` upper
//!   bound, then `u32` element type id, then row-major elements, each a
//!   `u8` null flag followed (when non-null) by a `u32` length and the
//!   element bytes. A zero-element array still carries one dimension.
//! - composite: `u32` field count, then per field a `u32` type id, a `u8`
//!   null flag, and (when non-null) a `u32` length and the field bytes.
//!   Field names come from the catalog schema, not the wire.
//!
//! Encoding rejects host values whose shape disagrees with the target
//! descriptor; scalar encoding accepts lossless widening only.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::core::error::{Error, Result};
use crate::core::types::TypeClass;
use crate::core::value::{
    ArrayDim, ArrayValue, CompositeField, CompositeValue, Decoded, Scalar, MAX_ARRAY_DIMS,
};

use super::descriptor::{NativeTypeId, TypeDescriptor};
use super::registry::TypeRegistry;

/// Nesting bound for arrays-of-arrays and composites-of-composites; a
/// catalog cycle would otherwise recurse forever
const MAX_VALUE_NESTING: usize = 32;

// =============================================================================
// Entry points
// =============================================================================

/// Decode one native datum against its descriptor
pub fn decode(registry: &TypeRegistry, desc: &TypeDescriptor, bytes: &[u8]) -> Result<Decoded> {
    decode_at(registry, desc, bytes, 0)
}

/// Encode one host value into the native form of the target descriptor
pub fn encode(registry: &TypeRegistry, desc: &TypeDescriptor, value: &Decoded) -> Result<Vec<u8>> {
    encode_at(registry, desc, value, 0)
}

pub fn decode_scalar(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
) -> Result<Decoded> {
    let _ = registry;
    let scalar = match desc.class {
        TypeClass::Bool => match bytes {
            [0] => Scalar::Bool(false),
            [1] => Scalar::Bool(true),
            _ => {
                return Err(Error::malformed(format!(
                    "{} datum is not a valid boolean",
                    desc.name
                )))
            }
        },
        TypeClass::Int8 => Scalar::Int8(i8::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Int16 => Scalar::Int16(i16::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Int32 => Scalar::Int32(i32::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Int64 => Scalar::Int64(i64::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::UInt8 => Scalar::UInt8(u8::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::UInt16 => Scalar::UInt16(u16::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::UInt32 => Scalar::UInt32(u32::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::UInt64 => Scalar::UInt64(u64::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Float32 => Scalar::Float32(f32::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Float64 => Scalar::Float64(f64::from_le_bytes(fixed(desc, bytes)?)),
        TypeClass::Text => match std::str::from_utf8(bytes) {
            Ok(s) => Scalar::Text(Arc::from(s)),
            Err(_) => {
                return Err(Error::malformed(format!(
                    "{} datum is not valid UTF-8",
                    desc.name
                )))
            }
        },
        TypeClass::Bytes => Scalar::Bytes(Arc::from(bytes)),
        TypeClass::Array | TypeClass::Composite => {
            return Err(Error::malformed(format!(
                "{} is not a scalar type",
                desc.name
            )))
        }
    };
    Ok(Decoded::Scalar(scalar))
}

pub fn encode_scalar(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
) -> Result<Vec<u8>> {
    let _ = registry;
    let scalar = match value {
        Decoded::Scalar(s) => s,
        other => {
            return Err(Error::shape_mismatch(format!(
                "cannot encode {} as {}",
                other.kind_name(),
                desc.name
            )))
        }
    };
    let widened = widen(scalar, desc.class).ok_or_else(|| {
        Error::shape_mismatch(format!(
            "cannot encode {} as {}",
            scalar.class(),
            desc.name
        ))
    })?;
    Ok(match widened {
        Scalar::Bool(v) => vec![u8::from(v)],
        Scalar::Int8(v) => v.to_le_bytes().to_vec(),
        Scalar::Int16(v) => v.to_le_bytes().to_vec(),
        Scalar::Int32(v) => v.to_le_bytes().to_vec(),
        Scalar::Int64(v) => v.to_le_bytes().to_vec(),
        Scalar::UInt8(v) => v.to_le_bytes().to_vec(),
        Scalar::UInt16(v) => v.to_le_bytes().to_vec(),
        Scalar::UInt32(v) => v.to_le_bytes().to_vec(),
        Scalar::UInt64(v) => v.to_le_bytes().to_vec(),
        Scalar::Float32(v) => v.to_le_bytes().to_vec(),
        Scalar::Float64(v) => v.to_le_bytes().to_vec(),
        Scalar::Text(s) => s.as_bytes().to_vec(),
        Scalar::Bytes(b) => b.to_vec(),
    })
}

pub fn decode_array(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
) -> Result<Decoded> {
    decode_array_at(registry, desc, bytes, 0)
}

pub fn encode_array(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
) -> Result<Vec<u8>> {
    encode_array_at(registry, desc, value, 0)
}

pub fn decode_composite(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
) -> Result<Decoded> {
    decode_composite_at(registry, desc, bytes, 0)
}

pub fn encode_composite(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
) -> Result<Vec<u8>> {
    encode_composite_at(registry, desc, value, 0)
}

// =============================================================================
// Decoding
// =============================================================================

fn decode_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
    depth: usize,
) -> Result<Decoded> {
    match desc.class {
        TypeClass::Array => decode_array_at(registry, desc, bytes, depth),
        TypeClass::Composite => decode_composite_at(registry, desc, bytes, depth),
        _ => decode_scalar(registry, desc, bytes),
    }
}

fn decode_array_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
    depth: usize,
) -> Result<Decoded> {
    check_depth(desc, depth)?;
    let elem_desc = element_descriptor(registry, desc)?;
    let mut r = Reader::new(desc, bytes);

    let ndim = r.read_u8()? as usize;
    if ndim == 0 || ndim > MAX_ARRAY_DIMS {
        return Err(Error::malformed(format!(
            "{} datum declares {} dimensions",
            desc.name, ndim
        )));
    }
    let mut dims: SmallVec<[ArrayDim; 2]> = SmallVec::new();
    let mut count: usize = 1;
    for _ in 0..ndim {
        let lower = r.read_i64()?;
        let upper = r.read_i64()?;
        if i128::from(upper) - i128::from(lower) + 1 < 0 {
            return Err(Error::malformed(format!(
                "{} datum declares bounds [{}, {}]",
                desc.name, lower, upper
            )));
        }
        let dim = ArrayDim::new(lower, upper);
        count = count
            .checked_mul(dim.len())
            .ok_or_else(|| Error::malformed(format!("{} datum is too large", desc.name)))?;
        dims.push(dim);
    }

    let wire_elem = NativeTypeId(r.read_u32()?);
    if wire_elem != elem_desc.type_id {
        return Err(Error::malformed(format!(
            "{} datum carries element type {}, catalog says {}",
            desc.name, wire_elem, elem_desc.type_id
        )));
    }

    // each element costs at least its null flag
    if r.remaining() < count {
        return Err(r.truncated());
    }
    let mut elements: Vec<Option<Decoded>> = Vec::new();
    elements.try_reserve(count)?;
    for _ in 0..count {
        elements.push(r.read_element(registry, elem_desc, depth)?);
    }
    r.finish()?;

    Ok(Decoded::Array(ArrayValue::new(
        elem_desc.class,
        dims,
        elements,
    )?))
}

fn decode_composite_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    bytes: &[u8],
    depth: usize,
) -> Result<Decoded> {
    check_depth(desc, depth)?;
    let mut r = Reader::new(desc, bytes);

    let nfields = r.read_u32()? as usize;
    if nfields != desc.fields.len() {
        return Err(Error::malformed(format!(
            "{} datum carries {} fields, schema has {}",
            desc.name,
            nfields,
            desc.fields.len()
        )));
    }
    let mut fields: Vec<CompositeField> = Vec::new();
    fields.try_reserve(nfields)?;
    for def in &desc.fields {
        let wire_id = NativeTypeId(r.read_u32()?);
        if wire_id != def.type_id {
            return Err(Error::malformed(format!(
                "{} field '{}' carries type {}, schema says {}",
                desc.name, def.name, wire_id, def.type_id
            )));
        }
        let field_desc = registry.describe(def.type_id)?;
        let value = r.read_element(registry, field_desc, depth)?;
        fields.push(CompositeField {
            name: Arc::clone(&def.name),
            value,
        });
    }
    r.finish()?;

    Ok(Decoded::Composite(CompositeValue::new(fields)))
}

// =============================================================================
// Encoding
// =============================================================================

fn encode_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
    depth: usize,
) -> Result<Vec<u8>> {
    match desc.class {
        TypeClass::Array => encode_array_at(registry, desc, value, depth),
        TypeClass::Composite => encode_composite_at(registry, desc, value, depth),
        _ => encode_scalar(registry, desc, value),
    }
}

fn encode_array_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
    depth: usize,
) -> Result<Vec<u8>> {
    check_depth(desc, depth)?;
    let array = match value {
        Decoded::Array(a) => a,
        other => {
            return Err(Error::shape_mismatch(format!(
                "cannot encode {} as {}",
                other.kind_name(),
                desc.name
            )))
        }
    };
    let elem_desc = element_descriptor(registry, desc)?;
    if array.elem_class() != elem_desc.class {
        return Err(Error::shape_mismatch(format!(
            "cannot encode array of {} as {}",
            array.elem_class(),
            desc.name
        )));
    }

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve(1 + array.dims().len() * 16 + 4 + array.len() * 5)?;
    out.push(array.dims().len() as u8);
    for dim in array.dims() {
        out.extend_from_slice(&dim.lower.to_le_bytes());
        out.extend_from_slice(&dim.upper.to_le_bytes());
    }
    out.extend_from_slice(&elem_desc.type_id.0.to_le_bytes());
    for element in array.elements() {
        write_element(registry, elem_desc, element.as_ref(), depth, &mut out)?;
    }
    Ok(out)
}

fn encode_composite_at(
    registry: &TypeRegistry,
    desc: &TypeDescriptor,
    value: &Decoded,
    depth: usize,
) -> Result<Vec<u8>> {
    check_depth(desc, depth)?;
    let record = match value {
        Decoded::Composite(c) => c,
        other => {
            return Err(Error::shape_mismatch(format!(
                "cannot encode {} as {}",
                other.kind_name(),
                desc.name
            )))
        }
    };
    if record.len() != desc.fields.len() {
        return Err(Error::shape_mismatch(format!(
            "{} has {} fields, got a record with {}",
            desc.name,
            desc.fields.len(),
            record.len()
        )));
    }

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve(4 + record.len() * 9)?;
    out.extend_from_slice(&(desc.fields.len() as u32).to_le_bytes());
    for (def, field) in desc.fields.iter().zip(record.fields()) {
        let field_desc = registry.describe(def.type_id)?;
        out.extend_from_slice(&def.type_id.0.to_le_bytes());
        write_element(registry, field_desc, field.value.as_ref(), depth, &mut out)?;
    }
    Ok(out)
}

/// Write one null-flagged, length-framed element or field
fn write_element(
    registry: &TypeRegistry,
    elem_desc: &TypeDescriptor,
    element: Option<&Decoded>,
    depth: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    match element {
        None => {
            out.try_reserve(1)?;
            out.push(1);
        }
        Some(d) => {
            let bytes = encode_at(registry, elem_desc, d, depth + 1)?;
            let len = u32::try_from(bytes.len()).map_err(|_| {
                Error::shape_mismatch(format!("{} element is too large", elem_desc.name))
            })?;
            out.try_reserve(5 + bytes.len())?;
            out.push(0);
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&bytes);
        }
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn check_depth(desc: &TypeDescriptor, depth: usize) -> Result<()> {
    if depth >= MAX_VALUE_NESTING {
        return Err(Error::malformed(format!(
            "{} value nests deeper than {} levels",
            desc.name, MAX_VALUE_NESTING
        )));
    }
    Ok(())
}

fn element_descriptor<'r>(
    registry: &'r TypeRegistry,
    desc: &TypeDescriptor,
) -> Result<&'r TypeDescriptor> {
    let elem_id = desc
        .element
        .ok_or_else(|| Error::shape_mismatch(format!("{} has no element type", desc.name)))?;
    registry.describe(elem_id)
}

fn fixed<const N: usize>(desc: &TypeDescriptor, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        Error::malformed(format!(
            "{} datum must be {} bytes, got {}",
            desc.name,
            N,
            bytes.len()
        ))
    })
}

/// Lossless class conversion; `None` when the conversion would narrow
fn widen(scalar: &Scalar, target: TypeClass) -> Option<Scalar> {
    if scalar.class() == target {
        return Some(scalar.clone());
    }
    if !scalar.class().widens_to(target) {
        return None;
    }
    if let (Scalar::Float32(v), TypeClass::Float64) = (scalar, target) {
        return Some(Scalar::Float64(f64::from(*v)));
    }
    // remaining widenings are integral; go through i128
    let v: i128 = match scalar {
        Scalar::Int8(v) => i128::from(*v),
        Scalar::Int16(v) => i128::from(*v),
        Scalar::Int32(v) => i128::from(*v),
        Scalar::Int64(v) => i128::from(*v),
        Scalar::UInt8(v) => i128::from(*v),
        Scalar::UInt16(v) => i128::from(*v),
        Scalar::UInt32(v) => i128::from(*v),
        Scalar::UInt64(v) => i128::from(*v),
        _ => return None,
    };
    match target {
        TypeClass::Int16 => Some(Scalar::Int16(v as i16)),
        TypeClass::Int32 => Some(Scalar::Int32(v as i32)),
        TypeClass::Int64 => Some(Scalar::Int64(v as i64)),
        TypeClass::UInt16 => Some(Scalar::UInt16(v as u16)),
        TypeClass::UInt32 => Some(Scalar::UInt32(v as u32)),
        TypeClass::UInt64 => Some(Scalar::UInt64(v as u64)),
        _ => None,
    }
}

/// Cursor over one native datum's bytes
struct Reader<'a> {
    desc: &'a TypeDescriptor,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(desc: &'a TypeDescriptor, buf: &'a [u8]) -> Self {
        Reader { desc, buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn truncated(&self) -> Error {
        Error::malformed(format!("truncated {} datum", self.desc.name))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(self.truncated());
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(buf))
    }

    /// Read one null-flagged, length-framed element or field
    fn read_element(
        &mut self,
        registry: &TypeRegistry,
        elem_desc: &TypeDescriptor,
        depth: usize,
    ) -> Result<Option<Decoded>> {
        match self.read_u8()? {
            1 => Ok(None),
            0 => {
                let len = self.read_u32()? as usize;
                let bytes = self.take(len)?;
                Ok(Some(decode_at(registry, elem_desc, bytes, depth + 1)?))
            }
            flag => Err(Error::malformed(format!(
                "{} datum has null flag {}",
                self.desc.name, flag
            ))),
        }
    }

    fn finish(self) -> Result<()> {
        if self.pos != self.buf.len() {
            return Err(Error::malformed(format!(
                "{} datum has {} trailing bytes",
                self.desc.name,
                self.buf.len() - self.pos
            )));
        }
        Ok(())
    }
}
