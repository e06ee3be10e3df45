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

//! # NumBridge - in-database numerical analytics bridge
//!
//! NumBridge lets numerical and statistical algorithms be written once,
//! against a polymorphic value type, and executed inside a relational
//! database engine as user-defined functions. The crate is the
//! type-conversion and function-invocation bridge between the two worlds:
//! it wraps the backend's native call record, exposes arguments as
//! [`Value`]s, converts results back to native form, and translates the
//! backend's abort-style error signaling into one uniform failure channel.
//!
//! ## Quick start
//!
//! ```rust
//! use numbridge::backend::{type_ids, EmbeddedBackend};
//! use numbridge::Value;
//!
//! let backend = EmbeddedBackend::new();
//!
//! let arg = backend.datum(type_ids::INT8, Value::from(41i64)).unwrap();
//! let ret = backend.invoke("add_one", &[arg], type_ids::INT8).unwrap();
//!
//! let out = backend.decode_return(&ret).unwrap();
//! assert_eq!(out.get::<i64>().unwrap(), 42);
//! ```
//!
//! ## Modules
//!
//! - [`core`] - backend-independent foundation ([`Value`], [`TypeClass`],
//!   [`Error`])
//! - [`backend`] - type registry, native codec, connector contracts, and
//!   the embedded reference backend
//! - [`bridge`] - call context, invocation dispatcher, and the function
//!   registration table
//! - [`modules`] - reference algorithm functions exported as UDFs
//! - [`common`] - version and build information
//!
//! Algorithm functions follow one contract: take the call context and the
//! argument tuple, return an owned [`Value`]. Declare them with
//! [`export_udfs!`] to generate per-symbol entry points and the
//! registration table.

pub mod backend;
pub mod bridge;
pub mod common;
pub mod core;
pub mod modules;

// Re-export main types for convenience
pub use crate::core::{
    ArrayDim, ArrayValue, CompositeField, CompositeValue, Decoded, Error, FromValue, Kind, Result,
    Scalar, TypeClass, Value,
};

pub use crate::backend::{
    BackendRuntime, CallRecord, EmbeddedBackend, ErrorReport, FieldDef, NativeDatum, NativeReturn,
    NativeTypeId, OwnedDatum, SqlDiagnostic, SqlState, TypeDescriptor, TypeLength, TypeRegistry,
};

pub use crate::bridge::{find_udf, AlgorithmFn, CallContext, UdfEntry};

pub use crate::common::version_info;
