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

//! Backend-facing half of the bridge
//!
//! Everything a backend connector exchanges with the bridge lives here:
//!
//! - [`CallRecord`] - the backend's per-invocation record (arguments, null
//!   flags, function identity)
//! - [`TypeRegistry`] / [`TypeDescriptor`] - the native type catalog
//! - [`codec`] - native-format decode/encode routines
//! - [`BackendRuntime`] - the connector contract: type catalog access plus
//!   the error/abort mechanism
//! - [`EmbeddedBackend`] - the in-process reference backend
//!
//! The bridge only ever reads a call record; its memory belongs to the
//! backend's per-invocation allocation scope and nothing here retains a
//! pointer into it past the invocation.

pub mod codec;
pub mod descriptor;
pub mod embedded;
pub mod registry;

pub use descriptor::{type_ids, FieldDef, NativeTypeId, TypeDescriptor, TypeLength};
pub use embedded::{EmbeddedBackend, OwnedDatum, SqlDiagnostic};
pub use registry::{Converter, TypeRegistry};

use std::fmt;

/// One argument (or return value) in the backend's native format
///
/// `bytes: None` is SQL NULL; the null flag lives here rather than in the
/// payload.
#[derive(Debug, Clone, Copy)]
pub struct NativeDatum<'a> {
    pub type_id: NativeTypeId,
    pub bytes: Option<&'a [u8]>,
}

impl<'a> NativeDatum<'a> {
    pub fn new(type_id: NativeTypeId, bytes: &'a [u8]) -> Self {
        NativeDatum {
            type_id,
            bytes: Some(bytes),
        }
    }

    pub fn null(type_id: NativeTypeId) -> Self {
        NativeDatum {
            type_id,
            bytes: None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.bytes.is_none()
    }
}

/// The backend's per-invocation call record
///
/// Provided by the backend, read-only to the bridge, gone when the
/// invocation's memory scope ends.
#[derive(Debug, Clone)]
pub struct CallRecord<'a> {
    /// Exported symbol identity of the invoked function
    pub function: &'a str,
    /// Positional arguments in native form
    pub args: &'a [NativeDatum<'a>],
    /// Declared type of the return value
    pub return_type: NativeTypeId,
}

/// What the dispatcher hands back to the backend executor
///
/// `Null` is the backend's native null-return convention; `Datum` carries
/// the encoded native value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeReturn {
    Null,
    Datum {
        type_id: NativeTypeId,
        bytes: Vec<u8>,
    },
}

impl NativeReturn {
    pub fn is_null(&self) -> bool {
        matches!(self, NativeReturn::Null)
    }
}

/// Error classification handed to the backend's abort mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlState {
    /// Allocation failure ("53200")
    OutOfMemory,
    /// Recoverable invocation failure ("22023")
    InvalidParameterValue,
    /// No UDF registered under the requested symbol ("42883")
    UndefinedFunction,
}

impl SqlState {
    /// Five-character SQLSTATE code
    pub const fn code(self) -> &'static str {
        match self {
            SqlState::OutOfMemory => "53200",
            SqlState::InvalidParameterValue => "22023",
            SqlState::UndefinedFunction => "42883",
        }
    }
}

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A classified, formatted diagnostic ready for the backend's abort call
#[derive(Debug, Clone, Copy)]
pub struct ErrorReport<'a> {
    pub state: SqlState,
    pub message: &'a str,
}

/// Contract a backend connector implements for the bridge
///
/// `report_error` is the backend's native error/abort mechanism: it
/// performs a non-local transfer of control back into the backend executor
/// and never returns. The dispatcher guarantees that when it calls this,
/// nothing but plain fixed-size data is still live on the bridge's side of
/// the stack.
pub trait BackendRuntime {
    /// The backend's native type catalog
    fn registry(&self) -> &TypeRegistry;

    /// Abort the invocation with a classified diagnostic; never returns
    fn report_error(&self, report: ErrorReport<'_>) -> !;
}
