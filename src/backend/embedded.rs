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

//! Embedded reference backend
//!
//! An in-process stand-in for a host database engine, implementing the
//! connector side of the bridge contract: it owns a type catalog, builds
//! call records, and implements the error/abort mechanism as a non-local
//! jump — an unwind with a typed payload that [`EmbeddedBackend::invoke`]
//! catches at the executor boundary, the same place a host engine's
//! longjmp would land. Tests and examples drive the whole bridge through
//! this backend; a production connector replaces it with its engine's own
//! call records and abort primitive.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::bridge::dispatch::dispatch;
use crate::bridge::exports::{find_udf, UdfEntry};
use crate::core::error::Result;
use crate::core::value::Value;

use super::descriptor::{NativeTypeId, TypeDescriptor};
use super::registry::TypeRegistry;
use super::{BackendRuntime, CallRecord, ErrorReport, NativeDatum, NativeReturn, SqlState};

/// Carried across the abort unwind; caught at the executor boundary
struct BackendAbort {
    state: SqlState,
    message: String,
}

/// What a database session sees when an invocation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlDiagnostic {
    pub state: SqlState,
    pub message: String,
}

impl fmt::Display for SqlDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.state.code(), self.message)
    }
}

impl std::error::Error for SqlDiagnostic {}

/// An argument (or return value) whose native bytes the caller owns
///
/// The executor materializes these into the borrowed [`NativeDatum`] form
/// for the duration of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDatum {
    pub type_id: NativeTypeId,
    pub bytes: Option<Vec<u8>>,
}

impl OwnedDatum {
    /// A SQL NULL of the given type
    pub fn null(type_id: NativeTypeId) -> Self {
        OwnedDatum {
            type_id,
            bytes: None,
        }
    }
}

/// In-process reference backend
pub struct EmbeddedBackend {
    registry: TypeRegistry,
    udfs: &'static [UdfEntry],
}

impl EmbeddedBackend {
    /// Backend with the builtin catalog and the crate's exported UDFs
    pub fn new() -> Self {
        EmbeddedBackend::with_udfs(crate::modules::REGISTERED_UDFS)
    }

    /// Backend with the builtin catalog and a custom registration table
    pub fn with_udfs(udfs: &'static [UdfEntry]) -> Self {
        EmbeddedBackend {
            registry: TypeRegistry::with_builtins(),
            udfs,
        }
    }

    /// Register an additional native type
    ///
    /// Startup-time only: the `&mut` receiver keeps registration strictly
    /// before the first invocation.
    pub fn register_type(&mut self, desc: TypeDescriptor) {
        self.registry.register(desc);
    }

    /// Encode a value into an owned native datum of the given type
    pub fn datum(&self, type_id: NativeTypeId, value: Value<'_>) -> Result<OwnedDatum> {
        match value.into_decoded()? {
            None => Ok(OwnedDatum::null(type_id)),
            Some(decoded) => {
                let desc = self.registry.describe(type_id)?;
                let convert = self.registry.converter_for(desc);
                Ok(OwnedDatum {
                    type_id,
                    bytes: Some((convert.encode)(&self.registry, desc, &decoded)?),
                })
            }
        }
    }

    /// Decode a native return into a polymorphic value
    pub fn decode_return(&self, ret: &NativeReturn) -> Result<Value<'static>> {
        match ret {
            NativeReturn::Null => Ok(Value::null()),
            NativeReturn::Datum { type_id, bytes } => {
                let desc = self.registry.describe(*type_id)?;
                let convert = self.registry.converter_for(desc);
                Ok(Value::owned((convert.decode)(&self.registry, desc, bytes)?))
            }
        }
    }

    /// Execute one UDF invocation, the way a host executor would
    ///
    /// Resolves the exported symbol, builds the call record, runs the
    /// dispatcher, and catches the abort unwind at this boundary. A failed
    /// invocation produces exactly one diagnostic; any native state the
    /// invocation produced before failing dies with its scope here.
    pub fn invoke(
        &self,
        symbol: &str,
        args: &[OwnedDatum],
        return_type: NativeTypeId,
    ) -> std::result::Result<NativeReturn, SqlDiagnostic> {
        let Some(func) = find_udf(self.udfs, symbol) else {
            return Err(SqlDiagnostic {
                state: SqlState::UndefinedFunction,
                message: format!("function \"{}\" does not exist", symbol),
            });
        };
        tracing::trace!(symbol, argc = args.len(), "executing UDF");

        // the invocation's memory scope: borrowed views die with this frame
        let natives: Vec<NativeDatum<'_>> = args
            .iter()
            .map(|datum| NativeDatum {
                type_id: datum.type_id,
                bytes: datum.bytes.as_deref(),
            })
            .collect();
        let record = CallRecord {
            function: symbol,
            args: &natives,
            return_type,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| dispatch(self, &record, func)));
        match outcome {
            Ok(ret) => Ok(ret),
            Err(payload) => match payload.downcast::<BackendAbort>() {
                Ok(abort) => Err(SqlDiagnostic {
                    state: abort.state,
                    message: abort.message,
                }),
                // not the abort mechanism; let it keep unwinding
                Err(other) => panic::resume_unwind(other),
            },
        }
    }
}

impl Default for EmbeddedBackend {
    fn default() -> Self {
        EmbeddedBackend::new()
    }
}

impl BackendRuntime for EmbeddedBackend {
    fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The non-local jump back into the executor
    ///
    /// `resume_unwind` skips the panic hook: this is control transfer, not
    /// a programming-error report.
    fn report_error(&self, report: ErrorReport<'_>) -> ! {
        panic::resume_unwind(Box::new(BackendAbort {
            state: report.state,
            message: report.message.to_string(),
        }))
    }
}
