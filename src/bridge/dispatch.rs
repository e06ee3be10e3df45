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

//! Invocation dispatcher
//!
//! The per-call protocol core. Each generated entry point hands its call
//! record and its one algorithm function to [`dispatch`], which builds the
//! call context, wraps the arguments, runs the algorithm, and encodes the
//! result — or classifies the failure, formats a bounded diagnostic, and
//! invokes the backend's abort mechanism.
//!
//! The backend's abort performs a non-local jump that is not guaranteed to
//! run cleanup below the entry point. The dispatcher therefore unwinds the
//! whole invocation first: every context, value, and intermediate buffer
//! is dropped before the abort call, and the only state carried across it
//! is the fixed-capacity [`Diagnostic`], which is plain bytes.

use std::panic::{self, AssertUnwindSafe};

use crate::backend::{BackendRuntime, CallRecord, ErrorReport, NativeReturn, SqlState};
use crate::core::error::Error;
use crate::core::value::Value;

use super::context::CallContext;
use super::exports::AlgorithmFn;

/// Diagnostic messages are truncated to this many bytes before the
/// function-identity prefix is attached
pub const MESSAGE_CAPACITY: usize = 2048;

/// Room for the truncated message plus the prefix and a bounded name
const REPORT_CAPACITY: usize = MESSAGE_CAPACITY + FUNCTION_NAME_CAPACITY + 16;

/// Function names longer than this are truncated in diagnostics
const FUNCTION_NAME_CAPACITY: usize = 256;

/// Fixed message for allocation failures
pub const OUT_OF_MEMORY_MESSAGE: &str = "Memory allocation failed. Typically, this indicates that \
     numbridge limits the available memory to less than what is needed for this input.";

/// Fixed message for failures the bridge cannot classify
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Unknown failure was raised.";

/// Invoke one algorithm function for one backend call record
///
/// On success returns the encoded native value (or the null-return
/// signal). On failure this function does not return: the classified
/// diagnostic is handed to the backend's abort mechanism.
pub fn dispatch(
    backend: &dyn BackendRuntime,
    record: &CallRecord<'_>,
    func: AlgorithmFn,
) -> NativeReturn {
    tracing::trace!(
        function = record.function,
        argc = record.args.len(),
        "dispatching UDF"
    );
    let diagnostic = match run(backend, record, func) {
        Ok(ret) => return ret,
        Err(diagnostic) => diagnostic,
    };
    tracing::debug!(
        function = record.function,
        sqlstate = diagnostic.state().code(),
        "invocation aborted: {}",
        diagnostic.message()
    );
    // Everything non-trivial has been dropped by now; the diagnostic is a
    // fixed-size byte buffer and the abort below never returns.
    backend.report_error(ErrorReport {
        state: diagnostic.state(),
        message: diagnostic.message(),
    })
}

/// Run the invocation with every failure caught and classified
fn run(
    backend: &dyn BackendRuntime,
    record: &CallRecord<'_>,
    func: AlgorithmFn,
) -> std::result::Result<NativeReturn, Diagnostic> {
    // a panic out of algorithm code must not unwind into the backend
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| invoke(backend, record, func)));
    match outcome {
        Ok(Ok(ret)) => Ok(ret),
        Ok(Err(failure)) => Err(classify(record.function, failure)),
        Err(_) => Err(classify(
            record.function,
            Failure {
                error: Error::Unclassified,
                recorded: None,
            },
        )),
    }
}

/// A failed invocation: the error plus whatever the context recorded
struct Failure {
    error: Error,
    recorded: Option<String>,
}

fn invoke(
    backend: &dyn BackendRuntime,
    record: &CallRecord<'_>,
    func: AlgorithmFn,
) -> std::result::Result<NativeReturn, Failure> {
    let ctx = CallContext::new(record, backend.registry());
    match run_call(&ctx, func) {
        Ok(ret) => Ok(ret),
        Err(error) => Err(Failure {
            recorded: ctx.last_error(),
            error,
        }),
    }
}

fn run_call(ctx: &CallContext<'_>, func: AlgorithmFn) -> crate::core::error::Result<NativeReturn> {
    let result = func(ctx, Value::arguments(ctx))?;
    let Some(decoded) = result.into_decoded()? else {
        return Ok(NativeReturn::Null);
    };
    let desc = ctx.return_descriptor()?;
    let convert = ctx.registry().converter_for(desc);
    let bytes = (convert.encode)(ctx.registry(), desc, &decoded)?;
    Ok(NativeReturn::Datum {
        type_id: desc.type_id,
        bytes,
    })
}

/// Classify a failure and format the bounded diagnostic
///
/// Priority: allocation failure gets the fixed out-of-memory message; a
/// recoverable failure with a recorded context message uses that message
/// (it is more specific than the error's own); any other recoverable
/// failure uses its own message; anything unrecognized gets the fixed
/// unknown-failure message.
fn classify(function: &str, failure: Failure) -> Diagnostic {
    let mut diagnostic;
    match &failure.error {
        Error::OutOfMemory => {
            diagnostic = Diagnostic::new(SqlState::OutOfMemory);
            diagnostic.set_message(function, OUT_OF_MEMORY_MESSAGE);
        }
        Error::Unclassified => {
            diagnostic = Diagnostic::new(SqlState::InvalidParameterValue);
            diagnostic.set_message(function, UNKNOWN_FAILURE_MESSAGE);
        }
        error => {
            diagnostic = Diagnostic::new(SqlState::InvalidParameterValue);
            match failure.recorded {
                Some(recorded) => diagnostic.set_message(function, &recorded),
                None => diagnostic.set_message(function, &error.to_string()),
            }
        }
    }
    diagnostic
}

/// Fixed-capacity formatted diagnostic
///
/// Plain bytes only, so it may sit on the stack across the backend's
/// non-local jump.
pub struct Diagnostic {
    state: SqlState,
    len: usize,
    buf: [u8; REPORT_CAPACITY],
}

impl Diagnostic {
    fn new(state: SqlState) -> Self {
        Diagnostic {
            state,
            len: 0,
            buf: [0; REPORT_CAPACITY],
        }
    }

    /// Format `Function "<name>": <message>`, truncating the message to
    /// [`MESSAGE_CAPACITY`] bytes on a character boundary
    fn set_message(&mut self, function: &str, message: &str) {
        self.len = 0;
        self.push_truncated("Function \"", REPORT_CAPACITY);
        self.push_truncated(function, FUNCTION_NAME_CAPACITY);
        self.push_truncated("\": ", REPORT_CAPACITY);
        self.push_truncated(message, MESSAGE_CAPACITY);
    }

    /// Append at most `limit` bytes of `s`, backing off to a char boundary
    fn push_truncated(&mut self, s: &str, limit: usize) {
        let mut take = s.len().min(limit).min(REPORT_CAPACITY - self.len);
        while take > 0 && !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
    }

    /// Error classification
    pub fn state(&self) -> SqlState {
        self.state
    }

    /// The formatted diagnostic text
    pub fn message(&self) -> &str {
        // only char-boundary-truncated UTF-8 is ever pushed
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}
