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

//! Error types for NumBridge
//!
//! This module defines the failure taxonomy shared by the value layer, the
//! type registry, the codec, and the invocation dispatcher. Every failure a
//! UDF invocation can produce is one of these variants; the dispatcher is
//! the single place where they are classified and handed to the backend.

use thiserror::Error;

/// Result type alias for NumBridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bridge operations
///
/// The dispatcher classifies these into the backend's error codes:
/// `OutOfMemory` maps to the out-of-memory class, `Unclassified` to a fixed
/// generic message, and everything else is a recoverable domain-class
/// failure surfaced with its own message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Resource errors
    // =========================================================================
    /// Allocation failure while building values or invocation state
    #[error("out of memory")]
    OutOfMemory,

    // =========================================================================
    // Domain errors
    // =========================================================================
    /// Recoverable condition raised by algorithm code with a specific message
    #[error("{0}")]
    Domain(String),

    // =========================================================================
    // Bridge contract violations
    // =========================================================================
    /// A value was read as a kind or width it does not have
    #[error("cannot read {got} value as {expected}")]
    TypeMismatch { expected: String, got: String },

    /// A host value does not fit the shape of the target type descriptor
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Subscript outside the declared bounds of an array, composite, or
    /// argument list
    #[error("index {index} out of range [{lower}, {upper}]")]
    IndexOutOfRange { index: i64, lower: i64, upper: i64 },

    /// The backend reported a type id the registry has no mapping for
    #[error("unknown backend type id {0}")]
    UnknownType(u32),

    /// Composite record has no field with the requested name
    #[error("composite record has no field '{0}'")]
    FieldNotFound(String),

    /// Native bytes do not parse as a value of the descriptor's type
    #[error("malformed native datum: {0}")]
    MalformedDatum(String),

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Failure condition not recognized as any of the above
    #[error("unknown failure")]
    Unclassified,
}

impl Error {
    /// Create a new Domain error
    pub fn domain(message: impl Into<String>) -> Self {
        Error::Domain(message.into())
    }

    /// Create a new TypeMismatch error
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create a new ShapeMismatch error
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Error::ShapeMismatch(message.into())
    }

    /// Create a new IndexOutOfRange error
    pub fn index_out_of_range(index: i64, lower: i64, upper: i64) -> Self {
        Error::IndexOutOfRange {
            index,
            lower,
            upper,
        }
    }

    /// Create a new MalformedDatum error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDatum(message.into())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
