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

//! Core types and definitions for NumBridge
//!
//! This module contains the backend-independent foundation:
//!
//! - [`TypeClass`] - Semantic types (integers, floats, text, array, composite)
//! - [`Value`] - The polymorphic value algorithm code reads and builds
//! - [`Error`] - Error taxonomy for all bridge operations

pub mod error;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use types::TypeClass;
pub use value::{
    ArrayDim, ArrayValue, CompositeField, CompositeValue, Decoded, FromValue, Kind, Scalar, Value,
    MAX_ARRAY_DIMS,
};
