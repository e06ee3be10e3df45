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

//! Invocation half of the bridge
//!
//! - [`CallContext`] - per-invocation state and argument introspection
//! - [`dispatch`] - the per-call entry logic and failure classification
//! - [`exports`] - the compile-time function registration table

pub mod context;
pub mod dispatch;
pub mod exports;

pub use context::CallContext;
pub use dispatch::{Diagnostic, MESSAGE_CAPACITY};
pub use exports::{find_udf, AlgorithmFn, UdfEntry};
