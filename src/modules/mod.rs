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

//! Reference algorithm functions
//!
//! Small, backend-independent consumers of the
//! [`Value`](crate::core::Value) and
//! [`CallContext`](crate::bridge::CallContext) contracts. They stand in
//! for the numerical algorithm library a real deployment links against and
//! give the registration table and the test suite something to export.

pub mod arith;
pub mod stats;

crate::export_udfs! {
    add_one => arith::add_one,
    describe_call => arith::describe_call,
    vector_sum => stats::vector_sum,
    weighted_mean => stats::weighted_mean,
}
