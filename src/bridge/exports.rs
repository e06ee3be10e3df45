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

//! Function registration table
//!
//! The association between exported UDF symbols and algorithm functions is
//! established at compile time: [`export_udfs!`](crate::export_udfs)
//! generates one entry point per symbol, each closing over exactly one
//! algorithm function, plus a static table of every export for load-time
//! enumeration. There is no runtime string lookup on the call path; the
//! table exists so a backend (or its install tooling) can enumerate what a
//! module exports.

use crate::core::error::Result;
use crate::core::value::Value;

use super::context::CallContext;

/// The algorithm function contract
///
/// An algorithm receives the call context (the database handle: argument
/// introspection, error recording) and its arguments wrapped in one
/// polymorphic value, and returns an owned polymorphic value. Algorithm
/// code is a pure consumer of these two contracts and never assumes a
/// particular backend.
pub type AlgorithmFn = for<'a> fn(&'a CallContext<'a>, Value<'a>) -> Result<Value<'static>>;

/// One exported UDF: symbol identity and the function bound to it
#[derive(Clone, Copy)]
pub struct UdfEntry {
    pub symbol: &'static str,
    pub func: AlgorithmFn,
}

/// Look a symbol up in a registration table
///
/// Only load-time machinery (such as the embedded executor) resolves by
/// name; generated entry points bind their function at compile time.
pub fn find_udf(table: &[UdfEntry], symbol: &str) -> Option<AlgorithmFn> {
    table
        .iter()
        .find(|entry| entry.symbol == symbol)
        .map(|entry| entry.func)
}

/// Declare the UDFs a module exports
///
/// For every `symbol => function` pair this generates a `pub fn symbol`
/// entry point that dispatches to exactly that algorithm function, and one
/// `REGISTERED_UDFS` table listing all of them:
///
/// ```ignore
/// export_udfs! {
///     add_one => arith::add_one,
///     vector_sum => stats::vector_sum,
/// }
/// ```
#[macro_export]
macro_rules! export_udfs {
    ($($symbol:ident => $func:path),+ $(,)?) => {
        $(
            #[doc = concat!("Generated UDF entry point for `", stringify!($symbol), "`")]
            pub fn $symbol(
                backend: &dyn $crate::backend::BackendRuntime,
                record: &$crate::backend::CallRecord<'_>,
            ) -> $crate::backend::NativeReturn {
                $crate::bridge::dispatch::dispatch(backend, record, $func)
            }
        )+

        /// Every UDF this module exports, for load-time enumeration
        pub static REGISTERED_UDFS: &[$crate::bridge::exports::UdfEntry] = &[
            $(
                $crate::bridge::exports::UdfEntry {
                    symbol: stringify!($symbol),
                    func: $func,
                },
            )+
        ];
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_udf_resolves_registered_symbols() {
        let table = crate::modules::REGISTERED_UDFS;
        assert!(find_udf(table, "add_one").is_some());
        assert!(find_udf(table, "no_such_symbol").is_none());
    }
}
