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

//! Scalar arithmetic reference functions

use crate::bridge::context::CallContext;
use crate::core::error::{Error, Result};
use crate::core::value::Value;

/// Add one to a 64-bit integer; NULL in, NULL out
pub fn add_one(_ctx: &CallContext<'_>, args: Value<'_>) -> Result<Value<'static>> {
    let arg = args.index(0)?;
    if arg.is_null() {
        return Ok(Value::null());
    }
    let n: i64 = arg.get()?;
    let sum = n
        .checked_add(1)
        .ok_or_else(|| Error::domain("integer out of range"))?;
    Ok(Value::from(sum))
}

/// Render the invocation's own metadata as text
///
/// Exercises the handle side of the algorithm contract: function identity,
/// argument count, per-argument types and null flags.
pub fn describe_call(ctx: &CallContext<'_>, _args: Value<'_>) -> Result<Value<'static>> {
    let mut parts: Vec<String> = Vec::new();
    for i in 0..ctx.argument_count() {
        let ty = ctx.argument_type(i)?;
        if ctx.is_argument_null(i)? {
            parts.push(format!("NULL::{}", ty.name));
        } else {
            parts.push(ty.name.to_string());
        }
    }
    Ok(Value::from(format!(
        "{}({})",
        ctx.function_name(),
        parts.join(", ")
    )))
}
