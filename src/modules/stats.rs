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

//! Vector statistics reference functions

use crate::bridge::context::CallContext;
use crate::core::error::{Error, Result};
use crate::core::value::Value;

/// Sum of a numeric vector; NULL in, NULL out
pub fn vector_sum(_ctx: &CallContext<'_>, args: Value<'_>) -> Result<Value<'static>> {
    let arg = args.index(0)?;
    if arg.is_null() {
        return Ok(Value::null());
    }
    let xs: Vec<f64> = arg.get()?;
    Ok(Value::from(xs.iter().sum::<f64>()))
}

/// Weighted mean of a value vector and a weight vector
///
/// Records a specific message on the context before failing, so the
/// session diagnostic names the actual problem rather than the generic
/// error the caller sees.
pub fn weighted_mean(ctx: &CallContext<'_>, args: Value<'_>) -> Result<Value<'static>> {
    let values = args.index(0)?;
    let weights = args.index(1)?;
    if values.is_null() || weights.is_null() {
        return Ok(Value::null());
    }
    let xs: Vec<f64> = values.get()?;
    let ws: Vec<f64> = weights.get()?;

    if xs.len() != ws.len() {
        ctx.record_error(format!(
            "value and weight vectors must have equal length, got {} and {}",
            xs.len(),
            ws.len()
        ));
        return Err(Error::domain("invalid input"));
    }
    let total: f64 = ws.iter().sum();
    if total == 0.0 {
        return Err(Error::domain("weights sum to zero"));
    }
    let dot: f64 = xs.iter().zip(ws.iter()).map(|(x, w)| x * w).sum();
    Ok(Value::from(dot / total))
}
