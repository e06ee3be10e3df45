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

//! Call context
//!
//! A [`CallContext`] is the state of one UDF invocation: the backend's call
//! record, argument introspection, and the last-error slot algorithm code
//! and nested operations use to surface a message more specific than a
//! generic failure. Exactly one exists per invocation; it lives on the
//! dispatcher's stack and dies with the invocation on both the normal and
//! the error path.

use std::cell::RefCell;

use crate::backend::descriptor::TypeDescriptor;
use crate::backend::registry::TypeRegistry;
use crate::backend::CallRecord;
use crate::core::error::{Error, Result};
use crate::core::value::Value;

/// State of one UDF invocation
pub struct CallContext<'a> {
    record: &'a CallRecord<'a>,
    registry: &'a TypeRegistry,
    // single-threaded per invocation; interior mutability is enough
    last_error: RefCell<Option<String>>,
}

impl<'a> CallContext<'a> {
    /// Wrap a backend call record
    pub fn new(record: &'a CallRecord<'a>, registry: &'a TypeRegistry) -> Self {
        CallContext {
            record,
            registry,
            last_error: RefCell::new(None),
        }
    }

    /// Identity of the invoked function, for diagnostics
    pub fn function_name(&self) -> &'a str {
        self.record.function
    }

    /// Number of positional arguments
    pub fn argument_count(&self) -> usize {
        self.record.args.len()
    }

    /// Null flag of argument `index`
    pub fn is_argument_null(&self, index: usize) -> Result<bool> {
        match self.record.args.get(index) {
            Some(datum) => Ok(datum.is_null()),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Declared native type of argument `index`
    pub fn argument_type(&self, index: usize) -> Result<&'a TypeDescriptor> {
        match self.record.args.get(index) {
            Some(datum) => self.registry.describe(datum.type_id),
            None => Err(self.out_of_range(index)),
        }
    }

    /// Wrap argument `index` as a polymorphic value
    ///
    /// Wrapping is lazy: no bytes are decoded until the value is read. A
    /// null argument wraps as a Null value.
    pub fn argument(&self, index: usize) -> Result<Value<'a>> {
        let datum = self
            .record
            .args
            .get(index)
            .ok_or_else(|| self.out_of_range(index))?;
        match datum.bytes {
            None => Ok(Value::null()),
            Some(bytes) => {
                let desc = self.registry.describe(datum.type_id)?;
                Ok(Value::from_raw(bytes, desc, self.registry))
            }
        }
    }

    /// Descriptor of the declared return type
    pub fn return_descriptor(&self) -> Result<&'a TypeDescriptor> {
        self.registry.describe(self.record.return_type)
    }

    /// The backend's type catalog
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Record a failure message more specific than a generic error
    ///
    /// When the invocation later fails with a recoverable error, the
    /// dispatcher reports this message instead of the error's own.
    pub fn record_error(&self, message: impl Into<String>) {
        *self.last_error.borrow_mut() = Some(message.into());
    }

    /// The recorded failure message, if any
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::index_out_of_range(
            index as i64,
            0,
            self.argument_count() as i64 - 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::descriptor::type_ids;
    use crate::backend::NativeDatum;

    fn record<'a>(args: &'a [NativeDatum<'a>]) -> CallRecord<'a> {
        CallRecord {
            function: "probe",
            args,
            return_type: type_ids::INT8,
        }
    }

    #[test]
    fn test_argument_introspection() {
        let bytes = 41i64.to_le_bytes();
        let args = [
            NativeDatum::new(type_ids::INT8, &bytes),
            NativeDatum::null(type_ids::FLOAT8),
        ];
        let record = record(&args);
        let ctx = CallContext::new(&record, TypeRegistry::builtin());

        assert_eq!(ctx.function_name(), "probe");
        assert_eq!(ctx.argument_count(), 2);
        assert!(!ctx.is_argument_null(0).expect("flag"));
        assert!(ctx.is_argument_null(1).expect("flag"));
        assert_eq!(ctx.argument_type(1).expect("type").name.as_ref(), "float8");
        assert!(matches!(
            ctx.is_argument_null(2),
            Err(Error::IndexOutOfRange { index: 2, lower: 0, upper: 1 })
        ));
    }

    #[test]
    fn test_arguments_wrap_lazily() {
        let bytes = 41i64.to_le_bytes();
        let args = [NativeDatum::new(type_ids::INT8, &bytes)];
        let record = record(&args);
        let ctx = CallContext::new(&record, TypeRegistry::builtin());

        let value = ctx.argument(0).expect("wrap");
        assert_eq!(value.get::<i64>().expect("decode"), 41);
        // repeated reads are idempotent
        assert_eq!(value.get::<i64>().expect("cached"), 41);

        assert!(!ctx.argument(0).expect("wrap again").is_null());
    }

    #[test]
    fn test_error_slot() {
        let args: [NativeDatum<'_>; 0] = [];
        let record = record(&args);
        let ctx = CallContext::new(&record, TypeRegistry::builtin());

        assert_eq!(ctx.last_error(), None);
        ctx.record_error("weights sum to zero");
        assert_eq!(ctx.last_error().as_deref(), Some("weights sum to zero"));
        // later recordings replace earlier ones
        ctx.record_error("second");
        assert_eq!(ctx.last_error().as_deref(), Some("second"));
    }
}
