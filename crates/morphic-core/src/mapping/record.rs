//! Keyed-map aggregates
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::aggregate::{Assignment, SourceAggregate, TargetAggregate};
use crate::error::ValidationError;
use crate::types::{Field, TypedValue, Value};
use std::any::Any;
use std::collections::HashMap;

/// A loosely typed record keyed by field name
pub type Record = HashMap<String, TypedValue>;

impl SourceAggregate for Record {
    fn key(&self, name: &str) -> Option<TypedValue> {
        self.get(name).cloned()
    }
}

impl TargetAggregate for Record {
    fn set_slot(&mut self, name: &str, value: TypedValue) -> Assignment {
        self.insert(name.to_string(), value);
        Assignment::Assigned
    }
}

/// Look up a field in a record with its declared type
///
/// A `Field<TypedValue>` matches any entry.
pub fn get_field<'a, T: Value>(
    record: &'a Record,
    field: &Field<T>,
) -> Result<&'a T, ValidationError> {
    let Some(value) = record.get(field.name()) else {
        return Err(ValidationError::new(
            field.name(),
            TypedValue::none(),
            format!("field {:?} not found", field.name()),
        ));
    };

    if let Some(dynamic) = (value as &dyn Any).downcast_ref::<T>() {
        return Ok(dynamic);
    }

    value.downcast_ref::<T>().ok_or_else(|| {
        ValidationError::new(
            field.name(),
            value.clone(),
            format!("expected type {}, got {}", field.type_tag(), value.type_tag()),
        )
    })
}
