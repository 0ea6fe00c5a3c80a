//! Validator steps
//!
//! A validator is a step whose input and output types are the same and which
//! either passes the value through or rejects it with a
//! [`ValidationError`]. Validators only describe the rule; the field name is
//! attached when the validator is bound to a destination field.
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::Convert;
use crate::error::{Result, ValidationError};
use crate::types::{TypedValue, Value};
use std::marker::PhantomData;

/// A domain rule over one value type
pub trait Validate: Send + Sync {
    type Value: Value;

    /// Return the violation message when the value breaks the rule
    fn validate(&self, value: &Self::Value) -> std::result::Result<(), String>;
}

/// Adapts a [`Validate`] rule into a pipeline step
pub struct ValidatorStep<V> {
    validator: V,
    field: String,
}

impl<V: Validate> ValidatorStep<V> {
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            field: String::new(),
        }
    }

    /// Name the field reported in raised [`ValidationError`]s
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl<V: Validate> Convert for ValidatorStep<V> {
    type Input = V::Value;
    type Output = V::Value;

    fn convert(&self, input: V::Value) -> Result<V::Value> {
        match self.validator.validate(&input) {
            Ok(()) => Ok(input),
            Err(message) => {
                log::debug!("validation rejected value for field {:?}: {}", self.field, message);
                Err(ValidationError::new(self.field.clone(), TypedValue::new(input), message).into())
            }
        }
    }
}

/// A validator backed by a closure
pub struct FnValidator<T, F> {
    rule: F,
    _type: PhantomData<fn(&T)>,
}

/// Build a [`Validate`] rule from a closure
///
/// ```
/// use morphic_core::transform::validator_fn;
///
/// let positive = validator_fn(|v: &i64| if *v > 0 { Ok(()) } else { Err("must be > 0".into()) });
/// # let _ = positive;
/// ```
pub fn validator_fn<T, F>(rule: F) -> FnValidator<T, F>
where
    T: Value,
    F: Fn(&T) -> std::result::Result<(), String> + Send + Sync,
{
    FnValidator {
        rule,
        _type: PhantomData,
    }
}

impl<T, F> Validate for FnValidator<T, F>
where
    T: Value,
    F: Fn(&T) -> std::result::Result<(), String> + Send + Sync,
{
    type Value = T;

    fn validate(&self, value: &T) -> std::result::Result<(), String> {
        (self.rule)(value)
    }
}
