//! Fluent, order-enforcing construction of field bindings
//!
//! Each stage only exposes the next legal calls: source field, destination
//! field, a converter or an explicit skip, a validator or an explicit skip,
//! then the final build.
//!
//! ```
//! use morphic_core::mapping::builder::FieldMappingBuilder;
//! use morphic_core::transform::{built_in::Parse, validator_fn};
//! use morphic_core::Field;
//!
//! let level = FieldMappingBuilder::from(Field::<String>::new("level"))
//!     .to(Field::<i64>::new("level"))
//!     .convert_with(Parse::<i64>::new())
//!     .validate_with(validator_fn(|v: &i64| {
//!         if *v >= 1 { Ok(()) } else { Err("must be >= 1".to_string()) }
//!     }))
//!     .build();
//!
//! assert_eq!(level.map_typed("12".to_string()).unwrap(), 12);
//! assert!(level.map_typed("0".to_string()).is_err());
//! ```
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::binding::FieldMapping;
use crate::error::CompositionError;
use crate::transform::chain::Chain;
use crate::transform::validate::{Validate, ValidatorStep};
use crate::transform::{step, Convert, SharedStep};
use crate::types::{Field, Value};

/// Entry point of the builder
pub struct FieldMappingBuilder;

impl FieldMappingBuilder {
    /// Begin a binding at its source field
    #[allow(clippy::should_implement_trait)]
    pub fn from<S: Value>(field: Field<S>) -> FromStep<S> {
        FromStep { from: field }
    }
}

/// Source declared; a destination is required next
pub struct FromStep<S> {
    from: Field<S>,
}

impl<S: Value> FromStep<S> {
    pub fn to<D: Value>(self, field: Field<D>) -> ConvertStep<S, D> {
        ConvertStep {
            from: self.from,
            to: field,
        }
    }
}

/// Both fields declared; attach a converter or skip conversion
pub struct ConvertStep<S, D> {
    from: Field<S>,
    to: Field<D>,
}

impl<S: Value, D: Value> ConvertStep<S, D> {
    pub fn convert_with<C>(self, converter: C) -> ValidateStep<S, D>
    where
        C: Convert<Input = S, Output = D> + 'static,
    {
        self.with_converter(Some(step(converter)))
    }

    /// Attach an erased converter; its types are checked by the final build
    pub fn convert_with_step(self, converter: SharedStep) -> ValidateStep<S, D> {
        self.with_converter(Some(converter))
    }

    pub fn skip_conversion(self) -> ValidateStep<S, D> {
        self.with_converter(None)
    }

    fn with_converter(self, converter: Option<SharedStep>) -> ValidateStep<S, D> {
        ValidateStep {
            from: self.from,
            to: self.to,
            converter,
        }
    }
}

/// Conversion decided; attach a validator or skip validation
pub struct ValidateStep<S, D> {
    from: Field<S>,
    to: Field<D>,
    converter: Option<SharedStep>,
}

impl<S: Value, D: Value> ValidateStep<S, D> {
    /// Validate the converted value; violations name the destination field
    pub fn validate_with<V>(self, validator: V) -> BuildStep<S, D>
    where
        V: Validate<Value = D> + 'static,
    {
        let field = self.to.name().to_string();
        self.with_validator(Some(step(ValidatorStep::new(validator).for_field(field))))
    }

    /// Attach an erased validator; its types are checked by the final build
    pub fn validate_with_step(self, validator: SharedStep) -> BuildStep<S, D> {
        self.with_validator(Some(validator))
    }

    pub fn skip_validation(self) -> BuildStep<S, D> {
        self.with_validator(None)
    }

    fn with_validator(self, validator: Option<SharedStep>) -> BuildStep<S, D> {
        let steps = self.converter.into_iter().chain(validator).collect();
        BuildStep {
            from: self.from,
            to: self.to,
            steps,
        }
    }
}

/// Fully configured; only the build remains
pub struct BuildStep<S, D> {
    from: Field<S>,
    to: Field<D>,
    steps: Vec<SharedStep>,
}

impl<S: Value, D: Value> BuildStep<S, D> {
    pub fn try_build(self) -> Result<FieldMapping<S, D>, CompositionError> {
        let chain = Chain::try_new(self.steps)?;
        Ok(FieldMapping::new(self.from, self.to, chain))
    }

    /// # Panics
    ///
    /// Panics when the attached steps do not form a valid chain from `S` to `D`.
    pub fn build(self) -> FieldMapping<S, D> {
        let chain = Chain::new(self.steps);
        FieldMapping::new(self.from, self.to, chain)
    }
}
