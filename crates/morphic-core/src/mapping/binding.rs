//! Field bindings: one source field, one destination field, one chain
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::transform::chain::Chain;
use crate::types::{Field, FieldDef, TypeTag, TypedValue, Value};
use std::any::Any;
use std::sync::Arc;

/// A binding with its static types erased, so bindings of different types
/// can share one list
pub trait FieldMapper: Send + Sync {
    fn source_field(&self) -> FieldDef;

    fn target_field(&self) -> FieldDef;

    fn map(&self, value: TypedValue) -> Result<FieldMappingResult>;
}

/// Shared handle to an erased binding
pub type SharedMapper = Arc<dyn FieldMapper>;

/// The destination field of a binding and the value produced for it
#[derive(Debug, Clone)]
pub struct FieldMappingResult {
    target_field: FieldDef,
    mapped_value: TypedValue,
}

impl FieldMappingResult {
    pub fn new(target_field: FieldDef, mapped_value: TypedValue) -> Self {
        Self {
            target_field,
            mapped_value,
        }
    }

    pub fn target_field(&self) -> &FieldDef {
        &self.target_field
    }

    pub fn mapped_value(&self) -> &TypedValue {
        &self.mapped_value
    }

    pub fn value_as<T: Any>(&self) -> Option<&T> {
        self.mapped_value.downcast_ref::<T>()
    }

    pub fn into_value(self) -> TypedValue {
        self.mapped_value
    }
}

/// Binds `from` to `to` through a chain from `S` to `D`
///
/// The chain's declared endpoints equal the two fields' types by
/// construction, since all three share `S` and `D`.
pub struct FieldMapping<S, D> {
    from: Field<S>,
    to: Field<D>,
    chain: Chain<S, D>,
}

impl<S: Value, D: Value> FieldMapping<S, D> {
    pub fn new(from: Field<S>, to: Field<D>, chain: Chain<S, D>) -> Self {
        Self { from, to, chain }
    }

    pub fn from_field(&self) -> &Field<S> {
        &self.from
    }

    pub fn to_field(&self) -> &Field<D> {
        &self.to
    }

    pub fn chain(&self) -> &Chain<S, D> {
        &self.chain
    }

    /// Run the chain on an already typed value
    pub fn map_typed(&self, value: S) -> Result<D> {
        self.chain.apply(value)
    }
}

impl<S: Value, D: Value> FieldMapper for FieldMapping<S, D> {
    fn source_field(&self) -> FieldDef {
        self.from.erase()
    }

    fn target_field(&self) -> FieldDef {
        self.to.erase()
    }

    fn map(&self, value: TypedValue) -> Result<FieldMappingResult> {
        let input = value.take::<S>().map_err(|found| Error::SourceTypeMismatch {
            expected: TypeTag::of::<S>(),
            found: found.type_tag(),
            field: Some(self.to.name().to_string()),
        })?;
        let mapped = self.map_typed(input)?;
        Ok(FieldMappingResult::new(self.to.erase(), TypedValue::new(mapped)))
    }
}

impl<S, D> Clone for FieldMapping<S, D> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            chain: self.chain.clone(),
        }
    }
}
