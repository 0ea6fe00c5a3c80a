//! Lifting an element step over a whole sequence
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::{Convert, SharedStep};
use crate::error::{CompositionError, Error, Result};
use crate::types::{TypeTag, TypedValue, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Maps `Vec<I>` to `Vec<O>` by applying one element step to every member
///
/// Declared types are `Vec<I>` and `Vec<O>`, so a loosely typed
/// `Vec<TypedValue>` is refused at the boundary even when every element
/// would individually fit.
pub struct SequenceMapper<I, O> {
    element: SharedStep,
    _types: PhantomData<fn(I) -> O>,
}

impl<I: Value, O: Value> SequenceMapper<I, O> {
    /// Wrap an erased element step whose declared types must be `I` and `O`
    pub fn new(element: SharedStep) -> std::result::Result<Self, CompositionError> {
        let (found_input, found_output) = (element.input_type(), element.output_type());
        if found_input != TypeTag::of::<I>() || found_output != TypeTag::of::<O>() {
            return Err(CompositionError::ElementSignature {
                expected_input: TypeTag::of::<I>(),
                expected_output: TypeTag::of::<O>(),
                found_input,
                found_output,
            });
        }
        Ok(Self {
            element,
            _types: PhantomData,
        })
    }

    /// Wrap a typed element step
    pub fn lift<C>(element: C) -> Self
    where
        C: Convert<Input = I, Output = O> + 'static,
    {
        Self {
            element: Arc::new(element),
            _types: PhantomData,
        }
    }

    /// Map every element in order; the first failure aborts with its index
    pub fn apply(&self, source: Vec<I>) -> Result<Vec<O>> {
        let mut mapped = Vec::with_capacity(source.len());

        for (index, item) in source.into_iter().enumerate() {
            let value = self
                .element
                .apply(TypedValue::new(item))
                .and_then(|value| {
                    value.take::<O>().map_err(|found| Error::FinalTypeMismatch {
                        expected: TypeTag::of::<O>(),
                        found: found.type_tag(),
                    })
                })
                .map_err(|source| Error::Element {
                    index,
                    source: Box::new(source),
                })?;
            mapped.push(value);
        }

        Ok(mapped)
    }
}

impl<I: Value, O: Value> Convert for SequenceMapper<I, O> {
    type Input = Vec<I>;
    type Output = Vec<O>;

    fn convert(&self, input: Vec<I>) -> Result<Vec<O>> {
        self.apply(input)
    }
}

impl<I, O> Clone for SequenceMapper<I, O> {
    fn clone(&self) -> Self {
        Self {
            element: Arc::clone(&self.element),
            _types: PhantomData,
        }
    }
}
