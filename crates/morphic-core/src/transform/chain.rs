//! Ordered transformation pipelines
//!
//! A [`Chain`] threads a value through its steps left to right. Its structure
//! (endpoints and adjacency of declared step types) is verified once, when the
//! chain is assembled; each call then only re-checks value tags.
//!
//! Chains over erased steps are verified at runtime by [`Chain::try_new`].
//! Chains assembled from typed steps through [`TypedChain`] are verified by
//! the compiler instead.
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::{Convert, SharedStep};
use crate::error::{CompositionError, Error, Result};
use crate::types::{TypeTag, TypedValue, Value};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A verified pipeline from `S` to `D`
pub struct Chain<S, D> {
    steps: Vec<SharedStep>,
    _types: PhantomData<fn(S) -> D>,
}

impl<S: Value, D: Value> Chain<S, D> {
    /// Assemble a chain, checking endpoints first and then every adjacent pair
    ///
    /// A chain without steps is accepted here; see [`Chain::apply`] for how
    /// it behaves.
    pub fn try_new<I>(steps: I) -> std::result::Result<Self, CompositionError>
    where
        I: IntoIterator<Item = SharedStep>,
    {
        let steps: Vec<SharedStep> = steps.into_iter().collect();
        verify_structure(TypeTag::of::<S>(), TypeTag::of::<D>(), &steps)?;
        Ok(Self::from_verified(steps))
    }

    /// Assemble a chain, treating a structural defect as fatal
    ///
    /// # Panics
    ///
    /// Panics when [`Chain::try_new`] would fail. A chain whose step types do
    /// not line up can never accept a valid input, so this is a
    /// configuration defect rather than a data error.
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = SharedStep>,
    {
        match Self::try_new(steps) {
            Ok(chain) => chain,
            Err(err) => {
                log::warn!(
                    "rejecting mapper chain {} -> {}: {}",
                    TypeTag::of::<S>(),
                    TypeTag::of::<D>(),
                    err
                );
                panic!("invalid mapper chain: {err}");
            }
        }
    }

    pub(crate) fn from_verified(steps: Vec<SharedStep>) -> Self {
        Self {
            steps,
            _types: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Declared (input, output) types of each step, in order
    pub fn signature(&self) -> Vec<(TypeTag, TypeTag)> {
        self.steps
            .iter()
            .map(|step| (step.input_type(), step.output_type()))
            .collect()
    }

    /// Run the input through every step
    ///
    /// Stops at the first failing step and reports its 1-based index. The
    /// final value must carry the tag of `D`; an empty chain therefore acts as
    /// the identity when `S` and `D` coincide and fails with
    /// [`Error::FinalTypeMismatch`] otherwise.
    pub fn apply(&self, input: S) -> Result<D> {
        let mut current = TypedValue::new(input);

        for (index, step) in self.steps.iter().enumerate() {
            current = step.apply(current).map_err(|source| {
                log::debug!("mapper chain failed at step {} ({}): {}", index + 1, step.name(), source);
                Error::Step {
                    step: index + 1,
                    source: Box::new(source),
                }
            })?;
        }

        current.take::<D>().map_err(|found| Error::FinalTypeMismatch {
            expected: TypeTag::of::<D>(),
            found: found.type_tag(),
        })
    }
}

impl<S: Value, D: Value> Convert for Chain<S, D> {
    type Input = S;
    type Output = D;

    fn convert(&self, input: S) -> Result<D> {
        self.apply(input)
    }
}

impl<S, D> Clone for Chain<S, D> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            _types: PhantomData,
        }
    }
}

impl<S: Value, D: Value> fmt::Debug for Chain<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(|step| step.name()).collect();
        f.debug_struct("Chain")
            .field("source", &TypeTag::of::<S>())
            .field("destination", &TypeTag::of::<D>())
            .field("steps", &steps)
            .finish()
    }
}

fn verify_structure(
    source: TypeTag,
    destination: TypeTag,
    steps: &[SharedStep],
) -> std::result::Result<(), CompositionError> {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return Ok(());
    };

    if first.input_type() != source {
        return Err(CompositionError::SourceEndpoint {
            expected: source,
            found: first.input_type(),
        });
    }

    if last.output_type() != destination {
        return Err(CompositionError::DestinationEndpoint {
            expected: destination,
            found: last.output_type(),
        });
    }

    for (index, pair) in steps.windows(2).enumerate() {
        let (output, input) = (pair[0].output_type(), pair[1].input_type());
        if output != input {
            return Err(CompositionError::Adjacency {
                index: index + 1,
                output,
                input,
            });
        }
    }

    Ok(())
}

/// Builder whose type parameter tracks the output of the last step added
///
/// ```
/// use morphic_core::transform::{built_in::Parse, chain::TypedChain, from_fn};
///
/// let chain = TypedChain::<String, String>::new()
///     .then(Parse::<i64>::new())
///     .then(from_fn(|n: i64| Ok(n * 2)))
///     .build();
/// assert_eq!(chain.apply("21".to_string()).unwrap(), 42);
/// ```
pub struct TypedChain<S, Cur> {
    steps: Vec<SharedStep>,
    _types: PhantomData<fn(S) -> Cur>,
}

impl<S: Value> TypedChain<S, S> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _types: PhantomData,
        }
    }
}

impl<S: Value> Default for TypedChain<S, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Value, Cur: Value> TypedChain<S, Cur> {
    /// Append a step that accepts the current output type
    pub fn then<C>(self, step: C) -> TypedChain<S, C::Output>
    where
        C: Convert<Input = Cur> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Arc::new(step));
        TypedChain {
            steps,
            _types: PhantomData,
        }
    }

    pub fn build(self) -> Chain<S, Cur> {
        Chain::from_verified(self.steps)
    }
}
