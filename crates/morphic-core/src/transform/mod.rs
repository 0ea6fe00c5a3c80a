//! Single-step transformers and the composers built on them
//!
//! Every pipeline step satisfies [`Transformer`]: a fixed declared input and
//! output type plus one dynamically typed `apply`. Most steps are written
//! against the typed [`Convert`] trait instead, which derives the declared
//! types from its associated types and gets the runtime boundary check for
//! free through a blanket implementation.
//!
//! # Module Organization
//!
//! - [`chain`] - ordered, adjacency-checked pipelines
//! - [`sequence`] - lifting an element step over a whole `Vec`
//! - [`dispatch`] - discriminator-key dispatch over a registry
//! - [`validate`] - validator steps raising [`ValidationError`](crate::ValidationError)
//! - [`built_in`] - identity, parsing and downcasting steps
//!
//! # Example
//!
//! ```
//! use morphic_core::transform::{built_in::Parse, chain::Chain, step};
//!
//! let chain = Chain::<String, i64>::new(vec![step(Parse::<i64>::new())]);
//! assert_eq!(chain.apply("12".to_string()).unwrap(), 12);
//! ```
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod chain;
pub mod dispatch;
pub mod sequence;
pub mod validate;


use crate::error::{Error, Result};
use crate::types::{TypeTag, TypedValue, Value};
use std::marker::PhantomData;
use std::sync::Arc;

pub use built_in::{Downcast, Identity, Parse};
pub use chain::{Chain, TypedChain};
pub use dispatch::{Dispatcher, TransformRegistry};
pub use sequence::SequenceMapper;
pub use validate::{validator_fn, Validate, ValidatorStep};

/// The capability every pipeline step exposes
///
/// `apply` must reject values whose runtime type differs from
/// `input_type()` with [`Error::SourceTypeMismatch`], even inside a chain
/// whose structure was already verified.
pub trait Transformer: Send + Sync {
    fn input_type(&self) -> TypeTag;

    fn output_type(&self) -> TypeTag;

    fn apply(&self, value: TypedValue) -> Result<TypedValue>;

    /// Human-readable label used in logs
    fn name(&self) -> String {
        format!("{} -> {}", self.input_type(), self.output_type())
    }
}

/// A statically typed step
pub trait Convert: Send + Sync {
    type Input: Value;
    type Output: Value;

    fn convert(&self, input: Self::Input) -> Result<Self::Output>;
}

impl<C: Convert> Transformer for C {
    fn input_type(&self) -> TypeTag {
        TypeTag::of::<C::Input>()
    }

    fn output_type(&self) -> TypeTag {
        TypeTag::of::<C::Output>()
    }

    fn apply(&self, value: TypedValue) -> Result<TypedValue> {
        let input = value
            .take::<C::Input>()
            .map_err(|found| Error::SourceTypeMismatch {
                expected: TypeTag::of::<C::Input>(),
                found: found.type_tag(),
                field: None,
            })?;
        self.convert(input).map(TypedValue::new)
    }
}

/// Shared handle to a type-erased step
pub type SharedStep = Arc<dyn Transformer>;

/// Erase a step so it can sit in a heterogeneous list
pub fn step<T: Transformer + 'static>(transformer: T) -> SharedStep {
    Arc::new(transformer)
}

/// A step backed by a closure
pub struct FnConvert<I, O, F> {
    func: F,
    _types: PhantomData<fn(I) -> O>,
}

/// Build a [`Convert`] step from a closure
pub fn from_fn<I, O, F>(func: F) -> FnConvert<I, O, F>
where
    I: Value,
    O: Value,
    F: Fn(I) -> Result<O> + Send + Sync,
{
    FnConvert {
        func,
        _types: PhantomData,
    }
}

impl<I, O, F> Convert for FnConvert<I, O, F>
where
    I: Value,
    O: Value,
    F: Fn(I) -> Result<O> + Send + Sync,
{
    type Input = I;
    type Output = O;

    fn convert(&self, input: I) -> Result<O> {
        (self.func)(input)
    }
}
