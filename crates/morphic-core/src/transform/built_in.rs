//! Built-in steps for common operations
//!
//! Domain converters belong to callers; these are the generic building
//! blocks every mapping ends up needing.
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::Convert;
use crate::error::{Error, Result};
use crate::types::{TypeTag, TypedValue, Value};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Pass the value through unchanged
pub struct Identity<T>(PhantomData<fn() -> T>);

impl<T: Value> Identity<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Value> Default for Identity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> Convert for Identity<T> {
    type Input = T;
    type Output = T;

    fn convert(&self, input: T) -> Result<T> {
        Ok(input)
    }
}

/// Narrow a dynamically typed value to `T`
///
/// This is the step that follows a loosely typed source field, such as a
/// [`Record`](crate::mapping::record::Record) entry read through a
/// `Field<TypedValue>`.
pub struct Downcast<T>(PhantomData<fn() -> T>);

impl<T: Value> Downcast<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Value> Default for Downcast<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> Convert for Downcast<T> {
    type Input = TypedValue;
    type Output = T;

    fn convert(&self, input: TypedValue) -> Result<T> {
        input.take::<T>().map_err(|found| Error::SourceTypeMismatch {
            expected: TypeTag::of::<T>(),
            found: found.type_tag(),
            field: None,
        })
    }
}

/// Parse a string with [`FromStr`]
pub struct Parse<T>(PhantomData<fn() -> T>);

impl<T> Parse<T>
where
    T: Value + FromStr,
    T::Err: fmt::Display,
{
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Parse<T>
where
    T: Value + FromStr,
    T::Err: fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Convert for Parse<T>
where
    T: Value + FromStr,
    T::Err: fmt::Display,
{
    type Input = String;
    type Output = T;

    fn convert(&self, input: String) -> Result<T> {
        input.trim().parse::<T>().map_err(|err| {
            Error::conversion(format!(
                "cannot parse {:?} as {}: {}",
                input,
                TypeTag::of::<T>(),
                err
            ))
        })
    }
}
