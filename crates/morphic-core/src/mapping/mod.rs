//! Field bindings and the aggregate mapper that drives them
//!
//! A [`FieldMapping`] binds one source field to one destination field through
//! a chain. An [`AggregateMapper`] applies an ordered list of bindings from a
//! source aggregate into a destination aggregate, reading and writing values
//! by field name.
//!
//! # Module Organization
//!
//! - [`binding`] - typed bindings and their erased form
//! - [`builder`] - the staged binding builder
//! - [`aggregate`] - name resolution and the aggregate mapper
//! - [`record`] - keyed-map aggregates
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

pub mod aggregate;
pub mod binding;
pub mod builder;
pub mod record;


pub use aggregate::{
    assign, AggregateMapper, Assignment, BindingDescriptor, SourceAggregate, TargetAggregate,
};
pub use binding::{FieldMapper, FieldMapping, FieldMappingResult, SharedMapper};
pub use builder::FieldMappingBuilder;
pub use record::{get_field, Record};
