//! Morphic Core - typed field-level mapping pipelines
//!
//! This crate composes, validates and executes transformation pipelines that
//! convert one structured shape into another (DTO to model style mapping).
//!
//! # Main Components
//!
//! - **Types**: [`Field`], [`TypedValue`] and [`TypeTag`], the identity and
//!   runtime type-tagging primitives
//! - **Transformers**: the single-step contract ([`Transformer`], [`Convert`])
//!   and the composers built on it: chains, sequence lifting, discriminator
//!   dispatch
//! - **Mapping**: field bindings, the staged binding builder and the
//!   aggregate mapper with its name-resolution protocol
//! - **Error Handling**: [`Error`] for call-scoped failures and
//!   [`CompositionError`] for structurally invalid configuration
//!
//! # Example
//!
//! ```
//! use morphic_core::mapping::{AggregateMapper, FieldMappingBuilder, Record};
//! use morphic_core::transform::built_in::Parse;
//! use morphic_core::{Field, Result, TypedValue};
//!
//! fn example() -> Result<()> {
//!     let level = FieldMappingBuilder::from(Field::<String>::new("level"))
//!         .to(Field::<i64>::new("level"))
//!         .convert_with(Parse::<i64>::new())
//!         .skip_validation()
//!         .build();
//!
//!     let mapper = AggregateMapper::<Record, Record>::new().bind(level);
//!
//!     let mut source = Record::new();
//!     source.insert("level".to_string(), TypedValue::new("12".to_string()));
//!
//!     let output = mapper.map(&source)?;
//!     assert_eq!(output["level"].downcast_ref::<i64>(), Some(&12));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod mapping;
pub mod transform;
pub mod types;

// Re-export main types for convenience
pub use error::{CompositionError, Error, Result, ValidationError};
pub use mapping::{
    AggregateMapper, FieldMapper, FieldMapping, FieldMappingBuilder, FieldMappingResult, Record,
    SourceAggregate, TargetAggregate,
};
pub use transform::{
    from_fn, step, Chain, Convert, Dispatcher, SequenceMapper, SharedStep, Transformer,
    TransformRegistry, TypedChain,
};
pub use types::{Field, FieldDef, TypeTag, TypedValue, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
