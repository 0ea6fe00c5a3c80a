//! Error types for the Morphic core library
//!
//! Two severities exist. [`CompositionError`] describes a structurally invalid
//! pipeline and is raised while configuration is assembled; [`Error`] is the
//! call-scoped failure returned when a value cannot be mapped. Runtime errors
//! nest: each layer (element, step, field) wraps the cause with its own
//! locating context.

use crate::types::{TypeTag, TypedValue};
use thiserror::Error;

/// Main error type for mapping operations
#[derive(Error, Debug)]
pub enum Error {
    /// A value reached a step or binding with the wrong runtime type
    #[error("invalid source type: expected {expected}, got {found}{}", field_clause(.field))]
    SourceTypeMismatch {
        expected: TypeTag,
        found: TypeTag,
        field: Option<String>,
    },

    /// The value leaving a chain does not have the chain's declared destination type
    #[error("final type mismatch: expected {expected}, got {found}")]
    FinalTypeMismatch { expected: TypeTag, found: TypeTag },

    /// A chain step failed; `step` is 1-based
    #[error("mapper chain failed at step {step}: {source}")]
    Step { step: usize, source: Box<Error> },

    /// A sequence element failed; `index` is 0-based
    #[error("sequence element {index} failed: {source}")]
    Element { index: usize, source: Box<Error> },

    /// A field binding failed while transforming the named source field
    #[error("transform error [{field}]: {source}")]
    Transform { field: String, source: Box<Error> },

    /// No slot, accessor or key of this name exists on the source
    #[error("field or accessor {field:?} not found on source")]
    FieldNotFound { field: String },

    /// No settable slot or mutator of this name exists on the destination
    #[error("could not assign or call mutator for {field:?}")]
    AssignmentTargetNotFound { field: String },

    /// The destination slot exists but does not accept the value's type
    #[error("type mismatch: cannot assign {found} to {field:?} expecting {expected}")]
    AssignmentTypeMismatch {
        field: String,
        expected: TypeTag,
        found: TypeTag,
    },

    /// The discriminator key has no registered transform
    #[error("no transform for key: {key}")]
    NoTransformForKey { key: String },

    /// A domain rule rejected the value
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A converter could not produce its output
    #[error("conversion failed: {message}")]
    Conversion { message: String },

    /// JSON rendering of diagnostics failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure surfaced from step code written against `anyhow`
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn field_clause(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" for field {name:?}"),
        None => String::new(),
    }
}

fn named_field(field: &str) -> String {
    if field.is_empty() {
        String::new()
    } else {
        format!(" for field {field:?}")
    }
}

impl Error {
    /// Build a converter failure from a message
    pub fn conversion(message: impl Into<String>) -> Self {
        Error::Conversion {
            message: message.into(),
        }
    }

    /// Name of the field this error is attributed to, searching nested causes
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Transform { field, .. }
            | Error::FieldNotFound { field }
            | Error::AssignmentTargetNotFound { field }
            | Error::AssignmentTypeMismatch { field, .. } => Some(field),
            Error::SourceTypeMismatch { field, .. } => field.as_deref(),
            Error::Validation(err) if !err.field.is_empty() => Some(&err.field),
            Error::Step { source, .. } | Error::Element { source, .. } => source.field(),
            _ => None,
        }
    }

    /// 1-based index of the outermost failing chain step, if any
    pub fn step_index(&self) -> Option<usize> {
        match self {
            Error::Step { step, .. } => Some(*step),
            Error::Transform { source, .. } | Error::Element { source, .. } => source.step_index(),
            _ => None,
        }
    }

    /// 0-based index of the outermost failing sequence element, if any
    pub fn element_index(&self) -> Option<usize> {
        match self {
            Error::Element { index, .. } => Some(*index),
            Error::Transform { source, .. } | Error::Step { source, .. } => source.element_index(),
            _ => None,
        }
    }

    /// The innermost error, with all locating wrappers removed
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Step { source, .. }
            | Error::Element { source, .. }
            | Error::Transform { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

/// A domain-rule violation raised by a validator step
#[derive(Error, Debug, Clone)]
#[error("validation failed{}: {message}", named_field(.field))]
pub struct ValidationError {
    /// Field the value was destined for; empty when the validator runs outside a binding
    pub field: String,
    /// The offending value
    pub value: TypedValue,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, value: TypedValue, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value,
            message: message.into(),
        }
    }
}

/// Structural defect found while assembling a pipeline
///
/// No input can make such a pipeline succeed, so the panicking constructors
/// treat it as fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("first step must accept {expected}, got {found}")]
    SourceEndpoint { expected: TypeTag, found: TypeTag },

    #[error("last step must produce {expected}, got {found}")]
    DestinationEndpoint { expected: TypeTag, found: TypeTag },

    /// Step `index` (1-based) produces a type step `index + 1` does not accept
    #[error(
        "type mismatch between step {index} output ({output}) and step {} input ({input})",
        .index + 1
    )]
    Adjacency {
        index: usize,
        output: TypeTag,
        input: TypeTag,
    },

    #[error("element step must map {expected_input} to {expected_output}, got {found_input} to {found_output}")]
    ElementSignature {
        expected_input: TypeTag,
        expected_output: TypeTag,
        found_input: TypeTag,
        found_output: TypeTag,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::SourceTypeMismatch {
            expected: TypeTag::of::<String>(),
            found: TypeTag::of::<i32>(),
            field: Some("level".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid source type: expected String, got i32 for field \"level\""
        );
    }

    #[test]
    fn test_validation_display_with_and_without_field() {
        let err = ValidationError::new("level", TypedValue::new(0), "must be >= 1");
        assert_eq!(err.to_string(), "validation failed for field \"level\": must be >= 1");

        let err = ValidationError::new("", TypedValue::new(0), "must be >= 1");
        assert_eq!(err.to_string(), "validation failed: must be >= 1");
    }

    #[test]
    fn test_locating_nested_errors() {
        let err = Error::Transform {
            field: "items".to_string(),
            source: Box::new(Error::Step {
                step: 2,
                source: Box::new(Error::Element {
                    index: 3,
                    source: Box::new(Error::conversion("bad element")),
                }),
            }),
        };

        assert_eq!(err.field(), Some("items"));
        assert_eq!(err.step_index(), Some(2));
        assert_eq!(err.element_index(), Some(3));
        assert!(matches!(err.root_cause(), Error::Conversion { .. }));
        assert!(err.to_string().contains("mapper chain failed at step 2"));
    }

    #[test]
    fn test_adjacency_display() {
        let err = CompositionError::Adjacency {
            index: 1,
            output: TypeTag::of::<i32>(),
            input: TypeTag::of::<String>(),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch between step 1 output (i32) and step 2 input (String)"
        );
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("disk on fire").into();
        assert!(matches!(err, Error::Internal { .. }));
        assert!(err.to_string().contains("disk on fire"));
    }
}
