//! Applying a list of field bindings across two aggregate shapes
//!
//! Values are read from and written to aggregates by field name. An aggregate
//! type opts in by implementing [`SourceAggregate`] and/or
//! [`TargetAggregate`], answering only the names it owns; no reflection is
//! involved. A binding may instead carry an explicit lens (getter and setter
//! closures), which bypasses name resolution for that binding.
//!
//! Reads try three tiers in order, first match wins: a direct slot, a
//! zero-argument accessor, a keyed lookup. Writes try two tiers: a settable
//! slot, then a single-argument mutator.
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::binding::{FieldMapper, SharedMapper};
use crate::error::{Error, Result};
use crate::transform::Convert;
use crate::types::{FieldDef, TypeTag, TypedValue, Value};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of offering a value to one write tier
#[derive(Debug)]
pub enum Assignment {
    /// The value was stored
    Assigned,
    /// The name exists but its declared type does not accept the value
    Rejected { expected: TypeTag, value: TypedValue },
    /// This tier has nothing under the name; the value is handed back
    Missing(TypedValue),
}

/// Store `value` into `slot` when the types match
///
/// The usual body of a [`TargetAggregate`] match arm:
///
/// ```
/// use morphic_core::mapping::aggregate::{assign, Assignment, TargetAggregate};
/// use morphic_core::TypedValue;
///
/// #[derive(Default)]
/// struct Model { level: i64 }
///
/// impl TargetAggregate for Model {
///     fn set_slot(&mut self, name: &str, value: TypedValue) -> Assignment {
///         match name {
///             "level" => assign(&mut self.level, value),
///             _ => Assignment::Missing(value),
///         }
///     }
/// }
/// ```
pub fn assign<T: Value>(slot: &mut T, value: TypedValue) -> Assignment {
    match value.take::<T>() {
        Ok(v) => {
            *slot = v;
            Assignment::Assigned
        }
        Err(value) => Assignment::Rejected {
            expected: TypeTag::of::<T>(),
            value,
        },
    }
}

/// Name-based read access to an aggregate
///
/// Every tier defaults to "not here", so an implementation only overrides
/// the tiers its shape has.
pub trait SourceAggregate {
    /// A direct field of the record
    fn slot(&self, _name: &str) -> Option<TypedValue> {
        None
    }

    /// A zero-argument accessor method
    fn accessor(&self, _name: &str) -> Option<TypedValue> {
        None
    }

    /// A key of a keyed map
    fn key(&self, _name: &str) -> Option<TypedValue> {
        None
    }
}

/// Name-based write access to an aggregate
pub trait TargetAggregate {
    /// A settable field of the record
    fn set_slot(&mut self, _name: &str, value: TypedValue) -> Assignment {
        Assignment::Missing(value)
    }

    /// A single-argument mutator method
    fn call_mutator(&mut self, _name: &str, value: TypedValue) -> Assignment {
        Assignment::Missing(value)
    }
}

/// Resolve a value through the read tiers
pub fn extract<S: SourceAggregate + ?Sized>(source: &S, name: &str) -> Option<TypedValue> {
    source
        .slot(name)
        .or_else(|| source.accessor(name))
        .or_else(|| source.key(name))
}

/// Store a value through the write tiers
///
/// A tier that rejects the type does not stop the search; if no tier
/// assigns, the first rejection is reported as a type mismatch.
pub fn assign_by_name<D: TargetAggregate + ?Sized>(dest: &mut D, name: &str, value: TypedValue) -> Result<()> {
    let mut rejected = None;

    let value = match dest.set_slot(name, value) {
        Assignment::Assigned => return Ok(()),
        Assignment::Rejected { expected, value } => {
            rejected = Some(expected);
            value
        }
        Assignment::Missing(value) => value,
    };

    let outcome = dest.call_mutator(name, value);
    settle(name, rejected, outcome)
}

fn settle(name: &str, rejected: Option<TypeTag>, outcome: Assignment) -> Result<()> {
    match (outcome, rejected) {
        (Assignment::Assigned, _) => Ok(()),
        (Assignment::Rejected { value, .. }, Some(expected))
        | (Assignment::Missing(value), Some(expected))
        | (Assignment::Rejected { expected, value }, None) => Err(Error::AssignmentTypeMismatch {
            field: name.to_string(),
            expected,
            found: value.type_tag(),
        }),
        (Assignment::Missing(_), None) => Err(Error::AssignmentTargetNotFound {
            field: name.to_string(),
        }),
    }
}

type Getter<S> = Arc<dyn Fn(&S) -> Option<TypedValue> + Send + Sync>;
type Setter<D> = Arc<dyn Fn(&mut D, TypedValue) -> Assignment + Send + Sync>;

enum Resolution<S, D> {
    ByName,
    Lens { get: Getter<S>, set: Setter<D> },
}

struct Binding<S, D> {
    mapper: SharedMapper,
    resolution: Resolution<S, D>,
}

/// One entry of [`AggregateMapper::describe`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingDescriptor {
    /// 1-based position in application order
    pub position: usize,
    pub source: FieldDef,
    pub target: FieldDef,
    /// `"name"` or `"lens"`
    pub resolution: &'static str,
}

/// Applies field bindings, in order, from an `S` into a `D`
pub struct AggregateMapper<S, D> {
    bindings: Vec<Binding<S, D>>,
}

impl<S, D> AggregateMapper<S, D> {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Build a mapper whose bindings all resolve by name
    pub fn with_mappings<I>(mappings: I) -> Self
    where
        I: IntoIterator<Item = SharedMapper>,
    {
        Self {
            bindings: mappings
                .into_iter()
                .map(|mapper| Binding {
                    mapper,
                    resolution: Resolution::ByName,
                })
                .collect(),
        }
    }

    /// Append a binding that resolves both fields by name
    pub fn bind<M: FieldMapper + 'static>(self, mapping: M) -> Self {
        self.bind_shared(Arc::new(mapping))
    }

    pub fn bind_shared(mut self, mapping: SharedMapper) -> Self {
        self.bindings.push(Binding {
            mapper: mapping,
            resolution: Resolution::ByName,
        });
        self
    }

    /// Append a binding that reads and writes through explicit closures
    ///
    /// The getter returning `None` is reported as a missing source field; the
    /// setter is only called with a value of type `B`.
    pub fn bind_with_lens<M, A, B, G, P>(mut self, mapping: M, get: G, set: P) -> Self
    where
        M: FieldMapper + 'static,
        A: Value,
        B: Value,
        G: Fn(&S) -> Option<A> + Send + Sync + 'static,
        P: Fn(&mut D, B) + Send + Sync + 'static,
        S: 'static,
        D: 'static,
    {
        let getter: Getter<S> = Arc::new(move |source: &S| get(source).map(TypedValue::new));
        let setter: Setter<D> = Arc::new(move |dest: &mut D, value: TypedValue| match value.take::<B>() {
            Ok(v) => {
                set(dest, v);
                Assignment::Assigned
            }
            Err(value) => Assignment::Rejected {
                expected: TypeTag::of::<B>(),
                value,
            },
        });
        self.bindings.push(Binding {
            mapper: Arc::new(mapping),
            resolution: Resolution::Lens {
                get: getter,
                set: setter,
            },
        });
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The binding plan in application order
    pub fn describe(&self) -> Vec<BindingDescriptor> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| BindingDescriptor {
                position: index + 1,
                source: binding.mapper.source_field(),
                target: binding.mapper.target_field(),
                resolution: match binding.resolution {
                    Resolution::ByName => "name",
                    Resolution::Lens { .. } => "lens",
                },
            })
            .collect()
    }

    pub fn describe_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.describe())?)
    }
}

impl<S, D> Default for AggregateMapper<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SourceAggregate, D: TargetAggregate> AggregateMapper<S, D> {
    /// Apply every binding to `dest`, stopping at the first failure
    ///
    /// On error `dest` keeps the values written by the bindings that ran
    /// before the failing one; no later binding is evaluated.
    pub fn map_into(&self, source: &S, dest: &mut D) -> Result<()> {
        let span = tracing::debug_span!("aggregate_map", bindings = self.bindings.len());
        let _entered = span.enter();

        for (index, binding) in self.bindings.iter().enumerate() {
            log::trace!(
                "applying binding {} ({} -> {})",
                index + 1,
                binding.mapper.source_field(),
                binding.mapper.target_field()
            );
            if let Err(err) = apply_binding(binding, source, dest) {
                log::debug!("binding {} failed after {} succeeded: {}", index + 1, index, err);
                return Err(err);
            }
        }

        log::trace!("mapped {} bindings", self.bindings.len());
        Ok(())
    }

    /// Map into a fresh `D::default()`, discarding the partial value on failure
    pub fn map(&self, source: &S) -> Result<D>
    where
        D: Default,
    {
        let mut dest = D::default();
        self.map_into(source, &mut dest)?;
        Ok(dest)
    }
}

fn apply_binding<S: SourceAggregate, D: TargetAggregate>(
    binding: &Binding<S, D>,
    source: &S,
    dest: &mut D,
) -> Result<()> {
    let from = binding.mapper.source_field();
    let to = binding.mapper.target_field();

    let raw = match &binding.resolution {
        Resolution::ByName => extract(source, from.name()),
        Resolution::Lens { get, .. } => get(source),
    }
    .ok_or_else(|| Error::FieldNotFound {
        field: from.name().to_string(),
    })?;

    let mapped = binding.mapper.map(raw).map_err(|err| Error::Transform {
        field: from.name().to_string(),
        source: Box::new(err),
    })?;

    let value = mapped.into_value();
    match &binding.resolution {
        Resolution::ByName => assign_by_name(dest, to.name(), value),
        Resolution::Lens { set, .. } => settle(to.name(), None, set(dest, value)),
    }
}

impl<S, D> Convert for AggregateMapper<S, D>
where
    S: SourceAggregate + Value,
    D: TargetAggregate + Default + Value,
{
    type Input = S;
    type Output = D;

    fn convert(&self, input: S) -> Result<D> {
        self.map(&input)
    }
}
