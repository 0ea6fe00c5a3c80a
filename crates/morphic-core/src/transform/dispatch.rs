//! Discriminator-key dispatch
//!
//! When the right transformation depends on a runtime tag carried by the
//! source (an operator, a kind, a variant name), a [`Dispatcher`] computes the
//! key and routes the value to the transform registered under it.
//!
//! ```
//! use morphic_core::transform::dispatch::{Dispatcher, TransformRegistry};
//!
//! #[derive(Clone)]
//! struct Op { kind: String, value: i64 }
//!
//! let registry = TransformRegistry::<String, Op, i64>::new()
//!     .register_fn("double".to_string(), |op: &Op| Ok(op.value * 2))
//!     .register_fn("triple".to_string(), |op: &Op| Ok(op.value * 3));
//! let dispatcher = Dispatcher::new(registry, |op: &Op| op.kind.clone());
//!
//! let op = Op { kind: "triple".to_string(), value: 3 };
//! assert_eq!(dispatcher.dispatch(&op).unwrap(), 9);
//! ```
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use super::Convert;
use crate::error::{Error, Result};
use crate::types::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Transform invoked with the source value and the entry's metadata
pub type TransformFn<S, D, M> = Arc<dyn Fn(&S, &M) -> Result<D> + Send + Sync>;

/// A registered transform together with its metadata
pub struct TransformEntry<S, D, M> {
    transform: TransformFn<S, D, M>,
    meta: M,
}

impl<S, D, M> TransformEntry<S, D, M> {
    pub fn meta(&self) -> &M {
        &self.meta
    }
}

/// Key -> (transform, metadata) table, read-only once handed to a [`Dispatcher`]
pub struct TransformRegistry<K, S, D, M = ()> {
    entries: HashMap<K, TransformEntry<S, D, M>>,
}

impl<K: Eq + Hash, S, D, M> TransformRegistry<K, S, D, M> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a transform; a later registration under the same key replaces the earlier one
    pub fn register<F>(mut self, key: K, meta: M, transform: F) -> Self
    where
        F: Fn(&S, &M) -> Result<D> + Send + Sync + 'static,
    {
        self.entries.insert(
            key,
            TransformEntry {
                transform: Arc::new(transform),
                meta,
            },
        );
        self
    }

    pub fn get(&self, key: &K) -> Option<&TransformEntry<S, D, M>> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys in arbitrary order
    pub fn keys(&self) -> Vec<&K> {
        self.entries.keys().collect()
    }
}

impl<K: Eq + Hash, S: 'static, D: 'static> TransformRegistry<K, S, D, ()> {
    /// Register a transform that needs no metadata
    pub fn register_fn<F>(self, key: K, transform: F) -> Self
    where
        F: Fn(&S) -> Result<D> + Send + Sync + 'static,
    {
        self.register(key, (), move |source, _| transform(source))
    }
}

impl<K: Eq + Hash, S, D, M> Default for TransformRegistry<K, S, D, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes each source value to the transform registered under its key
pub struct Dispatcher<K, S, D, M = ()> {
    registry: TransformRegistry<K, S, D, M>,
    key_fn: Arc<dyn Fn(&S) -> K + Send + Sync>,
}

impl<K, S, D, M> Dispatcher<K, S, D, M>
where
    K: Eq + Hash + Debug,
{
    pub fn new<F>(registry: TransformRegistry<K, S, D, M>, key_fn: F) -> Self
    where
        F: Fn(&S) -> K + Send + Sync + 'static,
    {
        Self {
            registry,
            key_fn: Arc::new(key_fn),
        }
    }

    /// Compute the key and invoke its transform
    ///
    /// An unregistered key yields [`Error::NoTransformForKey`] without
    /// invoking any transform. Errors from the transform are returned as is.
    pub fn dispatch(&self, source: &S) -> Result<D> {
        let key = (self.key_fn)(source);
        let Some(entry) = self.registry.get(&key) else {
            log::debug!("no transform registered for key {:?}", key);
            return Err(Error::NoTransformForKey {
                key: format!("{key:?}"),
            });
        };
        (entry.transform)(source, &entry.meta)
    }

    /// Registered keys in arbitrary order
    pub fn supported_keys(&self) -> Vec<&K> {
        self.registry.keys()
    }

    pub fn registry(&self) -> &TransformRegistry<K, S, D, M> {
        &self.registry
    }
}

impl<K, S, D, M> Convert for Dispatcher<K, S, D, M>
where
    K: Eq + Hash + Debug + Send + Sync,
    S: Value,
    D: Value,
    M: Send + Sync,
{
    type Input = S;
    type Output = D;

    fn convert(&self, input: S) -> Result<D> {
        self.dispatch(&input)
    }
}
