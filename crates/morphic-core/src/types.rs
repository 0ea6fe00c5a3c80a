//! Field identity and runtime type tagging
//!
//! Everything that flows through a pipeline is carried as a [`TypedValue`]: the
//! value itself plus the [`TypeTag`] of its concrete type. Fields describe a
//! named slot in a source or destination shape without holding any data.
//!
//! Copyright (c) 2025 Morphic Team
//! Licensed under the Apache-2.0 license

use serde::{Serialize, Serializer};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bound shared by every value that can travel through a pipeline
pub trait Value: Any + Clone + Send + Sync {}

impl<T: Any + Clone + Send + Sync> Value for T {}

/// Runtime type tag of a value or a declared slot
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: Option<TypeId>,
    name: &'static str,
}

impl TypeTag {
    /// Tag of an absent value
    pub const NONE: TypeTag = TypeTag { id: None, name: "none" };

    /// Tag for the concrete type `T`
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: Some(TypeId::of::<T>()),
            name: type_name::<T>(),
        }
    }

    /// Tag of [`TypedValue`] itself. A slot declared with this tag accepts any value.
    pub fn dynamic() -> Self {
        Self::of::<TypedValue>()
    }

    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_dynamic(&self) -> bool {
        *self == Self::dynamic()
    }

    /// Whether a value tagged `actual` may occupy a slot declared with `self`
    pub fn accepts(&self, actual: &TypeTag) -> bool {
        self == actual || self.is_dynamic()
    }

    /// Fully qualified type name as reported by the compiler
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, e.g. `Vec<String>`
    pub fn short_name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.short_name())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short_name())
    }
}

/// Strip module paths from every path segment of a type name
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut token = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            token.push(ch);
        } else {
            flush_segment(&mut out, &mut token);
            out.push(ch);
        }
    }
    flush_segment(&mut out, &mut token);
    out
}

fn flush_segment(out: &mut String, token: &mut String) {
    if let Some(last) = token.rsplit("::").next() {
        out.push_str(last);
    }
    token.clear();
}

/// A value paired with the tag of its concrete runtime type
///
/// The tag is computed from the value at construction and never changes.
/// Wrapping a `TypedValue` in another `TypedValue` returns the original, so
/// values are never nested.
#[derive(Clone)]
pub struct TypedValue {
    inner: Option<Arc<dyn Any + Send + Sync>>,
    tag: TypeTag,
}

impl TypedValue {
    pub fn new<T: Value>(value: T) -> Self {
        if let Some(existing) = (&value as &dyn Any).downcast_ref::<TypedValue>() {
            return existing.clone();
        }
        Self {
            inner: Some(Arc::new(value)),
            tag: TypeTag::of::<T>(),
        }
    }

    /// The absent value, tagged [`TypeTag::NONE`]
    pub fn none() -> Self {
        Self {
            inner: None,
            tag: TypeTag::NONE,
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.tag == TypeTag::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref()?.downcast_ref::<T>()
    }

    /// Extract the wrapped value as `T`, handing the value back unchanged on mismatch
    ///
    /// Asking for `TypedValue` always succeeds and returns `self`.
    pub fn take<T: Value>(self) -> std::result::Result<T, TypedValue> {
        if TypeId::of::<T>() == TypeId::of::<TypedValue>() {
            let boxed: Box<dyn Any> = Box::new(self);
            // Infallible: T is TypedValue.
            return boxed.downcast::<T>().map(|v| *v).map_err(|_| TypedValue::none());
        }

        let tag = self.tag;
        match self.inner {
            Some(inner) if tag == TypeTag::of::<T>() => match inner.downcast::<T>() {
                Ok(shared) => Ok(Arc::try_unwrap(shared).unwrap_or_else(|shared| (*shared).clone())),
                Err(inner) => Err(TypedValue { inner: Some(inner), tag }),
            },
            inner => Err(TypedValue { inner, tag }),
        }
    }
}

impl fmt::Debug for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedValue<{}>", self.tag)
    }
}

/// A named, typed slot in a source or destination shape
///
/// Fields are configuration: they are created once and only describe what a
/// value should look like. Two fields are equal when name and type match,
/// and the type half is guaranteed by `T`.
pub struct Field<T> {
    name: String,
    _type: PhantomData<fn() -> T>,
}

impl<T: Any> Field<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    /// Drop the static type, keeping name and tag
    pub fn erase(&self) -> FieldDef {
        FieldDef::new(self.name.clone(), self.type_tag())
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _type: PhantomData,
        }
    }
}

impl<T> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for Field<T> {}

impl<T: Any> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &self.type_tag())
            .finish()
    }
}

/// Type-erased field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDef {
    name: String,
    #[serde(rename = "type")]
    type_tag: TypeTag,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_tag)
    }
}

impl<T: Any> From<&Field<T>> for FieldDef {
    fn from(field: &Field<T>) -> Self {
        field.erase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_names() {
        assert_eq!(TypeTag::of::<String>().to_string(), "String");
        assert_eq!(TypeTag::of::<Vec<String>>().to_string(), "Vec<String>");
        assert_eq!(TypeTag::of::<i32>().to_string(), "i32");
        assert_eq!(
            TypeTag::of::<std::collections::HashMap<String, Vec<u8>>>().to_string(),
            "HashMap<String, Vec<u8>>"
        );
        assert_eq!(TypeTag::NONE.to_string(), "none");
    }

    #[test]
    fn test_tag_tracks_runtime_type() {
        let value = TypedValue::new(42_i64);
        assert_eq!(value.type_tag(), TypeTag::of::<i64>());
        assert!(value.is::<i64>());
        assert!(!value.is::<i32>());
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));

        let absent = TypedValue::none();
        assert!(absent.is_none());
        assert!(absent.type_tag().is_none());
        assert_eq!(absent.downcast_ref::<i64>(), None);
    }

    #[test]
    fn test_typed_values_do_not_nest() {
        let inner = TypedValue::new("hello".to_string());
        let outer = TypedValue::new(inner);
        assert_eq!(outer.type_tag(), TypeTag::of::<String>());
        assert_eq!(outer.take::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_take_mismatch_returns_value() {
        let value = TypedValue::new(7_u8);
        let back = value.take::<String>().unwrap_err();
        assert_eq!(back.type_tag(), TypeTag::of::<u8>());
        assert_eq!(back.take::<u8>().unwrap(), 7);
    }

    #[test]
    fn test_take_dynamic_always_succeeds() {
        let value = TypedValue::new(vec![1, 2, 3]);
        let same = value.take::<TypedValue>().unwrap();
        assert_eq!(same.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_dynamic_tag_accepts_everything() {
        let dynamic = TypeTag::dynamic();
        assert!(dynamic.accepts(&TypeTag::of::<String>()));
        assert!(dynamic.accepts(&TypeTag::NONE));
        assert!(!TypeTag::of::<String>().accepts(&TypeTag::of::<i32>()));
    }

    #[test]
    fn test_field_identity() {
        let a = Field::<String>::new("name");
        let b = Field::<String>::new("name");
        let c = Field::<String>::new("other");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.erase(), FieldDef::new("name", TypeTag::of::<String>()));
        assert_ne!(a.erase(), Field::<i32>::new("name").erase());
    }
}
