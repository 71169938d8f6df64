//! Property value model
//!
//! A [`PropValue`] is either a mapping ([`PropMap`]) that merges
//! recursively, or a leaf that replaces whatever it lands on.

use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

use serde_json::Number;

use crate::map::PropMap;

/// A single property value
///
/// Only [`PropValue::Map`] participates in deep merging. Every other variant
/// is a leaf: when a layer carries a leaf at some path, it overwrites the
/// inherited value on that path wholesale. Lists are leaves too.
///
/// Numbers compare by numeric value, so `10` equals `10.0`. Integers beyond
/// 2^53 compared against floats are compared after conversion to `f64`.
#[derive(Debug, Clone)]
pub enum PropValue {
    /// Explicit null (overwrites like any other leaf)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(Number),
    /// String value
    Text(String),
    /// Ordered list (replaced, never merged element-wise)
    List(Vec<PropValue>),
    /// Nested mapping (merged recursively)
    Map(PropMap),
    /// Opaque payload compared by identity (callbacks, handles)
    Opaque(OpaqueValue),
}

impl PropValue {
    /// Short name of the variant, used in error messages
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Opaque(_) => "opaque",
        }
    }

    /// True for every variant except [`PropValue::Map`]
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Map(_))
    }

    /// Borrow as mapping
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&PropMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Read as boolean
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Read as signed integer
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Read as float
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Borrow as opaque payload
    #[inline]
    #[must_use]
    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            Self::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(a, b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    a == b
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for PropValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for PropValue {
    /// Non-finite floats have no numeric representation and become `Null`
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<PropMap> for PropValue {
    fn from(value: PropMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(value: Vec<PropValue>) -> Self {
        Self::List(value)
    }
}

impl From<OpaqueValue> for PropValue {
    fn from(value: OpaqueValue) -> Self {
        Self::Opaque(value)
    }
}

/// Identity-compared payload
///
/// Wraps any shareable value. Clones share the payload; two opaque values
/// are equal only when they point at the same allocation, never by content.
#[derive(Clone)]
pub struct OpaqueValue {
    label: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    /// Wrap a payload under a human-readable label
    #[must_use]
    pub fn new<T: Any + Send + Sync>(label: impl Into<Arc<str>>, payload: T) -> Self {
        Self {
            label: label.into(),
            payload: Arc::new(payload),
        }
    }

    /// Wrap an already shared payload (keeps its identity)
    #[must_use]
    pub fn from_arc(label: impl Into<Arc<str>>, payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            label: label.into(),
            payload,
        }
    }

    /// Wrap a property callback
    #[must_use]
    pub fn callback<F>(label: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(&PropMap) -> PropValue + Send + Sync + 'static,
    {
        Self::new(label, Callback(Box::new(f)))
    }

    /// Label given at construction
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Downcast the payload
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Payload as callback, if it is one
    #[inline]
    #[must_use]
    pub fn as_callback(&self) -> Option<&Callback> {
        self.downcast_ref::<Callback>()
    }

    /// Same allocation?
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.payload).cast::<()>() == Arc::as_ptr(&other.payload).cast::<()>()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.label)
    }
}

/// Callback stored inside an [`OpaqueValue`]
pub struct Callback(Box<dyn Fn(&PropMap) -> PropValue + Send + Sync>);

impl Callback {
    /// Invoke with the resolved props
    #[inline]
    pub fn call(&self, props: &PropMap) -> PropValue {
        (self.0)(props)
    }
}

impl Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}
