//! Composed configuration snapshots
//!
//! A [`Snapshot`] is what a scope sees: component name to property
//! overrides, fully composed from every enclosing layer. Snapshots are
//! immutable and cheap to clone; clones share one allocation and one
//! [`HandleId`].

use std::collections::BTreeMap;
use std::sync::Arc;

use cascade_value::PropMap;
use once_cell::sync::Lazy;
use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::handle::HandleId;

/// Component name to property overrides
pub type Components = BTreeMap<String, PropMap>;

static ROOT: Lazy<Snapshot> = Lazy::new(|| Snapshot {
    inner: Arc::new(SnapshotInner {
        id: HandleId::ROOT,
        components: Components::new(),
    }),
});

#[derive(Debug)]
struct SnapshotInner {
    id: HandleId,
    components: Components,
}

/// Immutable composed configuration
///
/// Equality (`==`) compares contents. Use [`Snapshot::is_same`] for
/// reference identity.
#[derive(Debug, Clone)]
pub struct Snapshot {
    inner: Arc<SnapshotInner>,
}

impl Snapshot {
    /// The root snapshot: empty, with a fixed identity
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        ROOT.clone()
    }

    /// Publish a fully built component map under a fresh identity
    #[inline]
    pub(crate) fn from_components(components: Components) -> Self {
        Self {
            inner: Arc::new(SnapshotInner {
                id: HandleId::next(),
                components,
            }),
        }
    }

    /// Identity handle
    #[inline]
    #[must_use]
    pub fn id(&self) -> HandleId {
        self.inner.id
    }

    /// Same reference?
    #[inline]
    #[must_use]
    pub fn is_same(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Overrides for one component
    #[inline]
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&PropMap> {
        self.inner.components.get(name)
    }

    /// All component entries in name order
    #[inline]
    pub fn components(&self) -> impl Iterator<Item = (&str, &PropMap)> {
        self.inner
            .components
            .iter()
            .map(|(name, props)| (name.as_str(), props))
    }

    /// Borrow the underlying map
    #[inline]
    pub(crate) fn as_components(&self) -> &Components {
        &self.inner.components
    }

    /// Number of components with overrides
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.components.len()
    }

    /// No overrides at all?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.components.is_empty()
    }

    /// Render as JSON (opaque values omitted)
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        components_to_json(&self.inner.components)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) || self.inner.components == other.inner.components
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.components.serialize(serializer)
    }
}

pub(crate) fn components_to_json(components: &Components) -> JsonValue {
    JsonValue::Object(
        components
            .iter()
            .map(|(name, props)| (name.clone(), props.to_json()))
            .collect(),
    )
}
