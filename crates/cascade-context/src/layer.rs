//! Configuration layers
//!
//! A [`Layer`] is the partial configuration one scope contributes. Its shape
//! is enforced at construction: a mapping of component names, each holding a
//! property mapping. Untyped input that does not fit is rejected with
//! [`LayerError`], so the cascade never sees a malformed layer.
//!
//! Like snapshots, layers carry a [`HandleId`]. Hold on to a layer and pass
//! the same handle on every pass while its contents are unchanged; a freshly
//! built layer forces recomposition and triggers an advisory diagnostic when
//! its contents turn out to be equal to the previous one.

use std::sync::Arc;

use cascade_value::{PropMap, PropValue};
use serde_json::Value as JsonValue;

use crate::error::LayerError;
use crate::handle::HandleId;
use crate::snapshot::{components_to_json, Components};

#[derive(Debug)]
struct LayerInner {
    id: HandleId,
    components: Components,
}

/// Partial per-component configuration introduced at one scope
///
/// Equality (`==`) compares contents. Use [`Layer::is_same`] for reference
/// identity.
#[derive(Debug, Clone)]
pub struct Layer {
    inner: Arc<LayerInner>,
}

impl Layer {
    /// Build from component entries
    pub fn new<I, K>(components: I) -> Self
    where
        I: IntoIterator<Item = (K, PropMap)>,
        K: Into<String>,
    {
        Self::from_components(
            components
                .into_iter()
                .map(|(name, props)| (name.into(), props))
                .collect(),
        )
    }

    /// Layer without overrides
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::from_components(Components::new())
    }

    /// Start a builder
    #[inline]
    #[must_use]
    pub fn builder() -> LayerBuilder {
        LayerBuilder::default()
    }

    fn from_components(components: Components) -> Self {
        Self {
            inner: Arc::new(LayerInner {
                id: HandleId::next(),
                components,
            }),
        }
    }

    /// Build from an untyped property map
    ///
    /// # Errors
    /// [`LayerError::ComponentNotAMapping`] if any entry is not a mapping
    pub fn from_props(props: PropMap) -> Result<Self, LayerError> {
        let mut components = Components::new();
        for (name, value) in props {
            match value {
                PropValue::Map(overrides) => {
                    components.insert(name, overrides);
                }
                other => {
                    return Err(LayerError::ComponentNotAMapping {
                        component: name,
                        found: other.kind(),
                    })
                }
            }
        }
        Ok(Self::from_components(components))
    }

    /// Build from a JSON value
    ///
    /// # Errors
    /// - [`LayerError::NotAMapping`] if the value is not an object
    /// - [`LayerError::ComponentNotAMapping`] if an entry is not an object
    pub fn from_json_value(value: JsonValue) -> Result<Self, LayerError> {
        match PropValue::from(value) {
            PropValue::Map(props) => Self::from_props(props),
            other => Err(LayerError::NotAMapping {
                found: other.kind(),
            }),
        }
    }

    /// Parse JSON text
    ///
    /// # Errors
    /// Parse failures and shape violations
    pub fn from_json(json: &str) -> Result<Self, LayerError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parse YAML text
    ///
    /// # Errors
    /// Parse failures and shape violations
    pub fn from_yaml(yaml: &str) -> Result<Self, LayerError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_json_value(value)
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
    pub fn is_same(&self, other: &Layer) -> bool {
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

    /// Number of components overridden
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.components.len()
    }

    /// No overrides?
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

    /// Compact JSON text, cut at `max_chars` characters
    #[must_use]
    pub fn render(&self, max_chars: usize) -> String {
        let text = self.to_json().to_string();
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text,
        }
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) || self.inner.components == other.inner.components
    }
}

/// Incremental [`Layer`] construction
#[derive(Debug, Default)]
pub struct LayerBuilder {
    components: Components,
}

impl LayerBuilder {
    /// Add overrides for a component
    ///
    /// Repeated calls for the same name merge, later values winning.
    #[must_use]
    pub fn component(mut self, name: impl Into<String>, props: PropMap) -> Self {
        let name = name.into();
        if let Some(existing) = self.components.get_mut(&name) {
            existing.merge_from(&props);
            return self;
        }
        self.components.insert(name, props);
        self
    }

    /// Finish with a fresh identity
    #[must_use]
    pub fn build(self) -> Layer {
        Layer::from_components(self.components)
    }
}
