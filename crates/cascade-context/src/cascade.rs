//! The cascade: layer onto inherited snapshot
//!
//! Pure functions, no caching. [`crate::Provider`] adds memoization and the
//! stability diagnostic on top.

use crate::layer::Layer;
use crate::snapshot::Snapshot;

/// Deep-merge `layer` onto `inherited`, producing a new snapshot
///
/// The inherited snapshot is only read. The result is built from owned
/// copies, so later compositions over the same `inherited` see its original
/// contents regardless of what happened to earlier results.
///
/// Per component name, mappings merge recursively and every other value in
/// the layer replaces the inherited one.
#[must_use]
pub fn compose(inherited: &Snapshot, layer: &Layer) -> Snapshot {
    let mut components = inherited.as_components().clone();
    for (name, overrides) in layer.components() {
        if let Some(existing) = components.get_mut(name) {
            existing.merge_from(overrides);
            continue;
        }
        components.insert(name.to_string(), overrides.clone());
    }
    Snapshot::from_components(components)
}

/// Would composing `layer` onto `inherited` change nothing?
///
/// True when every component in the layer already exists in `inherited` and
/// every overridden path already holds an equal value.
#[must_use]
pub fn is_noop(inherited: &Snapshot, layer: &Layer) -> bool {
    layer.components().all(|(name, overrides)| {
        inherited
            .component(name)
            .is_some_and(|existing| overrides.is_subsumed_by(existing))
    })
}

/// [`compose`], returning `inherited` itself when the layer is a no-op
#[must_use]
pub fn compose_or_reuse(inherited: &Snapshot, layer: &Layer) -> Snapshot {
    if is_noop(inherited, layer) {
        return inherited.clone();
    }
    compose(inherited, layer)
}
