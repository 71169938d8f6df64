//! Connected-component prop resolution
//!
//! The consumer side of the cascade: a component looks up the overrides for
//! its own name and splices them into the props it was given.
//!
//! Precedence, lowest to highest:
//! 1. Context props for the component (everything except `_overrides`)
//! 2. Props passed explicitly to the component
//! 3. The `_overrides` mapping from the context
//!
//! Each step is a shallow, per-key replacement. If the props after step 2
//! carry a `renderChildren` callback, it is called with those props and its
//! result becomes `children`; otherwise `children` is taken from them.
//! Overrides never replace `children`.

use cascade_value::{PropMap, PropValue};

use crate::scope::Scope;

/// Context key whose mapping beats explicitly passed props
pub const OVERRIDES_KEY: &str = "_overrides";

/// Prop holding a callback that renders children from the resolved props
pub const RENDER_CHILDREN_KEY: &str = "renderChildren";

/// Prop holding the rendered children
pub const CHILDREN_KEY: &str = "children";

/// A component that reads its overrides from the cascade
pub trait Connected {
    /// Component name the overrides are keyed by
    const NAMESPACE: &'static str;

    /// Resolve props for this component in `scope`
    fn resolve(scope: &Scope, own_props: &PropMap) -> PropMap {
        resolve_props(scope, Self::NAMESPACE, own_props)
    }
}

/// Resolve the final props of `component` in `scope`
///
/// A non-mapping `_overrides` value is ignored.
#[must_use]
pub fn resolve_props(scope: &Scope, component: &str, own_props: &PropMap) -> PropMap {
    let mut resolved = PropMap::new();
    let mut overrides = None;

    if let Some(context_props) = scope.component(component) {
        for (key, value) in context_props {
            if key == OVERRIDES_KEY {
                overrides = value.as_map();
            } else {
                resolved.insert(key.clone(), value.clone());
            }
        }
    }
    resolved.extend(own_props.iter().map(|(k, v)| (k.clone(), v.clone())));

    let children = render_children(&resolved);

    if let Some(overrides) = overrides {
        resolved.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    match children {
        Some(children) => {
            resolved.insert(CHILDREN_KEY, children);
        }
        None => {
            resolved.remove(CHILDREN_KEY);
        }
    }
    resolved
}

fn render_children(props: &PropMap) -> Option<PropValue> {
    let callback = props
        .get(RENDER_CHILDREN_KEY)
        .and_then(PropValue::as_opaque)
        .and_then(|opaque| opaque.as_callback());
    match callback {
        Some(callback) => Some(callback.call(props)),
        None => props.get(CHILDREN_KEY).cloned(),
    }
}
