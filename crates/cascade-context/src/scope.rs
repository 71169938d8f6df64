//! Explicit scope threading
//!
//! Instead of an ambient "nearest enclosing provider" lookup, the snapshot a
//! subtree sees travels in a [`Scope`] value passed down the build call
//! stack. Scopes are produced by [`Scope::root`] and by providers.

use std::fmt;
use std::sync::Arc;

use cascade_value::PropMap;

use crate::snapshot::Snapshot;

/// Position of a provider in the tree
///
/// The sequence of provider keys from the root. Used to key memo state in
/// [`crate::ScopeTree`] and to label diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopePath(Vec<Arc<str>>);

impl ScopePath {
    /// The root position
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Position one level below `self`
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Arc::from(key));
        Self(segments)
    }

    /// Key segments from the root
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|segment| &**segment)
    }

    /// Number of providers above this position
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// At the root?
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// The configuration context visible at one point of the tree
#[derive(Debug, Clone)]
pub struct Scope {
    snapshot: Snapshot,
    path: ScopePath,
}

impl Scope {
    /// Root scope: the empty snapshot
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self {
            snapshot: Snapshot::empty(),
            path: ScopePath::root(),
        }
    }

    #[inline]
    pub(crate) fn new(snapshot: Snapshot, path: ScopePath) -> Self {
        Self { snapshot, path }
    }

    /// Snapshot visible here
    #[inline]
    #[must_use]
    pub fn current_snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Overrides for one component, if any scope above set them
    #[inline]
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&PropMap> {
        self.snapshot.component(name)
    }

    /// Position of the provider that produced this scope
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ScopePath {
        &self.path
    }

    /// Number of providers above this scope
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.depth()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_scope_is_empty() {
        let scope = Scope::root();

        assert!(scope.current_snapshot().is_empty());
        assert!(scope.current_snapshot().is_same(&Snapshot::empty()));
        assert!(scope.path().is_root());
        assert_eq!(scope.component("Card"), None);
    }

    #[test]
    fn path_display_and_depth() {
        let path = ScopePath::root().child("outer").child("inner");

        assert_eq!(path.to_string(), "/outer/inner");
        assert_eq!(ScopePath::root().to_string(), "/");
        assert_eq!(path.depth(), 2);
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["outer", "inner"]);
    }

    #[test]
    fn sibling_paths_differ() {
        let parent = ScopePath::root().child("outer");

        assert_ne!(parent.child("a"), parent.child("b"));
        assert_eq!(parent.child("a"), parent.child("a"));
    }
}
