//! Property maps and the deep merge
//!
//! Merge semantics:
//! - Map onto map: merge by key (recursive)
//! - Anything else: the overlay value replaces the base value
//!
//! Merging never touches the base. The result is built from owned clones, so
//! it shares no mutable structure with either input; only opaque payloads are
//! shared, and those are compared by identity anyway.

use std::collections::btree_map::{self, BTreeMap};

use crate::value::PropValue;

/// Mapping from property name to value
///
/// Keys are kept sorted; insertion order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropMap(BTreeMap<String, PropValue>);

impl PropMap {
    /// Empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert, returning the previous value
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.0.remove(key)
    }

    /// Lookup a key
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.0.get(key)
    }

    /// Lookup a nested path of map keys
    ///
    /// ```
    /// # use cascade_value::PropMap;
    /// let props = PropMap::new().with("style", PropMap::new().with("display", "block"));
    /// assert_eq!(
    ///     props.get_path(&["style", "display"]).and_then(|v| v.as_str()),
    ///     Some("block")
    /// );
    /// ```
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&PropValue> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get(segment)?.as_map()?;
        }
        current.get(last)
    }

    /// Key present?
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No entries?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, PropValue> {
        self.0.iter()
    }

    /// Iterate keys in order
    #[inline]
    pub fn keys(&self) -> btree_map::Keys<'_, String, PropValue> {
        self.0.keys()
    }

    /// Merge `overlay` into `self` in place
    ///
    /// `self` must be an owned working copy; callers holding a shared base
    /// should use [`PropMap::merged`].
    pub fn merge_from(&mut self, overlay: &PropMap) {
        for (key, incoming) in overlay.iter() {
            if let (Some(PropValue::Map(existing)), PropValue::Map(nested)) =
                (self.0.get_mut(key), incoming)
            {
                existing.merge_from(nested);
                continue;
            }
            self.0.insert(key.clone(), incoming.clone());
        }
    }

    /// Fresh map holding `self` with `overlay` merged on top
    #[must_use]
    pub fn merged(&self, overlay: &PropMap) -> PropMap {
        let mut out = self.clone();
        out.merge_from(overlay);
        out
    }

    /// Would merging `self` onto `base` leave `base` unchanged?
    ///
    /// True when every path in `self` already holds an equal value in `base`.
    #[must_use]
    pub fn is_subsumed_by(&self, base: &PropMap) -> bool {
        self.iter().all(|(key, value)| match (base.get(key), value) {
            (Some(PropValue::Map(inherited)), PropValue::Map(nested)) => {
                nested.is_subsumed_by(inherited)
            }
            (Some(inherited), incoming) => inherited == incoming,
            (None, _) => false,
        })
    }

    /// Unwrap the underlying tree
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, PropValue> {
        self.0
    }
}

impl From<BTreeMap<String, PropValue>> for PropMap {
    fn from(map: BTreeMap<String, PropValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for PropMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<PropValue>> Extend<(K, V)> for PropMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for PropMap {
    type Item = (String, PropValue);
    type IntoIter = btree_map::IntoIter<String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropMap {
    type Item = (&'a String, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
