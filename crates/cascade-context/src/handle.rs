//! Identity handles
//!
//! Reference identity is represented by a process-unique [`HandleId`] drawn
//! from a monotonic counter when a snapshot or layer is constructed. Cloning
//! a snapshot or layer keeps its id; building a new one, even with equal
//! contents, takes a fresh id. Ids are never reused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a snapshot or layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Identity of the root (empty) snapshot
    pub const ROOT: HandleId = HandleId(0);

    /// Allocate a fresh id
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = HandleId::next();
        let b = HandleId::next();

        assert_ne!(a, b);
        assert!(b > a);
        assert_ne!(a, HandleId::ROOT);
    }

    #[test]
    fn display() {
        assert_eq!(HandleId::ROOT.to_string(), "#0");
    }
}
