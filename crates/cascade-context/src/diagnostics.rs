//! Advisory diagnostics
//!
//! The cascade itself has one runtime condition worth reporting: a layer
//! passed as a new reference although its contents did not change. That
//! forces recomposition for every descendant, so callers are told to keep
//! the layer handle stable. [`crate::ScopeTree`] adds a second one for two
//! siblings entering under the same key in one pass. Diagnostics never
//! change composition results.

use std::fmt::{self, Debug};

use parking_lot::Mutex;

use crate::handle::HandleId;
use crate::scope::ScopePath;

/// A reported condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// New layer reference with contents equal to the previous one
    UnstableLayerReference {
        /// Provider position
        position: ScopePath,
        /// Identity of the previous layer
        previous: HandleId,
        /// Identity of the layer just supplied
        current: HandleId,
        /// JSON rendering of the layer, possibly truncated
        layer: String,
    },
    /// Position entered twice in one pass
    DuplicateKey {
        /// Shared position
        position: ScopePath,
        /// Pass in which the collision happened
        pass: u64,
    },
}

impl Diagnostic {
    /// Stable name of the condition
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnstableLayerReference { .. } => "unstable_layer_reference",
            Self::DuplicateKey { .. } => "duplicate_key",
        }
    }

    /// Provider position the diagnostic refers to
    #[inline]
    #[must_use]
    pub fn position(&self) -> &ScopePath {
        match self {
            Self::UnstableLayerReference { position, .. } | Self::DuplicateKey { position, .. } => {
                position
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnstableLayerReference { layer, .. } => write!(
                f,
                "layer is unchanged but was passed as a new reference; \
                 keep the same Layer handle while its contents are unchanged: {layer}"
            ),
            Self::DuplicateKey { position, .. } => write!(
                f,
                "{position} was entered twice in one pass; \
                 give sibling providers distinct keys"
            ),
        }
    }
}

/// Where diagnostics go
pub trait DiagnosticSink: Send + Sync + Debug {
    /// Receive one diagnostic
    fn report(&self, diagnostic: &Diagnostic);
}

/// Emits diagnostics as `tracing` warnings
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::UnstableLayerReference {
                position,
                previous,
                current,
                ..
            } => tracing::warn!(
                kind = diagnostic.kind(),
                position = %position,
                previous = %previous,
                current = %current,
                "{diagnostic}"
            ),
            Diagnostic::DuplicateKey { position, pass } => tracing::warn!(
                kind = diagnostic.kind(),
                position = %position,
                pass,
                "{diagnostic}"
            ),
        }
    }
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Empty recorder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Drain recorded diagnostics
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Number recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Nothing recorded?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries.lock().push(diagnostic.clone());
    }
}
