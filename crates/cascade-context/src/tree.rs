//! Position-keyed provider registry
//!
//! A host that re-evaluates its whole tree on every pass needs somewhere to
//! keep each position's [`Provider`] between passes. [`ScopeTree`] keys them
//! by [`ScopePath`] and drops the ones a pass did not visit.
//!
//! ```
//! use cascade_context::{Layer, ScopeTree};
//! use cascade_value::PropMap;
//!
//! let mut tree = ScopeTree::new();
//! let outer = Layer::new([("Card", PropMap::new().with("elevation", 10))]);
//!
//! let root = tree.begin_pass();
//! let scope = tree.enter(&root, "outer", &outer);
//! assert!(scope.component("Card").is_some());
//! assert_eq!(tree.finish_pass(), 0);
//! ```
//!
//! Keys must be unique among siblings within a pass. When a second sibling
//! enters a position already entered in the same pass, a
//! [`Diagnostic::DuplicateKey`] is reported and that sibling is composed
//! without memo or stability check, leaving the first sibling's provider
//! untouched.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cascade::{compose, compose_or_reuse};
use crate::config::CascadeConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::layer::Layer;
use crate::provider::{Provider, ProviderStats};
use crate::scope::{Scope, ScopePath};

#[derive(Debug)]
struct Slot {
    provider: Provider,
    last_pass: u64,
}

/// Providers for every mounted position
#[derive(Debug)]
pub struct ScopeTree {
    config: CascadeConfig,
    sink: Arc<dyn DiagnosticSink>,
    providers: HashMap<ScopePath, Slot>,
    pass: u64,
    unkeyed: ProviderStats,
}

impl ScopeTree {
    /// Tree configured from the environment, reporting through `tracing`
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(CascadeConfig::from_env_or_default(), Arc::new(TracingSink))
    }

    /// Tree with explicit configuration and sink shared by all providers
    #[must_use]
    pub fn with_parts(config: CascadeConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            config,
            sink,
            providers: HashMap::new(),
            pass: 0,
            unkeyed: ProviderStats::default(),
        }
    }

    /// Start a pass, returning the root scope
    pub fn begin_pass(&mut self) -> Scope {
        self.pass += 1;
        Scope::root()
    }

    /// Compose `layer` at `parent`/`key`, mounting a provider if needed
    pub fn enter(&mut self, parent: &Scope, key: &str, layer: &Layer) -> Scope {
        let position = parent.path().child(key);
        let pass = self.pass;
        if self
            .providers
            .get(&position)
            .is_some_and(|slot| slot.last_pass == pass)
        {
            return self.enter_duplicate(parent, position, layer);
        }

        let config = &self.config;
        let sink = &self.sink;

        let slot = self.providers.entry(position).or_insert_with(|| {
            tracing::debug!(key, parent = %parent.path(), "mounting provider");
            Slot {
                provider: Provider::with_parts(key, config.clone(), Arc::clone(sink)),
                last_pass: pass,
            }
        });
        slot.last_pass = pass;
        slot.provider.compose(parent, layer)
    }

    fn enter_duplicate(&mut self, parent: &Scope, position: ScopePath, layer: &Layer) -> Scope {
        if self.config.diagnostics_enabled() {
            let diagnostic = Diagnostic::DuplicateKey {
                position: position.clone(),
                pass: self.pass,
            };
            self.unkeyed.diagnostics += 1;
            self.sink.report(&diagnostic);
        }

        let snapshot = if self.config.elide_noop_layers {
            compose_or_reuse(parent.current_snapshot(), layer)
        } else {
            compose(parent.current_snapshot(), layer)
        };
        self.unkeyed.compositions += 1;
        Scope::new(snapshot, position)
    }

    /// End a pass, dropping providers it did not enter
    ///
    /// Returns how many were dropped.
    pub fn finish_pass(&mut self) -> usize {
        let pass = self.pass;
        let before = self.providers.len();
        self.providers.retain(|_, slot| slot.last_pass == pass);
        let dropped = before - self.providers.len();
        if dropped > 0 {
            tracing::debug!(dropped, pass, "unmounted providers");
        }
        dropped
    }

    /// Provider mounted at `position`
    #[inline]
    #[must_use]
    pub fn provider(&self, position: &ScopePath) -> Option<&Provider> {
        self.providers.get(position).map(|slot| &slot.provider)
    }

    /// Mounted providers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Nothing mounted?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Passes started so far
    #[inline]
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.pass
    }

    /// Counters summed over mounted providers, plus duplicate-key entries
    #[must_use]
    pub fn stats(&self) -> ProviderStats {
        let mut total = self.unkeyed;
        for slot in self.providers.values() {
            total += slot.provider.stats();
        }
        total
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
