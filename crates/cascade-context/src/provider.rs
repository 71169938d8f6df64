//! Memoizing provider
//!
//! A [`Provider`] is the state kept at one tree position across passes. On
//! each pass it receives the parent [`Scope`] and a [`Layer`] and hands back
//! the child scope.
//!
//! # Memoization
//! The composed snapshot is cached on the identity pair
//! `(inherited snapshot id, layer id)`. When both ids match the previous
//! pass, the cached snapshot handle is returned without merging.
//!
//! # Stability check
//! From the second pass on, whenever the layer id changes but its contents
//! equal the previous layer, an [`Diagnostic::UnstableLayerReference`] is
//! reported. The check reads only the layers; it never affects the result.

use std::fmt;
use std::ops::AddAssign;
use std::sync::Arc;

use crate::cascade::{compose, is_noop};
use crate::config::CascadeConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::handle::HandleId;
use crate::layer::Layer;
use crate::scope::{Scope, ScopePath};
use crate::snapshot::Snapshot;

/// Per-provider counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// Passes that produced a snapshot without the memo
    pub compositions: u64,
    /// Passes answered from the memo
    pub memo_hits: u64,
    /// Diagnostics reported
    pub diagnostics: u64,
}

impl AddAssign for ProviderStats {
    fn add_assign(&mut self, other: Self) {
        self.compositions += other.compositions;
        self.memo_hits += other.memo_hits;
        self.diagnostics += other.diagnostics;
    }
}

impl fmt::Display for ProviderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} compositions, {} memo hits, {} diagnostics",
            self.compositions, self.memo_hits, self.diagnostics
        )
    }
}

/// A subtree built under a provider
#[derive(Debug)]
pub struct ComposedSubtree<R> {
    /// Scope the subtree was built in
    pub scope: Scope,
    /// Whatever the subtree builder returned
    pub output: R,
}

impl<R> ComposedSubtree<R> {
    /// Snapshot the subtree saw
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        self.scope.current_snapshot()
    }
}

#[derive(Debug)]
struct Memo {
    inherited: HandleId,
    layer: HandleId,
    composed: Snapshot,
}

/// Memo state for one tree position
#[derive(Debug)]
pub struct Provider {
    key: Arc<str>,
    config: CascadeConfig,
    sink: Arc<dyn DiagnosticSink>,
    memo: Option<Memo>,
    previous_layer: Option<Layer>,
    stats: ProviderStats,
}

impl Provider {
    /// Provider configured from the environment, reporting through `tracing`
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self::with_parts(key, CascadeConfig::from_env_or_default(), Arc::new(TracingSink))
    }

    /// Provider with explicit configuration and sink
    #[must_use]
    pub fn with_parts(key: &str, config: CascadeConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            key: Arc::from(key),
            config,
            sink,
            memo: None,
            previous_layer: None,
            stats: ProviderStats::default(),
        }
    }

    /// Position key under the parent scope
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Counters so far
    #[inline]
    #[must_use]
    pub fn stats(&self) -> ProviderStats {
        self.stats
    }

    /// Has at least one pass run?
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.previous_layer.is_some()
    }

    /// Compose `layer` under `parent`, returning the child scope
    pub fn compose(&mut self, parent: &Scope, layer: &Layer) -> Scope {
        let position = parent.path().child(&self.key);
        self.check_layer_stability(&position, layer);
        let snapshot = self.memoized(parent.current_snapshot(), layer, &position);
        Scope::new(snapshot, position)
    }

    /// Compose `layer` under `parent` and build `children` in the result
    pub fn provide<R, F>(&mut self, parent: &Scope, layer: &Layer, children: F) -> ComposedSubtree<R>
    where
        F: FnOnce(&Scope) -> R,
    {
        let scope = self.compose(parent, layer);
        let output = children(&scope);
        ComposedSubtree { scope, output }
    }

    fn memoized(&mut self, inherited: &Snapshot, layer: &Layer, position: &ScopePath) -> Snapshot {
        if let Some(memo) = &self.memo {
            if memo.inherited == inherited.id() && memo.layer == layer.id() {
                self.stats.memo_hits += 1;
                tracing::trace!(
                    position = %position,
                    snapshot = %memo.composed.id(),
                    "reusing composed snapshot"
                );
                return memo.composed.clone();
            }
        }

        let composed = if self.config.elide_noop_layers && is_noop(inherited, layer) {
            inherited.clone()
        } else {
            compose(inherited, layer)
        };
        self.stats.compositions += 1;
        tracing::trace!(
            position = %position,
            inherited = %inherited.id(),
            layer = %layer.id(),
            snapshot = %composed.id(),
            "composed snapshot"
        );

        self.memo = Some(Memo {
            inherited: inherited.id(),
            layer: layer.id(),
            composed: composed.clone(),
        });
        composed
    }

    fn check_layer_stability(&mut self, position: &ScopePath, layer: &Layer) {
        let Some(previous) = self.previous_layer.replace(layer.clone()) else {
            return;
        };
        if previous.is_same(layer) || !self.config.diagnostics_enabled() {
            return;
        }
        if previous != *layer {
            return;
        }

        let diagnostic = Diagnostic::UnstableLayerReference {
            position: position.clone(),
            previous: previous.id(),
            current: layer.id(),
            layer: layer.render(self.config.max_payload_chars),
        };
        self.stats.diagnostics += 1;
        self.sink.report(&diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagnosticMode;
    use crate::diagnostics::RecordingSink;
    use cascade_value::PropMap;

    fn card_layer() -> Layer {
        Layer::new([("Card", PropMap::new().with("elevation", 10))])
    }

    fn recording(config: CascadeConfig) -> (Provider, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let provider = Provider::with_parts("p", config, sink.clone());
        (provider, sink)
    }

    #[test]
    fn same_inputs_hit_memo() {
        let (mut provider, _) = recording(CascadeConfig::default());
        let root = Scope::root();
        let layer = card_layer();

        let first = provider.compose(&root, &layer);
        let second = provider.compose(&root, &layer);

        assert!(first.current_snapshot().is_same(second.current_snapshot()));
        assert_eq!(
            provider.stats(),
            ProviderStats {
                compositions: 1,
                memo_hits: 1,
                diagnostics: 0
            }
        );
    }

    #[test]
    fn new_layer_reference_recomposes() {
        let (mut provider, _) = recording(CascadeConfig::default());
        let root = Scope::root();

        let first = provider.compose(&root, &card_layer());
        let second = provider.compose(&root, &card_layer());

        assert!(!first.current_snapshot().is_same(second.current_snapshot()));
        assert_eq!(first.current_snapshot(), second.current_snapshot());
        assert_eq!(provider.stats().compositions, 2);
    }

    #[test]
    fn new_inherited_reference_recomposes() {
        let (mut outer, _) = recording(CascadeConfig::default());
        let (mut inner, _) = recording(CascadeConfig::default());
        let root = Scope::root();
        let inner_layer = Layer::new([("Text", PropMap::new().with("size", 12))]);

        let a = outer.compose(&root, &card_layer());
        let a_inner = inner.compose(&a, &inner_layer);
        let b = outer.compose(&root, &card_layer());
        let b_inner = inner.compose(&b, &inner_layer);

        assert!(!a_inner.current_snapshot().is_same(b_inner.current_snapshot()));
        assert_eq!(inner.stats().compositions, 2);
        assert_eq!(inner.stats().memo_hits, 0);
    }

    #[test]
    fn equal_but_distinct_layer_warns_once() {
        let (mut provider, sink) = recording(CascadeConfig::default());
        let root = Scope::root();

        provider.compose(&root, &card_layer());
        assert!(sink.is_empty());

        provider.compose(&root, &card_layer());
        let reported = sink.take();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].position().to_string(), "/p");
        assert_eq!(provider.stats().diagnostics, 1);
    }

    #[test]
    fn reused_layer_never_warns() {
        let (mut provider, sink) = recording(CascadeConfig::default());
        let root = Scope::root();
        let layer = card_layer();

        for _ in 0..5 {
            provider.compose(&root, &layer);
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn rebuilt_layer_with_float_form_still_warns() {
        let (mut provider, sink) = recording(CascadeConfig::default());
        let root = Scope::root();

        provider.compose(&root, &card_layer());
        provider.compose(&root, &Layer::new([("Card", PropMap::new().with("elevation", 10.0))]));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn changed_contents_do_not_warn() {
        let (mut provider, sink) = recording(CascadeConfig::default());
        let root = Scope::root();

        provider.compose(&root, &card_layer());
        provider.compose(&root, &Layer::new([("Card", PropMap::new().with("elevation", 2))]));
        assert!(sink.is_empty());
    }

    #[test]
    fn diagnostics_off_is_silent_but_composes_the_same() {
        let (mut quiet, sink) =
            recording(CascadeConfig::default().with_diagnostics(DiagnosticMode::Off));
        let (mut loud, _) = recording(CascadeConfig::default());
        let root = Scope::root();

        quiet.compose(&root, &card_layer());
        let q = quiet.compose(&root, &card_layer());
        loud.compose(&root, &card_layer());
        let l = loud.compose(&root, &card_layer());

        assert!(sink.is_empty());
        assert_eq!(q.current_snapshot(), l.current_snapshot());
    }

    #[test]
    fn provide_builds_children_in_child_scope() {
        let mut provider = Provider::new("outer");
        let layer = card_layer();

        let subtree = provider.provide(&Scope::root(), &layer, |scope| {
            scope
                .component("Card")
                .and_then(|props| props.get("elevation"))
                .and_then(cascade_value::PropValue::as_i64)
        });

        assert_eq!(subtree.output, Some(10));
        assert_eq!(subtree.scope.path().to_string(), "/outer");
        assert!(provider.is_mounted());
    }

    #[test]
    fn noop_elision_can_be_disabled() {
        let (mut outer, _) = recording(CascadeConfig::default());
        let (mut inner, _) = recording(CascadeConfig::default().with_noop_elision(false));
        let layer = card_layer();

        let a = outer.compose(&Scope::root(), &layer);
        let b = inner.compose(&a, &layer);

        assert!(!b.current_snapshot().is_same(a.current_snapshot()));
        assert_eq!(b.current_snapshot(), a.current_snapshot());
    }
}
