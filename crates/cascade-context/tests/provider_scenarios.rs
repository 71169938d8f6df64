use std::sync::Arc;

use cascade_context::{
    resolve_props, CascadeConfig, Diagnostic, DiagnosticMode, Layer, Provider, RecordingSink,
    Scope, ScopePath, ScopeTree,
};
use cascade_test_utils::{
    init_tracing, inner_layer, outer_layer, outer_then_inner_json, recording_provider,
    recording_tree,
};
use cascade_value::{PropMap, PropValue};
use pretty_assertions::assert_eq;
use serde_json::json;

/// One pass over the card example: outer provider, inner provider below it,
/// and a sibling card outside both.
fn card_pass(
    tree: &mut ScopeTree,
    outer: &Layer,
    inner: &Layer,
) -> (Scope, Scope, Scope) {
    let root = tree.begin_pass();
    let outer_scope = tree.enter(&root, "outer", outer);
    let inner_scope = tree.enter(&outer_scope, "inner", inner);
    tree.finish_pass();
    (outer_scope, inner_scope, root)
}

#[test]
fn card_example_cascades() {
    init_tracing();
    let (mut tree, sink) = recording_tree();

    let (outer_scope, inner_scope, root) = card_pass(&mut tree, &outer_layer(), &inner_layer());

    assert_eq!(inner_scope.current_snapshot().to_json(), outer_then_inner_json());
    assert_eq!(
        outer_scope.current_snapshot().to_json(),
        outer_layer().to_json()
    );
    assert!(root.current_snapshot().is_empty());
    assert!(sink.is_empty());
}

#[test]
fn connected_components_see_their_overrides() {
    let (mut tree, _) = recording_tree();
    let (outer_scope, inner_scope, root) = card_pass(&mut tree, &outer_layer(), &inner_layer());

    let own = PropMap::new().with("style", PropMap::new().with("border", "3px solid green"));

    let outside = resolve_props(&root, "CardBody", &own);
    assert_eq!(outside, own);

    let in_outer = resolve_props(&outer_scope, "CardBody", &PropMap::new());
    assert_eq!(in_outer.get("as"), Some(&PropValue::from("a")));

    let in_inner = resolve_props(&inner_scope, "CardBody", &own);
    assert_eq!(in_inner.get("as"), Some(&PropValue::from("div")));
    assert_eq!(in_inner.get("href"), Some(&PropValue::from("https://wordpress.org")));
    assert_eq!(in_inner.get("style"), own.get("style"));
}

#[test]
fn rerenders_with_stable_layers_reuse_everything() {
    let (mut tree, sink) = recording_tree();
    let outer = outer_layer();
    let inner = inner_layer();

    let (first_outer, first_inner, _) = card_pass(&mut tree, &outer, &inner);
    for _ in 0..10 {
        let (o, i, _) = card_pass(&mut tree, &outer, &inner);
        assert!(o.current_snapshot().is_same(first_outer.current_snapshot()));
        assert!(i.current_snapshot().is_same(first_inner.current_snapshot()));
    }

    assert!(sink.is_empty());
    let stats = tree.stats();
    assert_eq!(stats.compositions, 2);
    assert_eq!(stats.memo_hits, 20);
    assert_eq!(stats.diagnostics, 0);
}

#[test]
fn rebuilt_equal_layer_warns_exactly_once() {
    let (mut provider, sink) = recording_provider("outer");
    let root = Scope::root();

    provider.compose(&root, &outer_layer());
    assert!(sink.is_empty(), "first mount never warns");

    provider.compose(&root, &outer_layer());

    let reported = sink.take();
    assert_eq!(reported.len(), 1);
    match &reported[0] {
        Diagnostic::UnstableLayerReference {
            position,
            previous,
            current,
            layer,
        } => {
            assert_eq!(position, &ScopePath::root().child("outer"));
            assert_ne!(previous, current);
            let rendered: serde_json::Value = serde_json::from_str(layer).unwrap();
            assert_eq!(rendered, outer_layer().to_json());
        }
        other => panic!("unexpected diagnostic: {other:?}"),
    }
}

#[test]
fn rebuilt_inner_layer_warns_per_pass_at_inner_position() {
    let (mut tree, sink) = recording_tree();
    let outer = outer_layer();

    for _ in 0..3 {
        card_pass(&mut tree, &outer, &inner_layer());
    }

    let reported = sink.take();
    assert_eq!(reported.len(), 2);
    assert!(reported
        .iter()
        .all(|d| d.position().to_string() == "/outer/inner"));
}

#[test]
fn warning_does_not_change_result() {
    let (mut warned, _) = recording_provider("p");
    let sink = Arc::new(RecordingSink::new());
    let mut silent = Provider::with_parts(
        "p",
        CascadeConfig::default().with_diagnostics(DiagnosticMode::Off),
        sink.clone(),
    );
    let root = Scope::root();

    warned.compose(&root, &outer_layer());
    silent.compose(&root, &outer_layer());
    let a = warned.compose(&root, &outer_layer());
    let b = silent.compose(&root, &outer_layer());

    assert_eq!(a.current_snapshot(), b.current_snapshot());
    assert!(sink.is_empty());
}

#[test]
fn diagnostic_payload_is_truncated() {
    let sink = Arc::new(RecordingSink::new());
    let mut provider = Provider::with_parts(
        "p",
        CascadeConfig::default().with_max_payload_chars(16),
        sink.clone(),
    );
    let root = Scope::root();

    provider.compose(&root, &outer_layer());
    provider.compose(&root, &outer_layer());

    match &sink.take()[..] {
        [Diagnostic::UnstableLayerReference { layer, .. }] => {
            assert_eq!(layer.chars().count(), 19);
            assert!(layer.ends_with("..."));
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }
}

#[test]
fn changing_outer_layer_recomposes_inner() {
    let (mut tree, sink) = recording_tree();
    let inner = inner_layer();

    let (_, before, _) = card_pass(&mut tree, &outer_layer(), &inner);
    let changed = Layer::from_json_value(json!({"Card": {"elevation": 2}})).unwrap();
    let (_, after, _) = card_pass(&mut tree, &changed, &inner);

    assert!(!before.current_snapshot().is_same(after.current_snapshot()));
    assert_eq!(
        after.current_snapshot().to_json(),
        json!({
            "Card": {"elevation": 2, "style": {"background": "white"}},
            "CardBody": {"as": "div"},
            "Text": {"style": {"outline": "4px dashed purple"}}
        })
    );
    assert!(sink.is_empty());
}

#[test]
fn siblings_sharing_a_key_keep_stable_layers_quiet() {
    let (mut tree, sink) = recording_tree();
    let left = outer_layer();
    let right = outer_layer();

    for _ in 0..3 {
        let root = tree.begin_pass();
        let a = tree.enter(&root, "card", &left);
        let b = tree.enter(&root, "card", &right);
        tree.finish_pass();
        assert_eq!(a.current_snapshot(), b.current_snapshot());
    }

    let reported = sink.take();
    assert!(!reported
        .iter()
        .any(|d| matches!(d, Diagnostic::UnstableLayerReference { .. })));
    assert_eq!(
        reported.iter().map(Diagnostic::kind).collect::<Vec<_>>(),
        vec!["duplicate_key"; 3]
    );
}

#[test]
fn snapshots_are_readable_from_many_threads() {
    let (mut tree, _) = recording_tree();
    let (_, inner_scope, _) = card_pass(&mut tree, &outer_layer(), &inner_layer());
    let snapshot = inner_scope.current_snapshot().clone();
    let expected = outer_then_inner_json();

    std::thread::scope(|s| {
        for _ in 0..4 {
            let snapshot = snapshot.clone();
            let expected = &expected;
            s.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(&snapshot.to_json(), expected);
                }
            });
        }
    });
}
