//! Testing utilities for the Cascade workspace
//!
//! Shared fixtures, proptest strategies, and tracing setup.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::sync::Arc;

use cascade_context::{CascadeConfig, Layer, Provider, RecordingSink, ScopeTree};
use cascade_value::{PropMap, PropValue};
use proptest::prelude::*;
use serde_json::json;

/// Outer layer of the card example: defaults for `Card` and `CardBody`
pub fn outer_layer() -> Layer {
    Layer::from_json_value(json!({
        "Card": {
            "isRounded": false,
            "elevation": 10
        },
        "CardBody": {
            "as": "a",
            "href": "https://wordpress.org",
            "style": {
                "display": "block"
            }
        }
    }))
    .unwrap()
}

/// Inner layer of the card example: overrides on top of [`outer_layer`]
pub fn inner_layer() -> Layer {
    Layer::from_json_value(json!({
        "Card": {
            "style": {
                "background": "white"
            }
        },
        "CardBody": {
            "as": "div"
        },
        "Text": {
            "style": {
                "outline": "4px dashed purple"
            }
        }
    }))
    .unwrap()
}

/// Expected snapshot inside both card layers
pub fn outer_then_inner_json() -> serde_json::Value {
    json!({
        "Card": {
            "isRounded": false,
            "elevation": 10,
            "style": {
                "background": "white"
            }
        },
        "CardBody": {
            "as": "div",
            "href": "https://wordpress.org",
            "style": {
                "display": "block"
            }
        },
        "Text": {
            "style": {
                "outline": "4px dashed purple"
            }
        }
    })
}

/// Provider wired to a fresh recording sink
pub fn recording_provider(key: &str) -> (Provider, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let provider = Provider::with_parts(key, CascadeConfig::default(), sink.clone());
    (provider, sink)
}

/// Scope tree wired to a fresh recording sink
pub fn recording_tree() -> (ScopeTree, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let tree = ScopeTree::with_parts(CascadeConfig::default(), sink.clone());
    (tree, sink)
}

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-d]".prop_map(String::from)
}

fn arb_leaf() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        Just(PropValue::Null),
        any::<bool>().prop_map(PropValue::from),
        (-100_i64..100).prop_map(PropValue::from),
        "[a-z]{0,4}".prop_map(PropValue::from),
        proptest::collection::vec((-5_i64..5).prop_map(PropValue::from), 0..3)
            .prop_map(PropValue::List),
    ]
}

/// Arbitrary nested property value
pub fn arb_prop_value() -> impl Strategy<Value = PropValue> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        proptest::collection::btree_map(arb_key(), inner, 0..4)
            .prop_map(|map| PropValue::Map(PropMap::from(map)))
    })
}

/// Arbitrary property map with colliding keys
pub fn arb_prop_map() -> impl Strategy<Value = PropMap> {
    proptest::collection::btree_map(arb_key(), arb_prop_value(), 0..4).prop_map(PropMap::from)
}

/// Arbitrary component entries over a small set of names
pub fn arb_components() -> impl Strategy<Value = BTreeMap<String, PropMap>> {
    proptest::collection::btree_map(
        prop_oneof![Just("Card"), Just("CardBody"), Just("Text")].prop_map(String::from),
        arb_prop_map(),
        0..3,
    )
}

/// Arbitrary layer
pub fn arb_layer() -> impl Strategy<Value = Layer> {
    arb_components().prop_map(Layer::new)
}
