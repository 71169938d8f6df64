use cascade_value::{PropMap, PropValue};
use proptest::prelude::*;

fn arb_number() -> impl Strategy<Value = PropValue> {
    (-20_i32..20).prop_flat_map(|n| {
        prop_oneof![
            Just(PropValue::from(n)),
            Just(PropValue::from(f64::from(n))),
        ]
    })
}

fn arb_leaf() -> impl Strategy<Value = PropValue> {
    prop_oneof![
        Just(PropValue::Null),
        any::<bool>().prop_map(PropValue::from),
        arb_number(),
        "[xyz]{0,2}".prop_map(PropValue::from),
        proptest::collection::vec(arb_number(), 0..3).prop_map(PropValue::List),
    ]
}

fn arb_map() -> impl Strategy<Value = PropMap> {
    let value = arb_leaf().prop_recursive(3, 20, 3, |inner| {
        proptest::collection::btree_map("[a-c]", inner, 0..3)
            .prop_map(|map| PropValue::Map(PropMap::from(map)))
    });
    proptest::collection::btree_map("[a-c]", value, 0..4).prop_map(PropMap::from)
}

proptest! {
    #[test]
    fn prop_overlay_takes_precedence(base in arb_map(), overlay in arb_map()) {
        let merged = base.merged(&overlay);

        for (key, incoming) in &overlay {
            let expected = match (base.get(key), incoming) {
                (Some(PropValue::Map(a)), PropValue::Map(b)) => PropValue::Map(a.merged(b)),
                _ => incoming.clone(),
            };
            prop_assert_eq!(merged.get(key), Some(&expected));
        }
    }

    #[test]
    fn prop_base_entries_outside_overlay_survive(base in arb_map(), overlay in arb_map()) {
        let before = base.clone();
        let merged = base.merged(&overlay);

        prop_assert_eq!(&base, &before);
        for (key, value) in &base {
            if !overlay.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn prop_subsumed_overlay_is_identity(base in arb_map(), overlay in arb_map()) {
        if overlay.is_subsumed_by(&base) {
            prop_assert_eq!(base.merged(&overlay), base.clone());
        }

        let subset: PropMap = base
            .iter()
            .step_by(2)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        prop_assert!(subset.is_subsumed_by(&base));
        prop_assert_eq!(base.merged(&subset), base);
    }

    #[test]
    fn prop_merge_is_idempotent(base in arb_map(), overlay in arb_map()) {
        let merged = base.merged(&overlay);

        prop_assert!(overlay.is_subsumed_by(&merged));
        prop_assert_eq!(merged.merged(&overlay), merged);
    }
}

#[test]
fn integral_float_overlay_is_subsumed() {
    let base = PropMap::new().with("style", PropMap::new().with("width", 10));
    let overlay = PropMap::new().with("style", PropMap::new().with("width", 10.0));

    assert!(overlay.is_subsumed_by(&base));
    assert_eq!(base.merged(&overlay), base);
}
