//! Algebraic properties of [`Meta`]: immutability, generalization, JSON round-trip.

use mpi_meta::{Meta, parse_meta, to_meta};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn arb_kind() -> impl Strategy<Value = String> {
    prop_oneof![Just("User".to_string()), Just("Order".to_string()), "[A-Z][a-z]{1,5}"]
}

fn arb_str_map() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_name(), "[ -~]{0,8}"), 0..4)
}

/// Generates a valid (non-Nil) Meta of the given depth.
fn arb_meta(depth: u32) -> BoxedStrategy<Meta> {
    let leaf = (
        arb_kind(),
        prop::option::of(arb_name()),
        prop::option::of(arb_name()),
        prop::option::of("[a-z0-9-]{1,8}"),
        prop::option::of("[ -~]{1,12}"),
        arb_str_map(),
        arb_str_map(),
    )
        .prop_map(|(kind, method, ns, gid, payload, tags, attrs)| {
            let mut m = Meta::new(kind).with_tags(tags).with_attrs(attrs);
            if let Some(method) = method {
                m = m.with_method(method);
            }
            if let Some(ns) = ns {
                m = m.with_ns(ns);
            }
            if let Some(gid) = gid {
                m = m.with_gid(gid);
            }
            if let Some(payload) = payload {
                m = m.with_payload(payload);
            }
            m
        });

    if depth == 0 {
        return leaf.boxed();
    }

    (
        leaf,
        prop::collection::vec((arb_name(), arb_meta(depth - 1)), 0..3),
        prop::collection::vec((arb_name(), arb_meta(depth - 1)), 0..3),
        prop::collection::vec(arb_meta(depth - 1), 0..3),
    )
        .prop_map(|(m, subs, rels, list)| {
            m.with_subs(subs).with_rels(rels).with_list(list)
        })
        .boxed()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn builders_never_modify_the_receiver(m in arb_meta(1), name in arb_name(), value in "[a-z]{0,4}") {
        let snapshot = m.tags().clone();
        let attrs = m.attrs().clone();
        let m2 = m.with_tag(name.clone(), value.clone()).with_attr(name, value);

        prop_assert_eq!(m.tags(), &snapshot);
        prop_assert_eq!(m.attrs(), &attrs);
        prop_assert!(m2.tags().len() >= snapshot.len());
    }

    #[test]
    fn generalization_is_reflexive(m in arb_meta(1)) {
        prop_assert!(m.generalizes(&m));
        prop_assert!(m.specializes(&m));
    }

    #[test]
    fn tag_subsets_generalize(m in arb_meta(0), extra in arb_str_map()) {
        let specific = m.with_tags(extra);
        // Keys already present may have been overwritten; rebuild the
        // general form from the specific one so it is a true subset.
        let general = specific.set_tags(
            specific.tags().iter().take(1).map(|(k, v)| (k.clone(), v.clone())),
        );
        prop_assert!(general.generalizes(&specific));
        prop_assert!(specific.specializes(&general));
    }

    #[test]
    fn json_round_trip(m in arb_meta(2)) {
        let (back, ok) = parse_meta(&m.json()).unwrap();
        prop_assert!(ok);
        prop_assert_eq!(&back, &m);

        let value: serde_json::Value = serde_json::from_str(&m.json_pretty()).unwrap();
        prop_assert_eq!(to_meta(&value), m);
    }
}
