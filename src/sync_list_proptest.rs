#![cfg(test)]

// Property tests for sync_list over ElementTree children, kept inside the
// crate next to the unit tests.

use crate::element_tree::{ElementTree, NodeId};
use crate::node_list::NodeList;
use crate::sync_list::{sync_list, SyncReport};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;

fn pool() -> Vec<String> {
    (0..10).map(|i| format!("k{i}")).collect()
}

// Unique keys in random order: a subsequence of the pool, shuffled.
fn arb_pass() -> impl Strategy<Value = Vec<String>> {
    let pool = pool();
    let n = pool.len();
    proptest::sample::subsequence(pool, 0..=n).prop_shuffle()
}

// Keys drawn with replacement, so duplicates are likely.
fn arb_pass_with_duplicates() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(proptest::sample::select(pool()), 0..12)
}

fn run(tree: &mut ElementTree, root: NodeId, keys: &[String]) -> SyncReport {
    let mut list = tree.children_of(root);
    let report: Result<SyncReport, Infallible> = sync_list(
        keys,
        &mut list,
        "li",
        |k| k.clone(),
        |k, list, node| {
            if let Some(e) = list.tree_mut().element_mut(node) {
                e.set_text(k.as_str());
            }
            Ok(())
        },
    );
    match report {
        Ok(r) => r,
        Err(e) => match e {},
    }
}

fn tags(tree: &ElementTree, root: NodeId) -> Vec<String> {
    tree.children(root)
        .iter()
        .map(|&n| tree.key_tag(n).cloned().unwrap_or_default())
        .collect()
}

// Property: a sequence of passes with unique keys.
// Invariants checked after every pass:
// - The children carry exactly the source keys, in source order, and their
//   text reflects the latest update.
// - Nodes whose key survives from the previous pass keep their identity.
// - `created`/`removed` count the keys that appeared/disappeared.
// - No element leaks: the tree holds the root plus one element per key.
// - Repeating the pass is update-only.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_unique_key_passes(passes in proptest::collection::vec(arb_pass(), 1..8)) {
        let mut tree: ElementTree = ElementTree::new();
        let root = tree.create_element("ul");
        let mut prev: HashMap<String, NodeId> = HashMap::new();

        for keys in passes {
            let report = run(&mut tree, root, &keys);

            prop_assert_eq!(tags(&tree, root), keys.clone());
            prop_assert_eq!(tree.text_content(root), keys.concat());
            prop_assert_eq!(tree.len(), keys.len() + 1);
            prop_assert_eq!(report.updated, keys.len());

            let current: HashSet<&String> = keys.iter().collect();
            let appeared = keys.iter().filter(|k| !prev.contains_key(*k)).count();
            let vanished = prev.keys().filter(|k| !current.contains(k)).count();
            prop_assert_eq!(report.created, appeared);
            prop_assert_eq!(report.removed, vanished);

            let children = tree.children(root).to_vec();
            for (k, node) in keys.iter().zip(&children) {
                if let Some(old) = prev.get(k) {
                    prop_assert_eq!(old, node, "node for {} was replaced", k);
                }
            }
            for (k, old) in &prev {
                if !current.contains(k) {
                    prop_assert!(!tree.contains(*old), "stale node for {} survived", k);
                }
            }

            let again = run(&mut tree, root, &keys);
            prop_assert!(!again.is_structural());
            prop_assert_eq!(tree.children(root), children.as_slice());

            prev = keys.iter().cloned().zip(children).collect();
        }
    }
}

// Property: duplicate keys never break the pass.
// - The list never ends up longer than the source, and nothing leaks.
// - A following pass with unique keys restores exact positional order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_duplicates_are_total(
        first in arb_pass(),
        dup in arb_pass_with_duplicates(),
        last in arb_pass(),
    ) {
        let mut tree: ElementTree = ElementTree::new();
        let root = tree.create_element("ul");
        run(&mut tree, root, &first);

        run(&mut tree, root, &dup);
        let list = tree.children_of(root);
        prop_assert!(list.len() <= dup.len());
        prop_assert_eq!(tree.len(), tree.children(root).len() + 1);

        run(&mut tree, root, &last);
        prop_assert_eq!(tags(&tree, root), last.clone());
        prop_assert_eq!(tree.len(), last.len() + 1);
    }
}
