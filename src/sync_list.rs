//! sync_list: keyed reconciliation of a record slice against a `NodeList`.
//!
//! One forward pass. Position `i` is settled before `i + 1` is looked at:
//! - the node at `i` already carries the key: update it in place;
//! - some other node carries the key: move it before the node at `i`;
//! - nobody carries the key: create, tag and insert a new node there.
//!
//! After the pass every surplus node sits past `src.len()` and is trimmed
//! from the tail. Lookups are linear, so a pass over an unchanged list is
//! O(n) and a pathological permutation is O(n²). Lists here hold tens of
//! entries.

use crate::node_list::NodeList;
use tracing::debug;

/// Structural work done by one `sync_list` pass.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncReport {
    /// `update` invocations that returned.
    pub updated: usize,
    /// Existing nodes relocated to a new position.
    pub moved: usize,
    /// Nodes created for keys with no match.
    pub created: usize,
    /// Nodes trimmed from the tail.
    pub removed: usize,
}

impl SyncReport {
    /// True if the pass inserted, moved or removed anything.
    pub fn is_structural(&self) -> bool {
        self.moved + self.created + self.removed > 0
    }
}

/// Bring the children of `list` in line with `src`.
///
/// On return `list.len() == src.len()` and the node at `i` carries
/// `key_of(&src[i])`, provided keys are unique within `src`. Duplicate keys
/// match the first tagged node in positional order.
///
/// If `update` fails, its error is returned right away. The structural change
/// for that element has already been applied and nothing is rolled back; the
/// tail is not trimmed.
pub fn sync_list<T, K, L, E, F, U>(
    src: &[T],
    list: &mut L,
    kind: &L::Kind,
    key_of: F,
    mut update: U,
) -> Result<SyncReport, E>
where
    K: PartialEq,
    L: NodeList<K> + ?Sized,
    F: Fn(&T) -> K,
    U: FnMut(&T, &mut L, L::Node) -> Result<(), E>,
{
    let mut report = SyncReport::default();

    for (i, entry) in src.iter().enumerate() {
        let key = key_of(entry);
        let candidate = list.node_at(i);

        let node = match candidate {
            Some(c) if list.key_tag(c) == Some(&key) => c,
            _ => match list.find_tagged(&key) {
                Some(found) => {
                    list.insert_before(found, candidate);
                    report.moved += 1;
                    found
                }
                None => {
                    let fresh = list.create(kind);
                    list.set_key_tag(fresh, key);
                    list.insert_before(fresh, candidate);
                    report.created += 1;
                    fresh
                }
            },
        };

        update(entry, list, node)?;
        report.updated += 1;
    }

    while list.len() > src.len() {
        if list.remove_last().is_none() {
            break;
        }
        report.removed += 1;
    }

    debug!(
        len = src.len(),
        updated = report.updated,
        moved = report.moved,
        created = report.created,
        removed = report.removed,
        "synced list"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    // Minimal array-backed list: nodes are ids into `tags`, `order` is the
    // child sequence. Destroyed ids are recorded so tests can see trimming.
    #[derive(Default)]
    struct VecList {
        tags: Vec<Option<&'static str>>,
        order: Vec<usize>,
        destroyed: Vec<usize>,
    }

    impl VecList {
        fn with_keys(keys: &[&'static str]) -> Self {
            let mut l = VecList::default();
            for &k in keys {
                let n = l.create(&());
                l.set_key_tag(n, k);
                l.insert_before(n, None);
            }
            l
        }

        fn keys(&self) -> Vec<&'static str> {
            self.order
                .iter()
                .map(|&n| self.tags[n].unwrap_or("<untagged>"))
                .collect()
        }
    }

    impl NodeList<&'static str> for VecList {
        type Node = usize;
        type Kind = ();

        fn len(&self) -> usize {
            self.order.len()
        }
        fn node_at(&self, index: usize) -> Option<usize> {
            self.order.get(index).copied()
        }
        fn key_tag(&self, node: usize) -> Option<&&'static str> {
            self.tags.get(node).and_then(|t| t.as_ref())
        }
        fn set_key_tag(&mut self, node: usize, key: &'static str) {
            self.tags[node] = Some(key);
        }
        fn create(&mut self, _kind: &()) -> usize {
            self.tags.push(None);
            self.tags.len() - 1
        }
        fn insert_before(&mut self, node: usize, anchor: Option<usize>) {
            if let Some(pos) = self.order.iter().position(|&n| n == node) {
                self.order.remove(pos);
            }
            match anchor.and_then(|a| self.order.iter().position(|&n| n == a)) {
                Some(at) => self.order.insert(at, node),
                None => self.order.push(node),
            }
        }
        fn remove_last(&mut self) -> Option<usize> {
            let n = self.order.pop()?;
            self.destroyed.push(n);
            Some(n)
        }
    }

    fn sync(
        src: &[&'static str],
        list: &mut VecList,
        seen: &mut Vec<(&'static str, usize)>,
    ) -> SyncReport {
        sync_list(src, list, &(), |s| *s, |s, _l, n| {
            seen.push((*s, n));
            Ok::<(), Infallible>(())
        })
        .unwrap()
    }

    #[test]
    fn growth_from_empty_creates_in_order() {
        let mut l = VecList::default();
        let mut seen = Vec::new();
        let r = sync(&["a", "b", "c", "d", "e"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(
            r,
            SyncReport {
                updated: 5,
                moved: 0,
                created: 5,
                removed: 0
            }
        );
        let order: Vec<_> = seen.iter().map(|(k, _)| *k).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn empty_source_drains_container() {
        let mut l = VecList::with_keys(&["a", "b", "c"]);
        let mut seen = Vec::new();
        let r = sync(&[], &mut l, &mut seen);
        assert!(l.order.is_empty());
        assert_eq!(r.removed, 3);
        assert!(seen.is_empty());
    }

    #[test]
    fn shrink_trims_from_tail() {
        let mut l = VecList::with_keys(&["a", "b", "c", "d", "e"]);
        let before = l.order.clone();
        let mut seen = Vec::new();
        let r = sync(&["a", "b"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["a", "b"]);
        assert_eq!(l.order, before[..2].to_vec());
        assert_eq!(r.removed, 3);
        assert_eq!(r.moved + r.created, 0);
        // Removal order is last-first.
        assert_eq!(l.destroyed, vec![before[4], before[3], before[2]]);
    }

    #[test]
    fn reorder_reuses_nodes() {
        let mut l = VecList::with_keys(&["A", "B", "C"]);
        let node_c = l.order[2];
        let node_a = l.order[0];
        let mut seen = Vec::new();
        let r = sync(&["C", "A", "B"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["C", "A", "B"]);
        assert_eq!(l.order[0], node_c);
        assert_eq!(l.order[1], node_a);
        assert_eq!(r.created, 0);
        assert_eq!(r.removed, 0);
        assert_eq!(r.updated, 3);
        // Update sees the relocated node, not the displaced candidate.
        assert_eq!(seen[0], ("C", node_c));
    }

    #[test]
    fn second_identical_pass_is_update_only() {
        let mut l = VecList::default();
        let mut seen = Vec::new();
        sync(&["x", "y", "z"], &mut l, &mut seen);
        let before = l.order.clone();
        seen.clear();
        let r = sync(&["x", "y", "z"], &mut l, &mut seen);
        assert!(!r.is_structural());
        assert_eq!(r.updated, 3);
        assert_eq!(l.order, before);
    }

    #[test]
    fn swap_and_append_scenario() {
        let mut l = VecList::default();
        let mut seen = Vec::new();
        sync(&["x", "y"], &mut l, &mut seen);
        let (nx, ny) = (l.order[0], l.order[1]);
        seen.clear();
        let r = sync(&["y", "x", "z"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["y", "x", "z"]);
        assert_eq!(l.order[0], ny);
        assert_eq!(l.order[1], nx);
        assert_eq!(r.created, 1);
        assert_eq!(r.removed, 0);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn untagged_node_never_matches() {
        let mut l = VecList::default();
        let n = l.create(&());
        l.insert_before(n, None);
        let mut seen = Vec::new();
        let r = sync(&["a"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["a"]);
        assert_eq!(r.created, 1);
        assert_eq!(r.removed, 1);
        assert_eq!(l.destroyed, vec![n]);
    }

    #[test]
    fn stale_interior_key_is_pushed_to_tail_and_trimmed() {
        let mut l = VecList::with_keys(&["a", "gone", "b"]);
        let gone = l.order[1];
        let mut seen = Vec::new();
        let r = sync(&["a", "b"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["a", "b"]);
        assert_eq!(r.moved, 1);
        assert_eq!(l.destroyed, vec![gone]);
    }

    // Duplicate keys steal the first tagged node, so the list can come out
    // shorter than the source. The pass still completes and a later pass
    // with unique keys restores the invariant.
    #[test]
    fn duplicate_keys_are_total() {
        let mut l = VecList::default();
        let mut seen = Vec::new();
        sync(&["a", "a", "b"], &mut l, &mut seen);
        assert_eq!(seen.len(), 3);
        assert_eq!(l.keys(), vec!["a", "b"]);

        seen.clear();
        sync(&["b", "a", "a"], &mut l, &mut seen);
        assert_eq!(seen.len(), 3);
        assert_eq!(l.keys(), vec!["b", "a"]);

        seen.clear();
        sync(&["c", "a", "b"], &mut l, &mut seen);
        assert_eq!(l.keys(), vec!["c", "a", "b"]);
    }

    #[test]
    fn update_error_propagates_after_structural_change() {
        let mut l = VecList::with_keys(&["a", "b", "c"]);
        let mut calls = 0;
        let res = sync_list(&["a", "z", "b"], &mut l, &(), |s| *s, |s, _l, _n| {
            calls += 1;
            if *s == "z" {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err("boom"));
        assert_eq!(calls, 2);
        // `z` was inserted before the callback failed; no trim happened.
        assert_eq!(l.keys(), vec!["a", "z", "b", "c"]);
        assert!(l.destroyed.is_empty());
    }
}
