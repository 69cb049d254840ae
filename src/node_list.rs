//! NodeList: the ordered, keyed child collection that `sync_list` mutates.

/// An ordered collection of child nodes, each optionally tagged with the key
/// of the record it currently represents.
///
/// Implementors only need positional access, relocation and tail removal;
/// `sync_list` never asks for anything else. A node that has no key tag is
/// treated as matching no key.
pub trait NodeList<K> {
    /// Node identity. Two equal values must refer to the same node.
    type Node: Copy + Eq;
    /// Constructor tag used when a brand-new node is needed.
    type Kind: ?Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The node currently at `index`, or `None` past the end.
    fn node_at(&self, index: usize) -> Option<Self::Node>;

    fn key_tag(&self, node: Self::Node) -> Option<&K>;

    fn set_key_tag(&mut self, node: Self::Node, key: K);

    /// Create a detached node of the given kind.
    fn create(&mut self, kind: &Self::Kind) -> Self::Node;

    /// Place `node` immediately before `anchor`, or at the end when `anchor`
    /// is `None`. An already attached node is relocated, not duplicated.
    fn insert_before(&mut self, node: Self::Node, anchor: Option<Self::Node>);

    /// Detach and destroy the last node.
    fn remove_last(&mut self) -> Option<Self::Node>;

    /// First node (in positional order) tagged with `key`.
    fn find_tagged(&self, key: &K) -> Option<Self::Node>
    where
        K: PartialEq,
    {
        (0..self.len())
            .filter_map(|i| self.node_at(i))
            .find(|&n| self.key_tag(n) == Some(key))
    }
}
