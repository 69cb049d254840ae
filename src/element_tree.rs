//! ElementTree: arena-backed element hierarchy with generational node ids.
//!
//! Stands in for the browser document. Elements live in a `SlotMap`; a
//! `NodeId` is a thin wrapper around its generational key, so ids of
//! destroyed elements never resolve again even when the slot is reused.
//! Key tags used by `sync_list` live in a `SecondaryMap` beside the arena
//! instead of on the element itself.

use crate::events::{Action, EventKind, Listener};
use crate::node_list::NodeList;
use hashbrown::HashMap;
use slotmap::{DefaultKey, SecondaryMap, SlotMap};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(DefaultKey);

#[derive(Debug)]
pub struct Element {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    text: String,
    listeners: Vec<Listener>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            text: String::new(),
            listeners: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Adds `class` unless already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn add_classes(&mut self, classes: &[&str]) {
        for class in classes {
            self.add_class(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Own text, not including descendants.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Subscribe `action` to `kind`, replacing any earlier subscription for
    /// the same kind. Re-rendering the same element is therefore idempotent.
    pub fn on(&mut self, kind: EventKind, action: Action) {
        match self.listeners.iter_mut().find(|l| l.kind == kind) {
            Some(l) => l.action = action,
            None => self.listeners.push(Listener { kind, action }),
        }
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn action_for(&self, kind: EventKind) -> Option<&Action> {
        self.listeners
            .iter()
            .find(|l| l.kind == kind)
            .map(|l| &l.action)
    }
}

pub struct ElementTree<K = String> {
    nodes: SlotMap<DefaultKey, Element>,
    key_tags: SecondaryMap<DefaultKey, K>,
}

impl<K> ElementTree<K> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            key_tags: SecondaryMap::new(),
        }
    }

    /// Number of live elements, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        NodeId(self.nodes.insert(Element::new(tag)))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Children of `id`; empty for a stale id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Attach `child` under `parent` right before `anchor` (or last when
    /// `anchor` is `None`), detaching it from wherever it was first.
    ///
    /// Returns false and changes nothing if an id is stale, if `anchor` is
    /// not a child of `parent`, or if the move would create a cycle.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        anchor: Option<NodeId>,
    ) -> bool {
        if !self.contains(parent) || !self.contains(child) || anchor == Some(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        if let Some(a) = anchor {
            if self.nodes[a.0].parent != Some(parent) {
                return false;
            }
        }

        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let at = anchor
            .and_then(|a| siblings.iter().position(|&c| c == a))
            .unwrap_or(siblings.len());
        siblings.insert(at, child);
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// Detach `id` and destroy it together with all descendants.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        self.destroy_subtree(id);
        true
    }

    /// Destroy every child of `id`, keeping `id` itself.
    pub fn clear_children(&mut self, id: NodeId) {
        let Some(e) = self.nodes.get_mut(id.0) else {
            return;
        };
        for child in core::mem::take(&mut e.children) {
            self.destroy_subtree(child);
        }
    }

    /// Own text of `id` followed by the text of its descendants, depth-first.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(e) = self.nodes.get(n.0) {
                out.push_str(&e.text);
                stack.extend(e.children.iter().rev().copied());
            }
        }
        out
    }

    /// First descendant of `id` (depth-first, excluding `id`) carrying `class`.
    pub fn find_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            let e = self.nodes.get(n.0)?;
            if e.has_class(class) {
                return Some(n);
            }
            stack.extend(e.children.iter().rev().copied());
        }
        None
    }

    /// Actions subscribed to `kind` on `target` and its ancestors, innermost
    /// first.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut cur = Some(target);
        while let Some(n) = cur {
            let Some(e) = self.nodes.get(n.0) else {
                break;
            };
            if let Some(a) = e.action_for(kind) {
                actions.push(a.clone());
            }
            cur = e.parent;
        }
        actions
    }

    pub fn key_tag(&self, id: NodeId) -> Option<&K> {
        self.key_tags.get(id.0)
    }

    pub fn set_key_tag(&mut self, id: NodeId, key: K) {
        let _ = self.key_tags.insert(id.0, key);
    }

    /// `NodeList` view over the children of `parent`.
    pub fn children_of(&mut self, parent: NodeId) -> Children<'_, K> {
        Children { tree: self, parent }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(id.0).and_then(|e| e.parent) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id.0).and_then(|e| e.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != id);
        }
    }

    fn destroy_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(e) = self.nodes.remove(n.0) {
                let _ = self.key_tags.remove(n.0);
                stack.extend(e.children);
            }
        }
    }
}

impl<K> Default for ElementTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The children of one element, seen as a keyed `NodeList`.
pub struct Children<'t, K> {
    tree: &'t mut ElementTree<K>,
    parent: NodeId,
}

impl<'t, K> Children<'t, K> {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn tree(&self) -> &ElementTree<K> {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ElementTree<K> {
        self.tree
    }
}

impl<'t, K> NodeList<K> for Children<'t, K> {
    type Node = NodeId;
    type Kind = str;

    fn len(&self) -> usize {
        self.tree.children(self.parent).len()
    }

    fn node_at(&self, index: usize) -> Option<NodeId> {
        self.tree.children(self.parent).get(index).copied()
    }

    fn key_tag(&self, node: NodeId) -> Option<&K> {
        self.tree.key_tag(node)
    }

    fn set_key_tag(&mut self, node: NodeId, key: K) {
        self.tree.set_key_tag(node, key);
    }

    fn create(&mut self, kind: &str) -> NodeId {
        self.tree.create_element(kind)
    }

    fn insert_before(&mut self, node: NodeId, anchor: Option<NodeId>) {
        let attached = self.tree.insert_before(self.parent, node, anchor);
        debug_assert!(attached, "sync_list handed out a foreign node");
    }

    fn remove_last(&mut self) -> Option<NodeId> {
        let last = *self.tree.children(self.parent).last()?;
        self.tree.remove(last);
        Some(last)
    }
}
