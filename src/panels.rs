//! Element builders for the menu: toolbar buttons and captures-list entries.

use crate::capture::Capture;
use crate::element_tree::{ElementTree, NodeId};
use crate::events::{Action, EventKind};

pub const ACTIVE_CLASS: &str = "noita-active";

pub const CAPTURE_ENTRY_CLASSES: [&str; 3] = [
    "noita-decoration-9piece0",
    "noita-hoverable",
    "captures-list-entry",
];

/// Show or hide an element (the `hidden` attribute).
pub fn set_hidden<K>(tree: &mut ElementTree<K>, node: NodeId, hidden: bool) {
    if let Some(e) = tree.element_mut(node) {
        if hidden {
            e.set_attribute("hidden", "");
        } else {
            e.remove_attribute("hidden");
        }
    }
}

pub fn is_hidden<K>(tree: &ElementTree<K>, node: NodeId) -> bool {
    tree.element(node)
        .map_or(false, |e| e.attribute("hidden").is_some())
}

/// An invisible group that lays out inventory-style buttons in a row.
pub fn inventory_bar<K>(tree: &mut ElementTree<K>) -> NodeId {
    let bar = tree.create_element("div");
    if let Some(e) = tree.element_mut(bar) {
        e.add_class("noita-inventory-group-invisible");
    }
    bar
}

/// An inventory-slot button with a 16x16 icon and an optional tooltip.
pub fn inventory_button<K>(
    tree: &mut ElementTree<K>,
    icon: &str,
    tooltip: Option<&str>,
    action: Action,
) -> NodeId {
    let button = tree.create_element("div");
    if let Some(e) = tree.element_mut(button) {
        e.add_class("noita-inventory-box");
        e.on(EventKind::Click, action);
    }

    let img = tree.create_element("img");
    if let Some(e) = tree.element_mut(img) {
        e.add_class("noita-icon");
        e.set_attribute("src", icon);
    }
    tree.append_child(button, img);

    if let Some(text) = tooltip {
        let tip = tree.create_element("span");
        if let Some(e) = tree.element_mut(tip) {
            e.add_classes(&["tooltip", "noita-decoration-9piece0"]);
            e.set_text(text);
        }
        tree.append_child(button, tip);
    }
    button
}

/// Fill a captures-list entry. Content is rebuilt on every call so the
/// result only depends on `capture` and `active_id`.
pub fn render_capture_entry<K>(
    tree: &mut ElementTree<K>,
    node: NodeId,
    capture: &Capture,
    active_id: &str,
) {
    tree.clear_children(node);
    let Some(e) = tree.element_mut(node) else {
        return;
    };
    e.add_classes(&CAPTURE_ENTRY_CLASSES);
    e.set_class(ACTIVE_CLASS, capture.unique_id == active_id);
    e.set_text("");
    e.set_attribute("title", capture.name.as_str());
    e.on(
        EventKind::Click,
        Action::ActivateCapture(capture.unique_id.clone()),
    );

    let (icon, width) = capture.game_mode.icon();
    let img = tree.create_element("img");
    if let Some(e) = tree.element_mut(img) {
        e.add_class("captures-list-entry-image");
        e.set_attribute("src", icon);
        e.set_attribute("width", width.to_string());
    }
    tree.append_child(node, img);

    let details = tree.create_element("div");
    if let Some(e) = tree.element_mut(details) {
        e.add_class("captures-list-entry-description");
    }
    let rows = [
        ("Gamemode", capture.game_mode.label().to_string()),
        ("Branch", capture.branch.as_str().to_string()),
        ("Build", capture.build_date()),
    ];
    for (label, value) in rows {
        for text in [label.to_string(), value] {
            let span = tree.create_element("span");
            if let Some(e) = tree.element_mut(span) {
                e.set_text(text);
            }
            tree.append_child(details, span);
        }
    }
    tree.append_child(node, details);
}
