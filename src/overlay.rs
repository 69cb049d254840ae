//! Overlay objects: annotations pinned to world coordinates.
//!
//! An object is presented either as a box covering a region or as a symbol
//! image anchored at a point. The two presentations are a closed set and are
//! rendered with a plain `match`.

use crate::capture::CatalogError;
use crate::element_tree::{ElementTree, NodeId};
use crate::events::{Action, EventKind};
use crate::viewport::{Point, Rect};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const BUILTIN_OVERLAYS: &str = include_str!("../data/overlays.json");

pub const TOOLTIP_CLASSES: [&str; 3] = ["tooltip", "overlay-tooltip", "noita-decoration-9piece0"];

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Rect(Rect),
    Point(Point),
}

/// Which part of the element sits on a point location.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Center,
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    Box {
        #[serde(default)]
        tooltip: Option<String>,
    },
    Symbol {
        #[serde(default)]
        tooltip: Option<String>,
        image: String,
    },
}

impl Presentation {
    pub fn tooltip(&self) -> Option<&str> {
        match self {
            Presentation::Box { tooltip } | Presentation::Symbol { tooltip, .. } => {
                tooltip.as_deref()
            }
        }
    }

    /// Rebuild `node` as the viewport element for this presentation.
    pub fn render<K>(&self, tree: &mut ElementTree<K>, node: NodeId) {
        tree.clear_children(node);
        let Some(e) = tree.element_mut(node) else {
            return;
        };
        let (class, stale) = match self {
            Presentation::Box { .. } => ("overlay-box", "overlay-symbol"),
            Presentation::Symbol { .. } => ("overlay-symbol", "overlay-box"),
        };
        e.remove_class(stale);
        e.add_class(class);

        if let Some(text) = self.tooltip() {
            let tip = tree.create_element("span");
            if let Some(t) = tree.element_mut(tip) {
                t.add_classes(&TOOLTIP_CLASSES);
                t.set_text(text);
            }
            tree.append_child(node, tip);
        }

        if let Presentation::Symbol { image, .. } = self {
            let img = tree.create_element("img");
            if let Some(i) = tree.element_mut(img) {
                i.set_attribute("src", image.as_str());
            }
            tree.append_child(node, img);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayObject {
    #[serde(rename = "uniqueID")]
    pub unique_id: String,
    pub name: String,
    #[serde(default)]
    pub overlay_groups: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub authored_by: Vec<String>,
    pub location: Location,
    #[serde(default)]
    pub placement: Option<Placement>,
    pub presentation: Presentation,
    /// HTML fragments shown in the detail modal, in order.
    #[serde(default, rename = "modalHTML")]
    pub modal_html: Vec<String>,
}

impl OverlayObject {
    /// Render the viewport element and subscribe its click to the modal.
    pub fn render<K>(&self, tree: &mut ElementTree<K>, node: NodeId) {
        self.presentation.render(tree, node);
        if let Some(e) = tree.element_mut(node) {
            e.on(EventKind::Click, Action::OpenOverlay(self.unique_id.clone()));
        }
    }
}

/// Parse an overlay table, rejecting duplicate ids.
pub fn overlays_from_json(json: &str) -> Result<Vec<OverlayObject>, CatalogError> {
    let objects: Vec<OverlayObject> = serde_json::from_str(json)?;
    {
        let mut seen = hashbrown::HashSet::with_capacity(objects.len());
        for o in &objects {
            if !seen.insert(o.unique_id.as_str()) {
                return Err(CatalogError::DuplicateId(o.unique_id.clone()));
            }
        }
    }
    Ok(objects)
}

pub fn builtin_overlays() -> Result<Vec<OverlayObject>, CatalogError> {
    overlays_from_json(BUILTIN_OVERLAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses_both_presentations() {
        let objs = builtin_overlays().expect("builtin overlays");
        assert_eq!(objs.len(), 3);
        assert_eq!(
            objs[0].location,
            Location::Rect(Rect::new(512.0, -1536.0, 512.0, 512.0))
        );
        assert!(matches!(objs[0].presentation, Presentation::Box { .. }));
        let orb = &objs[2];
        assert_eq!(orb.location, Location::Point(Point::new(780.0, -1073.0)));
        assert_eq!(orb.placement, Some(Placement::Bottom));
        assert_eq!(orb.modal_html.len(), 4);
        assert_eq!(orb.overlay_groups, vec!["All".to_string()]);
    }

    #[test]
    fn symbol_renders_tooltip_and_image() {
        let mut t: ElementTree = ElementTree::new();
        let n = t.create_element("div");
        let p = Presentation::Symbol {
            tooltip: Some("Orb".into()),
            image: "img/orb.webp".into(),
        };
        p.render(&mut t, n);
        let e = t.element(n).unwrap();
        assert!(e.has_class("overlay-symbol"));
        assert_eq!(e.children().len(), 2);
        let tip = t.element(e.children()[0]).unwrap();
        assert_eq!(tip.classes().collect::<Vec<_>>(), TOOLTIP_CLASSES.to_vec());
        assert_eq!(tip.text(), "Orb");
        let img = t.element(e.children()[1]).unwrap();
        assert_eq!(img.attribute("src"), Some("img/orb.webp"));
    }

    /// Invariant: re-rendering replaces content instead of accumulating it,
    /// and switching presentation swaps the class.
    #[test]
    fn rerender_is_idempotent() {
        let mut t: ElementTree = ElementTree::new();
        let n = t.create_element("div");
        let boxed = Presentation::Box { tooltip: None };
        boxed.render(&mut t, n);
        boxed.render(&mut t, n);
        assert!(t.children(n).is_empty());
        assert!(t.element(n).unwrap().has_class("overlay-box"));

        Presentation::Symbol {
            tooltip: None,
            image: "x.png".into(),
        }
        .render(&mut t, n);
        let e = t.element(n).unwrap();
        assert!(!e.has_class("overlay-box"));
        assert!(e.has_class("overlay-symbol"));
        assert_eq!(e.children().len(), 1);
        // 1 element + 1 img, nothing leaked from earlier renders.
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn object_click_opens_modal() {
        let objs = builtin_overlays().unwrap();
        let mut t: ElementTree = ElementTree::new();
        let n = t.create_element("div");
        objs[2].render(&mut t, n);
        assert_eq!(
            t.dispatch(n, EventKind::Click),
            vec![Action::OpenOverlay(objs[2].unique_id.clone())]
        );
    }

    #[test]
    fn duplicate_overlay_ids_rejected() {
        let json = format!(
            "[{},{}]",
            serde_json::to_string(&builtin_overlays().unwrap()[0]).unwrap(),
            serde_json::to_string(&builtin_overlays().unwrap()[0]).unwrap()
        );
        assert!(matches!(
            overlays_from_json(&json),
            Err(CatalogError::DuplicateId(_))
        ));
    }
}
