//! MapViewer: state, menu and overlay wiring around the deep-zoom widget.
//!
//! The widget itself (tile loading, rendering, pan/zoom physics) is behind
//! `TiledImageHost`. Everything the page shows around it is an element in
//! the viewer's `ElementTree`, and both lists in it are kept in sync with
//! their tables by `sync_list`.
//!
//! `ViewerState` is written only through `MapViewer` methods. Each writer
//! updates the state, mirrors it into the query string and refreshes the
//! elements that depend on it.

use crate::capture::{CaptureCatalog, CatalogError};
use crate::config::{ConfigError, ViewerConfig};
use crate::element_tree::{ElementTree, NodeId};
use crate::events::{Action, EventKind};
use crate::overlay::{builtin_overlays, Location, OverlayObject, Placement};
use crate::panels::{self, ACTIVE_CLASS};
use crate::query::QueryParams;
use crate::sync_list::{sync_list, SyncReport};
use crate::viewport::{coordinate_label, Point, Rect};
use core::convert::Infallible;
use tracing::{debug, info, warn};

/// The deep-zoom image widget, as seen by the viewer.
pub trait TiledImageHost {
    /// Load a tiled image as layer `index`.
    fn add_tiled_image(&mut self, index: usize, tile_source: &str, opacity: f32);
    fn remove_all_images(&mut self);
    fn set_opacity(&mut self, index: usize, opacity: f32);
    fn fit_bounds(&mut self, bounds: Rect, immediately: bool);
    fn zoom_by(&mut self, factor: f64);
    fn is_full_page(&self) -> bool;
    fn set_full_page(&mut self, full: bool);
    /// Pin `node` to a world location. Called again whenever the overlay
    /// list is re-synced.
    fn place_overlay(&mut self, node: NodeId, location: Location, placement: Option<Placement>);
    /// Unpin an element placed earlier. Called once its overlay object is
    /// gone from the table.
    fn remove_overlay(&mut self, node: NodeId);
    /// Upper zoom limit, in image pixels per screen pixel.
    fn set_max_zoom_pixel_ratio(&mut self, ratio: f64);
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("unknown capture {0:?}")]
    UnknownCapture(String),
    #[error("unknown overlay object {0:?}")]
    UnknownOverlay(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Application state mirrored into the page.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    active_capture: String,
    query: QueryParams,
    captures_list_visible: bool,
    overlays_visible: bool,
    open_overlay: Option<String>,
}

impl ViewerState {
    pub fn active_capture(&self) -> &str {
        &self.active_capture
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn captures_list_visible(&self) -> bool {
        self.captures_list_visible
    }

    pub fn overlays_visible(&self) -> bool {
        self.overlays_visible
    }

    pub fn open_overlay(&self) -> Option<&str> {
        self.open_overlay.as_deref()
    }
}

/// Element ids of the fixed parts of the menu.
#[derive(Copy, Clone, Debug)]
pub struct MenuNodes {
    pub container: NodeId,
    pub toolbar: NodeId,
    pub fullscreen_button: NodeId,
    pub overlays_button: NodeId,
    pub list_button: NodeId,
    pub captures_list: NodeId,
    pub overlay_layer: NodeId,
    pub modal: NodeId,
    pub coordinates_hover: NodeId,
}

pub struct MapViewer<H> {
    config: ViewerConfig,
    captures: CaptureCatalog,
    overlays: Vec<OverlayObject>,
    state: ViewerState,
    tree: ElementTree,
    menu: MenuNodes,
    host: H,
}

fn never<T>(r: Result<T, Infallible>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => match e {},
    }
}

impl<H: TiledImageHost> MapViewer<H> {
    /// Viewer over the built-in capture and overlay tables.
    pub fn builtin(query: &str, host: H) -> Result<Self, ViewerError> {
        Self::new(
            ViewerConfig::default(),
            CaptureCatalog::builtin()?,
            builtin_overlays()?,
            QueryParams::parse(query),
            host,
        )
    }

    /// Load every capture into `host`, fit the initial view and build the
    /// menu.
    ///
    /// The active capture comes from the `capture` query parameter when it
    /// names a known capture, otherwise from the configuration.
    pub fn new(
        config: ViewerConfig,
        captures: CaptureCatalog,
        overlays: Vec<OverlayObject>,
        query: QueryParams,
        mut host: H,
    ) -> Result<Self, ViewerError> {
        config.validate()?;

        let requested = query.capture().filter(|id| {
            let known = captures.contains(id);
            if !known {
                warn!(capture = id, "ignoring unknown capture from query");
            }
            known
        });
        let active = match requested {
            Some(id) => id.to_string(),
            None if captures.contains(&config.default_capture_id) => {
                config.default_capture_id.clone()
            }
            None => return Err(ViewerError::UnknownCapture(config.default_capture_id)),
        };

        host.set_max_zoom_pixel_ratio(config.max_zoom_pixel_ratio);
        host.fit_bounds(query.bounds(config.home_bounds), true);
        host.remove_all_images();
        for (i, c) in captures.iter().enumerate() {
            let opacity = if c.unique_id == active { 1.0 } else { 0.0 };
            host.add_tiled_image(i, &c.tile_source, opacity);
        }

        let mut tree = ElementTree::new();
        let menu = build_menu(&mut tree, &config);

        let mut viewer = Self {
            state: ViewerState {
                active_capture: active,
                query,
                captures_list_visible: config.captures_list_visible,
                overlays_visible: config.overlays_visible,
                open_overlay: None,
            },
            config,
            captures,
            overlays,
            tree,
            menu,
            host,
        };
        viewer.refresh_captures_list();
        viewer.refresh_overlays();
        info!(
            captures = viewer.captures.len(),
            overlays = viewer.overlays.len(),
            active = viewer.state.active_capture.as_str(),
            "viewer ready"
        );
        Ok(viewer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn captures(&self) -> &CaptureCatalog {
        &self.captures
    }

    pub fn overlays(&self) -> &[OverlayObject] {
        &self.overlays
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn menu(&self) -> MenuNodes {
        self.menu
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Query string to put in the address bar.
    pub fn query_string(&self) -> String {
        self.state.query.to_query_string()
    }

    /// Show capture `unique_id` and hide the others.
    pub fn set_active_capture(&mut self, unique_id: &str) -> Result<SyncReport, ViewerError> {
        if !self.captures.contains(unique_id) {
            return Err(ViewerError::UnknownCapture(unique_id.to_string()));
        }
        self.state.active_capture = unique_id.to_string();
        self.state.query.set_capture(unique_id);
        let report = self.refresh_captures_list();

        for (i, c) in self.captures.iter().enumerate() {
            let opacity = if c.unique_id == unique_id { 1.0 } else { 0.0 };
            self.host.set_opacity(i, opacity);
        }
        info!(capture = unique_id, "active capture changed");
        Ok(report)
    }

    /// Replace the capture table and re-sync the list. Keeps the active
    /// capture if it still exists, otherwise falls back to the configured
    /// default.
    pub fn replace_captures(
        &mut self,
        captures: CaptureCatalog,
    ) -> Result<SyncReport, ViewerError> {
        let active = if captures.contains(&self.state.active_capture) {
            self.state.active_capture.clone()
        } else if captures.contains(&self.config.default_capture_id) {
            self.config.default_capture_id.clone()
        } else {
            return Err(ViewerError::UnknownCapture(
                self.config.default_capture_id.clone(),
            ));
        };
        self.host.remove_all_images();
        for (i, c) in captures.iter().enumerate() {
            let opacity = if c.unique_id == active { 1.0 } else { 0.0 };
            self.host.add_tiled_image(i, &c.tile_source, opacity);
        }
        self.captures = captures;
        self.set_active_capture(&active)
    }

    pub fn replace_overlays(&mut self, overlays: Vec<OverlayObject>) -> SyncReport {
        self.overlays = overlays;
        if self
            .state
            .open_overlay
            .as_deref()
            .map_or(false, |id| !self.overlays.iter().any(|o| o.unique_id == id))
        {
            self.close_modal();
        }
        self.refresh_overlays()
    }

    /// Re-sync the captures list with the catalog.
    pub fn refresh_captures_list(&mut self) -> SyncReport {
        let active = self.state.active_capture.as_str();
        let mut list = self.tree.children_of(self.menu.captures_list);
        never(sync_list(
            self.captures.as_slice(),
            &mut list,
            "div",
            |c| c.unique_id.clone(),
            |c, list, node| {
                panels::render_capture_entry(list.tree_mut(), node, c, active);
                Ok(())
            },
        ))
    }

    /// Re-sync the overlay layer with the overlay table. Elements trimmed by
    /// the pass are unpinned from the widget.
    pub fn refresh_overlays(&mut self) -> SyncReport {
        let before = self.tree.children(self.menu.overlay_layer).to_vec();
        let host = &mut self.host;
        let mut layer = self.tree.children_of(self.menu.overlay_layer);
        let report = never(sync_list(
            &self.overlays,
            &mut layer,
            "div",
            |o| o.unique_id.clone(),
            |o, layer, node| {
                o.render(layer.tree_mut(), node);
                host.place_overlay(node, o.location, o.placement);
                Ok(())
            },
        ));
        for node in before {
            if !self.tree.contains(node) {
                self.host.remove_overlay(node);
            }
        }
        report
    }

    /// Deliver `kind` to `target` and run every subscribed action, innermost
    /// element first. Returns the number of actions run.
    pub fn dispatch(&mut self, target: NodeId, kind: EventKind) -> Result<usize, ViewerError> {
        let actions = self.tree.dispatch(target, kind);
        debug!(?kind, actions = actions.len(), "dispatching event");
        for action in &actions {
            self.apply(action.clone())?;
        }
        Ok(actions.len())
    }

    pub fn apply(&mut self, action: Action) -> Result<(), ViewerError> {
        match action {
            Action::ActivateCapture(id) => {
                self.set_active_capture(&id)?;
            }
            Action::ToggleCapturesList => {
                let visible = !self.state.captures_list_visible;
                self.state.captures_list_visible = visible;
                self.show(self.menu.captures_list, self.menu.list_button, visible);
            }
            Action::ToggleOverlays => {
                let visible = !self.state.overlays_visible;
                self.state.overlays_visible = visible;
                self.show(self.menu.overlay_layer, self.menu.overlays_button, visible);
            }
            Action::ZoomBy(factor) => self.host.zoom_by(factor),
            Action::ResetView => self.host.fit_bounds(self.config.home_bounds, false),
            Action::ToggleFullscreen => {
                let full = !self.host.is_full_page();
                self.host.set_full_page(full);
                if let Some(e) = self.tree.element_mut(self.menu.fullscreen_button) {
                    e.set_class(ACTIVE_CLASS, full);
                }
            }
            Action::OpenOverlay(id) => self.open_overlay(&id)?,
            Action::CloseModal => self.close_modal(),
        }
        Ok(())
    }

    /// Persist the settled view after a pan or zoom animation.
    pub fn on_animation_finish(&mut self, bounds: Rect) {
        self.state.query.set_bounds(bounds);
    }

    /// Move the coordinate hover label to world position `p`.
    pub fn pointer_moved(&mut self, p: Point) {
        let hover = self.menu.coordinates_hover;
        if let Some(e) = self.tree.element_mut(hover) {
            e.set_text(coordinate_label(p));
        }
        panels::set_hidden(&mut self.tree, hover, false);
    }

    pub fn pointer_left(&mut self) {
        panels::set_hidden(&mut self.tree, self.menu.coordinates_hover, true);
    }

    fn show(&mut self, panel: NodeId, button: NodeId, visible: bool) {
        panels::set_hidden(&mut self.tree, panel, !visible);
        if let Some(e) = self.tree.element_mut(button) {
            e.set_class(ACTIVE_CLASS, visible);
        }
    }

    fn open_overlay(&mut self, unique_id: &str) -> Result<(), ViewerError> {
        let object = self
            .overlays
            .iter()
            .find(|o| o.unique_id == unique_id)
            .ok_or_else(|| ViewerError::UnknownOverlay(unique_id.to_string()))?;

        let modal = self.menu.modal;
        self.tree.clear_children(modal);
        for fragment in &object.modal_html {
            let part = self.tree.create_element("div");
            if let Some(e) = self.tree.element_mut(part) {
                e.add_class("modal-fragment");
                e.set_attribute("html", fragment.as_str());
            }
            self.tree.append_child(modal, part);
        }
        panels::set_hidden(&mut self.tree, modal, false);
        self.state.open_overlay = Some(unique_id.to_string());
        Ok(())
    }

    fn close_modal(&mut self) {
        self.tree.clear_children(self.menu.modal);
        panels::set_hidden(&mut self.tree, self.menu.modal, true);
        self.state.open_overlay = None;
    }
}

fn build_menu(tree: &mut ElementTree, config: &ViewerConfig) -> MenuNodes {
    let container = tree.create_element("div");
    let toolbar = tree.create_element("div");
    if let Some(e) = tree.element_mut(container) {
        e.set_attribute("id", "menu-container");
    }
    if let Some(e) = tree.element_mut(toolbar) {
        e.set_attribute("id", "menu-toolbar");
    }
    tree.append_child(container, toolbar);

    let view_group = panels::inventory_bar(tree);
    tree.append_child(toolbar, view_group);
    let zoom_in = panels::inventory_button(
        tree,
        "img/plus.png",
        None,
        Action::ZoomBy(config.zoom_step),
    );
    let zoom_out = panels::inventory_button(
        tree,
        "img/minus.png",
        None,
        Action::ZoomBy(1.0 / config.zoom_step),
    );
    let home = panels::inventory_button(
        tree,
        "img/home.png",
        Some("Reset view"),
        Action::ResetView,
    );
    let fullscreen_button = panels::inventory_button(
        tree,
        "img/spells/enlarge.png",
        Some("Toggle fullscreen"),
        Action::ToggleFullscreen,
    );
    for b in [zoom_in, zoom_out, home, fullscreen_button] {
        tree.append_child(view_group, b);
    }

    let panel_group = panels::inventory_bar(tree);
    tree.append_child(toolbar, panel_group);
    let overlays_button = panels::inventory_button(
        tree,
        "img/map.png",
        Some("Toggle overlays"),
        Action::ToggleOverlays,
    );
    let list_button = panels::inventory_button(
        tree,
        "img/book.png",
        Some("Toggle list"),
        Action::ToggleCapturesList,
    );
    tree.append_child(panel_group, overlays_button);
    tree.append_child(panel_group, list_button);

    let captures_list = tree.create_element("div");
    if let Some(e) = tree.element_mut(captures_list) {
        e.set_attribute("id", "captures-list");
    }
    tree.append_child(container, captures_list);

    // Overlay elements are handed to the widget, they are not part of the menu.
    let overlay_layer = tree.create_element("div");
    let modal = tree.create_element("div");
    if let Some(e) = tree.element_mut(modal) {
        e.add_classes(&["overlay-modal", "noita-decoration-9piece0"]);
        e.on(EventKind::Click, Action::CloseModal);
    }
    let coordinates_hover = tree.create_element("div");
    if let Some(e) = tree.element_mut(coordinates_hover) {
        e.set_attribute("id", "coordinates-hover");
    }

    panels::set_hidden(tree, captures_list, !config.captures_list_visible);
    if let Some(e) = tree.element_mut(list_button) {
        e.set_class(ACTIVE_CLASS, config.captures_list_visible);
    }
    panels::set_hidden(tree, overlay_layer, !config.overlays_visible);
    if let Some(e) = tree.element_mut(overlays_button) {
        e.set_class(ACTIVE_CLASS, config.overlays_visible);
    }
    panels::set_hidden(tree, modal, true);
    panels::set_hidden(tree, coordinates_hover, true);

    MenuNodes {
        container,
        toolbar,
        fullscreen_button,
        overlays_button,
        list_button,
        captures_list,
        overlay_layer,
        modal,
        coordinates_hover,
    }
}
