//! mapcap-viewer: headless model of a deep-zoom viewer for stitched game
//! world captures, built around keyed list reconciliation.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the page around the image widget (capture list, overlay
//!   objects, toolbar) as plain data that can be driven and inspected
//!   without a browser.
//! - Layers:
//!   - `NodeList<K>`: the capability set an ordered child collection must
//!     offer: positional access, key tags, relocation, tail removal.
//!   - `sync_list`: one forward pass that makes node `i` represent record
//!     `i`, reusing nodes by key, creating missing ones and trimming the
//!     tail.
//!   - `ElementTree<K>`: slotmap-backed element arena with generational
//!     `NodeId`s; `Children` exposes one element's children as a `NodeList`.
//!   - `MapViewer<H>`: application state and wiring on top, talking to the
//!     image widget through `TiledImageHost`.
//!
//! Constraints
//! - Single-threaded and synchronous. A `sync_list` pass holds `&mut` to its
//!   list for the whole pass; callbacks get the list back as an argument and
//!   must not restructure it.
//! - Key tags are stored beside the arena (a `SecondaryMap`), never inside
//!   the records. Records are only borrowed.
//! - Lookups are linear. Lists are tens of entries long; an unchanged list
//!   costs one key comparison and one update per entry.
//! - Keys are expected to be unique within one pass. Duplicates never panic
//!   but may leave the list shorter than the source.
//!
//! Failure policy
//! - `sync_list` is generic over the update callback's error and returns it
//!   unchanged. Work done before the failure stays applied; the tail is not
//!   trimmed.
//! - Nodes without a key tag match nothing and get trimmed eventually.
//! - Data tables and configuration fail at load time with `thiserror` enums;
//!   runtime lookups of unknown ids return `ViewerError`.
//!
//! State
//! - `ViewerState` holds the active capture, the query string and panel
//!   visibility. Only `MapViewer` writes it, and every writer refreshes the
//!   dependent elements and the query string in the same call.
//! - Event listeners are `(EventKind, Action)` pairs stored on elements.
//!   `MapViewer::dispatch` resolves them and runs the actions; a capture
//!   click therefore triggers a fresh, independent sync pass.
//!
//! Notes and non-goals
//! - Tile pyramids, image decoding and rendering belong to the widget.
//! - The tail-only trim is kept as is. With unique keys every stale node ends
//!   up past the last source position, so nothing is stranded.

pub mod capture;
pub mod config;
pub mod element_tree;
pub mod events;
pub mod node_list;
pub mod overlay;
pub mod panels;
pub mod query;
pub mod sync_list;
mod sync_list_proptest;
pub mod viewer;
pub mod viewport;

// Public surface
pub use capture::{Capture, CaptureCatalog, CatalogError, GameMode};
pub use config::{ConfigError, ViewerConfig};
pub use element_tree::{Children, Element, ElementTree, NodeId};
pub use events::{Action, EventKind, Listener};
pub use node_list::NodeList;
pub use overlay::{Location, OverlayObject, Placement, Presentation};
pub use query::QueryParams;
pub use sync_list::{sync_list, SyncReport};
pub use viewer::{MapViewer, MenuNodes, TiledImageHost, ViewerError, ViewerState};
pub use viewport::{ChunkCoord, Point, Rect, CHUNK_SIZE, HOME_BOUNDS};
