// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conduit network editor core.
//!
//! Renders an external host pipeline (sources, filters, ports, connections)
//! as an interactive node graph and keeps the two in sync. The host is the
//! single source of truth: user edits are sent to it as requests, and the
//! visible graph only changes when the host's own change notifications come
//! back and drive a reconciliation pass.
//!
//! ## Architecture
//!
//! - [`geometry`]: port placement, grid snapping, connection curve routing
//! - [`node`] / [`port`] / [`connection`]: the visual data model
//! - [`canvas`]: reconciliation by set difference, the connection-drag state
//!   machine, selection sync, placeholder garbage collection, copy/paste
//! - [`layout`]: pluggable auto-layout providers
//! - [`ui`]: the egui view (painting, input, pan/zoom/fit)

pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod connection;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod port;
pub mod position;
pub mod ui;

pub use canvas::{Canvas, ReconcileDelta};
pub use config::CanvasConfig;
pub use connection::{Connection, DragWire, DropVerdict, LinkKey, PairKey, PortPair};
pub use layout::{LayeredLayout, LayoutProvider};
pub use node::{Node, NodeKind};
pub use port::{Port, PortDirection};
pub use ui::EditorView;
