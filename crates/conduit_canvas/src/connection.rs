// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection edges and the transient drag wire.

use crate::geometry::CurvePath;
use conduit_host::EntityRef;
use egui::Pos2;

/// An ordered entity pair: wiring flows from `source` into `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    /// Upstream entity.
    pub source: EntityRef,
    /// Downstream entity.
    pub dest: EntityRef,
}

/// The port indices of one connection within an entity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortPair {
    /// Output index on the source.
    pub output: u32,
    /// Input index on the destination.
    pub input: u32,
}

/// Full external key of one connection: the 4-tuple
/// `(source, output, dest, input)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkKey {
    /// Entity pair.
    pub pair: PairKey,
    /// Port indices.
    pub ports: PortPair,
}

impl LinkKey {
    /// Whether either endpoint belongs to `entity`.
    pub fn mentions(&self, entity: EntityRef) -> bool {
        self.pair.source == entity || self.pair.dest == entity
    }
}

/// One visual edge between an output port and an input port.
///
/// At most one `Connection` exists per [`LinkKey`]; the canvas's keyed
/// table enforces that. Endpoint ports are referenced by key, never owned.
#[derive(Debug, Clone)]
pub struct Connection {
    /// External identity.
    pub key: LinkKey,
    /// Cached routed path; recomputed whenever either endpoint moves.
    pub path: CurvePath,
    /// Selection flag.
    pub selected: bool,
}

impl Connection {
    /// Create a connection with its initial routed path.
    pub fn new(key: LinkKey, start: Pos2, end: Pos2) -> Self {
        Self {
            key,
            path: CurvePath::between(start, end),
            selected: false,
        }
    }

    /// Recompute the routed path from fresh endpoint positions.
    pub fn reroute(&mut self, start: Pos2, end: Pos2) {
        self.path = CurvePath::between(start, end);
    }
}

/// Hover verdict while a drag wire floats over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropVerdict {
    /// Not over an input port.
    #[default]
    Neutral,
    /// Over an input port the host (or the force override) would accept.
    Accept,
    /// Over an input port the host would reject.
    Reject,
}

/// The single in-progress connection being drawn by the user.
///
/// Anchored at a real output port; the free end follows the pointer. Never
/// enters the persistent connection table — a real edge only appears once
/// the host confirms the connection.
#[derive(Debug, Clone)]
pub struct DragWire {
    /// Entity owning the anchored output port.
    pub source: EntityRef,
    /// Anchored output port index.
    pub output: u32,
    /// Anchor position in scene coordinates.
    pub start: Pos2,
    /// Free endpoint, tracking the pointer.
    pub end: Pos2,
    /// Routed path from anchor to pointer.
    pub path: CurvePath,
    /// Current hover verdict, for styling only.
    pub verdict: DropVerdict,
}

impl DragWire {
    /// Start a wire at an output port.
    pub fn new(source: EntityRef, output: u32, start: Pos2, end: Pos2) -> Self {
        Self {
            source,
            output,
            start,
            end,
            path: CurvePath::between(start, end),
            verdict: DropVerdict::Neutral,
        }
    }

    /// Move the free endpoint.
    pub fn set_end(&mut self, end: Pos2) {
        self.end = end;
        self.path = CurvePath::between(self.start, end);
    }
}
