// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ports on a visual node.

use crate::connection::LinkKey;
use crate::geometry;
use egui::Vec2;

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Consumes data; sits on the node's top edge.
    Input,
    /// Produces data; sits on the node's bottom edge.
    Output,
}

/// One numbered input or output port of a node.
///
/// A port's offset is fixed at construction; its scene position is always
/// derived as `node center + offset`. The `connections` list mirrors exactly
/// the connections that reference this port as an endpoint and is maintained
/// solely by the canvas attach/detach helpers.
#[derive(Debug, Clone)]
pub struct Port {
    /// Port index within its direction.
    pub index: u32,
    /// Direction.
    pub direction: PortDirection,
    /// Fixed offset from the owning node's center.
    pub offset: Vec2,
    /// Keys of connections currently attached here.
    pub connections: Vec<LinkKey>,
}

impl Port {
    /// Create a port at its computed layout offset.
    pub fn new(direction: PortDirection, index: u32) -> Self {
        Self {
            index,
            direction,
            offset: geometry::port_offset(direction, index as usize),
            connections: Vec::new(),
        }
    }

    /// Whether any connection is attached.
    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Record an attached connection.
    pub(crate) fn attach(&mut self, key: LinkKey) {
        if !self.connections.contains(&key) {
            self.connections.push(key);
        }
    }

    /// Forget a detached connection.
    pub(crate) fn detach(&mut self, key: LinkKey) {
        self.connections.retain(|k| *k != key);
    }
}
