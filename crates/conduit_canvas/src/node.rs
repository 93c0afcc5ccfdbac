// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual nodes mirroring pipeline entities.

use crate::geometry::{self, NODE_SIZE, NOTE_SIZE, PORT_SIZE};
use crate::port::{Port, PortDirection};
use conduit_host::EntityRef;
use egui::{Pos2, Rect, Vec2};

/// Visual class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Fixed-size source/filter body with ports.
    Entity,
    /// Resizable sticky note; no ports, persisted width/height.
    Note,
}

/// The visual proxy for one pipeline entity.
///
/// Ports are created once from the entity's reported port counts and never
/// change for the node's lifetime; a changed port count means the entity was
/// removed and recreated. `entity` goes `None` when the host announces the
/// entity is about to be removed: the node stays alive for connection
/// cleanup but must not follow its identity link anymore.
#[derive(Debug, Clone)]
pub struct Node {
    /// Mirrored entity, or `None` during two-phase teardown.
    pub entity: Option<EntityRef>,
    /// Visual class.
    pub kind: NodeKind,
    /// Center position in scene coordinates (persisted via annotations).
    pub position: Pos2,
    /// Body size; fixed for entities, resizable for notes.
    pub size: Vec2,
    /// Input ports, ordered by index.
    pub inputs: Vec<Port>,
    /// Output ports, ordered by index.
    pub outputs: Vec<Port>,
    /// Selection flag.
    pub selected: bool,
}

impl Node {
    /// Create an entity node with the given port counts.
    pub fn new(entity: EntityRef, num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            entity: Some(entity),
            kind: NodeKind::Entity,
            position: Pos2::ZERO,
            size: NODE_SIZE,
            inputs: (0..num_inputs)
                .map(|i| Port::new(PortDirection::Input, i as u32))
                .collect(),
            outputs: (0..num_outputs)
                .map(|i| Port::new(PortDirection::Output, i as u32))
                .collect(),
            selected: false,
        }
    }

    /// Create a note node.
    pub fn new_note(entity: EntityRef, size: Option<Vec2>) -> Self {
        Self {
            entity: Some(entity),
            kind: NodeKind::Note,
            position: Pos2::ZERO,
            size: size.unwrap_or(NOTE_SIZE),
            inputs: Vec::new(),
            outputs: Vec::new(),
            selected: false,
        }
    }

    /// Body rectangle in scene coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }

    /// Scene position of one port's center.
    pub fn port_position(&self, direction: PortDirection, index: u32) -> Pos2 {
        self.position + geometry::port_offset(direction, index as usize)
    }

    /// Scene hit rectangle of one port.
    pub fn port_rect(&self, direction: PortDirection, index: u32) -> Rect {
        Rect::from_center_size(
            self.port_position(direction, index),
            Vec2::splat(PORT_SIZE + 2.0),
        )
    }

    /// The input port index under `pos`, if any.
    pub fn input_at(&self, pos: Pos2) -> Option<u32> {
        self.inputs
            .iter()
            .find(|p| self.port_rect(PortDirection::Input, p.index).contains(pos))
            .map(|p| p.index)
    }

    /// The output port index under `pos`, if any.
    pub fn output_at(&self, pos: Pos2) -> Option<u32> {
        self.outputs
            .iter()
            .find(|p| self.port_rect(PortDirection::Output, p.index).contains(pos))
            .map(|p| p.index)
    }

    /// Borrow a port.
    pub fn port(&self, direction: PortDirection, index: u32) -> Option<&Port> {
        match direction {
            PortDirection::Input => self.inputs.get(index as usize),
            PortDirection::Output => self.outputs.get(index as usize),
        }
    }

    /// Borrow a port mutably.
    pub(crate) fn port_mut(&mut self, direction: PortDirection, index: u32) -> Option<&mut Port> {
        match direction {
            PortDirection::Input => self.inputs.get_mut(index as usize),
            PortDirection::Output => self.outputs.get_mut(index as usize),
        }
    }

    /// Detach the identity link (phase one of removal). Subsequent paints
    /// and selection changes must degrade gracefully without it.
    pub fn detach_entity(&mut self) {
        self.entity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_created_from_counts() {
        let node = Node::new(EntityRef(1), 2, 3);
        assert_eq!(node.inputs.len(), 2);
        assert_eq!(node.outputs.len(), 3);
        assert_eq!(node.inputs[1].index, 1);
        assert_eq!(node.outputs[2].index, 2);
    }

    #[test]
    fn test_port_positions_follow_node() {
        let mut node = Node::new(EntityRef(1), 1, 1);
        let before = node.port_position(PortDirection::Input, 0);
        node.position += Vec2::new(100.0, 50.0);
        let after = node.port_position(PortDirection::Input, 0);
        assert_eq!(after - before, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_port_hit_rect() {
        let node = Node::new(EntityRef(1), 1, 1);
        let center = node.port_position(PortDirection::Output, 0);
        assert_eq!(node.output_at(center), Some(0));
        assert_eq!(node.output_at(center + Vec2::new(20.0, 0.0)), None);
        assert_eq!(node.input_at(center), None);
    }
}
