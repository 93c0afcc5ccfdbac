// SPDX-License-Identifier: MIT OR Apache-2.0
//! The canvas model: an event-driven mirror of the host pipeline.
//!
//! All user edits leave through [`conduit_host::PipelineHost`] as requests;
//! the local graph changes only when the host's notifications come back. The
//! connection table is rebuilt per entity pair by set difference against what
//! the host reports, so duplicate, coalesced, or stale notifications all
//! converge on the same state.

use crate::clipboard;
use crate::config::CanvasConfig;
use crate::connection::{Connection, DragWire, DropVerdict, LinkKey, PairKey, PortPair};
use crate::geometry::{self, GRID_SPACING};
use crate::node::{Node, NodeKind};
use crate::port::PortDirection;
use crate::position;
use conduit_host::{EntityKind, EntityRef, Fragment, PipelineEvent, PipelineHost};
use egui::{Pos2, Rect, Vec2};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// What one reconciliation pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileDelta {
    /// Connections created.
    pub added: usize,
    /// Connections dropped.
    pub removed: usize,
}

impl ReconcileDelta {
    fn merge(&mut self, other: ReconcileDelta) {
        self.added += other.added;
        self.removed += other.removed;
    }
}

/// Which side currently drives selection, to break the notification loop
/// between the canvas and the host's active-selection mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SyncDirection {
    #[default]
    Idle,
    HostToCanvas,
    CanvasToHost,
}

/// The editor's graph state.
#[derive(Debug, Default)]
pub struct Canvas {
    /// Visual nodes, keyed by the entity they mirror. A node whose entity
    /// link is already detached (teardown phase one) keeps its key here
    /// until the final removal notification arrives.
    pub nodes: IndexMap<EntityRef, Node>,
    /// Connections grouped by entity pair, then keyed by port pair. The
    /// nested key guarantees at most one connection per 4-tuple.
    connections: IndexMap<PairKey, IndexMap<PortPair, Connection>>,
    /// In-progress drag wire, if any.
    pub drag: Option<DragWire>,
    /// Behavior settings.
    pub config: CanvasConfig,
    sync: SyncDirection,
    /// Set while a multi-step pointer gesture (rubber band, node drag) is in
    /// flight; selection is pushed to the host once, at gesture end.
    gesture_active: bool,
    /// Modifier override: treat any drop target as connectable.
    force_connect: bool,
    /// One-shot placement hint for the next node without a persisted
    /// position, set by the view when a create is user-initiated.
    next_drop: Option<Pos2>,
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Iterate all connections.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values().flat_map(|group| group.values())
    }

    /// Look up one connection.
    pub fn connection(&self, key: LinkKey) -> Option<&Connection> {
        self.connections.get(&key.pair)?.get(&key.ports)
    }

    /// Total connection count.
    pub fn connection_count(&self) -> usize {
        self.connections.values().map(|group| group.len()).sum()
    }

    /// Set the modifier override that forces drop acceptance. The host may
    /// still reject the resulting request; the canvas simply stops
    /// second-guessing it.
    pub fn set_force_connect(&mut self, force: bool) {
        self.force_connect = force;
        if let Some(drag) = &mut self.drag {
            if force && drag.verdict == DropVerdict::Reject {
                drag.verdict = DropVerdict::Accept;
            }
        }
    }

    /// Hint where the next created node should land, in scene coordinates.
    /// Consumed by the first node that arrives without a persisted position,
    /// so a menu-triggered create appears under the pointer instead of below
    /// the graph.
    pub fn place_next_at(&mut self, pos: Pos2) {
        self.next_drop = Some(pos);
    }

    // ------------------------------------------------------------------
    // Host notifications

    /// Apply one host notification.
    pub fn apply_event(&mut self, host: &mut dyn PipelineHost, event: &PipelineEvent) {
        trace!(?event, "applying host event");
        match *event {
            PipelineEvent::EntityAdded(entity) => {
                self.add_node(host, entity);
            }
            PipelineEvent::EntityAboutToBeRemoved(entity) => {
                if let Some(node) = self.nodes.get_mut(&entity) {
                    node.detach_entity();
                }
            }
            PipelineEvent::EntityRemoved(entity) => {
                self.remove_node(entity);
            }
            PipelineEvent::ConnectionAdded { source, dest }
            | PipelineEvent::ConnectionRemoved { source, dest } => {
                self.reconcile(host, source, dest);
            }
            PipelineEvent::SelectionChanged(ref entities) => {
                self.apply_host_selection(entities);
            }
            PipelineEvent::RepresentationChanged(_) => {}
        }
    }

    /// Rebuild the whole mirror from the host's current state. Used at
    /// startup and safe to call again at any time.
    pub fn sync_full(&mut self, host: &mut dyn PipelineHost) -> ReconcileDelta {
        let live: HashSet<EntityRef> = host.entities().into_iter().collect();
        let stale: Vec<EntityRef> = self
            .nodes
            .keys()
            .copied()
            .filter(|e| !live.contains(e))
            .collect();
        for entity in stale {
            self.remove_node(entity);
        }
        for entity in host.entities() {
            self.add_node(host, entity);
        }

        let mut pairs: HashSet<PairKey> = self.connections.keys().copied().collect();
        for dest in host.entities() {
            for input in 0..host.num_input_ports(dest) as u32 {
                for (source, _) in host.upstream_connections(dest, input) {
                    pairs.insert(PairKey { source, dest });
                }
            }
        }
        let mut delta = ReconcileDelta::default();
        for pair in pairs {
            delta.merge(self.reconcile(host, pair.source, pair.dest));
        }
        delta
    }

    /// Create the visual node for an entity, if one is due.
    ///
    /// Placeholders never get a node. Position comes from the persisted
    /// annotation when present, then from the pending placement hint;
    /// otherwise the node lands one grid row below the current graph. The
    /// chosen spot is written back so it survives a reload.
    fn add_node(&mut self, host: &mut dyn PipelineHost, entity: EntityRef) {
        if self.nodes.contains_key(&entity) {
            return;
        }
        let kind = match host.kind(entity) {
            Some(EntityKind::Placeholder) | None => return,
            Some(kind) => kind,
        };
        let mut node = match kind {
            EntityKind::Note => Node::new_note(entity, position::read_size(host, entity)),
            _ => Node::new(
                entity,
                host.num_input_ports(entity),
                host.num_output_ports(entity),
            ),
        };
        match position::read_position(host, entity) {
            Some(pos) => node.position = pos,
            None => {
                let spot = self
                    .next_drop
                    .take()
                    .unwrap_or_else(|| self.free_position());
                node.position = geometry::snap_pos(spot);
                position::write_position(host, entity, node.position);
            }
        }
        debug!(%entity, ?kind, pos = ?node.position, "node added");
        self.nodes.insert(entity, node);
    }

    /// A spot for a node with no persisted position: below everything else,
    /// left-aligned with the graph.
    fn free_position(&self) -> Pos2 {
        match self.bounds() {
            Some(bounds) => Pos2::new(
                bounds.min.x + geometry::NODE_SIZE.x / 2.0,
                bounds.max.y + GRID_SPACING + geometry::NODE_SIZE.y / 2.0,
            ),
            None => Pos2::ZERO,
        }
    }

    /// Drop the visual node and every connection touching it.
    fn remove_node(&mut self, entity: EntityRef) {
        if self.nodes.shift_remove(&entity).is_none() {
            return;
        }
        let touched: Vec<PairKey> = self
            .connections
            .keys()
            .copied()
            .filter(|pair| pair.source == entity || pair.dest == entity)
            .collect();
        for pair in touched {
            if let Some(group) = self.connections.shift_remove(&pair) {
                for key in group.keys() {
                    self.detach_ports(LinkKey { pair, ports: *key });
                }
            }
        }
        debug!(%entity, "node removed");
    }

    /// Bring the connection group for `(source, dest)` in line with what the
    /// host reports, by set difference. Idempotent; a pass that changes
    /// nothing returns a zero delta. Pairs whose nodes are not (or no
    /// longer) on the canvas are skipped silently, which makes stale
    /// notifications harmless.
    pub fn reconcile(
        &mut self,
        host: &dyn PipelineHost,
        source: EntityRef,
        dest: EntityRef,
    ) -> ReconcileDelta {
        let pair = PairKey { source, dest };
        if !self.nodes.contains_key(&source) || !self.nodes.contains_key(&dest) {
            trace!(%source, %dest, "reconcile skipped, node absent");
            return ReconcileDelta::default();
        }

        let mut queried: HashSet<PortPair> = HashSet::new();
        for input in 0..host.num_input_ports(dest) as u32 {
            for (upstream, output) in host.upstream_connections(dest, input) {
                if upstream == source {
                    queried.insert(PortPair { output, input });
                }
            }
        }
        let known: HashSet<PortPair> = self
            .connections
            .get(&pair)
            .map(|group| group.keys().copied().collect())
            .unwrap_or_default();

        let mut delta = ReconcileDelta::default();
        for ports in queried.difference(&known) {
            let key = LinkKey { pair, ports: *ports };
            if self.insert_connection(key) {
                delta.added += 1;
            }
        }
        let dropped: Vec<PortPair> = known.difference(&queried).copied().collect();
        for ports in dropped {
            let key = LinkKey { pair, ports };
            if let Some(group) = self.connections.get_mut(&pair) {
                group.shift_remove(&ports);
            }
            self.detach_ports(key);
            delta.removed += 1;
        }
        if self.connections.get(&pair).is_some_and(|g| g.is_empty()) {
            self.connections.shift_remove(&pair);
        }
        if delta != ReconcileDelta::default() {
            debug!(%source, %dest, added = delta.added, removed = delta.removed, "reconciled");
        }
        delta
    }

    fn insert_connection(&mut self, key: LinkKey) -> bool {
        let Some((start, end)) = self.endpoints(key) else {
            warn!(
                source = %key.pair.source,
                dest = %key.pair.dest,
                output = key.ports.output,
                input = key.ports.input,
                "connection references a port the node does not have"
            );
            return false;
        };
        self.connections
            .entry(key.pair)
            .or_default()
            .insert(key.ports, Connection::new(key, start, end));
        self.attach_ports(key);
        true
    }

    fn endpoints(&self, key: LinkKey) -> Option<(Pos2, Pos2)> {
        let source = self.nodes.get(&key.pair.source)?;
        let dest = self.nodes.get(&key.pair.dest)?;
        source.port(PortDirection::Output, key.ports.output)?;
        dest.port(PortDirection::Input, key.ports.input)?;
        Some((
            source.port_position(PortDirection::Output, key.ports.output),
            dest.port_position(PortDirection::Input, key.ports.input),
        ))
    }

    fn attach_ports(&mut self, key: LinkKey) {
        if let Some(node) = self.nodes.get_mut(&key.pair.source) {
            if let Some(port) = node.port_mut(PortDirection::Output, key.ports.output) {
                port.attach(key);
            }
        }
        if let Some(node) = self.nodes.get_mut(&key.pair.dest) {
            if let Some(port) = node.port_mut(PortDirection::Input, key.ports.input) {
                port.attach(key);
            }
        }
    }

    fn detach_ports(&mut self, key: LinkKey) {
        if let Some(node) = self.nodes.get_mut(&key.pair.source) {
            if let Some(port) = node.port_mut(PortDirection::Output, key.ports.output) {
                port.detach(key);
            }
        }
        if let Some(node) = self.nodes.get_mut(&key.pair.dest) {
            if let Some(port) = node.port_mut(PortDirection::Input, key.ports.input) {
                port.detach(key);
            }
        }
    }

    // ------------------------------------------------------------------
    // Connection drag

    /// Begin drawing a wire from an output port.
    pub fn start_wire(&mut self, source: EntityRef, output: u32, pointer: Pos2) {
        let Some(node) = self.nodes.get(&source) else {
            return;
        };
        if node.port(PortDirection::Output, output).is_none() {
            return;
        }
        let start = node.port_position(PortDirection::Output, output);
        self.drag = Some(DragWire::new(source, output, start, pointer));
    }

    /// Detach an existing connection and continue dragging its loose end.
    ///
    /// The disconnect request goes to the host immediately; the visual edge
    /// disappears when the removal notification echoes back. If the detach
    /// empties a required first input, a placeholder feed is requested so
    /// the input never goes hungry.
    pub fn grab_connection(&mut self, host: &mut dyn PipelineHost, key: LinkKey, pointer: Pos2) {
        if self.connection(key).is_none() {
            return;
        }
        self.request_disconnect(host, key);
        self.start_wire(key.pair.source, key.ports.output, pointer);
    }

    /// Move the drag wire's free end and refresh the hover verdict.
    pub fn move_wire(&mut self, host: &dyn PipelineHost, pointer: Pos2) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        drag.set_end(pointer);
        drag.verdict = match Self::input_under(&self.nodes, pointer) {
            // Self-connections are never sent, modifier or not, so the
            // hover feedback must not promise one.
            Some((dest, _)) if dest == drag.source => DropVerdict::Reject,
            Some((dest, input)) => {
                let ok = host.can_connect(drag.source, drag.output, dest, input);
                if ok || self.force_connect {
                    DropVerdict::Accept
                } else {
                    DropVerdict::Reject
                }
            }
            None => DropVerdict::Neutral,
        };
    }

    /// Release the drag wire.
    ///
    /// The wire itself is destroyed before the drop is evaluated, so no code
    /// path can leave a stale wire behind. A connectable drop turns into a
    /// host request; everything else is simply a cancel.
    pub fn finish_wire(&mut self, host: &mut dyn PipelineHost, pointer: Pos2) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some((dest, input)) = Self::input_under(&self.nodes, pointer) else {
            return;
        };
        if dest == drag.source {
            return;
        }
        if !host.can_connect(drag.source, drag.output, dest, input) && !self.force_connect {
            return;
        }
        // Any placeholder feed is obsolete the moment a real connection
        // arrives; single-connection inputs additionally evict the occupant.
        for (upstream, up_out) in host.upstream_connections(dest, input) {
            if host.kind(upstream) == Some(EntityKind::Placeholder) {
                host.remove_connection(upstream, up_out, dest, input);
            }
        }
        if !host.accepts_multiple(dest, input) {
            host.clear_connections(dest, input);
        }
        host.add_connection(drag.source, drag.output, dest, input);
        self.collect_placeholders(host);
    }

    /// Abandon the drag wire without touching the host.
    pub fn cancel_wire(&mut self) {
        self.drag = None;
    }

    fn input_under(nodes: &IndexMap<EntityRef, Node>, pointer: Pos2) -> Option<(EntityRef, u32)> {
        nodes.iter().rev().find_map(|(&entity, node)| {
            node.entity?;
            node.input_at(pointer).map(|input| (entity, input))
        })
    }

    /// Request removal of one connection, keeping the required-first-input
    /// feed rule: if the removal empties input 0 of a non-optional port and
    /// the departing upstream is not itself a placeholder, a fresh
    /// placeholder is wired in.
    pub fn request_disconnect(&mut self, host: &mut dyn PipelineHost, key: LinkKey) {
        let dest = key.pair.dest;
        let input = key.ports.input;
        let occupancy = host.upstream_connections(dest, input).len();
        host.remove_connection(key.pair.source, key.ports.output, dest, input);
        let needs_feed = input == 0
            && !host.input_optional(dest, input)
            && occupancy <= 1
            && host.kind(key.pair.source) != Some(EntityKind::Placeholder);
        if needs_feed {
            let placeholder = host.create_placeholder();
            debug!(%dest, %placeholder, "feeding emptied required input");
            host.add_connection(placeholder, 0, dest, input);
        }
    }

    /// Remove placeholder entities nothing consumes anymore.
    pub fn collect_placeholders(&mut self, host: &mut dyn PipelineHost) {
        let orphans: Vec<EntityRef> = host
            .entities()
            .into_iter()
            .filter(|&e| {
                host.kind(e) == Some(EntityKind::Placeholder) && host.consumers(e).is_empty()
            })
            .collect();
        for entity in orphans {
            debug!(%entity, "collecting orphaned placeholder");
            host.remove_entity(entity);
        }
    }

    // ------------------------------------------------------------------
    // Selection

    /// Mark a pointer gesture as in flight; selection changes accumulate
    /// locally until [`Canvas::end_gesture`].
    pub fn begin_gesture(&mut self) {
        self.gesture_active = true;
    }

    /// End the gesture and push the accumulated selection to the host.
    pub fn end_gesture(&mut self, host: &mut dyn PipelineHost) {
        self.gesture_active = false;
        self.push_selection(host);
    }

    /// Select exactly one node.
    pub fn select_only(&mut self, host: &mut dyn PipelineHost, entity: EntityRef) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        self.clear_connection_selection();
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.selected = true;
        }
        self.push_selection(host);
    }

    /// Toggle one node's membership in the selection.
    pub fn toggle_selected(&mut self, host: &mut dyn PipelineHost, entity: EntityRef) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            node.selected = !node.selected;
        }
        self.push_selection(host);
    }

    /// Replace the selection with every node intersecting `rect`. Rubber
    /// band selection covers nodes only; any selected connections drop out.
    pub fn select_rect(&mut self, rect: Rect) {
        for node in self.nodes.values_mut() {
            node.selected = rect.intersects(node.rect());
        }
        self.clear_connection_selection();
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self, host: &mut dyn PipelineHost) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        self.clear_connection_selection();
        self.push_selection(host);
    }

    /// Select exactly one connection, deselecting all nodes.
    pub fn select_connection(&mut self, host: &mut dyn PipelineHost, key: LinkKey) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        for group in self.connections.values_mut() {
            for conn in group.values_mut() {
                conn.selected = conn.key == key;
            }
        }
        self.push_selection(host);
    }

    fn clear_connection_selection(&mut self) {
        for group in self.connections.values_mut() {
            for conn in group.values_mut() {
                conn.selected = false;
            }
        }
    }

    /// Entities of the currently selected nodes (teardown-phase nodes whose
    /// entity link is gone are excluded).
    pub fn selected_entities(&self) -> Vec<EntityRef> {
        self.nodes
            .values()
            .filter(|n| n.selected)
            .filter_map(|n| n.entity)
            .collect()
    }

    /// Keys of the currently selected connections.
    pub fn selected_connections(&self) -> Vec<LinkKey> {
        self.connections()
            .filter(|c| c.selected)
            .map(|c| c.key)
            .collect()
    }

    /// Push the canvas selection into the host, unless a host-driven update
    /// is being applied, a gesture is still in flight, or active-object
    /// mirroring is disabled.
    pub fn push_selection(&mut self, host: &mut dyn PipelineHost) {
        if self.sync != SyncDirection::Idle || self.gesture_active {
            return;
        }
        if !self.config.update_active_object {
            return;
        }
        self.sync = SyncDirection::CanvasToHost;
        host.set_selection(&self.selected_entities());
        self.sync = SyncDirection::Idle;
    }

    /// Apply a host-driven selection change without echoing it back.
    fn apply_host_selection(&mut self, entities: &[EntityRef]) {
        if self.sync == SyncDirection::CanvasToHost {
            return;
        }
        self.sync = SyncDirection::HostToCanvas;
        let wanted: HashSet<EntityRef> = entities.iter().copied().collect();
        for (entity, node) in &mut self.nodes {
            node.selected = wanted.contains(entity);
        }
        self.sync = SyncDirection::Idle;
    }

    // ------------------------------------------------------------------
    // Editing

    /// Move every selected node by `delta`, rerouting affected curves.
    pub fn drag_selected_by(&mut self, delta: Vec2) {
        let moved: Vec<EntityRef> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.selected)
            .map(|(&e, _)| e)
            .collect();
        for entity in &moved {
            if let Some(node) = self.nodes.get_mut(entity) {
                node.position += delta;
            }
        }
        self.reroute_touching(&moved);
    }

    /// Finish a node move: snap to the grid and persist positions.
    pub fn end_move(&mut self, host: &mut dyn PipelineHost) {
        let moved: Vec<EntityRef> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.selected)
            .map(|(&e, _)| e)
            .collect();
        for entity in &moved {
            if let Some(node) = self.nodes.get_mut(entity) {
                node.position = geometry::snap_pos(node.position);
                if let Some(live) = node.entity {
                    position::write_position(host, live, node.position);
                }
            }
        }
        self.reroute_touching(&moved);
    }

    /// Resize a note node and persist its size.
    pub fn resize_note(&mut self, host: &mut dyn PipelineHost, entity: EntityRef, size: Vec2) {
        if let Some(node) = self.nodes.get_mut(&entity) {
            if node.kind == NodeKind::Note {
                node.size = size.max(Vec2::splat(GRID_SPACING * 2.0));
                if let Some(live) = node.entity {
                    position::write_size(host, live, node.size);
                }
            }
        }
    }

    /// Delete every selected connection and node, then collect any
    /// placeholders orphaned by the removals. Connection removals honor the
    /// required-first-input feed rule; node removals make it moot for their
    /// own inputs since the entity disappears entirely.
    pub fn delete_selection(&mut self, host: &mut dyn PipelineHost) {
        for key in self.selected_connections() {
            self.request_disconnect(host, key);
        }
        for entity in self.selected_entities() {
            host.remove_entity(entity);
        }
        self.collect_placeholders(host);
    }

    /// Copy the selected entities into a fragment via the host.
    pub fn copy_selection(&self, host: &dyn PipelineHost) -> Fragment {
        host.export_fragment(&self.selected_entities())
    }

    /// Paste a fragment with its top-left corner at `drop_point`.
    ///
    /// With `with_connections`, wires arriving from outside the fragment
    /// reconnect to their original sources where those still exist. New
    /// nodes appear through the host's added/connected notifications like
    /// any other change.
    pub fn paste(
        &mut self,
        host: &mut dyn PipelineHost,
        fragment: &Fragment,
        drop_point: Pos2,
        with_connections: bool,
    ) -> Vec<EntityRef> {
        if fragment.is_empty() {
            return Vec::new();
        }
        let mut placed = fragment.clone();
        clipboard::place_at(&mut placed, drop_point);
        host.instantiate_fragment(&placed, with_connections)
    }

    /// Apply positions computed by a layout provider and persist them.
    pub fn apply_layout(
        &mut self,
        host: &mut dyn PipelineHost,
        positions: &std::collections::HashMap<EntityRef, Pos2>,
    ) {
        let touched: Vec<EntityRef> = positions.keys().copied().collect();
        for (&entity, &pos) in positions {
            if let Some(node) = self.nodes.get_mut(&entity) {
                node.position = pos;
                if let Some(live) = node.entity {
                    position::write_position(host, live, pos);
                }
            }
        }
        self.reroute_touching(&touched);
    }

    // ------------------------------------------------------------------
    // Geometry queries

    /// Scene bounds of all nodes and routed curves.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        let mut extend = |r: Rect| {
            rect = Some(match rect {
                Some(acc) => acc.union(r),
                None => r,
            });
        };
        for node in self.nodes.values() {
            extend(node.rect());
        }
        for conn in self.connections() {
            extend(conn.path.bounding_rect());
        }
        rect
    }

    /// Topmost node under `pos`.
    pub fn node_at(&self, pos: Pos2) -> Option<EntityRef> {
        self.nodes
            .iter()
            .rev()
            .find(|(_, node)| node.rect().contains(pos))
            .map(|(&entity, _)| entity)
    }

    /// Topmost connection whose curve passes within the hit tolerance.
    pub fn connection_at(&self, pos: Pos2) -> Option<LinkKey> {
        self.connections()
            .filter(|c| c.path.hit(pos))
            .min_by(|a, b| {
                a.path
                    .distance_to(pos)
                    .total_cmp(&b.path.distance_to(pos))
            })
            .map(|c| c.key)
    }

    fn reroute_touching(&mut self, entities: &[EntityRef]) {
        let nodes = &self.nodes;
        for group in self.connections.values_mut() {
            for conn in group.values_mut() {
                if !entities.iter().any(|&e| conn.key.mentions(e)) {
                    continue;
                }
                let (Some(source), Some(dest)) = (
                    nodes.get(&conn.key.pair.source),
                    nodes.get(&conn.key.pair.dest),
                ) else {
                    continue;
                };
                conn.reroute(
                    source.port_position(PortDirection::Output, conn.key.ports.output),
                    dest.port_position(PortDirection::Input, conn.key.ports.input),
                );
            }
        }
    }
}
