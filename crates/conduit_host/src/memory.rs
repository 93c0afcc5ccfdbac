// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory reference implementation of [`PipelineHost`].
//!
//! `MemoryHost` behaves like a real host: mutation requests are validated
//! against its own rules and either applied (producing an event) or silently
//! dropped. The embedder drains [`MemoryHost::drain_events`] and feeds them
//! to the canvas, which is exactly the asynchronous-echo shape the editor is
//! built around.

use crate::event::PipelineEvent;
use crate::fragment::{Fragment, FragmentEntity, FragmentWire};
use crate::host::{EntityKind, EntityRef, InputPortSpec, OutputPortSpec, PipelineHost};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Clone)]
struct Entity {
    name: String,
    kind: EntityKind,
    inputs: Vec<InputPortSpec>,
    outputs: Vec<OutputPortSpec>,
    annotations: BTreeMap<String, String>,
    modified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wire {
    source: EntityRef,
    output: u32,
    dest: EntityRef,
    input: u32,
}

/// An in-memory pipeline with a drainable event queue.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    entities: IndexMap<EntityRef, Entity>,
    wires: Vec<Wire>,
    visibility: HashMap<(EntityRef, u32), (bool, bool)>,
    selection: Vec<EntityRef>,
    events: VecDeque<PipelineEvent>,
}

impl MemoryHost {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source with the given output ports.
    pub fn add_source(&mut self, name: impl Into<String>, outputs: Vec<OutputPortSpec>) -> EntityRef {
        self.insert_entity(name.into(), EntityKind::Source, Vec::new(), outputs)
    }

    /// Register a filter with the given input and output ports.
    pub fn add_filter(
        &mut self,
        name: impl Into<String>,
        inputs: Vec<InputPortSpec>,
        outputs: Vec<OutputPortSpec>,
    ) -> EntityRef {
        self.insert_entity(name.into(), EntityKind::Filter, inputs, outputs)
    }

    /// Register a sticky note.
    pub fn add_note(&mut self, caption: impl Into<String>) -> EntityRef {
        self.insert_entity(caption.into(), EntityKind::Note, Vec::new(), Vec::new())
    }

    /// Flip an entity's modified flag, as committing or touching properties
    /// would in a real host.
    pub fn set_modified(&mut self, entity: EntityRef, modified: bool) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.modified = modified;
            self.events.push_back(PipelineEvent::RepresentationChanged(entity));
        }
    }

    /// Take every queued notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        self.events.drain(..).collect()
    }

    /// Number of wires currently present (test observability).
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// The host's current active selection (test observability).
    pub fn selection(&self) -> &[EntityRef] {
        &self.selection
    }

    fn insert_entity(
        &mut self,
        name: String,
        kind: EntityKind,
        inputs: Vec<InputPortSpec>,
        outputs: Vec<OutputPortSpec>,
    ) -> EntityRef {
        self.next_id += 1;
        let id = EntityRef(self.next_id);
        self.entities.insert(
            id,
            Entity {
                name,
                kind,
                inputs,
                outputs,
                annotations: BTreeMap::new(),
                modified: false,
            },
        );
        self.events.push_back(PipelineEvent::EntityAdded(id));
        id
    }

    fn wire_exists(&self, wire: Wire) -> bool {
        self.wires.contains(&wire)
    }

    fn input_spec(&self, dest: EntityRef, input: u32) -> Option<&InputPortSpec> {
        self.entities.get(&dest)?.inputs.get(input as usize)
    }
}

impl PipelineHost for MemoryHost {
    fn entities(&self) -> Vec<EntityRef> {
        self.entities.keys().copied().collect()
    }

    fn kind(&self, entity: EntityRef) -> Option<EntityKind> {
        self.entities.get(&entity).map(|e| e.kind)
    }

    fn name(&self, entity: EntityRef) -> Option<String> {
        self.entities.get(&entity).map(|e| e.name.clone())
    }

    fn rename(&mut self, entity: EntityRef, name: &str) {
        if let Some(e) = self.entities.get_mut(&entity) {
            if e.name != name && !name.is_empty() {
                e.name = name.to_owned();
                self.events.push_back(PipelineEvent::RepresentationChanged(entity));
            }
        }
    }

    fn num_input_ports(&self, entity: EntityRef) -> usize {
        self.entities.get(&entity).map_or(0, |e| e.inputs.len())
    }

    fn num_output_ports(&self, entity: EntityRef) -> usize {
        self.entities.get(&entity).map_or(0, |e| e.outputs.len())
    }

    fn input_port_name(&self, entity: EntityRef, port: u32) -> Option<String> {
        self.input_spec(entity, port).map(|p| p.name.clone())
    }

    fn output_port_name(&self, entity: EntityRef, port: u32) -> Option<String> {
        let e = self.entities.get(&entity)?;
        e.outputs.get(port as usize).map(|p| p.name.clone())
    }

    fn output_data_type(&self, entity: EntityRef, port: u32) -> Option<String> {
        let e = self.entities.get(&entity)?;
        e.outputs.get(port as usize).map(|p| p.data_type.clone())
    }

    fn upstream_connections(&self, dest: EntityRef, input: u32) -> Vec<(EntityRef, u32)> {
        self.wires
            .iter()
            .filter(|w| w.dest == dest && w.input == input)
            .map(|w| (w.source, w.output))
            .collect()
    }

    fn can_connect(&self, source: EntityRef, output: u32, dest: EntityRef, input: u32) -> bool {
        let Some(src) = self.entities.get(&source) else {
            return false;
        };
        let Some(out_spec) = src.outputs.get(output as usize) else {
            return false;
        };
        let Some(in_spec) = self.input_spec(dest, input) else {
            return false;
        };
        if source == dest {
            return false;
        }
        // Placeholders exist to satisfy "input must be non-empty" and fit
        // anywhere.
        if src.kind == EntityKind::Placeholder {
            return true;
        }
        in_spec.accepted.is_empty() || in_spec.accepted.contains(&out_spec.data_type)
    }

    fn accepts_multiple(&self, dest: EntityRef, input: u32) -> bool {
        self.input_spec(dest, input).is_some_and(|p| p.multiple)
    }

    fn input_optional(&self, dest: EntityRef, input: u32) -> bool {
        self.input_spec(dest, input).map_or(true, |p| p.optional)
    }

    fn add_connection(&mut self, source: EntityRef, output: u32, dest: EntityRef, input: u32) {
        let wire = Wire {
            source,
            output,
            dest,
            input,
        };
        if self.wire_exists(wire) {
            return;
        }
        if !self.can_connect(source, output, dest, input) {
            debug!(%source, %dest, output, input, "rejected connection request");
            return;
        }
        if !self.accepts_multiple(dest, input)
            && self.wires.iter().any(|w| w.dest == dest && w.input == input)
        {
            debug!(%dest, input, "rejected connection into occupied single input");
            return;
        }
        self.wires.push(wire);
        self.events
            .push_back(PipelineEvent::ConnectionAdded { source, dest });
    }

    fn remove_connection(&mut self, source: EntityRef, output: u32, dest: EntityRef, input: u32) {
        let wire = Wire {
            source,
            output,
            dest,
            input,
        };
        let before = self.wires.len();
        self.wires.retain(|w| *w != wire);
        if self.wires.len() != before {
            self.events
                .push_back(PipelineEvent::ConnectionRemoved { source, dest });
        }
    }

    fn clear_connections(&mut self, dest: EntityRef, input: u32) {
        let (dropped, kept): (Vec<Wire>, Vec<Wire>) = self
            .wires
            .drain(..)
            .partition(|w| w.dest == dest && w.input == input);
        self.wires = kept;
        for w in dropped {
            self.events.push_back(PipelineEvent::ConnectionRemoved {
                source: w.source,
                dest,
            });
        }
    }

    fn annotation(&self, entity: EntityRef, key: &str) -> Option<String> {
        self.entities.get(&entity)?.annotations.get(key).cloned()
    }

    fn set_annotation(&mut self, entity: EntityRef, key: &str, value: &str) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.annotations.insert(key.to_owned(), value.to_owned());
        }
    }

    fn output_visibility(&self, entity: EntityRef, output: u32) -> (bool, bool) {
        self.visibility
            .get(&(entity, output))
            .copied()
            .unwrap_or((true, false))
    }

    fn set_output_visibility(&mut self, entity: EntityRef, output: u32, visible: bool) {
        let entry = self.visibility.entry((entity, output)).or_insert((true, false));
        entry.0 = visible;
        self.events.push_back(PipelineEvent::RepresentationChanged(entity));
    }

    fn set_legend_visibility(&mut self, entity: EntityRef, output: u32, visible: bool) {
        let entry = self.visibility.entry((entity, output)).or_insert((true, false));
        entry.1 = visible;
        self.events.push_back(PipelineEvent::RepresentationChanged(entity));
    }

    fn is_modified(&self, entity: EntityRef) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.modified)
    }

    fn create_placeholder(&mut self) -> EntityRef {
        self.insert_entity(
            "placeholder".to_owned(),
            EntityKind::Placeholder,
            Vec::new(),
            vec![OutputPortSpec::new("out", "empty")],
        )
    }

    fn remove_entity(&mut self, entity: EntityRef) {
        if !self.entities.contains_key(&entity) {
            return;
        }
        debug!(%entity, "removing entity");
        self.events
            .push_back(PipelineEvent::EntityAboutToBeRemoved(entity));
        let (dropped, kept): (Vec<Wire>, Vec<Wire>) = self
            .wires
            .drain(..)
            .partition(|w| w.source == entity || w.dest == entity);
        self.wires = kept;
        for w in dropped {
            self.events.push_back(PipelineEvent::ConnectionRemoved {
                source: w.source,
                dest: w.dest,
            });
        }
        self.entities.shift_remove(&entity);
        self.selection.retain(|e| *e != entity);
        self.events.push_back(PipelineEvent::EntityRemoved(entity));
    }

    fn consumers(&self, entity: EntityRef) -> Vec<EntityRef> {
        let mut out: Vec<EntityRef> = Vec::new();
        for w in &self.wires {
            if w.source == entity && !out.contains(&w.dest) {
                out.push(w.dest);
            }
        }
        out
    }

    fn set_selection(&mut self, entities: &[EntityRef]) {
        if self.selection == entities {
            return;
        }
        self.selection = entities.to_vec();
        self.events
            .push_back(PipelineEvent::SelectionChanged(self.selection.clone()));
    }

    fn export_fragment(&self, entities: &[EntityRef]) -> Fragment {
        let mut fragment = Fragment::default();
        for &id in entities {
            let Some(e) = self.entities.get(&id) else {
                continue;
            };
            if e.kind == EntityKind::Placeholder {
                continue;
            }
            fragment.entities.push(FragmentEntity {
                reference: id,
                name: e.name.clone(),
                kind: e.kind,
                annotations: e.annotations.clone(),
                inputs: e.inputs.clone(),
                outputs: e.outputs.clone(),
            });
        }
        let copied = |id: EntityRef| fragment.entities.iter().any(|e| e.reference == id);
        for w in &self.wires {
            if copied(w.dest) {
                fragment.wires.push(FragmentWire {
                    source: w.source,
                    output: w.output,
                    dest: w.dest,
                    input: w.input,
                    external_source: !copied(w.source),
                });
            }
        }
        fragment
    }

    fn instantiate_fragment(
        &mut self,
        fragment: &Fragment,
        resolve_existing: bool,
    ) -> Vec<EntityRef> {
        let mut mapping: BTreeMap<EntityRef, EntityRef> = BTreeMap::new();
        let mut created = Vec::new();
        for e in &fragment.entities {
            let id = self.insert_entity(e.name.clone(), e.kind, e.inputs.clone(), e.outputs.clone());
            if let Some(stored) = self.entities.get_mut(&id) {
                stored.annotations = e.annotations.clone();
            }
            mapping.insert(e.reference, id);
            created.push(id);
        }
        for w in &fragment.wires {
            let Some(&dest) = mapping.get(&w.dest) else {
                continue;
            };
            let source = if w.external_source {
                if !resolve_existing || !self.entities.contains_key(&w.source) {
                    continue;
                }
                w.source
            } else {
                match mapping.get(&w.source) {
                    Some(&s) => s,
                    None => continue,
                }
            };
            self.add_connection(source, w.output, dest, w.input);
        }
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_pipeline() -> (MemoryHost, EntityRef, EntityRef) {
        let mut host = MemoryHost::new();
        let s = host.add_source("Wavelet", vec![OutputPortSpec::new("Output", "image")]);
        let f = host.add_filter(
            "Contour",
            vec![InputPortSpec::required("Input", vec!["image".into()])],
            vec![OutputPortSpec::new("Output", "polydata")],
        );
        host.drain_events();
        (host, s, f)
    }

    #[test]
    fn test_connect_produces_event() {
        let (mut host, s, f) = simple_pipeline();
        host.add_connection(s, 0, f, 0);
        assert_eq!(host.wire_count(), 1);
        assert_eq!(
            host.drain_events(),
            vec![PipelineEvent::ConnectionAdded { source: s, dest: f }]
        );
    }

    #[test]
    fn test_rejected_connect_produces_no_event() {
        let mut host = MemoryHost::new();
        let s = host.add_source("Table", vec![OutputPortSpec::new("Output", "table")]);
        let f = host.add_filter(
            "Contour",
            vec![InputPortSpec::required("Input", vec!["image".into()])],
            vec![],
        );
        host.drain_events();
        host.add_connection(s, 0, f, 0);
        assert_eq!(host.wire_count(), 0);
        assert!(host.drain_events().is_empty());
    }

    #[test]
    fn test_single_input_rejects_second_wire() {
        let (mut host, s, f) = simple_pipeline();
        let s2 = host.add_source("Wavelet2", vec![OutputPortSpec::new("Output", "image")]);
        host.add_connection(s, 0, f, 0);
        host.drain_events();
        host.add_connection(s2, 0, f, 0);
        assert_eq!(host.wire_count(), 1);
        assert!(host.drain_events().is_empty());
    }

    #[test]
    fn test_remove_entity_event_order() {
        let (mut host, s, f) = simple_pipeline();
        host.add_connection(s, 0, f, 0);
        host.drain_events();
        host.remove_entity(s);
        assert_eq!(
            host.drain_events(),
            vec![
                PipelineEvent::EntityAboutToBeRemoved(s),
                PipelineEvent::ConnectionRemoved { source: s, dest: f },
                PipelineEvent::EntityRemoved(s),
            ]
        );
    }

    #[test]
    fn test_fragment_round_trip_with_external_source() {
        let (mut host, s, f) = simple_pipeline();
        host.add_connection(s, 0, f, 0);
        let fragment = host.export_fragment(&[f]);
        assert_eq!(fragment.entities.len(), 1);
        assert_eq!(fragment.wires.len(), 1);
        assert!(fragment.wires[0].external_source);

        let created = host.instantiate_fragment(&fragment, true);
        assert_eq!(created.len(), 1);
        // The pasted filter reconnected to the still-present source.
        assert_eq!(host.upstream_connections(created[0], 0), vec![(s, 0)]);

        let created = host.instantiate_fragment(&fragment, false);
        assert!(host.upstream_connections(created[0], 0).is_empty());
    }
}
