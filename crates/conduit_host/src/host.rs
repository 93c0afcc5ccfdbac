// SPDX-License-Identifier: MIT OR Apache-2.0
//! The `PipelineHost` trait and the identity/port-spec types it deals in.

use crate::fragment::Fragment;
use serde::{Deserialize, Serialize};

/// Opaque identity of one pipeline entity inside the host.
///
/// The canvas uses this only as a map key and for delegated queries; it never
/// derives any behavior from the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub u64);

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of entity the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A data producer with outputs only.
    Source,
    /// A processing step with inputs and outputs.
    Filter,
    /// A free-floating annotation; drawn as a resizable note, never wired.
    Note,
    /// An internal placeholder auto-created by the editor to keep a required
    /// input non-empty. Skipped by the canvas and garbage-collected.
    Placeholder,
}

/// Declared shape of one output port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPortSpec {
    /// Port name as the host reports it.
    pub name: String,
    /// Data type produced on this port.
    pub data_type: String,
}

impl OutputPortSpec {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Declared shape of one input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPortSpec {
    /// Port name as the host reports it.
    pub name: String,
    /// Whether the port may be left unconnected.
    pub optional: bool,
    /// Whether the port accepts more than one incoming connection.
    pub multiple: bool,
    /// Data types this port accepts; empty means any.
    pub accepted: Vec<String>,
}

impl InputPortSpec {
    /// A required, single-connection input accepting the given types.
    pub fn required(name: impl Into<String>, accepted: Vec<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            multiple: false,
            accepted,
        }
    }

    /// An optional input accepting the given types.
    pub fn optional(name: impl Into<String>, accepted: Vec<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            multiple: false,
            accepted,
        }
    }

    /// Allow multiple incoming connections.
    pub fn with_multiple(mut self) -> Self {
        self.multiple = true;
        self
    }
}

/// The host pipeline as seen from the canvas.
///
/// Mutation requests are fire-and-forget: the host applies or rejects them on
/// its own terms and reports the outcome exclusively through
/// [`PipelineEvent`](crate::PipelineEvent) notifications. Callers must not
/// assume a request succeeded.
pub trait PipelineHost {
    /// All entities currently present, in the host's order.
    fn entities(&self) -> Vec<EntityRef>;

    /// Kind of an entity; `None` if it no longer exists.
    fn kind(&self, entity: EntityRef) -> Option<EntityKind>;

    /// Current display name.
    fn name(&self, entity: EntityRef) -> Option<String>;

    /// Request a rename.
    fn rename(&mut self, entity: EntityRef, name: &str);

    /// Number of declared input ports.
    fn num_input_ports(&self, entity: EntityRef) -> usize;

    /// Number of declared output ports.
    fn num_output_ports(&self, entity: EntityRef) -> usize;

    /// Name of one input port.
    fn input_port_name(&self, entity: EntityRef, port: u32) -> Option<String>;

    /// Name of one output port.
    fn output_port_name(&self, entity: EntityRef, port: u32) -> Option<String>;

    /// Data type produced on one output port.
    fn output_data_type(&self, entity: EntityRef, port: u32) -> Option<String>;

    /// The `(source, output)` pairs currently feeding `(dest, input)`.
    fn upstream_connections(&self, dest: EntityRef, input: u32) -> Vec<(EntityRef, u32)>;

    /// Whether the host's type/domain rules permit this connection.
    fn can_connect(&self, source: EntityRef, output: u32, dest: EntityRef, input: u32) -> bool;

    /// Whether an input accepts more than one incoming connection.
    fn accepts_multiple(&self, dest: EntityRef, input: u32) -> bool;

    /// Whether an input may be left unconnected.
    fn input_optional(&self, dest: EntityRef, input: u32) -> bool;

    /// Request wiring `(source, output)` into `(dest, input)`.
    fn add_connection(&mut self, source: EntityRef, output: u32, dest: EntityRef, input: u32);

    /// Request removal of one connection.
    fn remove_connection(&mut self, source: EntityRef, output: u32, dest: EntityRef, input: u32);

    /// Request removal of every connection into `(dest, input)`.
    fn clear_connections(&mut self, dest: EntityRef, input: u32);

    /// Read one string-keyed annotation.
    fn annotation(&self, entity: EntityRef, key: &str) -> Option<String>;

    /// Write one string-keyed annotation.
    fn set_annotation(&mut self, entity: EntityRef, key: &str, value: &str);

    /// `(shown, color_legend_shown)` for one output in the active view.
    fn output_visibility(&self, entity: EntityRef, output: u32) -> (bool, bool);

    /// Request a visibility change for one output.
    fn set_output_visibility(&mut self, entity: EntityRef, output: u32, visible: bool);

    /// Request a color-legend visibility change for one output.
    fn set_legend_visibility(&mut self, entity: EntityRef, output: u32, visible: bool);

    /// Whether the entity has uncommitted property changes.
    fn is_modified(&self, entity: EntityRef) -> bool;

    /// Create an internal placeholder entity with a single output.
    fn create_placeholder(&mut self) -> EntityRef;

    /// Request removal of an entity.
    fn remove_entity(&mut self, entity: EntityRef);

    /// Entities consuming any output of `entity`.
    fn consumers(&self, entity: EntityRef) -> Vec<EntityRef>;

    /// Push the canvas selection as the host's active selection.
    fn set_selection(&mut self, entities: &[EntityRef]);

    /// Serialize the given entities (plus their wiring) for copy/paste.
    fn export_fragment(&self, entities: &[EntityRef]) -> Fragment;

    /// Instantiate a pasted fragment. With `resolve_existing`, wires whose
    /// source lies outside the fragment reconnect to the original entity if
    /// it still exists; otherwise such wires are dropped.
    fn instantiate_fragment(&mut self, fragment: &Fragment, resolve_existing: bool)
        -> Vec<EntityRef>;
}
