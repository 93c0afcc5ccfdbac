// SPDX-License-Identifier: MIT OR Apache-2.0
//! Copy/paste fragment data model.
//!
//! The host owns the persisted text encoding (the original plugin used the
//! host's XML state format); the canvas only rewrites annotations and asks
//! the host to instantiate. `serde` derives let embedders put fragments on a
//! plain-text clipboard.

use crate::host::{EntityKind, EntityRef, InputPortSpec, OutputPortSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A serialized subgraph: entities, their annotations, and their wiring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Copied entities.
    pub entities: Vec<FragmentEntity>,
    /// Wires among copied entities, plus wires arriving from outside.
    pub wires: Vec<FragmentWire>,
}

/// One copied entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentEntity {
    /// Identity the entity had when copied; only used to resolve
    /// [`FragmentWire`] endpoints, never reused as a live reference.
    pub reference: EntityRef,
    /// Display name at copy time.
    pub name: String,
    /// Entity kind.
    pub kind: EntityKind,
    /// String-keyed annotations, including the persisted position.
    pub annotations: BTreeMap<String, String>,
    /// Declared input ports.
    pub inputs: Vec<InputPortSpec>,
    /// Declared output ports.
    pub outputs: Vec<OutputPortSpec>,
}

/// One wire in a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentWire {
    /// Upstream entity (a fragment reference, or a live entity if
    /// `external_source` is set).
    pub source: EntityRef,
    /// Upstream output index.
    pub output: u32,
    /// Downstream entity; always a fragment reference.
    pub dest: EntityRef,
    /// Downstream input index.
    pub input: u32,
    /// Whether `source` lies outside the fragment ("paste with
    /// connections" resolves it against the live pipeline).
    pub external_source: bool,
}

impl Fragment {
    /// Whether the fragment contains nothing to paste.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up a copied entity by its original reference.
    pub fn entity(&self, reference: EntityRef) -> Option<&FragmentEntity> {
        self.entities.iter().find(|e| e.reference == reference)
    }
}
