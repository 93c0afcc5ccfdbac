// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications delivered from the host to the canvas.

use crate::host::EntityRef;
use serde::{Deserialize, Serialize};

/// One host-side change, delivered in event-queue order on the UI thread.
///
/// Connection events identify only the entity pair involved; the changed
/// port set is always re-derived by reconciliation rather than trusted from
/// the payload, so coalesced or stale events are harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// An entity appeared in the pipeline.
    EntityAdded(EntityRef),
    /// An entity is about to be torn down; back-references into it are no
    /// longer safe to follow, but its visual node still exists.
    EntityAboutToBeRemoved(EntityRef),
    /// An entity is gone.
    EntityRemoved(EntityRef),
    /// Wiring between two entities gained at least one connection.
    ConnectionAdded {
        /// Upstream entity.
        source: EntityRef,
        /// Downstream entity.
        dest: EntityRef,
    },
    /// Wiring between two entities lost at least one connection.
    ConnectionRemoved {
        /// Upstream entity.
        source: EntityRef,
        /// Downstream entity.
        dest: EntityRef,
    },
    /// The host's active selection changed.
    SelectionChanged(Vec<EntityRef>),
    /// Display state (name, visibility, modified flag) changed; repaint only.
    RepresentationChanged(EntityRef),
}
