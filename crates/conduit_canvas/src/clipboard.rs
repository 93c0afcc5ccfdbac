// SPDX-License-Identifier: MIT OR Apache-2.0
//! Copy/paste placement.
//!
//! Copying delegates serialization to the host; this module only handles the
//! geometry of pasting: shifting the fragment's persisted positions so the
//! subgraph lands at the drop point while keeping its internal arrangement.

use crate::geometry::{self, NODE_SIZE, NOTE_SIZE};
use crate::position;
use conduit_host::{EntityKind, Fragment};
use egui::{Pos2, Vec2};

/// Rewrite a fragment's position annotations so its top-left entity lands at
/// `drop_point`, preserving relative placement.
///
/// Each pasted entity ends up at
/// `drop_point + (original - min_original) + half its visual size`, snapped
/// to the grid; the half-size term puts the first entity's body under the
/// pointer rather than its corner. Notes use their persisted size. Entities
/// without a parsable position collapse onto the drop point itself.
pub fn place_at(fragment: &mut Fragment, drop_point: Pos2) {
    let origin = fragment
        .entities
        .iter()
        .filter_map(|e| position::position_from_map(&e.annotations))
        .fold(None::<Pos2>, |acc, p| {
            Some(match acc {
                Some(min) => Pos2::new(min.x.min(p.x), min.y.min(p.y)),
                None => p,
            })
        });

    for entity in &mut fragment.entities {
        let relative = match (origin, position::position_from_map(&entity.annotations)) {
            (Some(origin), Some(pos)) => pos - origin,
            _ => Vec2::ZERO,
        };
        let size = position::size_from_map(&entity.annotations).unwrap_or(match entity.kind {
            EntityKind::Note => NOTE_SIZE,
            _ => NODE_SIZE,
        });
        let target = geometry::snap_pos(drop_point + relative + size * 0.5);
        entity
            .annotations
            .insert(position::KEY_X.to_owned(), format!("{}", target.x));
        entity
            .annotations
            .insert(position::KEY_Y.to_owned(), format!("{}", target.y));
    }
}
