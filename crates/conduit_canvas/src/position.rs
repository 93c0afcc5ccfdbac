// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted node position/size annotations.
//!
//! The host stores per-entity metadata as string-keyed string values; node
//! placement lives there as stringified floats under `Node.x`/`Node.y`
//! (plus `Node.width`/`Node.height` for resizable notes). The wire format is
//! dictated by the host; every parse/format call goes through this module so
//! numeric edge cases are handled exactly once.

use conduit_host::{EntityRef, PipelineHost};
use egui::{Pos2, Vec2};
use thiserror::Error;

/// Annotation key for the node center's x coordinate.
pub const KEY_X: &str = "Node.x";
/// Annotation key for the node center's y coordinate.
pub const KEY_Y: &str = "Node.y";
/// Annotation key for a note's width.
pub const KEY_WIDTH: &str = "Node.width";
/// Annotation key for a note's height.
pub const KEY_HEIGHT: &str = "Node.height";

/// A malformed position annotation.
#[derive(Debug, Error)]
#[error("annotation {key} is not a number: {value:?}")]
pub struct PositionError {
    /// Offending annotation key.
    pub key: String,
    /// Raw annotation value.
    pub value: String,
}

fn parse(key: &str, value: &str) -> Result<f32, PositionError> {
    value.trim().parse::<f32>().map_err(|_| PositionError {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}

/// Locale-independent float formatting for annotation values.
fn format(value: f32) -> String {
    format!("{value}")
}

/// Read an entity's persisted position, if both coordinates are present and
/// well formed.
pub fn read_position(host: &dyn PipelineHost, entity: EntityRef) -> Option<Pos2> {
    let x = host.annotation(entity, KEY_X)?;
    let y = host.annotation(entity, KEY_Y)?;
    match (parse(KEY_X, &x), parse(KEY_Y, &y)) {
        (Ok(x), Ok(y)) => Some(Pos2::new(x, y)),
        _ => None,
    }
}

/// Write an entity's position annotations.
pub fn write_position(host: &mut dyn PipelineHost, entity: EntityRef, pos: Pos2) {
    host.set_annotation(entity, KEY_X, &format(pos.x));
    host.set_annotation(entity, KEY_Y, &format(pos.y));
}

/// Read a note entity's persisted size.
pub fn read_size(host: &dyn PipelineHost, entity: EntityRef) -> Option<Vec2> {
    let w = host.annotation(entity, KEY_WIDTH)?;
    let h = host.annotation(entity, KEY_HEIGHT)?;
    match (parse(KEY_WIDTH, &w), parse(KEY_HEIGHT, &h)) {
        (Ok(w), Ok(h)) => Some(Vec2::new(w, h)),
        _ => None,
    }
}

/// Write a note entity's size annotations.
pub fn write_size(host: &mut dyn PipelineHost, entity: EntityRef, size: Vec2) {
    host.set_annotation(entity, KEY_WIDTH, &format(size.x));
    host.set_annotation(entity, KEY_HEIGHT, &format(size.y));
}

/// Parse a position out of a raw annotation map (used when pasting, where
/// the entity does not exist yet).
pub fn position_from_map(annotations: &std::collections::BTreeMap<String, String>) -> Option<Pos2> {
    let x = parse(KEY_X, annotations.get(KEY_X)?).ok()?;
    let y = parse(KEY_Y, annotations.get(KEY_Y)?).ok()?;
    Some(Pos2::new(x, y))
}

/// Parse a size out of a raw annotation map.
pub fn size_from_map(annotations: &std::collections::BTreeMap<String, String>) -> Option<Vec2> {
    let w = parse(KEY_WIDTH, annotations.get(KEY_WIDTH)?).ok()?;
    let h = parse(KEY_HEIGHT, annotations.get(KEY_HEIGHT)?).ok()?;
    Some(Vec2::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_host::MemoryHost;

    #[test]
    fn test_position_round_trip() {
        let mut host = MemoryHost::new();
        let e = host.add_source("s", vec![]);
        write_position(&mut host, e, Pos2::new(-137.5, 25.0));
        assert_eq!(read_position(&host, e), Some(Pos2::new(-137.5, 25.0)));
    }

    #[test]
    fn test_missing_or_garbage_reads_as_none() {
        let mut host = MemoryHost::new();
        let e = host.add_source("s", vec![]);
        assert_eq!(read_position(&host, e), None);
        host.set_annotation(e, KEY_X, "12.0");
        assert_eq!(read_position(&host, e), None);
        host.set_annotation(e, KEY_Y, "not-a-number");
        assert_eq!(read_position(&host, e), None);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let mut host = MemoryHost::new();
        let e = host.add_source("s", vec![]);
        host.set_annotation(e, KEY_X, " 50 ");
        host.set_annotation(e, KEY_Y, "75.0");
        assert_eq!(read_position(&host, e), Some(Pos2::new(50.0, 75.0)));
    }
}
