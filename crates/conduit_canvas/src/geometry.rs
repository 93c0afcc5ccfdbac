// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pure geometry: port placement, grid snapping, and connection curves.
//!
//! All positions are scene coordinates. Node positions refer to the node's
//! center; ports are placed relative to that center.

use crate::port::PortDirection;
use egui::{Pos2, Rect, Vec2};

/// Scene-space grid pitch used for background lines and snapping.
pub const GRID_SPACING: f32 = 25.0;

/// Fixed size of a source/filter node.
pub const NODE_SIZE: Vec2 = Vec2::new(150.0, 50.0);

/// Default size of a freshly created note node.
pub const NOTE_SIZE: Vec2 = Vec2::new(200.0, 100.0);

/// Ports laid out left-to-right before wrapping into the next row.
pub const PORTS_PER_ROW: usize = 10;

/// Horizontal distance between neighboring ports.
const PORT_PITCH: f32 = 12.5;

/// Vertical distance between port rows.
const ROW_PITCH: f32 = 12.5;

/// First port's inset from the node corner.
const PORT_INSET: Vec2 = Vec2::new(12.5, 4.5);

/// Side length of a port square.
pub const PORT_SIZE: f32 = 9.0;

/// Straight lead-in drawn before a curve leaves a port.
const CURVE_LEAD: f32 = 6.0;

/// Smallest vertical reach of a curve's control points.
const CURVE_MIN_REACH: f32 = 37.0 - 2.0 * CURVE_LEAD;

/// Largest vertical reach of a curve's control points.
const CURVE_MAX_REACH: f32 = 40.0;

/// Half the stroked width used when hit-testing a curve.
pub const CURVE_HIT_TOLERANCE: f32 = 5.0;

/// Offset of a port's center from its node's center.
///
/// Inputs sit along the top edge, wrapping upward row by row; outputs sit
/// along the bottom edge, wrapping downward. Ports never store their own
/// position; it is re-derived from this whenever the node moves.
pub fn port_offset(direction: PortDirection, index: usize) -> Vec2 {
    let (edge_y, inset_y, row_y) = match direction {
        PortDirection::Input => (-NODE_SIZE.y / 2.0, PORT_INSET.y, -ROW_PITCH),
        PortDirection::Output => (NODE_SIZE.y / 2.0, -PORT_INSET.y, ROW_PITCH),
    };
    let row = (index / PORTS_PER_ROW) as f32;
    let col = (index % PORTS_PER_ROW) as f32;
    Vec2::new(
        -NODE_SIZE.x / 2.0 + PORT_INSET.x + col * PORT_PITCH,
        edge_y + inset_y + row * row_y,
    )
}

/// Round one coordinate to the nearest grid line.
///
/// Ties (exact half-steps) round away from zero, so `12.5` snaps to `25.0`
/// and `-12.5` snaps to `-25.0`. Nodes are draggable right up to the origin,
/// so this boundary behavior is observable and must stay put.
pub fn snap(value: f32) -> f32 {
    (value / GRID_SPACING).round() * GRID_SPACING
}

/// Snap a point to the grid.
pub fn snap_pos(pos: Pos2) -> Pos2 {
    Pos2::new(snap(pos.x), snap(pos.y))
}

/// A routed connection curve: a straight lead-out from the start port, one
/// cubic segment, and a straight lead-in to the end port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    /// Start point (an output port's center).
    pub start: Pos2,
    /// Where the cubic begins, one lead below the start.
    pub curve_start: Pos2,
    /// First cubic control point.
    pub ctrl1: Pos2,
    /// Second cubic control point.
    pub ctrl2: Pos2,
    /// Where the cubic ends, one lead above the end.
    pub curve_end: Pos2,
    /// End point (an input port's center, or the pointer during a drag).
    pub end: Pos2,
}

impl CurvePath {
    /// Route a curve between two endpoints.
    ///
    /// The control points reach vertically by the endpoints' vertical
    /// distance, clamped so short hops do not produce exaggerated S-curves
    /// and long hops do not bulge without bound.
    pub fn between(start: Pos2, end: Pos2) -> Self {
        let curve_start = start + Vec2::new(0.0, CURVE_LEAD);
        let curve_end = end - Vec2::new(0.0, CURVE_LEAD);

        let span = curve_end - curve_start;
        let min = CURVE_MIN_REACH.min(span.length());
        let reach = (curve_end.y - curve_start.y)
            .abs()
            .clamp(min, CURVE_MAX_REACH);

        let off = Vec2::new(0.0, reach);
        Self {
            start,
            curve_start,
            ctrl1: curve_start + off,
            ctrl2: curve_end - off,
            curve_end,
            end,
        }
    }

    /// Point on the cubic segment at parameter `t` in `[0, 1]`.
    pub fn cubic_point(&self, t: f32) -> Pos2 {
        let (p0, p1, p2, p3) = (self.curve_start, self.ctrl1, self.ctrl2, self.curve_end);
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;
        Pos2::new(
            mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x,
            mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y,
        )
    }

    /// Sample the whole path as a polyline, lead segments included.
    pub fn points(&self, segments: usize) -> Vec<Pos2> {
        let mut out = Vec::with_capacity(segments + 3);
        out.push(self.start);
        for i in 0..=segments {
            out.push(self.cubic_point(i as f32 / segments as f32));
        }
        out.push(self.end);
        out
    }

    /// Distance from a point to the sampled path.
    pub fn distance_to(&self, pos: Pos2) -> f32 {
        let mut min = f32::MAX;
        for p in self.points(20) {
            min = min.min(p.distance(pos));
        }
        min
    }

    /// Whether a point lies within the stroked hit area of the path.
    pub fn hit(&self, pos: Pos2) -> bool {
        self.distance_to(pos) <= CURVE_HIT_TOLERANCE
    }

    /// Loose bounding rectangle of the path.
    pub fn bounding_rect(&self) -> Rect {
        let mut rect = Rect::from_two_pos(self.start, self.end);
        rect.extend_with(self.ctrl1);
        rect.extend_with(self.ctrl2);
        rect.expand(CURVE_HIT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_idempotent() {
        for v in [-1000.0, -37.2, -12.5, 0.0, 3.0, 12.5, 12.4999, 99.0, 625.0] {
            let once = snap(v);
            assert_eq!(snap(once), once, "snap(snap({v})) != snap({v})");
            assert_eq!(once % GRID_SPACING, 0.0);
        }
    }

    #[test]
    fn test_snap_nearest_intersection() {
        assert_eq!(snap(12.4), 0.0);
        assert_eq!(snap(12.6), 25.0);
        assert_eq!(snap(-12.4), 0.0);
        assert_eq!(snap(-12.6), -25.0);
        assert_eq!(snap(37.0), 50.0);
    }

    #[test]
    fn test_snap_half_step_rounds_away_from_zero() {
        assert_eq!(snap(12.5), 25.0);
        assert_eq!(snap(-12.5), -25.0);
        assert_eq!(snap(62.5), 75.0);
        assert_eq!(snap(-62.5), -75.0);
    }

    #[test]
    fn test_input_ports_sit_on_top_edge() {
        let first = port_offset(PortDirection::Input, 0);
        assert_eq!(first.x, -NODE_SIZE.x / 2.0 + 12.5);
        assert_eq!(first.y, -NODE_SIZE.y / 2.0 + 4.5);

        let second = port_offset(PortDirection::Input, 1);
        assert_eq!(second.y, first.y);
        assert_eq!(second.x, first.x + 12.5);
    }

    #[test]
    fn test_output_ports_sit_on_bottom_edge() {
        let first = port_offset(PortDirection::Output, 0);
        assert_eq!(first.x, -NODE_SIZE.x / 2.0 + 12.5);
        assert_eq!(first.y, NODE_SIZE.y / 2.0 - 4.5);
    }

    #[test]
    fn test_port_rows_wrap_away_from_node() {
        let wrapped_in = port_offset(PortDirection::Input, PORTS_PER_ROW);
        let first_in = port_offset(PortDirection::Input, 0);
        assert_eq!(wrapped_in.x, first_in.x);
        assert_eq!(wrapped_in.y, first_in.y - 12.5);

        let wrapped_out = port_offset(PortDirection::Output, PORTS_PER_ROW);
        let first_out = port_offset(PortDirection::Output, 0);
        assert_eq!(wrapped_out.y, first_out.y + 12.5);
    }

    #[test]
    fn test_curve_reach_clamped() {
        // Long vertical hop: reach capped at the max.
        let long = CurvePath::between(Pos2::new(0.0, 0.0), Pos2::new(0.0, 500.0));
        assert_eq!((long.ctrl1 - long.curve_start).y, CURVE_MAX_REACH);

        // Short hop between distant endpoints: at least the min reach.
        let short = CurvePath::between(Pos2::new(0.0, 0.0), Pos2::new(300.0, 5.0));
        assert_eq!((short.ctrl1 - short.curve_start).y, CURVE_MIN_REACH);

        // Tiny hop: reach shrinks with the endpoint distance instead of
        // forcing an S-curve.
        let tiny = CurvePath::between(Pos2::new(0.0, 0.0), Pos2::new(3.0, 16.0));
        assert!((tiny.ctrl1 - tiny.curve_start).y < CURVE_MIN_REACH);
    }

    #[test]
    fn test_curve_endpoints_preserved() {
        let path = CurvePath::between(Pos2::new(10.0, 20.0), Pos2::new(90.0, 120.0));
        let pts = path.points(16);
        assert_eq!(pts.first().copied(), Some(Pos2::new(10.0, 20.0)));
        assert_eq!(pts.last().copied(), Some(Pos2::new(90.0, 120.0)));
    }

    #[test]
    fn test_curve_hit_on_and_off_path() {
        let path = CurvePath::between(Pos2::new(0.0, 0.0), Pos2::new(0.0, 100.0));
        assert!(path.hit(Pos2::new(0.0, 50.0)));
        assert!(!path.hit(Pos2::new(40.0, 50.0)));
    }
}
