// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pluggable automatic graph layout.

use crate::geometry::{self, GRID_SPACING, NODE_SIZE};
use conduit_host::EntityRef;
use egui::Pos2;
use std::collections::{HashMap, HashSet, VecDeque};

/// An automatic layout algorithm.
///
/// Implementations see only the graph's structure; applying the returned
/// positions (writing annotations, rerouting curves) stays with the caller.
pub trait LayoutProvider {
    /// Human-readable algorithm name, for menus.
    fn name(&self) -> &str;

    /// Compute a center position for every node in `nodes`. Edges are
    /// `(source, dest)` pairs; edges touching unknown nodes are ignored.
    fn compute(
        &self,
        nodes: &[EntityRef],
        edges: &[(EntityRef, EntityRef)],
    ) -> HashMap<EntityRef, Pos2>;
}

/// Layered top-down layout.
///
/// Entities are ranked by their longest path from a root (a node with no
/// incoming edges); each rank becomes a row, laid out left to right in input
/// order. Disconnected nodes land on rank zero. The rank pass is bounded by
/// the node count, so an edge list that somehow contains a cycle still
/// terminates.
#[derive(Debug, Default)]
pub struct LayeredLayout;

impl LayoutProvider for LayeredLayout {
    fn name(&self) -> &str {
        "Layered"
    }

    fn compute(
        &self,
        nodes: &[EntityRef],
        edges: &[(EntityRef, EntityRef)],
    ) -> HashMap<EntityRef, Pos2> {
        let known: HashSet<EntityRef> = nodes.iter().copied().collect();
        let edges: Vec<_> = edges
            .iter()
            .copied()
            .filter(|(s, d)| known.contains(s) && known.contains(d) && s != d)
            .collect();

        let mut rank: HashMap<EntityRef, usize> = nodes.iter().map(|&n| (n, 0)).collect();
        // Longest-path ranking; bounded by node count to survive bad input.
        for _ in 0..nodes.len() {
            let mut changed = false;
            for &(source, dest) in &edges {
                let want = rank[&source] + 1;
                if rank[&dest] < want {
                    rank.insert(dest, want);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        // Row membership in stable input order, breadth-first from roots so
        // siblings stay adjacent.
        let mut order: Vec<EntityRef> = Vec::with_capacity(nodes.len());
        let mut seen: HashSet<EntityRef> = HashSet::new();
        let mut queue: VecDeque<EntityRef> = nodes
            .iter()
            .copied()
            .filter(|n| edges.iter().all(|(_, d)| d != n))
            .collect();
        while let Some(n) = queue.pop_front() {
            if !seen.insert(n) {
                continue;
            }
            order.push(n);
            for &(source, dest) in &edges {
                if source == n && !seen.contains(&dest) {
                    queue.push_back(dest);
                }
            }
        }
        for &n in nodes {
            if seen.insert(n) {
                order.push(n);
            }
        }

        let mut rows: HashMap<usize, Vec<EntityRef>> = HashMap::new();
        for &n in &order {
            rows.entry(rank[&n]).or_default().push(n);
        }

        let h_step = NODE_SIZE.x + 2.0 * GRID_SPACING;
        let v_step = NODE_SIZE.y + 3.0 * GRID_SPACING;
        let mut positions = HashMap::with_capacity(nodes.len());
        for (row, members) in rows {
            let width = (members.len().saturating_sub(1)) as f32 * h_step;
            for (column, &n) in members.iter().enumerate() {
                let pos = Pos2::new(
                    column as f32 * h_step - width / 2.0,
                    row as f32 * v_step,
                );
                positions.insert(n, geometry::snap_pos(pos));
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(ids: &[u64]) -> Vec<EntityRef> {
        ids.iter().map(|&i| EntityRef(i)).collect()
    }

    #[test]
    fn test_chain_ranks_descend() {
        let nodes = refs(&[1, 2, 3]);
        let edges = vec![(EntityRef(1), EntityRef(2)), (EntityRef(2), EntityRef(3))];
        let pos = LayeredLayout.compute(&nodes, &edges);
        assert!(pos[&EntityRef(1)].y < pos[&EntityRef(2)].y);
        assert!(pos[&EntityRef(2)].y < pos[&EntityRef(3)].y);
    }

    #[test]
    fn test_diamond_merges_below_both_parents() {
        let nodes = refs(&[1, 2, 3, 4]);
        let edges = vec![
            (EntityRef(1), EntityRef(2)),
            (EntityRef(1), EntityRef(3)),
            (EntityRef(2), EntityRef(4)),
            (EntityRef(3), EntityRef(4)),
        ];
        let pos = LayeredLayout.compute(&nodes, &edges);
        assert!(pos[&EntityRef(4)].y > pos[&EntityRef(2)].y);
        assert!(pos[&EntityRef(4)].y > pos[&EntityRef(3)].y);
        // Siblings share a row.
        assert_eq!(pos[&EntityRef(2)].y, pos[&EntityRef(3)].y);
        assert_ne!(pos[&EntityRef(2)].x, pos[&EntityRef(3)].x);
    }

    #[test]
    fn test_every_node_placed_and_snapped() {
        let nodes = refs(&[1, 2, 3]);
        let pos = LayeredLayout.compute(&nodes, &[(EntityRef(1), EntityRef(2))]);
        assert_eq!(pos.len(), 3);
        for p in pos.values() {
            assert_eq!(p.x % GRID_SPACING, 0.0);
            assert_eq!(p.y % GRID_SPACING, 0.0);
        }
    }
}
