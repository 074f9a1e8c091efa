//! Coverage: resource units captured by a network.
//!
//! Nodes are visited breadth-first from the root. Each node claims every
//! claimable cell within `radius` of its position; claims are irreversible, so
//! when two nodes reach the same cell the one visited first keeps it.
//!
//! The field is consumed in place. Callers must hand in a field that no other
//! evaluation will observe (normally a fresh clone).

use rootnet_engine::{Network, ResourceField};

/// Claims resource for every node of `network` and returns the number of claimed cells.
pub fn evaluate(network: &Network, field: &mut ResourceField, radius: f64) -> u64 {
    let mut total = 0;
    for id in network.bfs_order() {
        let node = &network.nodes()[id.0];
        for index in field.candidate_cells(node.position, radius) {
            let Some(cell) = field.cell_mut(index) else {
                continue;
            };
            if cell.is_claimable() {
                cell.claim(id);
                total += 1;
            }
        }
    }
    total
}
