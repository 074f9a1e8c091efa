//! Transport: distance from captured resource back to the root.
//!
//! Claimed cells are grouped by the node that claimed them. Every distinct
//! claiming node contributes its root-path distance exactly once, regardless of
//! how many cells it claimed.

use std::collections::BTreeMap;

use rootnet_engine::{Network, NodeId, ResourceField};
use serde::{Deserialize, Serialize};

/// A group of claimed cells whose claiming node is not part of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedAcquisition {
    pub node_id: NodeId,
    pub cells: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOutcome {
    pub transport: f64,
    /// Claiming ids that could not be resolved; they contributed nothing.
    pub unresolved: Vec<UnresolvedAcquisition>,
}

/// Computes the transport score of `network` over an already-covered `field`.
pub fn evaluate(network: &Network, field: &ResourceField) -> TransportOutcome {
    // Groups in order of first appearance in a row-major scan.
    let mut order = vec![];
    let mut counts = BTreeMap::<NodeId, usize>::new();
    for (_, cell) in field.cells() {
        if let Some(id) = cell.acquired_by {
            let count = counts.entry(id).or_default();
            if *count == 0 {
                order.push(id);
            }
            *count += 1;
        }
    }

    let mut transport = 0.0;
    let mut unresolved = vec![];
    for id in order {
        if let Some(distance) = network.path_distance(id) {
            transport += distance;
        } else {
            let cells = counts[&id];
            tracing::warn!(node = %id, cells, "claimed cells reference a node outside the network");
            unresolved.push(UnresolvedAcquisition { node_id: id, cells });
        }
    }

    TransportOutcome {
        transport,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use rootnet_engine::{CellIndex, FieldGeometry};

    use super::*;
    use crate::coverage;

    fn field(size: f64) -> ResourceField {
        ResourceField::new(FieldGeometry::new(size, size, 1.0))
    }

    #[test]
    fn test_unclaimed_field_has_no_transport() {
        let network = Network::new(DVec2::ZERO);
        let outcome = evaluate(&network, &field(4.0));
        assert_eq!(outcome.transport, 0.0);
        assert!(outcome.unresolved.is_empty());
    }

    #[test]
    fn test_one_term_per_claiming_node() {
        let mut network = Network::new(DVec2::ZERO);
        let a = network.add_child(NodeId::ROOT, DVec2::new(3.0, 0.0));
        let b = network.add_child(a, DVec2::new(3.0, 4.0));

        let mut field = field(10.0);
        // one cell for `a`, five for `b`
        field.cell_mut(CellIndex::new(0, 0)).unwrap().claim(a);
        for col in 0..5 {
            field.cell_mut(CellIndex::new(5, col)).unwrap().claim(b);
        }

        let outcome = evaluate(&network, &field);
        assert_eq!(outcome.transport, 3.0 + 7.0);
    }

    #[test]
    fn test_after_coverage() {
        let mut network = Network::new(DVec2::ZERO);
        let tip = network.add_child(NodeId::ROOT, DVec2::new(2.0, 0.0));
        network.add_child(tip, DVec2::new(2.0, 2.0));

        let mut field = field(8.0);
        coverage::evaluate(&network, &mut field, 2.0);
        // root contributes 0, the two other nodes 2 and 4
        assert_eq!(evaluate(&network, &field).transport, 6.0);
    }

    #[test]
    fn test_unresolved_ids_contribute_nothing() {
        let mut network = Network::new(DVec2::ZERO);
        let a = network.add_child(NodeId::ROOT, DVec2::new(0.0, 2.0));

        let mut field = field(4.0);
        field.cell_mut(CellIndex::new(0, 0)).unwrap().claim(NodeId(99));
        field.cell_mut(CellIndex::new(3, 3)).unwrap().claim(NodeId(99));
        field.cell_mut(CellIndex::new(2, 0)).unwrap().claim(a);

        let outcome = evaluate(&network, &field);
        assert_eq!(outcome.transport, 2.0);
        assert_eq!(
            outcome.unresolved,
            vec![UnresolvedAcquisition {
                node_id: NodeId(99),
                cells: 2
            }]
        );
    }
}
