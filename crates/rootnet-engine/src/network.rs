//! Rooted transport network stored as an arena of nodes.
//!
//! Nodes are addressed by [`NodeId`], an index into the arena that is assigned
//! when the node is appended. The network only ever grows by appending leaves, so
//! ids are stable, parents always precede their children, and each node's
//! distance to the root can be cached at creation time.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Identifier of a node in a [`Network`].
///
/// This is an index into the network's node arena and is only meaningful within
/// networks that share a common history (a network and its clones).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: Self = Self(0);
}

/// Identifier of an edge in a [`Network`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("e{_0}")]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: DVec2,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Sum of Euclidean edge lengths along the path from the root.
    pub root_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub parent: NodeId,
    pub child: NodeId,
}

/// A rooted tree of nodes connected by parent→child edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Network {
    /// Creates a network containing only a root node at `root_position`.
    #[must_use]
    pub fn new(root_position: DVec2) -> Self {
        Self {
            nodes: vec![Node {
                id: NodeId::ROOT,
                position: root_position,
                parent: None,
                children: Vec::with_capacity(4),
                root_distance: 0.0,
            }],
            edges: vec![],
        }
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The most recently appended node.
    #[must_use]
    pub fn last_node(&self) -> &Node {
        // never empty: the root is created in `new`
        &self.nodes[self.nodes.len() - 1]
    }

    /// Appends a leaf under `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this network.
    pub fn add_child(&mut self, parent: NodeId, position: DVec2) -> NodeId {
        let parent_node = &self.nodes[parent.0];
        let root_distance = parent_node.root_distance + parent_node.position.distance(position);

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            position,
            parent: Some(parent),
            children: Vec::with_capacity(4),
            root_distance,
        });
        self.nodes[parent.0].children.push(id);
        self.edges.push(Edge {
            id: EdgeId(self.edges.len()),
            parent,
            child: id,
        });
        id
    }

    /// Node ids in breadth-first order from the root, children in insertion order.
    #[must_use]
    pub fn bfs_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([NodeId::ROOT]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.nodes[id.0].children.iter().copied());
        }
        order
    }

    /// Ids on the path from the root to `id`, root first.
    #[must_use]
    pub fn path_from_root(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let mut path = vec![self.node(id)?.id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Length of the path from the root to `id`.
    #[must_use]
    pub fn path_distance(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.root_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_network_has_single_root() {
        let network = Network::new(DVec2::ZERO);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.edge_count(), 0);
        assert_eq!(network.root().id, NodeId::ROOT);
        assert_eq!(network.root().parent, None);
        assert_eq!(network.last_node().id, NodeId::ROOT);
    }

    #[test]
    fn test_add_child_links_parent_and_edge() {
        let mut network = Network::new(DVec2::ZERO);
        let a = network.add_child(NodeId::ROOT, DVec2::new(3.0, 4.0));
        let b = network.add_child(a, DVec2::new(3.0, 6.0));

        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(network.root().children, vec![a]);
        assert_eq!(network.node(b).unwrap().parent, Some(a));
        assert_eq!(
            network.edges()[1],
            Edge {
                id: EdgeId(1),
                parent: a,
                child: b
            }
        );
        assert_eq!(network.path_distance(a), Some(5.0));
        assert_eq!(network.path_distance(b), Some(7.0));
        assert_eq!(network.path_distance(NodeId(9)), None);
    }

    #[test]
    fn test_bfs_order_follows_discovery() {
        let mut network = Network::new(DVec2::ZERO);
        let a = network.add_child(NodeId::ROOT, DVec2::new(-1.0, 0.0));
        let a1 = network.add_child(a, DVec2::new(-2.0, 0.0));
        let b = network.add_child(NodeId::ROOT, DVec2::new(1.0, 0.0));
        let b1 = network.add_child(b, DVec2::new(2.0, 0.0));
        let a2 = network.add_child(a, DVec2::new(-1.0, 1.0));

        assert_eq!(network.bfs_order(), vec![NodeId::ROOT, a, b, a1, a2, b1]);
    }

    #[test]
    fn test_path_from_root() {
        let mut network = Network::new(DVec2::ZERO);
        let a = network.add_child(NodeId::ROOT, DVec2::X);
        let b = network.add_child(a, DVec2::new(1.0, 1.0));
        let _c = network.add_child(NodeId::ROOT, DVec2::Y);

        assert_eq!(network.path_from_root(b), Some(vec![NodeId::ROOT, a, b]));
        assert_eq!(network.path_from_root(NodeId::ROOT), Some(vec![NodeId::ROOT]));
        assert_eq!(network.path_from_root(NodeId(7)), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut network = Network::new(DVec2::ZERO);
        network.add_child(NodeId::ROOT, DVec2::X);
        let mut copy = network.clone();
        copy.add_child(NodeId(1), DVec2::new(2.0, 0.0));

        assert_eq!(network.node_count(), 2);
        assert_eq!(network.node(NodeId(1)).unwrap().children, vec![]);
        assert_eq!(copy.node_count(), 3);
    }

    #[test]
    fn test_serialize_network() {
        let mut network = Network::new(DVec2::ZERO);
        network.add_child(NodeId::ROOT, DVec2::new(-2.0, 0.0));
        let value = serde_json::to_value(&network).unwrap();
        assert_eq!(value["nodes"][1]["position"], serde_json::json!([-2.0, 0.0]));
        assert_eq!(value["edges"][0]["child"], serde_json::json!(1));
    }
}
