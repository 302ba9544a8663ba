//! Network topology: nodes, links and converged routing tables.

use std::collections::BTreeMap;

use log::debug;

use crate::link::{Link, LinkId};
use crate::node::{Node, NodeId, Position};
use crate::routing::{self, Route, RoutingTable};

/// Owns the node positions, the physical links and the per-node routing
/// tables.
///
/// Nodes are added first; [`Topology::build_routes`] then derives direct
/// links from positions (two nodes closer than the range threshold get a
/// mirrored pair of links, a node and itself a zero-latency link) and relaxes
/// all routing tables to a fixpoint. Link ids are only meaningful for the
/// node count present at build time.
pub struct Topology {
    nodes: Vec<Node>,
    links: BTreeMap<LinkId, Link>,
    tables: Vec<RoutingTable>,
    range: f64,
    link_bandwidth: f64,
    link_latency: f64,
}

impl Topology {
    /// Creates an empty topology.
    ///
    /// `range` is the direct-reachability threshold for the distance between
    /// two node positions; `link_bandwidth` and `link_latency` are assigned
    /// to every derived link.
    pub fn new(range: f64, link_bandwidth: f64, link_latency: f64) -> Self {
        Self {
            nodes: Vec::new(),
            links: BTreeMap::new(),
            tables: Vec::new(),
            range,
            link_bandwidth,
            link_latency,
        }
    }

    /// Adds a node at `position` and returns its id.
    pub fn add_node(&mut self, position: Position) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { id, position });
        self.tables.push(RoutingTable::new(id));
        id
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Dense link id of the directed pair `(src, dst)`.
    pub fn link_id(&self, src: NodeId, dst: NodeId) -> LinkId {
        src * self.nodes.len() + dst
    }

    /// Returns the link with the given id.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// Mutable access to the link with the given id.
    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(&id)
    }

    /// Returns the direct link from `src` to `dst`, if the pair is in range.
    pub fn link_between(&self, src: NodeId, dst: NodeId) -> Option<&Link> {
        self.links.get(&self.link_id(src, dst))
    }

    /// Routing table of the given node.
    pub fn routing_table(&self, node: NodeId) -> &RoutingTable {
        &self.tables[node]
    }

    /// Returns the converged route from `src` to `dst`, if one is known.
    pub fn route(&self, src: NodeId, dst: NodeId) -> Option<Route> {
        self.tables.get(src)?.route(dst)
    }

    /// Derives direct links from node positions and relaxes all routing
    /// tables to a fixpoint.
    ///
    /// Rebuilding resets links (including any bandwidth in use) and tables,
    /// so two builds over the same nodes produce identical state.
    pub fn build_routes(&mut self) {
        let n = self.nodes.len();
        self.links.clear();
        for table in self.tables.iter_mut() {
            *table = RoutingTable::new(table.owner());
        }
        for src in 0..n {
            for dst in 0..n {
                let distance = self.nodes[src].position.distance_to(&self.nodes[dst].position);
                if distance < self.range {
                    let latency = if src == dst { 0. } else { self.link_latency };
                    self.links
                        .insert(src * n + dst, Link::new(self.link_bandwidth, latency));
                    self.tables[src].update(dst, dst, distance);
                }
            }
        }
        let passes = routing::converge(&mut self.tables);
        debug!("routing converged in {} passes over {} nodes", passes, n);
    }
}
