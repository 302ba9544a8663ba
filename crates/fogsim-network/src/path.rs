//! Concrete node/link paths derived from routing tables at query time.

use crate::link::LinkId;
use crate::node::NodeId;
use crate::topology::Topology;

/// Walks longer than this are treated as routing loops.
const MAX_HOPS: usize = 100;

/// An ordered node and link sequence between two nodes.
///
/// Paths are resolved fresh per query and reflect the routing tables at that
/// moment; they are not cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Source node id.
    pub source: NodeId,
    /// Destination node id.
    pub destination: NodeId,
    /// Visited nodes, source and destination included.
    pub nodes: Vec<NodeId>,
    /// Ids of the links connecting consecutive nodes of the path.
    pub links: Vec<LinkId>,
}

impl Path {
    /// Walks next-hop entries from `source` toward `destination`.
    ///
    /// Returns `None` when a routing entry is missing along the walk or the
    /// walk exceeds [`MAX_HOPS`] without reaching the destination.
    pub fn resolve(topology: &Topology, source: NodeId, destination: NodeId) -> Option<Path> {
        let mut nodes = vec![source];
        let mut links = Vec::new();
        let mut current = source;
        let mut next = topology.route(current, destination)?.next_hop;
        links.push(topology.link_id(current, next));
        let mut hops = 1;
        while next != destination && hops < MAX_HOPS {
            nodes.push(next);
            current = next;
            next = topology.route(current, destination)?.next_hop;
            links.push(topology.link_id(current, next));
            hops += 1;
        }
        if next != destination {
            return None;
        }
        if nodes[nodes.len() - 1] != destination {
            nodes.push(destination);
        }
        Some(Path {
            source,
            destination,
            nodes,
            links,
        })
    }

    /// Minimum spare bandwidth over the path's links.
    ///
    /// A link id with no backing link counts as zero spare capacity.
    pub fn min_available_bandwidth(&self, topology: &Topology) -> f64 {
        self.links
            .iter()
            .map(|id| topology.link(*id).map_or(0., |link| link.available_bandwidth()))
            .fold(f64::INFINITY, f64::min)
    }
}
