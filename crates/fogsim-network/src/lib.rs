#![warn(missing_docs)]
//! Fog network model: node positions, capacity-bounded links, converged
//! routing tables and on-demand path resolution.

pub mod link;
pub mod node;
pub mod path;
pub mod routing;
pub mod topology;

pub use link::{Link, LinkId};
pub use node::{Node, NodeId, Position};
pub use path::Path;
pub use routing::{Route, RoutingTable};
pub use topology::Topology;
