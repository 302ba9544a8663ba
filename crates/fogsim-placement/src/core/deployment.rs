//! Application deployment: greedy chain placement with backtracking.

use std::collections::BTreeSet;

use log::{debug, info, warn};

use fogsim_network::{Path, Topology};

use crate::core::application::Application;
use crate::core::common::AllocationVerdict;
use crate::core::device::{DeviceId, DevicePool};

/// Upper bound on placement attempts for one deployment request.
pub const ATTEMPT_BUDGET: u32 = 2000;

/// Result of a deployment request.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentOutcome {
    /// Whether every process of the application was placed.
    pub success: bool,
    /// Routing distance from the last search frontier to the device chosen
    /// for the final process.
    pub deployment_latency: f64,
    /// Sum of link latencies over every path the deployment reserved
    /// bandwidth on.
    pub operational_latency: f64,
    /// Chosen device per process, in process order. Empty on failure.
    pub placements: Vec<DeviceId>,
}

impl DeploymentOutcome {
    fn failure() -> Self {
        Self {
            success: false,
            deployment_latency: 0.,
            operational_latency: 0.,
            placements: Vec::new(),
        }
    }
}

/// Search state of one deployment request.
///
/// `placed` grows and shrinks as a stack while candidates are tried;
/// `excluded_entry_hosts` collects frontier devices around which no host for
/// the first process could be found.
struct SearchState {
    placed: Vec<DeviceId>,
    excluded_entry_hosts: BTreeSet<DeviceId>,
    attempts: u32,
}

impl SearchState {
    fn new() -> Self {
        Self {
            placed: Vec::new(),
            excluded_entry_hosts: BTreeSet::new(),
            attempts: 0,
        }
    }
}

/// Tries to place every process of `app` onto the devices of `pool`,
/// starting the search from the `entry` device.
///
/// Candidate devices are explored in ascending routing distance from the
/// search frontier: the entry device for the first process, then the device
/// hosting the most recently placed process. A candidate must have strict
/// headroom for the process demand and enough spare bandwidth on the paths
/// to every already placed process.
///
/// On overall failure (no viable host for the first process, or the attempt
/// budget spent) all device usage recorded by this request is reverted; link
/// bandwidth already reserved is not returned.
pub fn deploy(
    app: &Application,
    entry: DeviceId,
    pool: &mut DevicePool,
    topology: &mut Topology,
) -> DeploymentOutcome {
    let mut state = SearchState::new();
    let mut deployment_latency = 0.;
    let mut operational_latency = 0.;
    let mut entry_search_exhausted = false;

    while state.placed.len() < app.process_count() && state.attempts < ATTEMPT_BUDGET {
        state.attempts += 1;

        let frontier = match frontier_device(&state, entry, topology) {
            Some(frontier) => frontier,
            None => {
                entry_search_exhausted = true;
                break;
            }
        };
        let candidates = candidates_by_distance(frontier, topology);

        let process_index = state.placed.len();
        let demand = app.process(process_index).demand;
        let mut placed_this_round = false;

        for (candidate, distance) in candidates {
            if pool.can_allocate(&demand, candidate) != AllocationVerdict::Success {
                continue;
            }
            state.placed.push(candidate);
            if !linkable(&state.placed, app, topology) {
                state.placed.pop();
                continue;
            }
            pool.allocate(&demand, candidate);
            operational_latency += reserve_links(&state.placed, app, topology);
            deployment_latency = distance;
            debug!(
                "application {}: process {} placed on device {} at distance {}",
                app.id, process_index, candidate, distance
            );
            placed_this_round = true;
            break;
        }

        if !placed_this_round && state.placed.is_empty() {
            // nothing around this frontier can host the first process
            state.excluded_entry_hosts.insert(frontier);
        }
    }

    if state.placed.len() < app.process_count() || state.attempts >= ATTEMPT_BUDGET || entry_search_exhausted {
        rollback(&state.placed, app, pool);
        info!(
            "application {}: {} processes not deployed",
            app.id,
            app.process_count()
        );
        return DeploymentOutcome::failure();
    }

    info!(
        "application {}: {} processes deployed on {:?}",
        app.id,
        app.process_count(),
        state.placed
    );
    DeploymentOutcome {
        success: true,
        deployment_latency,
        operational_latency,
        placements: state.placed,
    }
}

/// Picks the device whose routing table drives the next search round.
///
/// Returns `None` once every device reachable from the entry point has been
/// rejected as a host for the first process.
fn frontier_device(state: &SearchState, entry: DeviceId, topology: &Topology) -> Option<DeviceId> {
    if let Some(&last) = state.placed.last() {
        return Some(last);
    }
    if state.excluded_entry_hosts.is_empty() {
        return Some(entry);
    }
    topology
        .routing_table(entry)
        .destinations()
        .filter(|(dest, _)| !state.excluded_entry_hosts.contains(dest))
        .min_by(|a, b| {
            a.1.distance
                .partial_cmp(&b.1.distance)
                .unwrap()
                .then(a.0.cmp(&b.0))
        })
        .map(|(dest, _)| dest)
}

/// Devices reachable from `frontier`, ordered by ascending routing distance
/// with ties broken by id.
fn candidates_by_distance(frontier: DeviceId, topology: &Topology) -> Vec<(DeviceId, f64)> {
    let mut candidates: Vec<(DeviceId, f64)> = topology
        .routing_table(frontier)
        .destinations()
        .map(|(dest, route)| (dest, route.distance))
        .collect();
    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
    candidates
}

/// Checks that the paths from the newest placement to the devices hosting
/// every placed process have enough spare bandwidth for the demanded links.
fn linkable(placed: &[DeviceId], app: &Application, topology: &Topology) -> bool {
    let new_index = placed.len() - 1;
    let new_device = placed[new_index];
    for (k, &device) in placed.iter().enumerate() {
        let required = app.bandwidth_between(k, new_index);
        let available = match Path::resolve(topology, new_device, device) {
            Some(path) => path.min_available_bandwidth(topology),
            None => 0.,
        };
        if required > available {
            return false;
        }
    }
    true
}

/// Reserves the demanded bandwidth between the newest placement and every
/// placed process, returning the accumulated latency of the links touched.
fn reserve_links(placed: &[DeviceId], app: &Application, topology: &mut Topology) -> f64 {
    let new_index = placed.len() - 1;
    let new_device = placed[new_index];
    let mut latency = 0.;
    for (k, &device) in placed.iter().enumerate() {
        let amount = app.bandwidth_between(new_index, k);
        let path = match Path::resolve(topology, new_device, device) {
            Some(path) => path,
            None => continue,
        };
        for link_id in path.links {
            match topology.link_mut(link_id) {
                Some(link) => {
                    if !link.reserve(amount) && amount > 0. {
                        warn!(
                            "application {}: link {} cannot fit {} of bandwidth",
                            app.id, link_id, amount
                        );
                    }
                    latency += link.latency;
                }
                None => warn!("application {}: path crosses unknown link {}", app.id, link_id),
            }
        }
    }
    latency
}

/// Reverts the device usage recorded for the given placements. Bandwidth
/// reserved on links stays reserved.
fn rollback(placed: &[DeviceId], app: &Application, pool: &mut DevicePool) {
    for (index, &device) in placed.iter().enumerate() {
        pool.release(&app.process(index).demand, device);
    }
}
