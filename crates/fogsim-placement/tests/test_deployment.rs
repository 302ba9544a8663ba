use fogsim_network::{Position, Topology};
use fogsim_placement::core::application::{Application, Processus};
use fogsim_placement::core::common::Resources;
use fogsim_placement::core::deployment::deploy;
use fogsim_placement::core::device::{Device, DevicePool};

const RANGE: f64 = 6.;
const LATENCY: f64 = 10.;

fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!((x - y).abs() < eps, "Values do not match: {:.15} vs {:.15}", x, y);
}

fn device_limits() -> Resources {
    Resources::new(2., 2., 4096., 256_000.)
}

/// Two devices 5 apart, both within direct range of each other.
fn two_device_world(link_bandwidth: f64) -> (DevicePool, Topology) {
    let mut topology = Topology::new(RANGE, link_bandwidth, LATENCY);
    let a = topology.add_node(Position::new(0., 0., 0.));
    let b = topology.add_node(Position::new(5., 0., 0.));
    topology.build_routes();
    let mut pool = DevicePool::new();
    pool.add_device(Device::new(a, device_limits()));
    pool.add_device(Device::new(b, device_limits()));
    (pool, topology)
}

fn cpu_process(id: u32, cpu: f64) -> Processus {
    Processus {
        id,
        demand: Resources::new(cpu, 0., 0., 0.),
    }
}

/// Two processes of one CPU each, linked with the given bandwidth demand.
fn chain_application(bandwidth: f64) -> Application {
    Application::new(
        0,
        vec![cpu_process(0, 1.), cpu_process(1, 1.)],
        vec![vec![0., bandwidth], vec![bandwidth, 0.]],
    )
}

#[test]
fn two_linked_processes_spread_over_both_devices() {
    let (mut pool, mut topology) = two_device_world(1000.);
    let outcome = deploy(&chain_application(100.), 0, &mut pool, &mut topology);

    assert!(outcome.success);
    assert_eq!(outcome.placements, vec![0, 1]);
    assert_float_eq(outcome.deployment_latency, 5., 1e-9);
    assert_float_eq(outcome.operational_latency, LATENCY, 1e-9);
    assert_float_eq(pool.device(0).unwrap().usage().cpu, 1., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 1., 1e-9);
    // bandwidth is reserved along the resolved direction only
    assert_float_eq(topology.link_between(1, 0).unwrap().used_bandwidth(), 100., 1e-9);
    assert_float_eq(topology.link_between(0, 1).unwrap().used_bandwidth(), 0., 1e-9);
}

#[test]
fn insufficient_link_capacity_fails_and_restores_devices() {
    let (mut pool, mut topology) = two_device_world(50.);
    let outcome = deploy(&chain_application(100.), 0, &mut pool, &mut topology);

    assert!(!outcome.success);
    assert!(outcome.placements.is_empty());
    assert_float_eq(outcome.deployment_latency, 0., 1e-9);
    assert_float_eq(outcome.operational_latency, 0., 1e-9);
    assert_float_eq(pool.device(0).unwrap().usage().cpu, 0., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 0., 1e-9);
}

#[test]
fn single_process_deploys_on_the_entry_device() {
    let (mut pool, mut topology) = two_device_world(1000.);
    let app = Application::new(0, vec![cpu_process(0, 1.)], vec![vec![0.]]);
    let outcome = deploy(&app, 0, &mut pool, &mut topology);

    assert!(outcome.success);
    assert_eq!(outcome.placements, vec![0]);
    assert_float_eq(outcome.deployment_latency, 0., 1e-9);
    assert_float_eq(outcome.operational_latency, 0., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 0., 1e-9);
}

#[test]
fn nearly_full_device_is_skipped_for_the_next_candidate() {
    let mut topology = Topology::new(RANGE, 1000., LATENCY);
    let a = topology.add_node(Position::new(0., 0., 0.));
    let b = topology.add_node(Position::new(5., 0., 0.));
    topology.build_routes();
    let mut pool = DevicePool::new();
    pool.add_device(Device::with_usage(
        a,
        device_limits(),
        Resources::new(1.5, 0., 0., 0.),
    ));
    pool.add_device(Device::new(b, device_limits()));

    let app = Application::new(0, vec![cpu_process(0, 1.)], vec![vec![0.]]);
    let outcome = deploy(&app, a, &mut pool, &mut topology);

    assert!(outcome.success);
    assert_eq!(outcome.placements, vec![b]);
    assert_float_eq(pool.device(a).unwrap().usage().cpu, 1.5, 1e-9);
    assert_float_eq(pool.device(b).unwrap().usage().cpu, 1., 1e-9);
}

#[test]
fn failed_deployment_keeps_link_reservations() {
    let (mut pool, mut topology) = two_device_world(1000.);
    // the third process fits nowhere, so the whole deployment is rolled back
    let app = Application::new(
        0,
        vec![cpu_process(0, 1.), cpu_process(1, 1.), cpu_process(2, 5.)],
        vec![
            vec![0., 100., 0.],
            vec![100., 0., 50.],
            vec![0., 50., 0.],
        ],
    );
    let outcome = deploy(&app, 0, &mut pool, &mut topology);

    assert!(!outcome.success);
    assert!(outcome.placements.is_empty());
    // device usage is restored in full
    assert_float_eq(pool.device(0).unwrap().usage().cpu, 0., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 0., 1e-9);
    // the bandwidth reserved while the first two processes were placed is not
    assert_float_eq(topology.link_between(1, 0).unwrap().used_bandwidth(), 100., 1e-9);
}

#[test]
fn unplaceable_first_process_exhausts_the_entry_search() {
    let (mut pool, mut topology) = two_device_world(1000.);
    let app = Application::new(0, vec![cpu_process(0, 5.)], vec![vec![0.]]);
    let outcome = deploy(&app, 0, &mut pool, &mut topology);

    assert!(!outcome.success);
    assert!(outcome.placements.is_empty());
    assert_float_eq(pool.device(0).unwrap().usage().cpu, 0., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 0., 1e-9);
}

#[test]
fn attempt_budget_bounds_a_search_that_cannot_finish() {
    let (mut pool, mut topology) = two_device_world(1000.);
    // the second process fits on no device, so the search spins on it until
    // the attempt budget runs out
    let app = Application::new(
        0,
        vec![cpu_process(0, 1.), cpu_process(1, 5.)],
        vec![vec![0., 0.], vec![0., 0.]],
    );
    let outcome = deploy(&app, 0, &mut pool, &mut topology);

    assert!(!outcome.success);
    assert!(outcome.placements.is_empty());
    assert_float_eq(outcome.deployment_latency, 0., 1e-9);
    assert_float_eq(outcome.operational_latency, 0., 1e-9);
    assert_float_eq(pool.device(0).unwrap().usage().cpu, 0., 1e-9);
    assert_float_eq(pool.device(1).unwrap().usage().cpu, 0., 1e-9);
}

#[test]
fn linked_processes_without_a_route_are_refused() {
    // two islands out of range of each other
    let mut topology = Topology::new(RANGE, 1000., LATENCY);
    let a = topology.add_node(Position::new(0., 0., 0.));
    let _b = topology.add_node(Position::new(100., 0., 0.));
    topology.build_routes();
    let mut pool = DevicePool::new();
    // only one CPU of headroom on the entry island
    pool.add_device(Device::with_usage(a, device_limits(), Resources::new(0.5, 0., 0., 0.)));
    pool.add_device(Device::new(_b, device_limits()));

    let outcome = deploy(&chain_application(100.), a, &mut pool, &mut topology);

    assert!(!outcome.success);
    assert!(outcome.placements.is_empty());
    assert_float_eq(pool.device(a).unwrap().usage().cpu, 0.5, 1e-9);
}

#[test]
fn repeated_deployments_accumulate_until_capacity_runs_out() {
    let (mut pool, mut topology) = two_device_world(1000.);
    let app = Application::new(0, vec![cpu_process(0, 1.)], vec![vec![0.]]);

    // 2 CPUs per device and strict admission leave room for one process each
    assert!(deploy(&app, 0, &mut pool, &mut topology).success);
    assert!(deploy(&app, 0, &mut pool, &mut topology).success);
    assert!(!deploy(&app, 0, &mut pool, &mut topology).success);

    for id in pool.ids() {
        let device = pool.device(id).unwrap();
        assert!(device.usage().cpu <= device.limits().cpu);
    }
}
