use fogsim_placement::core::application::{Application, Processus};
use fogsim_placement::core::common::{AllocationVerdict, IdAllocator, Resources};
use fogsim_placement::core::config::SimulationConfig;
use fogsim_placement::core::device::{Device, DevicePool};
use fogsim_placement::extensions::application_reader::ApplicationSpec;
use fogsim_placement::extensions::inventory_reader::InventorySpec;
use fogsim_placement::extensions::workload_generator;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!((x - y).abs() < eps, "Values do not match: {:.15} vs {:.15}", x, y);
}

fn limits() -> Resources {
    Resources::new(2., 2., 4096., 256_000.)
}

#[test]
fn allocation_is_refused_per_resource() {
    let device = Device::new(0, limits());
    assert_eq!(
        device.can_allocate(&Resources::new(1., 0., 0., 0.)),
        AllocationVerdict::Success
    );
    assert_eq!(
        device.can_allocate(&Resources::new(3., 0., 0., 0.)),
        AllocationVerdict::NotEnoughCpu
    );
    assert_eq!(
        device.can_allocate(&Resources::new(1., 3., 0., 0.)),
        AllocationVerdict::NotEnoughGpu
    );
    assert_eq!(
        device.can_allocate(&Resources::new(1., 1., 8192., 0.)),
        AllocationVerdict::NotEnoughMemory
    );
    assert_eq!(
        device.can_allocate(&Resources::new(1., 1., 1024., 500_000.)),
        AllocationVerdict::NotEnoughDisk
    );
}

#[test]
fn exact_fit_is_rejected() {
    let mut device = Device::new(0, limits());
    device.allocate(&Resources::new(1., 0., 0., 0.));
    assert_eq!(
        device.can_allocate(&Resources::new(1., 0., 0., 0.)),
        AllocationVerdict::NotEnoughCpu
    );
    assert_eq!(
        device.can_allocate(&Resources::new(0.5, 0., 0., 0.)),
        AllocationVerdict::Success
    );
}

#[test]
fn release_clamps_usage_at_zero() {
    let mut device = Device::new(0, limits());
    device.allocate(&Resources::new(1., 1., 512., 1024.));
    device.release(&Resources::new(2., 2., 1024., 4096.));
    assert_eq!(device.usage(), Resources::default());
}

#[test]
fn pool_reports_unknown_devices() {
    let mut pool = DevicePool::new();
    pool.add_device(Device::new(0, limits()));
    assert_eq!(
        pool.can_allocate(&Resources::default(), 7),
        AllocationVerdict::DeviceNotFound
    );
    assert_eq!(pool.ids(), vec![0]);
}

#[test]
fn application_exposes_symmetric_bandwidth() {
    let app = Application::new(
        3,
        vec![
            Processus {
                id: 0,
                demand: Resources::default(),
            },
            Processus {
                id: 1,
                demand: Resources::default(),
            },
        ],
        vec![vec![0., 42.], vec![42., 0.]],
    );
    assert_eq!(app.process_count(), 2);
    assert_float_eq(app.bandwidth_between(0, 1), 42., 1e-9);
    assert_float_eq(app.bandwidth_between(1, 0), 42., 1e-9);
}

#[test]
#[should_panic(expected = "Bandwidth matrix dimension")]
fn mismatched_matrix_dimension_is_refused() {
    Application::new(
        0,
        vec![Processus {
            id: 0,
            demand: Resources::default(),
        }],
        vec![vec![0., 1.], vec![1., 0.]],
    );
}

#[test]
fn id_allocator_hands_out_consecutive_ids() {
    let mut ids = IdAllocator::new();
    assert_eq!(ids.allocate(), 0);
    assert_eq!(ids.allocate(), 1);
    assert_eq!(ids.allocate(), 2);
}

#[test]
fn application_descriptor_builds_a_mirrored_matrix() {
    let yaml = r#"
processes:
  - cpu: 1.0
    gpu: 0.0
    memory: 1024.0
    disk: 20480.0
  - cpu: 0.5
    gpu: 0.5
    memory: 512.0
    disk: 10240.0
links:
  - from: 0
    to: 1
    bandwidth: 20480.0
"#;
    let spec: ApplicationSpec = serde_yaml::from_str(yaml).unwrap();
    let mut ids = IdAllocator::new();
    let app = spec.build(5, &mut ids);

    assert_eq!(app.id, 5);
    assert_eq!(app.process_count(), 2);
    assert_eq!(app.process(0).id, 0);
    assert_eq!(app.process(1).id, 1);
    assert_float_eq(app.process(0).demand.cpu, 1., 1e-9);
    assert_float_eq(app.bandwidth_between(0, 1), 20480., 1e-9);
    assert_float_eq(app.bandwidth_between(1, 0), 20480., 1e-9);
}

#[test]
fn application_descriptor_is_read_from_json_too() {
    let json = r#"{
        "processes": [
            {"cpu": 1.0, "gpu": 0.0, "memory": 256.0, "disk": 512.0}
        ]
    }"#;
    let spec: ApplicationSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.processes.len(), 1);
    assert!(spec.links.is_empty());
}

#[test]
fn inventory_descriptor_defaults_usage_to_zero() {
    let yaml = r#"
devices:
  - position: {x: 1.0, y: 2.0}
    cpu: 2.0
    gpu: 2.0
    memory: 4096.0
    disk: 256000.0
"#;
    let inventory: InventorySpec = serde_yaml::from_str(yaml).unwrap();
    let spec = &inventory.devices[0];
    assert_float_eq(spec.position.z, 0., 1e-9);
    assert_eq!(spec.usage(), Resources::default());
    assert_float_eq(spec.limits().memory, 4096., 1e-9);
}

#[test]
fn config_file_overrides_defaults_field_by_field() {
    let config = SimulationConfig::from_file("test-configs/config.yaml");
    assert_eq!(config.seed, 42);
    assert_float_eq(config.network.range, 6., 1e-9);
    // absent fields keep their defaults
    assert_float_eq(config.network.link_latency, 10., 1e-9);
    assert_eq!(config.experiment.applications, 20);
    assert_eq!(config.number_of_devices(), 10);
}

#[test]
fn default_config_matches_the_modeled_infrastructure() {
    let config = SimulationConfig::new();
    assert_eq!(config.seed, 123);
    assert_float_eq(config.network.range, 9., 1e-9);
    assert_float_eq(config.network.link_bandwidth, 1_024_000., 1e-9);
    assert_eq!(config.experiment.applications, 200);
    assert!(config.devices.is_empty());
}

#[test]
fn workload_generation_is_deterministic_by_seed() {
    let mut ids_a = IdAllocator::new();
    let mut ids_b = IdAllocator::new();
    let mut rng_a = StdRng::seed_from_u64(7);
    let mut rng_b = StdRng::seed_from_u64(7);

    let first = workload_generator::random_application(0, 3, true, &mut ids_a, &mut rng_a);
    let second = workload_generator::random_application(0, 3, true, &mut ids_b, &mut rng_b);

    assert_eq!(first.process_count(), second.process_count());
    for i in 0..first.process_count() {
        assert_eq!(first.process(i).demand, second.process(i).demand);
        for j in 0..first.process_count() {
            assert_float_eq(first.bandwidth_between(i, j), second.bandwidth_between(i, j), 1e-9);
        }
    }
}

#[test]
fn generated_applications_guarantee_a_chain() {
    let mut ids = IdAllocator::new();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let app = workload_generator::random_application(0, 4, true, &mut ids, &mut rng);
        for i in 0..app.process_count().saturating_sub(1) {
            assert!(app.bandwidth_between(i, i + 1) > 0.);
        }
    }
}
