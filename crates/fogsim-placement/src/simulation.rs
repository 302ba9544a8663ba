//! Simulation facade wiring devices, network and deployments together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fogsim_network::{Position, Topology};

use crate::core::application::Application;
use crate::core::common::{IdAllocator, Resources};
use crate::core::config::SimulationConfig;
use crate::core::deployment::{deploy, DeploymentOutcome};
use crate::core::device::{Device, DeviceId, DevicePool};
use crate::core::logger::{Logger, StdoutLogger};
use crate::extensions::application_reader::ApplicationSpec;
use crate::extensions::inventory_reader::InventorySpec;
use crate::extensions::workload_generator;

/// Owns the modeled infrastructure and runs deployment requests against it.
///
/// One request runs to completion before the next starts; the routing tables
/// are built once, after all devices are registered, and stay fixed while
/// deployments only change device usage and link bandwidth.
pub struct FogSimulation {
    pool: DevicePool,
    topology: Topology,
    logger: Box<dyn Logger>,
    rng: StdRng,
    app_ids: IdAllocator,
    process_ids: IdAllocator,
    config: SimulationConfig,
}

impl FogSimulation {
    /// Creates a simulation logging through the `log` macros.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_logger(config, Box::new(StdoutLogger::new()))
    }

    /// Creates a simulation with a custom logger.
    pub fn with_logger(config: SimulationConfig, logger: Box<dyn Logger>) -> Self {
        let topology = Topology::new(
            config.network.range,
            config.network.link_bandwidth,
            config.network.link_latency,
        );
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            pool: DevicePool::new(),
            topology,
            logger,
            rng,
            app_ids: IdAllocator::new(),
            process_ids: IdAllocator::new(),
            config,
        }
    }

    /// Adds a device with the given position and capacity limits.
    pub fn add_device(&mut self, position: Position, limits: Resources) -> DeviceId {
        let id = self.topology.add_node(position);
        self.pool.add_device(Device::new(id, limits));
        id
    }

    /// Adds a device that already carries some usage.
    pub fn add_device_with_usage(
        &mut self,
        position: Position,
        limits: Resources,
        usage: Resources,
    ) -> DeviceId {
        let id = self.topology.add_node(position);
        self.pool.add_device(Device::with_usage(id, limits, usage));
        id
    }

    /// Creates the device groups listed in the config at random positions
    /// inside the configured area.
    pub fn build_devices_from_config(&mut self) {
        for group in self.config.devices.clone() {
            for _ in 0..group.count.unwrap_or(1) {
                let position =
                    workload_generator::random_position(self.config.area.width, self.config.area.height, &mut self.rng);
                let limits = Resources::new(group.cpu, group.gpu, group.memory, group.disk);
                self.add_device(position, limits);
            }
        }
    }

    /// Creates the devices described by an inventory descriptor.
    pub fn build_devices_from_inventory(&mut self, inventory: &InventorySpec) {
        for spec in &inventory.devices {
            self.add_device_with_usage(spec.position, spec.limits(), spec.usage());
        }
    }

    /// Computes direct links and converges all routing tables.
    pub fn build_network(&mut self) {
        self.topology.build_routes();
    }

    /// Deploys `app` starting the search from the `entry` device and logs the
    /// resulting report.
    pub fn deploy_application(&mut self, app: &Application, entry: DeviceId) -> DeploymentOutcome {
        let outcome = deploy(app, entry, &mut self.pool, &mut self.topology);
        if outcome.success {
            self.logger
                .log_info("deployment", format!("application {} successfully deployed", app.id));
            for (index, device) in outcome.placements.iter().enumerate() {
                self.logger.log_info(
                    "deployment",
                    format!("processus {} on device {}", app.process(index).id, device),
                );
            }
        } else {
            self.logger.log_info(
                "deployment",
                format!("deployment failure for application {}", app.id),
            );
        }
        outcome
    }

    /// Builds an application from a descriptor, assigning fresh ids.
    pub fn application_from_spec(&mut self, spec: &ApplicationSpec) -> Application {
        spec.build(self.app_ids.allocate(), &mut self.process_ids)
    }

    /// Generates a random application using the experiment settings.
    pub fn random_application(&mut self) -> Application {
        workload_generator::random_application(
            self.app_ids.allocate(),
            self.config.experiment.max_processes,
            self.config.experiment.random_process_count,
            &mut self.process_ids,
            &mut self.rng,
        )
    }

    /// Picks a random device id as a deployment entry point.
    pub fn random_entry_device(&mut self) -> DeviceId {
        self.rng.gen_range(0..self.pool.len())
    }

    /// Returns the device with the given id.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.pool.device(id)
    }

    /// Number of registered devices.
    pub fn device_count(&self) -> usize {
        self.pool.len()
    }

    /// The network topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The simulation config.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Writes the collected deployment log to `path`, if the logger keeps
    /// records.
    pub fn save_log(&self, path: &str) -> Result<(), std::io::Error> {
        self.logger.save_log(path)
    }
}
