//! Simulation configuration.

use serde::{Deserialize, Serialize};

/// Holds raw simulation config parsed from a YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawSimulationConfig {
    pub seed: Option<u64>,
    pub network: Option<RawNetworkConfig>,
    pub area: Option<RawAreaConfig>,
    pub devices: Option<Vec<DeviceConfig>>,
    pub experiment: Option<RawExperimentConfig>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawNetworkConfig {
    pub range: Option<f64>,
    pub link_bandwidth: Option<f64>,
    pub link_latency: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawAreaConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawExperimentConfig {
    pub applications: Option<usize>,
    pub max_processes: Option<usize>,
    pub random_process_count: Option<bool>,
}

/// Holds configuration of a single device or a set of identical devices.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DeviceConfig {
    /// Number of such devices.
    pub count: Option<u32>,
    /// Device CPU capacity.
    pub cpu: f64,
    /// Device GPU capacity.
    pub gpu: f64,
    /// Device memory capacity in MB.
    pub memory: f64,
    /// Device disk capacity in MB.
    pub disk: f64,
}

/// Direct-link parameters of the modeled network.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Direct reachability radius in meters.
    pub range: f64,
    /// Bandwidth assigned to every derived link, in kB/s.
    pub link_bandwidth: f64,
    /// Latency assigned to every derived link.
    pub link_latency: f64,
}

/// Rectangular area devices are placed in.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct AreaConfig {
    /// Area width in meters.
    pub width: f64,
    /// Area height in meters.
    pub height: f64,
}

/// Batch experiment parameters.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ExperimentConfig {
    /// Number of applications deployed per run.
    pub applications: usize,
    /// Largest process count of a generated application.
    pub max_processes: usize,
    /// Whether generated applications draw their process count at random
    /// between one and `max_processes`.
    pub random_process_count: bool,
}

/// Represents simulation configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct SimulationConfig {
    /// Seed for all random generation of a run.
    pub seed: u64,
    /// Network parameters.
    pub network: NetworkConfig,
    /// Device placement area.
    pub area: AreaConfig,
    /// Configurations of device groups.
    pub devices: Vec<DeviceConfig>,
    /// Batch experiment parameters.
    pub experiment: ExperimentConfig,
}

impl SimulationConfig {
    /// Creates simulation config with default parameter values.
    pub fn new() -> Self {
        Self {
            seed: 123,
            network: NetworkConfig {
                range: 9.,
                link_bandwidth: 1000. * 1024.,
                link_latency: 10.,
            },
            area: AreaConfig {
                width: 40.,
                height: 40.,
            },
            devices: Vec::new(),
            experiment: ExperimentConfig {
                applications: 200,
                max_processes: 3,
                random_process_count: true,
            },
        }
    }

    /// Creates simulation config by reading parameter values from a YAML
    /// file (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Self {
        let raw: RawSimulationConfig = serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name));
        let default = SimulationConfig::new();

        let network = raw.network.unwrap_or(RawNetworkConfig {
            range: None,
            link_bandwidth: None,
            link_latency: None,
        });
        let area = raw.area.unwrap_or(RawAreaConfig {
            width: None,
            height: None,
        });
        let experiment = raw.experiment.unwrap_or(RawExperimentConfig {
            applications: None,
            max_processes: None,
            random_process_count: None,
        });

        Self {
            seed: raw.seed.unwrap_or(default.seed),
            network: NetworkConfig {
                range: network.range.unwrap_or(default.network.range),
                link_bandwidth: network.link_bandwidth.unwrap_or(default.network.link_bandwidth),
                link_latency: network.link_latency.unwrap_or(default.network.link_latency),
            },
            area: AreaConfig {
                width: area.width.unwrap_or(default.area.width),
                height: area.height.unwrap_or(default.area.height),
            },
            devices: raw.devices.unwrap_or_default(),
            experiment: ExperimentConfig {
                applications: experiment.applications.unwrap_or(default.experiment.applications),
                max_processes: experiment.max_processes.unwrap_or(default.experiment.max_processes),
                random_process_count: experiment
                    .random_process_count
                    .unwrap_or(default.experiment.random_process_count),
            },
        }
    }

    /// Returns the total device count over all groups.
    pub fn number_of_devices(&self) -> u32 {
        self.devices.iter().map(|group| group.count.unwrap_or(1)).sum()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
