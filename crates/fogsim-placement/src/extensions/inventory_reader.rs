//! Device inventory ingestion.

use serde::{Deserialize, Serialize};

use fogsim_network::Position;

use crate::core::common::Resources;

/// One device entry of an inventory descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Device position.
    pub position: Position,
    /// CPU capacity.
    pub cpu: f64,
    /// GPU capacity.
    pub gpu: f64,
    /// Memory capacity in MB.
    pub memory: f64,
    /// Disk capacity in MB.
    pub disk: f64,
    /// CPU already in use.
    #[serde(default)]
    pub cpu_used: f64,
    /// GPU already in use.
    #[serde(default)]
    pub gpu_used: f64,
    /// Memory already in use, in MB.
    #[serde(default)]
    pub memory_used: f64,
    /// Disk space already in use, in MB.
    #[serde(default)]
    pub disk_used: f64,
}

impl DeviceSpec {
    /// Capacity limits described by this entry.
    pub fn limits(&self) -> Resources {
        Resources::new(self.cpu, self.gpu, self.memory, self.disk)
    }

    /// Initial usage described by this entry.
    pub fn usage(&self) -> Resources {
        Resources::new(self.cpu_used, self.gpu_used, self.memory_used, self.disk_used)
    }
}

/// Device inventory descriptor as stored in YAML files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySpec {
    /// Described devices, in id order.
    pub devices: Vec<DeviceSpec>,
}

impl InventorySpec {
    /// Reads an inventory descriptor from a YAML file.
    pub fn from_file(file_name: &str) -> Self {
        serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name))
    }
}
