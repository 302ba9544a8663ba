//! Shared resource accounting types.

use serde::{Deserialize, Serialize};

/// A four-dimensional resource vector, used for device capacity limits,
/// current usage and process demands alike.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Number of CPUs.
    pub cpu: f64,
    /// Number of GPUs.
    pub gpu: f64,
    /// Memory in MB.
    pub memory: f64,
    /// Disk space in MB.
    pub disk: f64,
}

impl Resources {
    /// Creates a resource vector from its four components.
    pub fn new(cpu: f64, gpu: f64, memory: f64, disk: f64) -> Self {
        Self {
            cpu,
            gpu,
            memory,
            disk,
        }
    }
}

/// Outcome of testing a resource allocation against a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AllocationVerdict {
    /// The allocation fits.
    Success,
    /// Not enough spare CPU.
    NotEnoughCpu,
    /// Not enough spare GPU.
    NotEnoughGpu,
    /// Not enough spare memory.
    NotEnoughMemory,
    /// Not enough spare disk space.
    NotEnoughDisk,
    /// No device with the requested id exists.
    DeviceNotFound,
}

/// Hands out consecutive ids.
///
/// Owned by whatever context constructs the corresponding entities
/// (simulation facade, loaders, generators) rather than shared process-wide.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Creates an allocator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id and advances the counter.
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
