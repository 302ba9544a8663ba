//! Devices and the device pool.

use std::collections::BTreeMap;

use fogsim_network::NodeId;

use crate::core::common::{AllocationVerdict, Resources};

/// Device id. Devices share the id space with their network nodes.
pub type DeviceId = NodeId;

/// A compute host with four capacity limits and four usage counters.
#[derive(Debug, Clone)]
pub struct Device {
    /// Device id, equal to the id of the network node hosting it.
    pub id: DeviceId,
    limits: Resources,
    usage: Resources,
}

impl Device {
    /// Creates a device with the given capacity limits and no usage.
    pub fn new(id: DeviceId, limits: Resources) -> Self {
        Self {
            id,
            limits,
            usage: Resources::default(),
        }
    }

    /// Creates a device with pre-existing usage, e.g. from an inventory
    /// snapshot.
    pub fn with_usage(id: DeviceId, limits: Resources, usage: Resources) -> Self {
        Self { id, limits, usage }
    }

    /// Capacity limits of this device.
    pub fn limits(&self) -> Resources {
        self.limits
    }

    /// Current usage of this device.
    pub fn usage(&self) -> Resources {
        self.usage
    }

    /// Tests whether `demand` fits on this device.
    ///
    /// Admission requires strictly positive headroom on every resource; an
    /// exact fit is refused.
    pub fn can_allocate(&self, demand: &Resources) -> AllocationVerdict {
        if self.usage.cpu + demand.cpu >= self.limits.cpu {
            return AllocationVerdict::NotEnoughCpu;
        }
        if self.usage.gpu + demand.gpu >= self.limits.gpu {
            return AllocationVerdict::NotEnoughGpu;
        }
        if self.usage.memory + demand.memory >= self.limits.memory {
            return AllocationVerdict::NotEnoughMemory;
        }
        if self.usage.disk + demand.disk >= self.limits.disk {
            return AllocationVerdict::NotEnoughDisk;
        }
        AllocationVerdict::Success
    }

    /// Adds `demand` to the usage counters.
    pub fn allocate(&mut self, demand: &Resources) {
        self.usage.cpu += demand.cpu;
        self.usage.gpu += demand.gpu;
        self.usage.memory += demand.memory;
        self.usage.disk += demand.disk;
    }

    /// Subtracts `demand` from the usage counters, clamping each at zero.
    pub fn release(&mut self, demand: &Resources) {
        self.usage.cpu = (self.usage.cpu - demand.cpu).max(0.);
        self.usage.gpu = (self.usage.gpu - demand.gpu).max(0.);
        self.usage.memory = (self.usage.memory - demand.memory).max(0.);
        self.usage.disk = (self.usage.disk - demand.disk).max(0.);
    }
}

/// All devices of the modeled infrastructure, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DevicePool {
    devices: BTreeMap<DeviceId, Device>,
}

impl DevicePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device to the pool.
    pub fn add_device(&mut self, device: Device) {
        self.devices.insert(device.id, device);
    }

    /// Returns the device with the given id.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    /// Mutable access to the device with the given id.
    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(&id)
    }

    /// Ids of all devices in ascending order.
    pub fn ids(&self) -> Vec<DeviceId> {
        self.devices.keys().cloned().collect()
    }

    /// Number of devices in the pool.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the pool holds no device.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Checks whether `demand` currently fits on the given device.
    pub fn can_allocate(&self, demand: &Resources, id: DeviceId) -> AllocationVerdict {
        match self.devices.get(&id) {
            Some(device) => device.can_allocate(demand),
            None => AllocationVerdict::DeviceNotFound,
        }
    }

    /// Records `demand` on the given device.
    pub fn allocate(&mut self, demand: &Resources, id: DeviceId) {
        if let Some(device) = self.devices.get_mut(&id) {
            device.allocate(demand);
        }
    }

    /// Releases `demand` from the given device.
    pub fn release(&mut self, demand: &Resources, id: DeviceId) {
        if let Some(device) = self.devices.get_mut(&id) {
            device.release(demand);
        }
    }
}
