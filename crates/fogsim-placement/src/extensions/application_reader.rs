//! Application descriptor ingestion.

use serde::{Deserialize, Serialize};

use crate::core::application::{Application, Processus};
use crate::core::common::{IdAllocator, Resources};

/// One process entry of an application descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessusSpec {
    /// Requested number of CPUs.
    pub cpu: f64,
    /// Requested number of GPUs.
    pub gpu: f64,
    /// Requested memory in MB.
    pub memory: f64,
    /// Requested disk space in MB.
    pub disk: f64,
}

/// One link entry of an application descriptor, naming two process positions
/// and the bandwidth demanded between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppLinkSpec {
    /// Position of the first process in the process list.
    pub from: usize,
    /// Position of the second process.
    pub to: usize,
    /// Demanded bandwidth in kB/s.
    pub bandwidth: f64,
}

/// Application descriptor as stored in YAML or JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSpec {
    /// Processes in deployment order.
    pub processes: Vec<ProcessusSpec>,
    /// Bandwidth demands between process pairs.
    #[serde(default)]
    pub links: Vec<AppLinkSpec>,
}

impl ApplicationSpec {
    /// Reads a descriptor from a `.json` file or (by default) a YAML file.
    pub fn from_file(file_name: &str) -> Self {
        let content =
            std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name));
        if file_name.ends_with(".json") {
            serde_json::from_str(&content)
                .unwrap_or_else(|_| panic!("Can't parse JSON from file {}", file_name))
        } else {
            serde_yaml::from_str(&content)
                .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name))
        }
    }

    /// Builds an [`Application`], drawing process ids from `ids`.
    ///
    /// Links are mirrored into both halves of the bandwidth matrix, so the
    /// listing order of a link's endpoints does not matter.
    pub fn build(&self, app_id: u32, ids: &mut IdAllocator) -> Application {
        let processes = self
            .processes
            .iter()
            .map(|spec| Processus {
                id: ids.allocate(),
                demand: Resources::new(spec.cpu, spec.gpu, spec.memory, spec.disk),
            })
            .collect();
        let count = self.processes.len();
        let mut matrix = vec![vec![0.; count]; count];
        for link in &self.links {
            matrix[link.from][link.to] = link.bandwidth;
            matrix[link.to][link.from] = link.bandwidth;
        }
        Application::new(app_id, processes, matrix)
    }
}
