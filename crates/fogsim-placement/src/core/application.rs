//! Applications and their processes.

use crate::core::common::Resources;

/// One process of an application with its resource demand.
#[derive(Debug, Clone)]
pub struct Processus {
    /// Process id, used for reporting only.
    pub id: u32,
    /// Resource demand of the process.
    pub demand: Resources,
}

/// An ordered set of processes plus the bandwidth demands between them.
///
/// A process position defines both its deployment order and its index into
/// the bandwidth matrix.
#[derive(Debug, Clone)]
pub struct Application {
    /// Application id.
    pub id: u32,
    processes: Vec<Processus>,
    bandwidth: Vec<Vec<f64>>,
}

impl Application {
    /// Creates an application from its processes and bandwidth matrix.
    ///
    /// The matrix must be square with the process count as its dimension,
    /// symmetric, and zero on the diagonal.
    pub fn new(id: u32, processes: Vec<Processus>, bandwidth: Vec<Vec<f64>>) -> Self {
        assert_eq!(
            bandwidth.len(),
            processes.len(),
            "Bandwidth matrix dimension must equal process count"
        );
        for (i, row) in bandwidth.iter().enumerate() {
            assert_eq!(
                row.len(),
                processes.len(),
                "Bandwidth matrix must be square"
            );
            assert_eq!(row[i], 0., "Bandwidth matrix diagonal must be zero");
            for (j, value) in row.iter().enumerate() {
                assert_eq!(*value, bandwidth[j][i], "Bandwidth matrix must be symmetric");
            }
        }
        Self {
            id,
            processes,
            bandwidth,
        }
    }

    /// Number of processes.
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Returns the process at the given position.
    pub fn process(&self, index: usize) -> &Processus {
        &self.processes[index]
    }

    /// All processes in deployment order.
    pub fn processes(&self) -> &[Processus] {
        &self.processes
    }

    /// Required bandwidth between the processes at positions `i` and `j`.
    pub fn bandwidth_between(&self, i: usize, j: usize) -> f64 {
        self.bandwidth[i][j]
    }
}
