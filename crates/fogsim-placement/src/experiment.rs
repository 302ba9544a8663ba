//! Tools for running batch experiments with multiple simulation runs.

use std::fs;
use std::fs::File;
use std::sync::{Arc, Mutex};

use dyn_clone::{clone_trait_object, DynClone};
use indexmap::map::IndexMap;
use log::Level;
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;

use crate::core::config::SimulationConfig;
use crate::core::deployment::DeploymentOutcome;
use crate::core::logger::{FileLogger, Logger, StdoutLogger};
use crate::simulation::FogSimulation;

/// Trait for implementing custom callbacks for simulation runs within an
/// experiment.
pub trait SimulationCallbacks: DynClone + Send {
    /// Runs after the infrastructure of a run is built, before the first
    /// deployment.
    fn on_run_start(&mut self, _sim: &mut FogSimulation) {}

    /// Runs after each deployment, returns false if the run must be stopped.
    fn on_deployment(&mut self, _sim: &mut FogSimulation, _outcome: &DeploymentOutcome) -> bool {
        true
    }

    /// Runs upon the completion of a run, returns extra results of this run.
    fn on_run_finish(&mut self, _sim: &mut FogSimulation) -> IndexMap<String, String> {
        IndexMap::new()
    }
}

clone_trait_object!(SimulationCallbacks);

/// Cumulative counters over the deployments of one run.
#[derive(Debug, Default, Clone)]
struct RunStats {
    deployment_latency: f64,
    operational_latency: f64,
    applications_deployed: usize,
    applications_refused: usize,
    processes_placed: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &DeploymentOutcome) {
        self.deployment_latency += outcome.deployment_latency;
        self.operational_latency += outcome.operational_latency;
        if outcome.success {
            self.applications_deployed += 1;
            self.processes_placed += outcome.placements.len();
        } else {
            self.applications_refused += 1;
        }
    }

    fn fill(&self, results: &mut IndexMap<String, String>) {
        results.insert("applications_deployed".to_string(), self.applications_deployed.to_string());
        results.insert("applications_refused".to_string(), self.applications_refused.to_string());
        results.insert("processes_placed".to_string(), self.processes_placed.to_string());
        results.insert("deployment_latency".to_string(), self.deployment_latency.to_string());
        results.insert(
            "operational_latency".to_string(),
            self.operational_latency.to_string(),
        );
    }
}

/// Implements execution of an experiment: a number of seeded runs, each
/// deploying a stream of random applications over a fresh infrastructure.
pub struct Experiment {
    pub config: SimulationConfig,
    pub callbacks: Box<dyn SimulationCallbacks>,
    pub runs: usize,
    pub log_dir: Option<String>,
    pub log_level: Level,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
enum DictValue {
    String(String),
    StringDict(IndexMap<String, String>),
    Config(SimulationConfig),
}

impl Experiment {
    pub fn new(
        config: SimulationConfig,
        callbacks: Box<dyn SimulationCallbacks>,
        runs: usize,
        log_dir: Option<String>,
        log_level: Level,
    ) -> Self {
        if let Some(dir) = log_dir.clone() {
            fs::create_dir_all(dir).unwrap();
        }

        Self {
            config,
            callbacks,
            runs,
            log_dir,
            log_level,
        }
    }

    /// Runs the experiment using the specified number of threads.
    pub fn run(&mut self, num_threads: usize) {
        let results = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::new(num_threads);

        for run_id in 1..=self.runs {
            let mut config = self.config.clone();
            config.seed = self.config.seed + run_id as u64 - 1;
            let mut callbacks = self.callbacks.clone();
            let log_level = self.log_level;
            let log_file = self.log_dir.clone().map(|dir| format!("{}/log_{}.csv", dir, run_id));
            let results = results.clone();

            pool.execute(move || {
                println!("RUN {}: seed {}", run_id, config.seed);
                let run_results = run_simulation(run_id, config.clone(), &mut callbacks, log_file, log_level);

                let mut run_entry = IndexMap::<String, DictValue>::new();
                run_entry.insert("id".to_string(), DictValue::String(format!("{}", run_id)));
                run_entry.insert("config".to_string(), DictValue::Config(config));
                run_entry.insert("results".to_string(), DictValue::StringDict(run_results));
                results.lock().unwrap().push(run_entry);
            });
        }

        pool.join();
        let results = Arc::try_unwrap(results).unwrap().into_inner().unwrap();

        if let Some(dir) = self.log_dir.clone() {
            let mut file = File::create(format!("{}/results.json", dir)).unwrap();
            serde_json::to_writer_pretty(&mut file, &results).unwrap();
        }
    }
}

fn run_simulation(
    run_id: usize,
    config: SimulationConfig,
    callbacks: &mut Box<dyn SimulationCallbacks>,
    log_file: Option<String>,
    log_level: Level,
) -> IndexMap<String, String> {
    let logger: Box<dyn Logger> = if log_file.is_some() {
        Box::new(FileLogger::with_level(log_level))
    } else {
        Box::new(StdoutLogger::new())
    };

    let applications = config.experiment.applications;
    let mut sim = FogSimulation::with_logger(config, logger);
    sim.build_devices_from_config();
    sim.build_network();
    callbacks.on_run_start(&mut sim);

    let mut stats = RunStats::default();
    for _ in 0..applications {
        let app = sim.random_application();
        let entry = sim.random_entry_device();
        let outcome = sim.deploy_application(&app, entry);
        stats.record(&outcome);
        if !callbacks.on_deployment(&mut sim, &outcome) {
            break;
        }
    }

    if let Some(log_file) = log_file {
        let save_result = sim.save_log(&log_file);
        match save_result {
            Ok(_) => println!("Log for run {run_id} saved successfully to file: {log_file}"),
            Err(e) => println!("Error while saving log for run {run_id}: {e:?}"),
        }
    }

    let mut results = callbacks.on_run_finish(&mut sim);
    stats.fill(&mut results);
    results
}
