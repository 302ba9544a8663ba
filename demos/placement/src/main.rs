use clap::Parser;
use log::info;

use fogsim_placement::core::config::SimulationConfig;
use fogsim_placement::experiment::{Experiment, SimulationCallbacks};
use fogsim_placement::extensions::application_reader::ApplicationSpec;
use fogsim_placement::simulation::FogSimulation;

fn init_logger() {
    use env_logger::Builder;
    use std::io::Write;
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

/// Deploys a described application onto a randomly generated fog
/// infrastructure, or simulates a batch of random deployments.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Simulation configuration file
    #[clap(long, default_value = "config.yaml")]
    config: String,

    /// Application descriptor file
    #[clap(long, default_value = "app.yaml")]
    application: String,

    /// Run the batch simulation instead of a one-shot deployment
    #[clap(long)]
    simulate: bool,

    /// Directory for batch simulation logs and results
    #[clap(long, default_value = "results")]
    log_dir: String,
}

#[derive(Clone)]
struct QuietCallbacks {}

impl SimulationCallbacks for QuietCallbacks {}

fn deploy_one_application(config: SimulationConfig, application: &str) {
    let mut sim = FogSimulation::new(config);
    sim.build_devices_from_config();
    sim.build_network();

    let spec = ApplicationSpec::from_file(application);
    let app = sim.application_from_spec(&spec);
    let entry = sim.random_entry_device();
    info!("deploying application {} from entry device {}", app.id, entry);

    let outcome = sim.deploy_application(&app, entry);
    info!(
        "success: {}, deployment latency: {}, operational latency: {}",
        outcome.success, outcome.deployment_latency, outcome.operational_latency
    );
}

fn simulate_deployments(config: SimulationConfig, log_dir: &str) {
    let mut experiment = Experiment::new(
        config,
        Box::new(QuietCallbacks {}),
        1,
        Some(log_dir.to_string()),
        log::Level::Info,
    );
    experiment.run(1);
    info!("batch simulation results saved under {}", log_dir);
}

fn main() {
    init_logger();
    let args = Args::parse();
    let config = SimulationConfig::from_file(&args.config);

    if args.simulate {
        simulate_deployments(config, &args.log_dir);
    } else {
        deploy_one_application(config, &args.application);
    }
}
