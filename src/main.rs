use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use threebody::engine::{builtin_configs, SCENARIO_CLASSIC};
use threebody::{ScenarioConfig, Simulator, Gravity};

#[derive(Parser, Debug)]
#[command(about = "Integrate three gravitating point masses frame by frame")]
struct Args {
    /// TOML scenario file; overrides --scenario
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in scenario id (classic, symmetric-line, triangle)
    #[arg(short, long, default_value = SCENARIO_CLASSIC)]
    scenario: String,

    /// Number of frames to integrate (defaults to the scenario's value)
    #[arg(short, long)]
    frames: Option<usize>,

    /// Print positions every K frames (0 = only the final state)
    #[arg(short, long, default_value_t = 0)]
    print_every: usize,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    match &args.config {
        Some(path) => ScenarioConfig::from_file(path)
            .with_context(|| format!("failed to load scenario {}", path.display())),
        None => {
            let bodies = builtin_configs(&args.scenario)?;
            Ok(ScenarioConfig::new(bodies, Default::default()))
        }
    }
}

fn print_positions(sim: &Simulator<Gravity>) {
    let p = sim.positions();
    println!(
        "frame {:>5}  t = {:>8.3}  [{:.4}, {:.4}, {:.4}]  [{:.4}, {:.4}, {:.4}]  [{:.4}, {:.4}, {:.4}]",
        sim.frame(),
        sim.time(),
        p[0].x, p[0].y, p[0].z,
        p[1].x, p[1].y, p[1].z,
        p[2].x, p[2].y, p[2].z,
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let scenario = load_scenario(&args)?;
    let frames = args.frames.unwrap_or(scenario.simulation.frames);
    let mut sim = scenario.build_simulator()?;

    info!(
        "running {} frames, dt = {}, g = {}",
        frames,
        sim.dt(),
        sim.field().params.g
    );

    let p0 = sim.total_momentum();
    let e0 = sim.total_energy();

    for _ in 0..frames {
        sim.step();
        if args.print_every > 0 && sim.frame() % args.print_every as u64 == 0 {
            print_positions(&sim);
        }
    }

    if let Some(i) = sim.first_non_finite() {
        warn!("state of body {} is no longer finite", i);
    }

    println!("t = {:.3}", sim.time());
    for snap in sim.body_snapshots() {
        println!(
            "body {}  m = {}  state = [x,y,z,vx,vy,vz] = {:?}",
            snap.id, snap.mass, snap.state
        );
    }
    println!("momentum drift = {:.3e}", (sim.total_momentum() - p0).norm());
    println!("energy drift   = {:.3e}", sim.total_energy() - e0);

    Ok(())
}
