//! Gravflip Sim - headless controller runner
//!
//! Runs the demo level with a scripted input timeline and prints the
//! resulting event log and final character state.
//!
//! Usage:
//!   gravflip-sim [--config <controller.toml>] [--scenario <scenario.toml>] [--seconds <s>]

use anyhow::{Context, Result};
use clap::Parser;
use gravflip_controller::ControllerConfig;
use gravflip_physics::PhysicsSystem;
use gravflip_sim::{DemoLevel, Scenario, SimRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gravflip-sim")]
#[command(about = "Run the gravity-flip character controller headlessly")]
struct Args {
    /// Controller config (TOML, see scenarios/controller.toml); defaults are used when omitted
    #[arg(long)]
    config: Option<String>,

    /// Scripted input timeline (TOML); the bundled demo when omitted
    #[arg(long)]
    scenario: Option<String>,

    /// Wall seconds to run; defaults to the scenario's length
    #[arg(long)]
    seconds: Option<f64>,

    /// Presentation frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Fixed simulation rate
    #[arg(long, default_value_t = 50.0)]
    tick_rate: f64,

    /// Print the effective controller config and exit
    #[arg(long)]
    dump_config: bool,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &args.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("Failed to load controller config {path}"))?,
        None => ControllerConfig::default(),
    };

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let scenario = match &args.scenario {
        Some(path) => {
            Scenario::load(path).with_context(|| format!("Failed to load scenario {path}"))?
        }
        None => Scenario::demo().context("Bundled demo scenario is invalid")?,
    };
    let seconds = args.seconds.unwrap_or_else(|| scenario.duration());
    if !(args.fps > 0.0 && args.tick_rate > 0.0) {
        anyhow::bail!("--fps and --tick-rate must be positive");
    }

    let mut system = PhysicsSystem::new(config).context("Invalid controller config")?;
    let level = DemoLevel::default();
    level
        .build(&mut system)
        .context("Failed to build demo level")?;

    let mut runner =
        SimRunner::new(system, scenario, args.tick_rate).context("Failed to start simulation")?;
    runner
        .run_for(seconds, 1.0 / args.fps)
        .context("Simulation step failed")?;
    let report = runner.finish()?;

    println!("Events:");
    for logged in &report.events {
        println!("  {:>7.3}s  {:?}", logged.time, logged.event);
    }
    println!();
    println!("Final state after {} fixed steps ({:.2}s):", report.fixed_steps, report.simulated_time);
    println!("  position  {:.3}", report.position);
    println!("  gravity   {:.3}", report.gravity);
    println!("  grounded  {}", report.grounded);
    println!("  crouched  {}", report.crouched);
    println!("  pitch     {:.1}°", report.pitch_deg);

    Ok(())
}
