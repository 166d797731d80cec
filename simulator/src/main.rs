//! Fair-launch scenario simulator
//!
//! Deploys a launch pool from a TOML scenario, replays each trader step as an
//! encoded pool call and reports pool and account state along the way.

mod config;
mod scenario;

use anyhow::{bail, Context, Result};
use config::Config;
use scenario::Simulation;

struct Args {
    config_path: Option<String>,
    write_default: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config_path: None, write_default: None, json: false };
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--write-default" => {
                let path = iter.next().context("--write-default needs a path")?;
                args.write_default = Some(path);
            }
            "-h" | "--help" => {
                println!("usage: fairlaunch-sim [--json] [--write-default <path>] [scenario.toml]");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag {}", flag),
            path => {
                if args.config_path.replace(path.to_string()).is_some() {
                    bail!("only one scenario file may be given");
                }
            }
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    if let Some(path) = args.write_default {
        return Config::write_default(&path);
    }

    log::info!("Starting fair-launch simulator");

    // An explicit path must load; otherwise fall back to the built-in scenario
    let config = match args.config_path.as_deref() {
        Some(path) => Config::load(Some(path))?,
        None => Config::load(None).unwrap_or_else(|e| {
            log::warn!("Failed to load config ({:#}), using default scenario", e);
            Config::default_scenario()
        }),
    };

    let mut sim = Simulation::new(config).context("Failed to deploy launch pool")?;
    log::info!(
        "Deployed {} ({}) at {}",
        sim.pool().name(),
        sim.pool().symbol(),
        sim.pool().address()
    );
    sim.log_state();

    sim.run();

    let rejected = sim
        .reports()
        .iter()
        .filter(|r| matches!(r.outcome, scenario::StepOutcome::Rejected { .. }))
        .count();
    log::info!(
        "Ran {} steps ({} rejected), launch {}",
        sim.reports().len(),
        rejected,
        if sim.pool().get_launch_status() { "graduated" } else { "still trading" }
    );

    if args.json {
        let summary = serde_json::to_string_pretty(&sim.summary()).context("Failed to serialize summary")?;
        println!("{}", summary);
    }

    Ok(())
}
