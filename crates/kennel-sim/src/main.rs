//! Simulation binary for the Kennel work agents.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the path in argv, `KENNEL_CONFIG`, or
//!    `kennel.yaml`
//! 3. Build the demo scene and staff every work role
//! 4. Restore saved agent tags if `KENNEL_LOAD` names a file
//! 5. Run the tick loop
//! 6. Log the summary and save agent tags if `KENNEL_SAVE` names a file

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use kennel_sim::{Simulation, SimulationConfig, build_scene, log_run_end};

/// Config file read when neither argv nor the environment names one.
const DEFAULT_CONFIG: &str = "kennel.yaml";

fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("kennel-sim starting");

    let config = load_config()?;
    info!(
        seed = config.seed,
        ticks = config.ticks,
        agents_per_role = config.agents_per_role,
        loot_tables = config.loot.len(),
        "Configuration loaded"
    );

    let scene = build_scene();
    info!(
        dredger = %scene.sites.dredger,
        land_station = %scene.sites.land_station,
        harvest_post = %scene.sites.harvest_post,
        trough = %scene.sites.trough,
        "Scene built"
    );

    let mut sim = Simulation::new(&config, scene)?;

    if let Some(path) = env_path("KENNEL_LOAD") {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading saved agents from {}", path.display()))?;
        let tags: Vec<serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing saved agents in {}", path.display()))?;
        sim.load_all(&tags);
        info!(path = %path.display(), agents = tags.len(), "Agents restored");
    }

    let summary = sim.run(config.ticks, config.report_every);
    log_run_end(&summary);
    for (structure, stat, label, count) in sim.stat_rows() {
        info!(%structure, stat = %stat, label = %label, count, "Stat");
    }

    let tags = sim.save_all()?;
    for tag in &tags {
        debug!(%tag, "Saved agent");
    }
    if let Some(path) = env_path("KENNEL_SAVE") {
        let json = serde_json::to_string_pretty(&tags)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing saved agents to {}", path.display()))?;
        info!(path = %path.display(), agents = tags.len(), "Agents saved");
    }

    info!(ticks = summary.ticks, "kennel-sim shutdown complete");
    Ok(())
}

/// Plain text by default; `KENNEL_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("KENNEL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the run configuration.
///
/// An explicitly named file must exist. The implicit `kennel.yaml` is
/// optional, and defaults are used without it.
fn load_config() -> anyhow::Result<SimulationConfig> {
    let named = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env_path("KENNEL_CONFIG"));
    if let Some(path) = named {
        return SimulationConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()));
    }
    let fallback = Path::new(DEFAULT_CONFIG);
    if fallback.exists() {
        Ok(SimulationConfig::from_file(fallback)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
