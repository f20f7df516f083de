use std::env;
use std::str::FromStr;

use anyhow::Context;
use orbital_sim::input::{InputSnapshot, ScriptedInput};
use orbital_sim::io::{self, RunSummary};
use orbital_sim::physics::altitude;
use orbital_sim::satellite::SatelliteKind;
use orbital_sim::sim::Simulator;
use orbital_sim::types::SimConfig;
use tracing::info;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// ---------------------------------------------------------------------------
// Environment configuration
// ---------------------------------------------------------------------------

fn env_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}={raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

fn load_config() -> anyhow::Result<(SimConfig, u64)> {
    let defaults = SimConfig::default();
    let seed = match env::var("ORBITAL_SEED") {
        Ok(raw) => Some(raw.trim().parse::<u64>().context("ORBITAL_SEED must be an integer")?),
        Err(_) => None,
    };
    let config = SimConfig {
        defunct_chance: env_or("ORBITAL_DEFUNCT_CHANCE", defaults.defunct_chance)?,
        meters_per_pixel: env_or("ORBITAL_METERS_PER_PIXEL", defaults.meters_per_pixel)?,
        seed,
        ..defaults
    };
    let frames = env_or("ORBITAL_FRAMES", 3_000_u64)?;
    Ok((config, frames))
}

/// Scripted pilot: sweep the ship around and shoot every 15 frames.
fn demo_script(frames: u64) -> ScriptedInput {
    let script = (0..frames)
        .map(|i| InputSnapshot {
            right: (i / 40) % 3 == 0,
            left: (i / 40) % 3 == 2,
            thrust: i % 200 < 10,
            fire: i % 15 == 0,
            ..InputSnapshot::default()
        })
        .collect();
    ScriptedInput::new(script)
}

fn main() -> anyhow::Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let (config, frames) = load_config()?;
    let dt = config.dt();
    let mut sim = Simulator::new(config).context("building initial fleet")?;
    let mut pilot = demo_script(frames);
    info!(frames, dt, seed = ?sim.config().seed, satellites = sim.len(), "starting run");

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let sample_interval = (frames / 20).max(1);
    let mut samples = Vec::new();
    for i in 0..frames {
        sim.step(&mut pilot)?;
        if i % sample_interval == 0 || i + 1 == frames {
            let ship_alt = sim
                .iter()
                .find(|(_, s)| s.kind() == SatelliteKind::Ship)
                .map(|(_, s)| altitude(&s.pos()) / 1000.0);
            samples.push((sim.frame(), sim.len(), sim.stats(), ship_alt));
        }
        if sim.quit_requested() {
            break;
        }
    }

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let summary = RunSummary::from_simulator(&sim);
    println!();
    println!("====================================================================");
    println!("  ORBITAL SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Run");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Frames:        {:>8}       Step:         {:>8.1} s",
        summary.frames, dt
    );
    println!(
        "  Simulated:     {:>8.1} h     Live:         {:>8}",
        summary.simulated_seconds / 3600.0,
        summary.live
    );
    println!();

    println!("  Timeline");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>6}  {:>6}  {:>10}  {:>9}  {:>12}",
        "frame", "live", "shots", "collisions", "destroyed", "ship alt(km)"
    );
    println!("  {}", "─".repeat(60));
    for (frame, live, stats, ship_alt) in &samples {
        let alt = ship_alt.map_or_else(|| "lost".to_string(), |a| format!("{a:.0}"));
        println!(
            "  {:>7}  {:>6}  {:>6}  {:>10}  {:>9}  {:>12}",
            frame, live, stats.shots, stats.collisions, stats.destroyed, alt
        );
    }
    println!();

    println!("  Fleet");
    println!("  ──────────────────────────────────────────────────────────────────");
    for (kind, count) in &summary.by_kind {
        println!("  {:<18} {:>5}", kind.name(), count);
    }
    println!("  {:<18} {:>5}", "(defunct)", summary.defunct);
    println!("====================================================================");
    println!();

    if let Ok(path) = env::var("ORBITAL_CSV") {
        io::write_fleet_file(&path, &sim).with_context(|| format!("writing {path}"))?;
        info!(%path, "fleet snapshot written");
    }
    if let Ok(path) = env::var("ORBITAL_JSON") {
        io::write_summary_file(&path, &summary).with_context(|| format!("writing {path}"))?;
        info!(%path, "run summary written");
    }
    Ok(())
}
