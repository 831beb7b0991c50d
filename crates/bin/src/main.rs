//! Cell growth - headless level runner.
//!
//! Drives the simulation at the configured frame rate against a scripted
//! pointer and a recording render sink. Ctrl-C requests a quit.

mod headless;

use headless::{OrbitPointer, SignalInput};
use sim::{Config, FrameClock, Simulation, Status};
use std::path::Path;
use std::time::Instant;
use surface::FrameRecorder;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Cell Growth v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load(Path::new("config.toml"))?;
    config.validate()?;
    info!("Loaded configuration");
    info!("  World: {}x{}", config.world.width, config.world.height);
    info!("  Frame rate: {} fps", config.clock.max_fps);
    info!(
        "  Entities: player {}x{} mass, {} autonomous {}x{} mass",
        config.player.cells, config.player.mass, config.autonomous.count, config.autonomous.cells, config.autonomous.mass
    );

    let mut sim = Simulation::new(config.clone(), config.run.seed)?;
    let outcome = run(&mut sim, &config).await?;

    let player_mass = sim
        .player()
        .map(|p| p.total_mass(sim.population()))
        .unwrap_or(0);
    info!(
        "Finished after {} frames: {:?} (player mass {}, {} cells alive)",
        sim.frame_count(),
        outcome,
        player_mass,
        sim.population().len()
    );
    Ok(())
}

/// Run frames until the level ends or the frame limit is reached.
async fn run(sim: &mut Simulation, config: &Config) -> anyhow::Result<Status> {
    let mut clock = FrameClock::new(&config.clock);
    let budget = clock.frame_budget();
    let mut ticker = interval(budget);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut input = SignalInput::spawn();
    let mut pointer = OrbitPointer::new(*sim.bounds());
    let mut recorder = FrameRecorder::new();

    loop {
        ticker.tick().await;

        sim.handle_input(&input.poll())?;
        let dt = clock.tick();
        let frame_start = Instant::now();

        pointer.advance(dt);
        let report = sim.tick(dt, &pointer);
        recorder.clear();
        sim.draw(&mut recorder);

        let elapsed = frame_start.elapsed();
        if elapsed > budget {
            warn!(
                "Slow frame #{}: {:.3}ms (budget: {:.1}ms) - {} entities, {} cells",
                sim.frame_count(),
                elapsed.as_secs_f64() * 1000.0,
                budget.as_secs_f64() * 1000.0,
                sim.entities().len(),
                sim.population().len()
            );
        }
        if !report.absorptions.is_empty() || !report.reaped.is_empty() {
            debug!(
                "Frame #{}: {} absorbed, {} entities gone, {} draw commands",
                sim.frame_count(),
                report.absorptions.len(),
                report.reaped.len(),
                recorder.commands().len()
            );
        }

        if sim.status() != Status::Running {
            return Ok(sim.status());
        }
        if config.run.frames > 0 && sim.frame_count() >= config.run.frames {
            return Ok(Status::Running);
        }
    }
}
