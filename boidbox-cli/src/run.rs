use std::io::Write;

use anyhow::{ensure, Context, Result};
use boidbox_core::StepReport;
use boidbox_shared::FlockHost;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub ticks: u64,
    /// Simulated frame rate; each tick advances by `1 / fps`.
    pub fps: f32,
    /// Write a frame every this many ticks.
    pub every: u64,
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            fps: 60.0,
            every: 1,
            parallel: false,
        }
    }
}

impl RunOptions {
    pub fn delta(&self) -> f32 {
        1.0 / self.fps
    }
}

/// What happened over a headless run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub agents: usize,
    /// Agent-ticks on which containment fired.
    pub contained: u64,
    pub max_speed_seen: f32,
    /// The per-tick speed cap, `max_speed * delta`.
    pub speed_limit: f32,
    pub frames_written: u64,
}

/// Runs the host for `options.ticks` ticks at a fixed delta, writing
/// JSON-lines frames to `frames` when given.
pub fn run(
    host: &mut FlockHost,
    options: &RunOptions,
    mut frames: Option<&mut dyn Write>,
) -> Result<RunSummary> {
    ensure!(
        options.fps.is_finite() && options.fps > 0.0,
        "fps must be positive, got {}",
        options.fps
    );
    ensure!(options.every > 0, "frame interval must be at least 1");

    if options.parallel && !cfg!(feature = "parallel") {
        log::warn!("Built without the parallel feature, stepping sequentially");
    }

    let delta = options.delta();
    let mut summary = RunSummary {
        agents: host.flock().len(),
        speed_limit: host.config().max_speed * delta,
        ..Default::default()
    };

    log::info!(
        "Running {} ticks of {} agents at {} fps",
        options.ticks,
        summary.agents,
        options.fps
    );

    for _ in 0..options.ticks {
        let report = step(host, delta, options.parallel);
        summary.ticks += 1;
        summary.contained += report.contained as u64;

        for agent in host.flock().iter() {
            ensure!(
                agent.is_finite(),
                "agent went non-finite on tick {}: {:?}",
                host.ticks(),
                agent
            );
            summary.max_speed_seen = summary.max_speed_seen.max(agent.velocity.magnitude());
        }

        if let Some(out) = frames.as_mut() {
            if host.ticks() % options.every == 0 {
                let line = serde_json::to_string(&host.frame()?)?;
                writeln!(out, "{line}").context("Failed to write frame")?;
                summary.frames_written += 1;
            }
        }

        if report.contained > 0 {
            log::debug!("tick {}: {} agents contained", host.ticks(), report.contained);
        }
    }

    if let Some(out) = frames {
        out.flush().context("Failed to flush frames")?;
    }

    Ok(summary)
}

#[cfg(feature = "parallel")]
fn step(host: &mut FlockHost, delta: f32, parallel: bool) -> StepReport {
    if parallel {
        host.tick_parallel(delta)
    } else {
        host.tick(delta)
    }
}

#[cfg(not(feature = "parallel"))]
fn step(host: &mut FlockHost, delta: f32, _parallel: bool) -> StepReport {
    host.tick(delta)
}
