use crate::config;
use crate::frame::state::{SimCommand, FLASHES, PARTICLES, PAUSED, TELEMETRY, UPDATE_LOCK};
use crate::frame::{FlashTracker, RenderParticle, Telemetry};
use crate::profile_scope;
use crate::simulation::{AutoFuel, Simulation, StepReport};
use std::sync::atomic::Ordering;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use super::command_loop;

/// Shortest wait on the command channel during an idle frame.
const IDLE_WAIT_MIN: f32 = 1e-3;

/// Driver-side state that lives next to the simulation but outside the physics core.
pub struct LoopState {
    pub auto_fuel: AutoFuel,
    pub flashes: FlashTracker,
    /// Frame time handed to every step, before the frame cap.
    pub dt: f32,
    /// False until the injection kick starts the burn.
    pub running: bool,
    pub step_once: bool,
    pub shutdown: bool,
}

impl LoopState {
    pub fn new(auto_fuel: AutoFuel, dt: f32) -> Self {
        Self {
            auto_fuel,
            flashes: FlashTracker::default(),
            dt,
            running: false,
            step_once: false,
            shutdown: false,
        }
    }
}

/// Clamp a frame time into `[0, MAX_FRAME_DT]`; NaN counts as zero.
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.clamp(0.0, config::MAX_FRAME_DT)
    }
}

/// One frame: step if running, then flashes, refuelling and compaction.
pub fn advance(simulation: &mut Simulation, state: &mut LoopState) -> Option<StepReport> {
    let dt = clamp_frame_dt(state.dt);
    let stepping = state.running || std::mem::take(&mut state.step_once);
    let report = if stepping {
        profile_scope!("simulation_loop");
        let report = simulation.step(dt);
        state.flashes.spawn(simulation.events());
        if report.fusions > 0 {
            let counts = simulation.particles.counts();
            println!(
                "[fusion] +{} total: {} D: {} T: {} He: {}",
                report.fusions, simulation.fusion_count, counts.deuterium, counts.tritium, counts.helium
            );
        }
        state.auto_fuel.update(simulation, dt);
        simulation.compact();
        Some(report)
    } else {
        None
    };
    state.flashes.advance(dt);
    report
}

/// Publish the current frame for the renderer.
pub fn render(simulation: &Simulation, state: &LoopState) {
    let mut lock = UPDATE_LOCK.lock();
    {
        let mut particles = PARTICLES.lock();
        particles.clear();
        particles.extend(simulation.particles.active().map(RenderParticle::from));
    }
    {
        let mut flashes = FLASHES.lock();
        flashes.clear();
        flashes.extend_from_slice(state.flashes.visible());
    }
    *TELEMETRY.lock() = Telemetry::collect(simulation, &state.flashes);
    *lock |= true;
}

/// Drive the simulation until `Shutdown` arrives or `max_frames` frames have passed.
/// Idle frames (paused, or waiting for the burn to start) count toward the limit
/// and block on the command channel for one frame time instead of spinning.
/// Returns the simulation so the caller can report on it.
pub fn run_simulation_loop(
    rx: Receiver<SimCommand>,
    mut simulation: Simulation,
    mut state: LoopState,
    max_frames: Option<usize>,
) -> Simulation {
    let mut frames = 0;
    loop {
        while let Ok(cmd) = rx.try_recv() {
            command_loop::handle_command(cmd, &mut simulation, &mut state);
        }
        if state.shutdown {
            break;
        }

        let stepped = if PAUSED.load(Ordering::Relaxed) {
            None
        } else {
            advance(&mut simulation, &mut state)
        };
        frames += 1;

        match stepped {
            Some(_) if simulation.frame % config::TELEMETRY_INTERVAL == 0 => {
                match serde_json::to_string(&Telemetry::collect(&simulation, &state.flashes)) {
                    Ok(json) => println!("[telemetry] {}", json),
                    Err(e) => eprintln!("[telemetry] serialization failed: {}", e),
                }
                #[cfg(feature = "profiling")]
                {
                    crate::PROFILER.lock().print_and_clear(simulation.frame);
                }
            }
            Some(_) => {}
            None => {
                let wait = Duration::from_secs_f32(clamp_frame_dt(state.dt).max(IDLE_WAIT_MIN));
                match rx.recv_timeout(wait) {
                    Ok(cmd) => command_loop::handle_command(cmd, &mut simulation, &mut state),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }

        render(&simulation, &state);

        if state.shutdown || max_frames.is_some_and(|max| frames >= max) {
            break;
        }
        std::thread::yield_now();
    }
    simulation
}
