use crate::frame::state::{SimCommand, SIM_COMMAND_SENDER};
use crate::init_config::InitConfig;
use std::sync::mpsc::channel;

pub mod command_loop;
pub mod simulation_loop;

use simulation_loop::LoopState;

/// Frames run when the scenario does not say otherwise.
pub const DEFAULT_STEPS: usize = 600;

pub fn run() {
    // Creates a global thread pool (using rayon) with threads = max(3, total cores) - 2
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let threads = cores.max(crate::config::MIN_THREADS) - crate::config::THREADS_LEAVE_FREE;
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        eprintln!("[startup] could not size the thread pool: {}", e);
    }

    let path = std::env::args().nth(1);
    let loaded = match &path {
        Some(p) => InitConfig::load_from_file(p),
        None => InitConfig::load_default(),
    };
    let init = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!(
                "[startup] no scenario loaded from {} ({}), using defaults",
                path.as_deref().unwrap_or("tokamak.toml"),
                e
            );
            InitConfig::default()
        }
    };

    let simulation = match init.build_simulation() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("[startup] invalid scenario: {}", e);
            return;
        }
    };
    let state = LoopState::new(init.fueling.clone(), init.simulation.frame_dt());
    let steps = init.simulation.steps.unwrap_or(DEFAULT_STEPS);

    let (tx, rx) = channel();
    if let Some(kick) = init.plasma.start_kick() {
        // Queued before the loop starts so the first frame already runs
        let _ = tx.send(SimCommand::StartInjection { kick });
    }
    *SIM_COMMAND_SENDER.lock() = Some(tx);

    let handle = std::thread::spawn(move || {
        simulation_loop::run_simulation_loop(rx, simulation, state, Some(steps))
    });

    match handle.join() {
        Ok(simulation) => {
            let counts = simulation.particles.counts();
            println!(
                "Simulation ended after {} frames. Total fusion reactions: {}",
                simulation.frame, simulation.fusion_count
            );
            println!(
                "Final active particles: {} (D {}, T {}, He {}, n {})",
                counts.total(),
                counts.deuterium,
                counts.tritium,
                counts.helium,
                counts.neutron
            );
        }
        Err(_) => eprintln!("[shutdown] simulation thread panicked"),
    }
}
