use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Sender;

use super::flash::FusionFlash;
use super::snapshot::{RenderParticle, Telemetry};
use crate::config::{CoulombSolver, SimConfig};

pub static PAUSED: Lazy<AtomicBool> = Lazy::new(|| AtomicBool::new(false));
pub static UPDATE_LOCK: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(false));
pub static PARTICLES: Lazy<Mutex<Vec<RenderParticle>>> = Lazy::new(|| Mutex::new(Vec::new()));
pub static FLASHES: Lazy<Mutex<Vec<FusionFlash>>> = Lazy::new(|| Mutex::new(Vec::new()));
pub static TELEMETRY: Lazy<Mutex<Telemetry>> = Lazy::new(|| Mutex::new(Telemetry::default()));

// Simulation commands
// Sent to the simulation thread by whatever front end drives it
#[derive(Clone, Debug)]
pub enum SimCommand {
    SetTimeScale(f32),
    SetTemperature(f32),
    SetParticleDensity(f32),
    SetVelocityScale(f32),
    SetFusionBoost(f32),
    SetMaxFusionFraction(f32),
    SetConfinementStrength(f32),
    SetCoreAttraction(f32),
    SetDriftOmega(f32),
    SetWallLossProbability(f32),
    SetCoulomb(bool),
    SetCoulombSolver(CoulombSolver),
    SetConfig(SimConfig),
    InjectFuel { deuterium: usize, tritium: usize },
    /// Kick the fuel toroidally and start stepping.
    StartInjection { kick: f32 },
    SetAutoFuel { enabled: bool, threshold: usize, batch_size: usize },
    Reseed { deuterium: usize, tritium: usize },
    Compact,
    DeleteAll,
    StepOnce,
    Shutdown,
}

pub static SIM_COMMAND_SENDER: Lazy<Mutex<Option<Sender<SimCommand>>>> = Lazy::new(|| Mutex::new(None));
