// init_config.rs
// Handles loading and parsing the run scenario from tokamak.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{self, SimConfig};
use crate::geometry::TorusGeometry;
use crate::simulation::{AutoFuel, Simulation};
use crate::species::Species;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InitConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub plasma: PlasmaConfig,
    /// Runtime physics parameters; anything omitted keeps its default.
    #[serde(default)]
    pub physics: SimConfig,
    #[serde(default)]
    pub fueling: AutoFuel,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Fixed RNG seed. A fresh OS seed is used when omitted.
    pub seed: Option<u64>,
    /// Frame time in seconds; clamped to the frame cap at runtime.
    pub dt: Option<f32>,
    /// Number of frames to run before exiting.
    pub steps: Option<usize>,
    pub major_radius: Option<f32>,
    pub minor_radius: Option<f32>,
    pub toroidal_field: Option<f32>,
    pub safety_factor: Option<f32>,
}

impl SimulationConfig {
    pub fn geometry(&self) -> TorusGeometry {
        TorusGeometry::new(
            self.major_radius.unwrap_or(config::TORUS_MAJOR_RADIUS),
            self.minor_radius.unwrap_or(config::TORUS_MINOR_RADIUS),
        )
    }

    pub fn frame_dt(&self) -> f32 {
        self.dt.unwrap_or(config::DEFAULT_DT)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PlasmaConfig {
    pub deuterium: usize,
    pub tritium: usize,
    /// Toroidal kick applied when the burn starts.
    pub injection_kick: Option<f32>,
    /// With `auto_start = false` the plasma waits for a StartInjection command.
    pub auto_start: bool,
    pub extra: Vec<ExtraSpeciesConfig>,
}

impl PlasmaConfig {
    /// Kick to queue at startup, if the burn should start on its own.
    pub fn start_kick(&self) -> Option<f32> {
        self.injection_kick.filter(|_| self.auto_start)
    }
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            deuterium: config::DEFAULT_DEUTERIUM,
            tritium: config::DEFAULT_TRITIUM,
            injection_kick: Some(config::DEFAULT_INJECTION_KICK),
            auto_start: true,
            extra: Vec::new(),
        }
    }
}

/// Additional thermal particles of any species, e.g. electrons or helium ash.
#[derive(Debug, Deserialize, Serialize)]
pub struct ExtraSpeciesConfig {
    pub species: String,
    pub count: usize,
}

impl ExtraSpeciesConfig {
    pub fn to_species(&self) -> Result<Species, String> {
        Species::from_name(&self.species)
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: InitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file("tokamak.toml")
    }

    /// Build a simulation with the configured vessel, parameters and initial plasma.
    pub fn build_simulation(&self) -> Result<Simulation, String> {
        let sim_cfg = &self.simulation;
        let mut simulation = match sim_cfg.seed {
            Some(seed) => Simulation::with_seed(seed),
            None => Simulation::new(),
        };
        simulation.set_vessel(
            sim_cfg.geometry(),
            sim_cfg.toroidal_field.unwrap_or(config::TOROIDAL_FIELD),
            sim_cfg.safety_factor.unwrap_or(config::SAFETY_FACTOR),
        );
        simulation.set_config(self.physics.clone());
        simulation.seed_thermal_plasma(self.plasma.deuterium, self.plasma.tritium);
        for extra in &self.plasma.extra {
            simulation.seed_species(extra.to_species()?, extra.count);
        }
        Ok(simulation)
    }
}
