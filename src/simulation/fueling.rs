// simulation/fueling.rs
// Automatic refuelling when either fuel species runs low

use serde::{Deserialize, Serialize};

use crate::config;
use crate::species::Species;

use super::Simulation;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFuel {
    pub enabled: bool,
    /// Refuel when active D or active T drops below this count.
    pub threshold: usize,
    /// Particles of each species added per refuel.
    pub batch_size: usize,
    /// Minimum seconds between refuels.
    pub cooldown: f32,
    /// Seconds until the next refuel is allowed.
    #[serde(skip)]
    pub remaining: f32,
}

impl Default for AutoFuel {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: config::AUTO_FUEL_THRESHOLD,
            batch_size: config::AUTO_FUEL_BATCH,
            cooldown: config::AUTO_FUEL_COOLDOWN,
            remaining: 0.0,
        }
    }
}

impl AutoFuel {
    /// Count down the cooldown by `dt` and inject a batch if fuel is low.
    /// Returns the batch size when a refuel happened.
    pub fn update(&mut self, simulation: &mut Simulation, dt: f32) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        self.remaining -= dt;
        let counts = simulation.particles.counts();
        let deuterium = counts.get(Species::Deuterium);
        let tritium = counts.get(Species::Tritium);
        if (deuterium < self.threshold || tritium < self.threshold) && self.remaining <= 0.0 {
            simulation.inject_fuel(self.batch_size, self.batch_size);
            self.remaining = self.cooldown;
            println!(
                "[autofuel] +{} D + {} T (D was {}, T was {})",
                self.batch_size, self.batch_size, deuterium, tritium
            );
            return Some(self.batch_size);
        }
        None
    }
}
