use serde::{Deserialize, Serialize};

use crate::units;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Species {
    Deuterium,
    Tritium,
    Helium4,
    Neutron,
    Electron,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesProps {
    /// kg
    pub mass: f32,
    /// C
    pub charge: f32,
    /// Render radius in device units
    pub radius: f32,
    /// RGBA display hint
    pub color: [f32; 4],
}

/// Constant per-species table, indexed by `Species as usize`.
pub const SPECIES_TABLE: [SpeciesProps; 5] = [
    // Deuterium
    SpeciesProps {
        mass: units::DEUTERIUM_MASS,
        charge: units::ELEMENTARY_CHARGE,
        radius: 0.02,
        color: [0.3, 0.6, 1.0, 0.9],
    },
    // Tritium
    SpeciesProps {
        mass: units::TRITIUM_MASS,
        charge: units::ELEMENTARY_CHARGE,
        radius: 0.02,
        color: [0.6, 0.3, 1.0, 0.9],
    },
    // Helium4
    SpeciesProps {
        mass: units::HELIUM_MASS,
        charge: 2.0 * units::ELEMENTARY_CHARGE,
        radius: 0.025,
        color: [1.0, 1.0, 0.3, 1.0],
    },
    // Neutron
    SpeciesProps {
        mass: units::NEUTRON_MASS,
        charge: 0.0,
        radius: 0.015,
        color: [0.8, 0.8, 0.8, 0.7],
    },
    // Electron
    SpeciesProps {
        mass: units::ELECTRON_MASS,
        charge: -units::ELEMENTARY_CHARGE,
        radius: 0.008,
        color: [1.0, 0.2, 0.2, 0.6],
    },
];

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Deuterium,
        Species::Tritium,
        Species::Helium4,
        Species::Neutron,
        Species::Electron,
    ];

    pub fn props(&self) -> &'static SpeciesProps {
        &SPECIES_TABLE[*self as usize]
    }

    pub fn mass(&self) -> f32 {
        self.props().mass
    }

    pub fn charge(&self) -> f32 {
        self.props().charge
    }

    pub fn radius(&self) -> f32 {
        self.props().radius
    }

    pub fn color(&self) -> [f32; 4] {
        self.props().color
    }

    /// True for the two fuel species.
    pub fn is_fuel(&self) -> bool {
        matches!(self, Species::Deuterium | Species::Tritium)
    }

    pub fn from_name(name: &str) -> Result<Species, String> {
        match name {
            "Deuterium" | "D" => Ok(Species::Deuterium),
            "Tritium" | "T" => Ok(Species::Tritium),
            "Helium4" | "Helium" | "He4" => Ok(Species::Helium4),
            "Neutron" | "n" => Ok(Species::Neutron),
            "Electron" | "e" => Ok(Species::Electron),
            _ => Err(format!("Unknown species: {}", name)),
        }
    }
}
