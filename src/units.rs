//! Physical constants and unit conversions.
//!
//! The simulation mixes SI quantities (mass in kg, charge in C, temperature in K)
//! with scaled kinematics: positions are in device units (metres for the default
//! torus) and velocities are SI speeds multiplied by `SimConfig::velocity_scale`.
//! Forces computed from SI quantities are multiplied by `FORCE_SCALE` before they
//! are applied to scaled velocities.

/// Elementary charge in coulombs.
pub const ELEMENTARY_CHARGE: f32 = 1.602e-19;
/// Boltzmann constant in J/K.
pub const BOLTZMANN_CONSTANT: f32 = 1.381e-23;
/// Coulomb's constant in N⋅m²/C².
pub const COULOMB_CONSTANT: f32 = 8.988e9;
/// Vacuum permeability in H/m.
pub const VACUUM_PERMEABILITY: f32 = 4.0 * std::f32::consts::PI * 1e-7;

/// Particle masses in kilograms.
pub const ELECTRON_MASS: f32 = 9.109e-31;
pub const DEUTERIUM_MASS: f32 = 3.344e-27;
pub const TRITIUM_MASS: f32 = 5.008e-27;
pub const HELIUM_MASS: f32 = 6.646e-27;
pub const NEUTRON_MASS: f32 = 1.675e-27;

/// Megaelectronvolt in joules.
pub const MEV: f32 = 1.0e6 * ELEMENTARY_CHARGE;

/// Minimum centre-of-mass energy (J) for an unforced D-T reaction.
pub const FUSION_THRESHOLD_ENERGY: f32 = 1.0e-14;
/// Reference D-T cross-section (m²) at the threshold energy.
pub const FUSION_CROSS_SECTION: f32 = 1.0e-28;
/// Energy released by one D-T reaction.
pub const FUSION_ENERGY: f32 = 17.6 * MEV;

/// Scale applied to SI forces before integrating scaled velocities.
pub const FORCE_SCALE: f32 = 1e-6;

/// Convert a temperature in kelvin to keV.
pub fn kelvin_to_kev(temperature: f32) -> f32 {
    temperature * BOLTZMANN_CONSTANT / (1.0e3 * ELEMENTARY_CHARGE)
}
