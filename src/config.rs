// Centralized configuration for simulation parameters

use serde::{Deserialize, Serialize};

// ====================
// Device Geometry
// ====================
pub const TORUS_MAJOR_RADIUS: f32 = 1.2; // R, distance from the symmetry axis to the tube centre
pub const TORUS_MINOR_RADIUS: f32 = 0.4; // a, tube radius
pub const EDGE_BUFFER: f32 = 0.01; // Extra push-back past the wall on collision
pub const EDGE_PUSH_FACTOR: f32 = 1.05;
pub const NEAR_WALL_BAND: f32 = 0.02; // Soft damping band inside the wall
pub const SDF_NORMAL_EPSILON: f32 = 0.001;
pub const MAJOR_RADIUS_RANGE: (f32, f32) = (0.05, 100.0);
pub const MIN_MINOR_RADIUS: f32 = 0.01;
/// Upper bound on a / R; the tube must not reach the symmetry axis
pub const MAX_ASPECT_FRACTION: f32 = 0.95;

// ====================
// Magnetic Field
// ====================
pub const TOROIDAL_FIELD: f32 = 8.0; // Tesla on the magnetic axis
pub const SAFETY_FACTOR: f32 = 3.0;
pub const MIRROR_PROBE_OFFSET: f32 = 0.01; // Central-difference step for grad|B|
pub const POLOIDAL_EDGE_CAP: f32 = 2.0; // Poloidal field saturates at 2x the edge value
pub const AXIS_EPSILON: f32 = 1e-6;
pub const TOROIDAL_FIELD_RANGE: (f32, f32) = (0.0, 50.0);
pub const SAFETY_FACTOR_RANGE: (f32, f32) = (0.1, 100.0);

// ====================
// Integration
// ====================
pub const DEFAULT_DT: f32 = 1.0 / 60.0;
/// Largest frame delta the driver will hand to a single step
pub const MAX_FRAME_DT: f32 = 0.033;
pub const CORE_ATTRACTION_SOFTENING: f32 = 0.01;
pub const CORE_ATTRACTION_MIN_DISTANCE: f32 = 1e-8;
/// Charges smaller than this are treated as neutral
pub const NEUTRAL_CHARGE_EPSILON: f32 = 1e-30;

// ====================
// Coulomb Interaction
// ====================
pub const COULOMB_MIN_SEPARATION: f32 = 1e-6;
/// Debye length prefactor: lambda_D = 743 * sqrt(T / n)
pub const DEBYE_PREFACTOR: f32 = 7.43e2;
/// Cell-list cutoff in Debye lengths; exp(-10) leaves < 5e-5 of the force
pub const COULOMB_CUTOFF_DEBYE_LENGTHS: f32 = 10.0;
/// Cap on cells per axis so tiny Debye lengths do not explode the grid
pub const CELL_LIST_MAX_CELLS_PER_AXIS: usize = 64;

// ====================
// Fusion
// ====================
pub const FUSION_INTERACTION_DISTANCE: f32 = 0.03;
pub const REACTIVITY_COEFFICIENT: f32 = 1e-6;
/// Keeps sqrt(T) defined; small enough that a cold plasma's expected count is negligible
pub const MIN_TEMPERATURE_KEV: f32 = 1e-30;
pub const MIN_TORUS_VOLUME: f32 = 1e-8;

// ====================
// Seeding / Fueling
// ====================
/// Fraction of the minor radius used for the initial thermal plasma
pub const SEED_RADIUS_FRACTION: f32 = 0.85;
/// Fraction of the minor radius used for fuel injection (keeps fresh fuel off the wall)
pub const INJECTION_RADIUS_FRACTION: f32 = 0.7;
pub const DEFAULT_DEUTERIUM: usize = 4200;
pub const DEFAULT_TRITIUM: usize = 4200;
pub const DEFAULT_INJECTION_KICK: f32 = 0.25;
pub const INJECTION_VERTICAL_RATIO: f32 = 0.3;
pub const AUTO_FUEL_THRESHOLD: usize = 5000;
pub const AUTO_FUEL_BATCH: usize = 1000;
pub const AUTO_FUEL_COOLDOWN: f32 = 0.6; // seconds

// ====================
// Store / Frame Output
// ====================
/// Store length above which inactive records are compacted away
pub const COMPACTION_THRESHOLD: usize = 15_000;
pub const FLASH_DURATION: f32 = 2.5; // seconds
pub const MAX_FLASHES: usize = 64;
pub const FLASH_COLOR: [f32; 3] = [1.0, 0.95, 0.4];
pub const FLASH_INTENSITY: f32 = 2.0;
/// Frames between telemetry lines printed by the headless driver
pub const TELEMETRY_INTERVAL: usize = 60;

// ====================
// Threading
// ====================
pub const MIN_THREADS: usize = 3;
pub const THREADS_LEAVE_FREE: usize = 2;

// ====================
// Tunable Defaults
// ====================
pub const DEFAULT_TIME_SCALE: f32 = 1e-2;
pub const DEFAULT_TEMPERATURE: f32 = 1.0e9; // Kelvin
pub const DEFAULT_PARTICLE_DENSITY: f32 = 1e20; // m^-3
pub const DEFAULT_VELOCITY_SCALE: f32 = 1e-7;
pub const DEFAULT_FUSION_BOOST: f32 = 1.0e6;
pub const DEFAULT_MAX_FUSION_FRACTION: f32 = 0.02;
pub const DEFAULT_CONFINEMENT_STRENGTH: f32 = 50.0;
pub const DEFAULT_CORE_ATTRACTION: f32 = 8.0;
pub const DEFAULT_DRIFT_OMEGA: f32 = 2.5;
pub const DEFAULT_WALL_LOSS_PROBABILITY: f32 = 0.0;

// Slider ranges of the control panel; runtime values are clamped into them.
pub const TIME_SCALE_RANGE: (f32, f32) = (1e-4, 1.0);
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 5e9);
pub const FUSION_BOOST_RANGE: (f32, f32) = (0.0, 1e9);
pub const CONFINEMENT_RANGE: (f32, f32) = (0.0, 500.0);
pub const CORE_ATTRACTION_RANGE: (f32, f32) = (0.0, 50.0);
pub const DRIFT_OMEGA_RANGE: (f32, f32) = (0.0, 20.0);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoulombSolver {
    /// Every unordered pair of active particles, no cutoff.
    Pairwise,
    /// Neighbours found through a 3-D cell list; pairs farther apart than
    /// `cutoff_debye_lengths` Debye lengths are skipped.
    CellList { cutoff_debye_lengths: f32 },
}

impl Default for CoulombSolver {
    fn default() -> Self {
        CoulombSolver::Pairwise
    }
}

/// Runtime-tunable physics parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Integration speed multiplier: scaled_dt = dt * time_scale
    pub time_scale: f32,
    /// Plasma temperature in kelvin
    pub temperature: f32,
    /// Reference number density (m^-3) used for screening and unforced fusion
    pub particle_density: f32,
    /// Converts SI speeds into simulation velocity units
    pub velocity_scale: f32,
    /// Multiplies fusion rates and probabilities
    pub fusion_boost: f32,
    /// Largest fraction of the limiting species that may fuse in one step
    pub max_fusion_fraction_per_step: f32,
    /// Wall push-back gain
    pub confinement_strength: f32,
    /// Pull toward the magnetic axis
    pub core_attraction_strength: f32,
    /// Toroidal drift angular rate
    pub drift_omega: f32,
    /// Chance that a particle hitting the wall is lost
    pub wall_loss_probability: f32,
    pub enable_coulomb: bool,
    pub coulomb_solver: CoulombSolver,
    /// Store length above which inactive records are compacted
    pub compaction_threshold: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            temperature: DEFAULT_TEMPERATURE,
            particle_density: DEFAULT_PARTICLE_DENSITY,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            fusion_boost: DEFAULT_FUSION_BOOST,
            max_fusion_fraction_per_step: DEFAULT_MAX_FUSION_FRACTION,
            confinement_strength: DEFAULT_CONFINEMENT_STRENGTH,
            core_attraction_strength: DEFAULT_CORE_ATTRACTION,
            drift_omega: DEFAULT_DRIFT_OMEGA,
            wall_loss_probability: DEFAULT_WALL_LOSS_PROBABILITY,
            enable_coulomb: false,
            coulomb_solver: CoulombSolver::Pairwise,
            compaction_threshold: COMPACTION_THRESHOLD,
        }
    }
}

/// Clamp `value` into `[lo, hi]`, replacing NaN with `fallback`.
pub(crate) fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    }
}

/// Force vessel radii into a usable torus: both positive, the tube clear of the axis.
pub fn vessel_radii(major_radius: f32, minor_radius: f32) -> (f32, f32) {
    let major = clamp_or(major_radius, MAJOR_RADIUS_RANGE, TORUS_MAJOR_RADIUS);
    let minor = clamp_or(
        minor_radius,
        (MIN_MINOR_RADIUS, major * MAX_ASPECT_FRACTION),
        TORUS_MINOR_RADIUS.min(major * MAX_ASPECT_FRACTION),
    );
    (major, minor)
}

impl SimConfig {
    /// Return a copy with every parameter forced into its valid range.
    ///
    /// Out-of-range values are never rejected; they are clamped so the engine
    /// always works with bounded inputs. NaN falls back to the default.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let solver = match self.coulomb_solver {
            CoulombSolver::CellList { cutoff_debye_lengths } => CoulombSolver::CellList {
                cutoff_debye_lengths: clamp_or(
                    cutoff_debye_lengths,
                    (1.0, 100.0),
                    COULOMB_CUTOFF_DEBYE_LENGTHS,
                ),
            },
            CoulombSolver::Pairwise => CoulombSolver::Pairwise,
        };
        Self {
            time_scale: clamp_or(self.time_scale, TIME_SCALE_RANGE, d.time_scale),
            temperature: clamp_or(self.temperature, TEMPERATURE_RANGE, d.temperature),
            particle_density: clamp_or(self.particle_density, (1.0, f32::MAX), d.particle_density),
            velocity_scale: clamp_or(self.velocity_scale, (0.0, 1.0), d.velocity_scale),
            fusion_boost: clamp_or(self.fusion_boost, FUSION_BOOST_RANGE, d.fusion_boost),
            max_fusion_fraction_per_step: clamp_or(
                self.max_fusion_fraction_per_step,
                (0.0, 1.0),
                d.max_fusion_fraction_per_step,
            ),
            confinement_strength: clamp_or(
                self.confinement_strength,
                CONFINEMENT_RANGE,
                d.confinement_strength,
            ),
            core_attraction_strength: clamp_or(
                self.core_attraction_strength,
                CORE_ATTRACTION_RANGE,
                d.core_attraction_strength,
            ),
            drift_omega: clamp_or(self.drift_omega, DRIFT_OMEGA_RANGE, d.drift_omega),
            wall_loss_probability: clamp_or(
                self.wall_loss_probability,
                (0.0, 1.0),
                d.wall_loss_probability,
            ),
            enable_coulomb: self.enable_coulomb,
            coulomb_solver: solver,
            compaction_threshold: self.compaction_threshold.max(1),
        }
    }

    /// Debye screening length derived from temperature and density.
    pub fn debye_length(&self) -> f32 {
        DEBYE_PREFACTOR * (self.temperature / self.particle_density).max(0.0).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let cfg = SimConfig {
            time_scale: 50.0,
            temperature: -10.0,
            fusion_boost: f32::NAN,
            max_fusion_fraction_per_step: 3.0,
            wall_loss_probability: -0.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(cfg.time_scale, TIME_SCALE_RANGE.1);
        assert_eq!(cfg.temperature, 0.0);
        assert_eq!(cfg.fusion_boost, DEFAULT_FUSION_BOOST);
        assert_eq!(cfg.max_fusion_fraction_per_step, 1.0);
        assert_eq!(cfg.wall_loss_probability, 0.0);
    }

    #[test]
    fn defaults_survive_sanitizing() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.sanitized(), cfg);
    }

    #[test]
    fn vessel_radii_keep_a_proper_torus() {
        assert_eq!(vessel_radii(1.2, 0.4), (1.2, 0.4));
        assert_eq!(vessel_radii(-1.2, 0.4), (MAJOR_RADIUS_RANGE.0, MAJOR_RADIUS_RANGE.0 * MAX_ASPECT_FRACTION));
        assert_eq!(vessel_radii(1.0, 2.0), (1.0, MAX_ASPECT_FRACTION));
        assert_eq!(vessel_radii(f32::NAN, 0.0), (TORUS_MAJOR_RADIUS, MIN_MINOR_RADIUS));
        assert_eq!(vessel_radii(f32::INFINITY, f32::NAN).1, TORUS_MINOR_RADIUS);
    }

    #[test]
    fn debye_length_matches_reference_plasma() {
        let cfg = SimConfig::default();
        // 743 * sqrt(1e9 / 1e20)
        let expected = 743.0 * (1e-11f32).sqrt();
        assert!((cfg.debye_length() - expected).abs() / expected < 1e-4);
    }
}
