// simulation/simulation.rs
// The Simulation struct: owns the particle store, vessel and RNG and advances one step at a time

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::f32::consts::TAU;
use ultraviolet::Vec3;

use super::collision::{self, WallContact};
use super::forces;
use super::fusion::{self, FusionContext, FusionEvent, FusionRateInputs};
use crate::config::SimConfig;
use crate::field::MagneticField;
use crate::geometry::TorusGeometry;
use crate::particle::{Particle, ParticleStore};
use crate::profile_scope;
use crate::species::Species;

/// Summary of a single call to [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StepReport {
    pub frame: usize,
    /// Expected reaction count from the thermal rate estimate.
    pub expected_fusions: f32,
    /// Reactions drawn after stochastic rounding and capping.
    pub sampled_fusions: usize,
    /// Reactions that actually happened.
    pub fusions: usize,
    /// Draws that hit a reactant already consumed or lost earlier in the step.
    pub skipped_fusions: usize,
    /// Particles reset to the magnetic axis after diverging.
    pub recovered: usize,
    pub wall_losses: usize,
    /// Product particles merged into the store at the end of the step.
    pub created: usize,
}

/// The main simulation state.
pub struct Simulation {
    pub dt: f32,
    pub frame: usize,
    pub particles: ParticleStore,
    pub field: MagneticField,
    pub geometry: TorusGeometry,
    pub config: SimConfig,
    /// Reactions since construction or the last reset.
    pub fusion_count: u64,
    pub last_report: StepReport,
    pub(crate) rng: StdRng,
    pending: Vec<Particle>,
    events: Vec<FusionEvent>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Default vessel and parameters, seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic simulation: the same seed and the same calls replay exactly.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            dt: crate::config::DEFAULT_DT,
            frame: 0,
            particles: ParticleStore::new(),
            field: MagneticField::default(),
            geometry: TorusGeometry::default(),
            config: SimConfig::default(),
            fusion_count: 0,
            last_report: StepReport::default(),
            rng,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Replace the vessel. The field is rebuilt for the new radii; degenerate
    /// field parameters are clamped by [`MagneticField::new`].
    pub fn set_vessel(&mut self, geometry: TorusGeometry, b_toroidal: f32, safety_factor: f32) {
        self.field = MagneticField::new(
            geometry.major_radius,
            geometry.minor_radius,
            b_toroidal,
            safety_factor,
        );
        self.geometry = geometry;
    }

    /// Install new parameters; out-of-range values are clamped.
    pub fn set_config(&mut self, config: SimConfig) {
        self.config = config.sanitized();
    }

    /// Fusion events produced by the most recent step.
    pub fn events(&self) -> &[FusionEvent] {
        &self.events
    }

    /// Drop every particle and reset counters. Parameters and RNG state are kept.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.pending.clear();
        self.events.clear();
        self.frame = 0;
        self.fusion_count = 0;
        self.last_report = StepReport::default();
    }

    /// Remove inactive records once the store grows past the configured threshold.
    pub fn compact(&mut self) -> usize {
        let removed = self.particles.compact_if_above(self.config.compaction_threshold);
        if removed > 0 {
            println!(
                "[compact] removed {} inactive records, {} remain",
                removed,
                self.particles.len()
            );
        }
        removed
    }

    /// Advance by `dt` seconds of wall time (integration uses `dt * time_scale`).
    pub fn step(&mut self, dt: f32) -> StepReport {
        profile_scope!("simulation_step");
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.dt = dt;
        let scaled_dt = dt * self.config.time_scale;
        self.events.clear();
        let mut report = StepReport::default();

        // Fusion sees the fuel population as it stood before this step
        let deuterium = self.particles.active_indices(Species::Deuterium);
        let tritium = self.particles.active_indices(Species::Tritium);

        if self.config.enable_coulomb {
            forces::apply_coulomb_forces(&mut self.particles, &self.geometry, &self.config, scaled_dt);
        }

        self.integrate(scaled_dt);
        self.confine(scaled_dt, &mut report);
        self.sample_fusions(&deuterium, &tritium, dt, scaled_dt, &mut report);

        report.created = self.pending.len();
        self.particles.extend(self.pending.drain(..));

        if report.recovered > 0 {
            eprintln!(
                "[recover] frame {}: reset {} diverged particle(s) to the magnetic axis",
                self.frame, report.recovered
            );
        }

        self.fusion_count += report.fusions as u64;
        report.frame = self.frame;
        self.frame += 1;
        self.last_report = report;
        report
    }

    fn integrate(&mut self, scaled_dt: f32) {
        profile_scope!("integrate");
        let field = &self.field;
        let geometry = &self.geometry;
        let cfg = &self.config;
        self.particles.as_mut_slice().par_iter_mut().for_each(|p| {
            if !p.active {
                return;
            }
            forces::apply_field_forces(p, field, geometry, cfg, scaled_dt);
            p.pos += p.vel * scaled_dt;
        });
    }

    /// Divergence recovery and wall contact, in slot order so random draws replay.
    fn confine(&mut self, scaled_dt: f32, report: &mut StepReport) {
        profile_scope!("confine");
        for p in self.particles.iter_mut() {
            if !p.active {
                continue;
            }
            if reset_on_divergence(p, &self.geometry, &mut self.rng) {
                report.recovered += 1;
            }
            // Recorded before the wall response, so it reflects the free flight
            p.update_kinetic_energy();
            if collision::resolve_wall_contact(p, &self.geometry, &self.config, scaled_dt, &mut self.rng)
                == WallContact::Lost
            {
                report.wall_losses += 1;
            }
        }
    }

    fn sample_fusions(
        &mut self,
        deuterium: &[usize],
        tritium: &[usize],
        dt: f32,
        scaled_dt: f32,
        report: &mut StepReport,
    ) {
        profile_scope!("fusion_sampling");
        let budget = fusion::fusion_budget(&FusionRateInputs {
            deuterium: deuterium.len(),
            tritium: tritium.len(),
            volume: self.geometry.volume(),
            temperature: self.config.temperature,
            dt,
            fusion_boost: self.config.fusion_boost,
            max_fraction: self.config.max_fusion_fraction_per_step,
        });
        report.expected_fusions = budget.expected;
        if budget.max_pairs == 0 {
            return;
        }

        let sampled = fusion::stochastic_round(budget.expected, &mut self.rng).min(budget.cap);
        report.sampled_fusions = sampled;
        let ctx = FusionContext::from_config(&self.config, scaled_dt);

        for _ in 0..sampled {
            let d = deuterium[self.rng.random_range(0..deuterium.len())];
            let t = tritium[self.rng.random_range(0..tritium.len())];
            // Earlier draws this step may already have consumed one of them
            if !self.particles[d].active || !self.particles[t].active {
                report.skipped_fusions += 1;
                continue;
            }
            let (a, b) = fusion::pair_mut(self.particles.as_mut_slice(), d, t);
            if let Some(products) = fusion::attempt_fusion(a, b, &ctx, true, &mut self.rng) {
                self.events.push(products.event());
                self.pending.push(products.helium);
                self.pending.push(products.neutron);
                report.fusions += 1;
            }
        }
    }

    /// Attempt a reaction between two stored particles outside the step loop.
    ///
    /// Products are appended to the store immediately. Returns `None` when the
    /// indices are invalid or equal, either particle is inactive, or the gate fails.
    pub fn try_fuse(&mut self, i: usize, j: usize, forced: bool) -> Option<FusionEvent> {
        if i == j || i >= self.particles.len() || j >= self.particles.len() {
            return None;
        }
        if !self.particles[i].active || !self.particles[j].active {
            return None;
        }
        let ctx = FusionContext::from_config(&self.config, self.dt * self.config.time_scale);
        let (a, b) = fusion::pair_mut(self.particles.as_mut_slice(), i, j);
        let products = fusion::attempt_fusion(a, b, &ctx, forced, &mut self.rng)?;
        let event = products.event();
        self.particles.push(products.helium);
        self.particles.push(products.neutron);
        self.fusion_count += 1;
        Some(event)
    }
}

/// Reset a particle with any non-finite component onto a random point of the
/// magnetic axis with zero velocity. Returns true when a reset happened.
pub fn reset_on_divergence<R: Rng + ?Sized>(
    p: &mut Particle,
    geometry: &TorusGeometry,
    rng: &mut R,
) -> bool {
    if p.is_finite() {
        return false;
    }
    let phi = rng.random::<f32>() * TAU;
    p.pos = geometry.point_on_axis(phi);
    p.vel = Vec3::zero();
    true
}
