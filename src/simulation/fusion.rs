// simulation/fusion.rs
// D-T fusion: population-level rate estimate and single-pair reaction kinematics

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use ultraviolet::Vec3;

use crate::config::{self, SimConfig};
use crate::particle::Particle;
use crate::species::Species;
use crate::units;

/// Inputs to the per-step thermal rate estimate.
#[derive(Clone, Copy, Debug)]
pub struct FusionRateInputs {
    pub deuterium: usize,
    pub tritium: usize,
    pub volume: f32,
    pub temperature: f32,
    pub dt: f32,
    pub fusion_boost: f32,
    pub max_fraction: f32,
}

/// How many reactions a step may produce.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FusionBudget {
    /// min(N_D, N_T)
    pub max_pairs: usize,
    /// Expected reaction count, already clamped to `[0, cap]`.
    pub expected: f32,
    /// Hard per-step ceiling, `floor(max_pairs * max_fraction)`.
    pub cap: usize,
}

/// One reaction that happened during a step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusionEvent {
    pub position: Vec3,
    pub helium_id: u64,
    pub neutron_id: u64,
}

/// Products of a successful reaction, not yet in the store.
#[derive(Clone, Debug)]
pub struct FusionProducts {
    pub helium: Particle,
    pub neutron: Particle,
}

impl FusionProducts {
    pub fn event(&self) -> FusionEvent {
        FusionEvent {
            position: self.helium.pos,
            helium_id: self.helium.id,
            neutron_id: self.neutron.id,
        }
    }
}

/// Simplified D-T reactivity, proportional to the square root of the temperature in keV.
pub fn reactivity(temperature: f32) -> f32 {
    let t_kev = units::kelvin_to_kev(temperature).max(config::MIN_TEMPERATURE_KEV);
    config::REACTIVITY_COEFFICIENT * t_kev.sqrt()
}

pub fn fusion_budget(inputs: &FusionRateInputs) -> FusionBudget {
    let max_pairs = inputs.deuterium.min(inputs.tritium);
    if max_pairs == 0 {
        return FusionBudget::default();
    }
    let fraction = if inputs.max_fraction.is_nan() { 0.0 } else { inputs.max_fraction.clamp(0.0, 1.0) };
    let cap = ((max_pairs as f32 * fraction) as usize).min(max_pairs);

    let volume = inputs.volume.max(config::MIN_TORUS_VOLUME);
    let n_d = inputs.deuterium as f32 / volume;
    let n_t = inputs.tritium as f32 / volume;
    let raw = reactivity(inputs.temperature) * n_d * n_t * volume * inputs.dt * inputs.fusion_boost;
    let expected = if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, max_pairs as f32).min(max_pairs as f32 * fraction)
    };

    FusionBudget { max_pairs, expected, cap }
}

/// Integer part of `expected` plus one more with probability equal to the
/// fractional part. Always consumes exactly one uniform draw.
pub fn stochastic_round<R: Rng + ?Sized>(expected: f32, rng: &mut R) -> usize {
    let whole = expected.max(0.0).floor();
    let remainder = expected - whole;
    let bump = rng.random::<f32>() < remainder;
    whole as usize + usize::from(bump)
}

/// Gate parameters for a single reaction attempt.
#[derive(Clone, Copy, Debug)]
pub struct FusionContext {
    pub particle_density: f32,
    pub fusion_boost: f32,
    pub velocity_scale: f32,
    pub dt: f32,
}

impl FusionContext {
    pub fn from_config(cfg: &SimConfig, dt: f32) -> Self {
        Self {
            particle_density: cfg.particle_density,
            fusion_boost: cfg.fusion_boost,
            velocity_scale: cfg.velocity_scale,
            dt,
        }
    }
}

/// Kinetic energy of the pair in its centre-of-mass frame, ½μv².
///
/// The reduced mass is formed as `m_a / M * m_b`; the product `m_a * m_b` of two
/// ion masses is below the smallest f32.
pub fn center_of_mass_energy(a: &Particle, b: &Particle) -> f32 {
    let reduced_mass = a.mass / (a.mass + b.mass) * b.mass;
    0.5 * reduced_mass * (a.vel - b.vel).mag_sq()
}

/// Try to fuse `a` with `b`.
///
/// Unforced attempts must clear the centre-of-mass energy threshold, the
/// interaction distance and a probability draw; any failure leaves both
/// particles untouched. Forced attempts skip all three. On success both
/// reactants are deactivated and the products are returned at the centre of
/// mass.
pub fn attempt_fusion<R: Rng + ?Sized>(
    a: &mut Particle,
    b: &mut Particle,
    ctx: &FusionContext,
    forced: bool,
    rng: &mut R,
) -> Option<FusionProducts> {
    let total_mass = a.mass + b.mass;
    let v_rel = (a.vel - b.vel).mag();
    let e_cm = center_of_mass_energy(a, b);

    if !forced {
        if e_cm < units::FUSION_THRESHOLD_ENERGY {
            return None;
        }
        if (b.pos - a.pos).mag() > config::FUSION_INTERACTION_DISTANCE {
            return None;
        }
        let cross_section = units::FUSION_CROSS_SECTION * (e_cm / units::FUSION_THRESHOLD_ENERGY);
        let chance = (cross_section * ctx.particle_density * v_rel * ctx.dt * ctx.fusion_boost)
            .clamp(0.0, 1.0);
        if rng.random::<f32>() > chance {
            return None;
        }
    }

    let cm_pos = (a.pos * a.mass + b.pos * b.mass) / total_mass;
    let cm_vel = (a.vel * a.mass + b.vel * b.mass) / total_mass;

    let phi = rng.random::<f32>() * TAU;
    let cos_theta = rng.random_range(-1.0f32..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let dir = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);

    let (v_alpha, v_neutron) = product_speeds();
    let helium = Particle::new(
        Species::Helium4,
        cm_pos,
        cm_vel + dir * (v_alpha * ctx.velocity_scale),
    );
    let neutron = Particle::new(
        Species::Neutron,
        cm_pos,
        cm_vel - dir * (v_neutron * ctx.velocity_scale),
    );

    a.active = false;
    b.active = false;

    #[cfg(feature = "fusion_debug")]
    eprintln!(
        "[fusion] {} + {} -> He {} / n {} at {:?}, E_cm={:.3e} J",
        a.id, b.id, helium.id, neutron.id, cm_pos, e_cm
    );

    Some(FusionProducts { helium, neutron })
}

/// SI speeds of the alpha and the neutron in the centre-of-mass frame.
///
/// The 17.6 MeV release is split in inverse proportion to the product masses,
/// so the two momenta cancel exactly.
pub fn product_speeds() -> (f32, f32) {
    let m_alpha = units::HELIUM_MASS;
    let m_neutron = units::NEUTRON_MASS;
    let e_alpha = units::FUSION_ENERGY * m_neutron / (m_alpha + m_neutron);
    let e_neutron = units::FUSION_ENERGY - e_alpha;
    (
        (2.0 * e_alpha / m_alpha).sqrt(),
        (2.0 * e_neutron / m_neutron).sqrt(),
    )
}

/// Mutable references to two distinct slots.
pub(crate) fn pair_mut(particles: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    assert!(i != j, "a particle cannot react with itself");
    if i < j {
        let (left, right) = particles.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = particles.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
