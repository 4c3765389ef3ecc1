// simulation/forces.rs
// Field push (Lorentz + mirror, core attraction, toroidal drift) and the optional
// Debye-screened Coulomb pass

use rayon::prelude::*;
use ultraviolet::Vec3;

use crate::cell_list::CellList;
use crate::config::{self, CoulombSolver, SimConfig};
use crate::field::{lorentz_force, MagneticField};
use crate::geometry::TorusGeometry;
use crate::particle::{Particle, ParticleStore};
use crate::profile_scope;
use crate::units;

/// Velocity update from the magnetic field and the two artificial confinement aids.
///
/// Neutral particles are left untouched: they feel neither the field nor the
/// core attraction and drift terms.
pub fn apply_field_forces(
    p: &mut Particle,
    field: &MagneticField,
    geometry: &TorusGeometry,
    cfg: &SimConfig,
    scaled_dt: f32,
) {
    if !p.is_charged() {
        return;
    }

    let b = field.field_at(p.pos);
    let force = (lorentz_force(p.vel, b, p.charge) + field.mirror_force(p.pos, p.vel, p.mass))
        * units::FORCE_SCALE;
    p.vel += force / p.mass * scaled_dt;

    // Core attraction toward the magnetic axis
    let offset = p.pos - geometry.project_to_centerline(p.pos);
    let dist = offset.mag();
    if dist > config::CORE_ATTRACTION_MIN_DISTANCE {
        let pull = cfg.core_attraction_strength / (dist + config::CORE_ATTRACTION_SOFTENING);
        p.vel -= offset * (pull * scaled_dt);
    }

    // Net toroidal precession
    let r = (p.pos.x * p.pos.x + p.pos.z * p.pos.z).sqrt();
    if r > config::AXIS_EPSILON {
        p.vel += MagneticField::toroidal_direction(p.pos) * (cfg.drift_omega * scaled_dt);
    }
}

/// Screened Coulomb force on `target` exerted by `source`.
///
/// The expression is antisymmetric to the bit: swapping the arguments negates
/// the separation vector and leaves the charge product unchanged.
pub fn screened_coulomb(target: &Particle, source: &Particle, debye_length: f32) -> Vec3 {
    let d = target.pos - source.pos;
    let r = d.mag().max(config::COULOMB_MIN_SEPARATION);
    let magnitude = units::COULOMB_CONSTANT * (target.charge * source.charge) / (r * r);
    let screening = (-r / debye_length).exp();
    d * (magnitude * screening / r)
}

/// Apply the pairwise electrostatic term to every active particle.
///
/// Forces are evaluated from the positions at the start of the pass and then
/// applied together, so the result does not depend on iteration order.
pub fn apply_coulomb_forces(
    particles: &mut ParticleStore,
    geometry: &TorusGeometry,
    cfg: &SimConfig,
    scaled_dt: f32,
) {
    profile_scope!("forces_coulomb");
    let debye = cfg.debye_length().max(config::COULOMB_MIN_SEPARATION);
    let forces = match cfg.coulomb_solver {
        CoulombSolver::Pairwise => pairwise_forces(particles.as_slice(), debye),
        CoulombSolver::CellList { cutoff_debye_lengths } => {
            cell_list_forces(particles.as_slice(), geometry, debye, cutoff_debye_lengths * debye)
        }
    };
    for (p, force) in particles.iter_mut().zip(forces) {
        if p.active {
            p.vel += force * (units::FORCE_SCALE / p.mass * scaled_dt);
        }
    }
}

/// Net force on each particle from every other active charged particle.
pub fn pairwise_forces(particles: &[Particle], debye: f32) -> Vec<Vec3> {
    (0..particles.len())
        .into_par_iter()
        .map(|i| {
            let target = &particles[i];
            if !target.active || !target.is_charged() {
                return Vec3::zero();
            }
            let mut total = Vec3::zero();
            for (j, source) in particles.iter().enumerate() {
                if j != i && source.active && source.is_charged() {
                    total += screened_coulomb(target, source, debye);
                }
            }
            total
        })
        .collect()
}

/// Same as [`pairwise_forces`] but only over neighbours closer than `cutoff`.
pub fn cell_list_forces(
    particles: &[Particle],
    geometry: &TorusGeometry,
    debye: f32,
    cutoff: f32,
) -> Vec<Vec3> {
    let reach = geometry.major_radius + geometry.minor_radius;
    let mut cells = CellList::new(
        Vec3::new(-reach, -geometry.minor_radius, -reach),
        Vec3::new(reach, geometry.minor_radius, reach),
        cutoff,
        config::CELL_LIST_MAX_CELLS_PER_AXIS,
    );
    cells.rebuild(particles);

    (0..particles.len())
        .into_par_iter()
        .map(|i| {
            let target = &particles[i];
            if !target.active || !target.is_charged() {
                return Vec3::zero();
            }
            let mut total = Vec3::zero();
            for j in cells.find_neighbors_within(particles, i, cutoff) {
                let source = &particles[j];
                if source.is_charged() {
                    total += screened_coulomb(target, source, debye);
                }
            }
            total
        })
        .collect()
}
