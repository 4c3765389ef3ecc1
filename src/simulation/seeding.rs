// simulation/seeding.rs
// Thermal plasma sampling inside the torus: initial seeding, fuel injection and the start-up kick

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f32::consts::TAU;
use ultraviolet::Vec3;

use crate::config;
use crate::geometry::TorusGeometry;
use crate::particle::Particle;
use crate::species::Species;
use crate::units;

use super::Simulation;

/// RMS thermal speed sqrt(3kT/m) in m/s.
pub fn thermal_velocity(mass: f32, temperature: f32) -> f32 {
    (3.0 * units::BOLTZMANN_CONSTANT * temperature.max(0.0) / mass).sqrt()
}

/// Gaussian velocity with standard deviation `sigma` on each axis.
pub fn sample_velocity<R: Rng + ?Sized>(sigma: f32, rng: &mut R) -> Vec3 {
    let vx: f32 = StandardNormal.sample(rng);
    let vy: f32 = StandardNormal.sample(rng);
    let vz: f32 = StandardNormal.sample(rng);
    Vec3::new(vx, vy, vz) * sigma
}

/// Position uniform over the disk of radius `radius_fraction * a` around a
/// random point of the magnetic axis.
pub fn sample_tube_position<R: Rng + ?Sized>(
    geometry: &TorusGeometry,
    radius_fraction: f32,
    rng: &mut R,
) -> Vec3 {
    let phi = rng.random::<f32>() * TAU;
    let theta = rng.random::<f32>() * TAU;
    let rho = rng.random::<f32>().sqrt() * geometry.minor_radius * radius_fraction;
    geometry.point_in_tube(phi, theta, rho)
}

/// `count` thermal particles of one species.
pub fn sample_species<R: Rng + ?Sized>(
    species: Species,
    count: usize,
    geometry: &TorusGeometry,
    radius_fraction: f32,
    temperature: f32,
    velocity_scale: f32,
    rng: &mut R,
) -> Vec<Particle> {
    let sigma = thermal_velocity(species.mass(), temperature) * velocity_scale;
    (0..count)
        .map(|_| {
            let pos = sample_tube_position(geometry, radius_fraction, rng);
            let vel = sample_velocity(sigma, rng);
            Particle::new(species, pos, vel)
        })
        .collect()
}

impl Simulation {
    fn add_thermal(&mut self, species: Species, count: usize, radius_fraction: f32) {
        let batch = sample_species(
            species,
            count,
            &self.geometry,
            radius_fraction,
            self.config.temperature,
            self.config.velocity_scale,
            &mut self.rng,
        );
        self.particles.extend(batch);
    }

    /// Initial fill: deuterium first, then tritium, within 85% of the minor radius.
    pub fn seed_thermal_plasma(&mut self, deuterium: usize, tritium: usize) {
        self.add_thermal(Species::Deuterium, deuterium, config::SEED_RADIUS_FRACTION);
        self.add_thermal(Species::Tritium, tritium, config::SEED_RADIUS_FRACTION);
        println!(
            "[seed] {} D + {} T at {:.3e} K ({} slots)",
            deuterium,
            tritium,
            self.config.temperature,
            self.particles.len()
        );
    }

    /// Thermal particles of any species, placed like the initial fill.
    pub fn seed_species(&mut self, species: Species, count: usize) {
        self.add_thermal(species, count, config::SEED_RADIUS_FRACTION);
    }

    /// Refuel with fresh D and T confined to 70% of the minor radius.
    pub fn inject_fuel(&mut self, deuterium: usize, tritium: usize) {
        self.add_thermal(Species::Deuterium, deuterium, config::INJECTION_RADIUS_FRACTION);
        self.add_thermal(Species::Tritium, tritium, config::INJECTION_RADIUS_FRACTION);
    }

    /// Give every active fuel ion a toroidal push of `kick` plus a random
    /// vertical component of up to 30% of it. Returns the number of kicked particles.
    pub fn injection_kick(&mut self, kick: f32) -> usize {
        let mut kicked = 0;
        for p in self.particles.iter_mut() {
            if !p.active || !p.species.is_fuel() {
                continue;
            }
            let beta = self.rng.random::<f32>() * TAU;
            let r = (p.pos.x * p.pos.x + p.pos.z * p.pos.z).sqrt();
            if r > config::AXIS_EPSILON {
                p.vel.x += kick * (-p.pos.z / r);
                p.vel.z += kick * (p.pos.x / r);
            }
            p.vel.y += kick * config::INJECTION_VERTICAL_RATIO * beta.sin();
            p.update_kinetic_energy();
            kicked += 1;
        }
        kicked
    }
}
