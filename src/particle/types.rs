// particle/types.rs
// The Particle record and its species-driven constructor

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use ultraviolet::Vec3;

use crate::species::Species;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub mass: f32,
    pub charge: f32,
    pub radius: f32,
    pub id: u64,
    pub species: Species,
    /// Derived each step from mass and velocity; not authoritative.
    pub kinetic_energy: f32,
    pub active: bool,
}

impl Particle {
    /// Create an active particle; mass, charge and radius come from the species table.
    pub fn new(species: Species, pos: Vec3, vel: Vec3) -> Self {
        let props = species.props();
        let mut p = Self {
            pos,
            vel,
            mass: props.mass,
            charge: props.charge,
            radius: props.radius,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            species,
            kinetic_energy: 0.0,
            active: true,
        };
        p.update_kinetic_energy();
        p
    }

    pub fn update_kinetic_energy(&mut self) {
        self.kinetic_energy = 0.5 * self.mass * self.vel.mag_sq();
    }

    pub fn momentum(&self) -> Vec3 {
        self.vel * self.mass
    }

    pub fn is_charged(&self) -> bool {
        self.charge.abs() >= crate::config::NEUTRAL_CHARGE_EPSILON
    }

    /// True when every position and velocity component is finite.
    pub fn is_finite(&self) -> bool {
        let p = self.pos;
        let v = self.vel;
        p.x.is_finite()
            && p.y.is_finite()
            && p.z.is_finite()
            && v.x.is_finite()
            && v.y.is_finite()
            && v.z.is_finite()
    }

    pub fn color(&self) -> [f32; 4] {
        self.species.color()
    }
}
