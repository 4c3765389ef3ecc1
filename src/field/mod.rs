//! Idealized tokamak magnetic field.
//!
//! The field is the sum of a toroidal component that falls off as 1/R from the
//! symmetry axis and a poloidal component that wraps around the tube and grows
//! linearly with the distance from the magnetic axis. All evaluation is pure.

use ultraviolet::Vec3;

use crate::config;
use crate::units;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticField {
    /// Toroidal field on the magnetic axis (T)
    pub b_toroidal: f32,
    /// Poloidal field at the plasma edge (T)
    pub b_poloidal: f32,
    pub major_radius: f32,
    pub minor_radius: f32,
    pub safety_factor: f32,
}

impl Default for MagneticField {
    fn default() -> Self {
        Self::new(
            config::TORUS_MAJOR_RADIUS,
            config::TORUS_MINOR_RADIUS,
            config::TOROIDAL_FIELD,
            config::SAFETY_FACTOR,
        )
    }
}

impl MagneticField {
    /// Inputs are clamped: radii as for the vessel, the field into
    /// `TOROIDAL_FIELD_RANGE` and q into `SAFETY_FACTOR_RANGE`.
    pub fn new(major_radius: f32, minor_radius: f32, b_toroidal: f32, safety_factor: f32) -> Self {
        let (major_radius, minor_radius) = config::vessel_radii(major_radius, minor_radius);
        let b_toroidal =
            config::clamp_or(b_toroidal, config::TOROIDAL_FIELD_RANGE, config::TOROIDAL_FIELD);
        let safety_factor =
            config::clamp_or(safety_factor, config::SAFETY_FACTOR_RANGE, config::SAFETY_FACTOR);
        let b_poloidal = b_toroidal * minor_radius / (major_radius * safety_factor);
        Self {
            b_toroidal,
            b_poloidal,
            major_radius,
            minor_radius,
            safety_factor,
        }
    }

    /// Unit vector around the symmetry axis, (−z, 0, x)/R.
    pub fn toroidal_direction(p: Vec3) -> Vec3 {
        let r = (p.x * p.x + p.z * p.z).sqrt();
        if r < config::AXIS_EPSILON {
            return Vec3::new(0.0, 0.0, 1.0);
        }
        Vec3::new(-p.z / r, 0.0, p.x / r)
    }

    pub fn toroidal_magnitude(&self, p: Vec3) -> f32 {
        let r_local = (p.x * p.x + p.z * p.z).sqrt().max(config::AXIS_EPSILON);
        self.b_toroidal * self.major_radius / r_local
    }

    pub fn poloidal_field(&self, p: Vec3) -> Vec3 {
        let rxz = (p.x * p.x + p.z * p.z).sqrt().max(config::AXIS_EPSILON);
        let center = Vec3::new(
            self.major_radius * p.x / rxz,
            0.0,
            self.major_radius * p.z / rxz,
        );
        let radial = p - center;
        let r_len = radial.mag().max(config::AXIS_EPSILON);
        let radial_dir = radial / r_len;

        let direction = Self::toroidal_direction(p).cross(radial_dir);
        let r_frac = (r_len / self.minor_radius).min(config::POLOIDAL_EDGE_CAP);
        direction * (self.b_poloidal * r_frac)
    }

    /// Total magnetic field at `p`.
    pub fn field_at(&self, p: Vec3) -> Vec3 {
        self.poloidal_field(p) + Self::toroidal_direction(p) * self.toroidal_magnitude(p)
    }

    pub fn magnitude_at(&self, p: Vec3) -> f32 {
        self.field_at(p).mag()
    }

    /// Magnetic-moment force −μ∇|B| with μ = m|v|²/(2|B|).
    pub fn mirror_force(&self, p: Vec3, v: Vec3, mass: f32) -> Vec3 {
        let h = config::MIRROR_PROBE_OFFSET;
        let axes = [Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()];
        let mut grad = [0.0f32; 3];
        for (g, axis) in grad.iter_mut().zip(axes) {
            let lo = self.magnitude_at(p - axis * h);
            let hi = self.magnitude_at(p + axis * h);
            *g = (hi - lo) / (2.0 * h);
        }
        let b0 = self.magnitude_at(p) + 1e-10;
        let mu = mass * v.mag_sq() / (2.0 * b0);
        Vec3::new(grad[0], grad[1], grad[2]) * -mu
    }

    /// B²/(2μ0) at `p`.
    pub fn magnetic_pressure(&self, p: Vec3) -> f32 {
        self.field_at(p).mag_sq() / (2.0 * units::VACUUM_PERMEABILITY)
    }

    /// Gyro-radius on the magnetic axis for a particle with speed `speed`.
    pub fn larmor_radius(&self, mass: f32, speed: f32, charge: f32) -> f32 {
        if charge.abs() < config::NEUTRAL_CHARGE_EPSILON {
            return 1e6;
        }
        let b = self.magnitude_at(Vec3::new(self.major_radius, 0.0, 0.0));
        mass * speed / (charge.abs() * b)
    }
}

/// q·(v×B)
pub fn lorentz_force(v: Vec3, b: Vec3, charge: f32) -> Vec3 {
    v.cross(b) * charge
}

#[cfg(test)]
mod tests;
