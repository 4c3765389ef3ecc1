//! Torus geometry of the confinement vessel.
//!
//! The torus is centred on the origin with its symmetry axis along +Y; the
//! magnetic axis (tube centreline) is the circle of radius `major_radius` in the
//! XZ plane.

use std::f32::consts::PI;

use ultraviolet::Vec3;

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusGeometry {
    pub major_radius: f32,
    pub minor_radius: f32,
}

impl Default for TorusGeometry {
    fn default() -> Self {
        Self::new(config::TORUS_MAJOR_RADIUS, config::TORUS_MINOR_RADIUS)
    }
}

impl TorusGeometry {
    /// Radii are clamped into a proper torus (see `config::vessel_radii`).
    pub fn new(major_radius: f32, minor_radius: f32) -> Self {
        let (major_radius, minor_radius) = config::vessel_radii(major_radius, minor_radius);
        Self { major_radius, minor_radius }
    }

    /// Distance to the torus surface; positive outside, negative inside.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        let dxz = (p.x * p.x + p.z * p.z).sqrt() - self.major_radius;
        (dxz * dxz + p.y * p.y).sqrt() - self.minor_radius
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.signed_distance(p) <= 0.0
    }

    /// Outward unit normal, the SDF gradient by central differences.
    pub fn normal(&self, p: Vec3) -> Vec3 {
        let eps = config::SDF_NORMAL_EPSILON;
        let diff = |axis: Vec3| {
            self.signed_distance(p + axis * eps) - self.signed_distance(p - axis * eps)
        };
        let n = Vec3::new(diff(Vec3::unit_x()), diff(Vec3::unit_y()), diff(Vec3::unit_z()));
        n / (n.mag() + 1e-10)
    }

    /// Nearest point on the magnetic axis.
    pub fn project_to_centerline(&self, p: Vec3) -> Vec3 {
        let rxz = (p.x * p.x + p.z * p.z).sqrt();
        if rxz < 1e-8 {
            Vec3::new(self.major_radius, 0.0, 0.0)
        } else {
            Vec3::new(self.major_radius * p.x / rxz, 0.0, self.major_radius * p.z / rxz)
        }
    }

    /// Point on the magnetic axis at toroidal angle `phi`.
    pub fn point_on_axis(&self, phi: f32) -> Vec3 {
        Vec3::new(self.major_radius * phi.cos(), 0.0, self.major_radius * phi.sin())
    }

    /// Point at toroidal angle `phi`, poloidal angle `theta` and distance `rho`
    /// from the magnetic axis.
    pub fn point_in_tube(&self, phi: f32, theta: f32, rho: f32) -> Vec3 {
        let ring = self.major_radius + rho * theta.cos();
        Vec3::new(ring * phi.cos(), rho * theta.sin(), ring * phi.sin())
    }

    /// Plasma volume 2π²·R·a².
    pub fn volume(&self) -> f32 {
        (2.0 * PI * PI * self.major_radius * self.minor_radius * self.minor_radius)
            .max(config::MIN_TORUS_VOLUME)
    }
}
