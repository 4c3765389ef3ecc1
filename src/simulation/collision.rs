// simulation/collision.rs
// Wall handling against the torus signed distance field

use rand::Rng;
use ultraviolet::Vec3;

use crate::config::{self, SimConfig};
use crate::geometry::TorusGeometry;
use crate::particle::Particle;

/// What the wall did to a particle this step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallContact {
    /// Well inside the plasma, untouched.
    Clear,
    /// Inside the damping band just below the wall.
    Damped,
    /// Was outside and got pushed back in.
    Reflected,
    /// Was outside and got absorbed by the wall.
    Lost,
}

/// Confine `p` to the vessel.
///
/// A wall-loss draw is consumed only for particles outside the wall and only
/// when the loss probability is positive.
pub fn resolve_wall_contact<R: Rng + ?Sized>(
    p: &mut Particle,
    geometry: &TorusGeometry,
    cfg: &SimConfig,
    scaled_dt: f32,
    rng: &mut R,
) -> WallContact {
    let sdf = geometry.signed_distance(p.pos);

    if sdf > 0.0 {
        let n = geometry.normal(p.pos);
        p.vel -= n * (cfg.confinement_strength * sdf * scaled_dt);
        p.pos -= n * ((sdf + config::EDGE_BUFFER) * config::EDGE_PUSH_FACTOR);
        remove_outward_velocity(p, n);

        // Far excursions can overshoot through the opposite side of the tube
        if geometry.signed_distance(p.pos) > config::EDGE_BUFFER {
            pull_onto_inner_wall(p, geometry);
        }

        if cfg.wall_loss_probability > 0.0 && rng.random::<f32>() < cfg.wall_loss_probability {
            p.active = false;
            return WallContact::Lost;
        }
        WallContact::Reflected
    } else if sdf > -config::NEAR_WALL_BAND {
        let n = geometry.normal(p.pos);
        p.vel -= n * (cfg.confinement_strength * (sdf + config::NEAR_WALL_BAND) * scaled_dt);
        remove_outward_velocity(p, n);
        WallContact::Damped
    } else {
        WallContact::Clear
    }
}

fn remove_outward_velocity(p: &mut Particle, n: Vec3) {
    let vn = p.vel.dot(n);
    if vn > 0.0 {
        p.vel -= n * vn;
    }
}

fn pull_onto_inner_wall(p: &mut Particle, geometry: &TorusGeometry) {
    let center = geometry.project_to_centerline(p.pos);
    let offset = p.pos - center;
    let dist = offset.mag();
    let depth = geometry.minor_radius - config::EDGE_BUFFER * config::EDGE_PUSH_FACTOR;
    p.pos = if dist > config::AXIS_EPSILON {
        center + offset * (depth / dist)
    } else {
        center
    };
}
