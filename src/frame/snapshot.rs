// frame/snapshot.rs
// Read-only projections of the simulation handed out once per frame

use serde::Serialize;
use ultraviolet::Vec3;

use super::flash::{FlashTracker, FusionFlash};
use crate::particle::{Particle, SpeciesCounts};
use crate::simulation::Simulation;
use crate::species::Species;

/// What a renderer needs to draw one particle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderParticle {
    pub position: Vec3,
    pub radius: f32,
    pub color: [f32; 4],
    pub species: Species,
}

impl From<&Particle> for RenderParticle {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.pos,
            radius: p.radius,
            color: p.color(),
            species: p.species,
        }
    }
}

/// Scalar statistics for dashboards and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Telemetry {
    pub frame: usize,
    pub active: usize,
    pub counts: SpeciesCounts,
    pub fusion_count: u64,
    pub active_flashes: usize,
    pub expected_fusions: f32,
    pub recovered: usize,
    pub stored: usize,
}

impl Telemetry {
    pub fn collect(simulation: &Simulation, flashes: &FlashTracker) -> Self {
        let counts = simulation.particles.counts();
        Self {
            frame: simulation.frame,
            active: counts.total(),
            counts,
            fusion_count: simulation.fusion_count,
            active_flashes: flashes.len(),
            expected_fusions: simulation.last_report.expected_fusions,
            recovered: simulation.last_report.recovered,
            stored: simulation.particles.len(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct FrameSnapshot {
    pub particles: Vec<RenderParticle>,
    pub flashes: Vec<FusionFlash>,
    pub telemetry: Telemetry,
}

impl FrameSnapshot {
    /// Active particles only; inactive records are never drawn.
    pub fn capture(simulation: &Simulation, flashes: &FlashTracker) -> Self {
        Self {
            particles: simulation.particles.active().map(RenderParticle::from).collect(),
            flashes: flashes.visible().to_vec(),
            telemetry: Telemetry::collect(simulation, flashes),
        }
    }
}
