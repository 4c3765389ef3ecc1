// frame/flash.rs
// Short-lived fusion flashes handed to the renderer; aged here, never fed back into physics

use serde::Serialize;
use ultraviolet::Vec3;

use crate::config;
use crate::simulation::FusionEvent;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FusionFlash {
    pub position: Vec3,
    /// 0 when spawned, expired at 1.
    pub age: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl FusionFlash {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            age: 0.0,
            color: config::FLASH_COLOR,
            intensity: config::FLASH_INTENSITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FlashTracker {
    flashes: Vec<FusionFlash>,
    /// Seconds a flash stays visible.
    pub duration: f32,
}

impl Default for FlashTracker {
    fn default() -> Self {
        Self::new(config::FLASH_DURATION)
    }
}

impl FlashTracker {
    pub fn new(duration: f32) -> Self {
        Self { flashes: Vec::new(), duration: duration.max(f32::EPSILON) }
    }

    /// One flash per fusion event.
    pub fn spawn(&mut self, events: &[FusionEvent]) {
        self.flashes.extend(events.iter().map(|e| FusionFlash::at(e.position)));
    }

    /// Age every flash by `dt` seconds and drop the expired ones.
    pub fn advance(&mut self, dt: f32) {
        let step = dt.max(0.0) / self.duration;
        for flash in &mut self.flashes {
            flash.age += step;
        }
        self.flashes.retain(|f| f.age < 1.0);
    }

    /// Number of live flashes, including those beyond the render cap.
    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }

    /// The oldest live flashes, at most `MAX_FLASHES` of them.
    pub fn visible(&self) -> &[FusionFlash] {
        &self.flashes[..self.flashes.len().min(config::MAX_FLASHES)]
    }

    pub fn clear(&mut self) {
        self.flashes.clear();
    }
}
