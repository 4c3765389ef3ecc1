// frame/mod.rs
// Per-frame output for an external renderer: particle snapshot, fusion flashes and telemetry

pub mod flash;
pub mod snapshot;
pub mod state;

pub use flash::{FlashTracker, FusionFlash};
pub use snapshot::{FrameSnapshot, RenderParticle, Telemetry};
