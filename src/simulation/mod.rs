// simulation/mod.rs
// Re-exports and module declarations for simulation submodules

pub mod collision;
pub mod forces;
pub mod fueling;
pub mod fusion;
pub mod seeding;
pub mod simulation;

pub use fueling::AutoFuel;
pub use fusion::{FusionEvent, FusionProducts};
pub use simulation::*;

#[cfg(test)]
mod fusion_tests;
