// particle/mod.rs
// Re-exports for the particle module

mod store;
mod types;

pub use store::*;
pub use types::*;

#[cfg(test)]
mod tests;
