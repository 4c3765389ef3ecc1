pub mod app;
pub mod cell_list;
pub mod config;
pub mod field;
pub mod frame;
pub mod geometry;
pub mod init_config;
pub mod particle;
pub mod profiler;
pub mod simulation;
pub mod species;
pub mod units;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
