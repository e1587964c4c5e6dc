//! Pixel Dash - a side-scrolling obstacle-dodging runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, streams, collisions, abilities)
//! - `clock`: Fixed-step tick driver
//! - `tuning`: Data-driven game balance
//! - `best_score`: Best-score record
//! - `persistence`: Versioned JSON saves with backup recovery
//! - `platform`: Browser/native platform abstraction

pub mod best_score;
pub mod clock;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Meter capacity; an ability can fire only at this value
    pub const MAX_ENERGY: u8 = 100;

    /// Wall-clock delay after death before a retry is honored (ms)
    pub const RETRY_COOLDOWN_MS: f64 = 2000.0;
}

/// Linear blend between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
