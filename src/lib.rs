//! Cyber Guardian - email threat triage arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, difficulty, tools, scoring)
//! - `session`: Screen state machine and fixed-timestep driver around `sim`
//! - `persistence`: Key-value storage (LocalStorage on web, memory on native)
//! - `highscores` / `settings`: Player data persisted through `persistence`
//! - `web`: wasm-bindgen surface consumed by the browser UI

pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScore, HighScoreRecord};
pub use session::{DefeatCheck, Performance, Screen, Session, SessionConfig};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Session length in seconds
    pub const SESSION_LENGTH_SECS: u32 = 120;

    /// Fixed simulation rate (60 Hz, matches the 1000/60 ms update interval)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f32 = 1000.0 / TICKS_PER_SECOND as f32;
    /// Milliseconds charged against cooldowns, shield and email lifetimes per tick
    pub const TICK_BUDGET_MS: u32 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame fed to the accumulator (ms); longer stalls are dropped
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Default play-field size (canvas pixels)
    pub const DEFAULT_FIELD_WIDTH: f32 = 1280.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 720.0;

    /// Email card size used for hit-testing
    pub const EMAIL_WIDTH: f32 = 180.0;
    pub const EMAIL_HEIGHT: f32 = 120.0;
    /// Emails spawn this far beyond the right edge
    pub const SPAWN_OFFSET_X: f32 = 50.0;
    /// Top of the vertical spawn band (space for the HUD)
    pub const SPAWN_BAND_TOP: f32 = 120.0;
    /// Vertical space reserved for HUD + tool panel
    pub const SPAWN_BAND_RESERVED: f32 = 320.0;
    /// Maximum vertical drift speed (px/s, either direction)
    pub const SPAWN_DRIFT_Y: f32 = 4.0;
    /// Emails further left than this are off-screen
    pub const OFFSCREEN_X: f32 = -200.0;

    /// Quarantined emails drift toward the bottom-left corner
    pub const QUARANTINE_VELOCITY: (f32, f32) = (-100.0, 50.0);
    /// Extra lifetime granted after a successful quarantine (ms)
    pub const QUARANTINE_GRACE_MS: f32 = 3000.0;
    /// Quarantine zone: x below this...
    pub const QUARANTINE_ZONE_X: f32 = 50.0;
    /// ...and y within this distance of the bottom edge
    pub const QUARANTINE_ZONE_DEPTH: f32 = 200.0;

    /// Shield protection window (ms)
    pub const SHIELD_DURATION_MS: u32 = 8000;

    /// Combo bounds
    pub const COMBO_MIN: f64 = 1.0;
    pub const COMBO_MAX: f64 = 5.0;
    /// Health bounds
    pub const MAX_HEALTH: u8 = 100;

    /// Hard cap on live particles regardless of settings
    pub const MAX_PARTICLES: usize = 256;
}
