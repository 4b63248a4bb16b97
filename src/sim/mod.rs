//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod actions;
pub mod difficulty;
pub mod effects;
pub mod email;
pub mod ledger;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tools;

pub use actions::{ClickOutcome, activate_shield, classify, clear_tool, close_detail, pointer_down, select_tool};
pub use difficulty::{DifficultySnapshot, Phase, difficulty, phase_at, spawn_interval_ms, weighted_pick};
pub use effects::{FloatingText, Particle};
pub use email::{Email, EmailDetail, EmailId, EmailKind, EmailView};
pub use ledger::{DamageOutcome, DamageSource, Ledger, Shield};
pub use spawner::{advance_spawner, spawn_email};
pub use state::{Clock, GameEvent, GameState, SessionEnd};
pub use tick::{DefeatCheck, tick};
pub use tools::{Cooldowns, Tool};
