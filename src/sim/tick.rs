//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! 60 Hz frame; the 1 Hz countdown and the spawner are driven from here so
//! all three timer sources start, pause and stop together.

use super::ledger::DamageSource;
use super::spawner::advance_spawner;
use super::state::{GameState, SessionEnd};
use crate::consts::*;

/// When a depleted health bar ends the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum DefeatCheck {
    /// Only on the 1 Hz countdown step (up to ~1 s of latency)
    #[default]
    OnTimerTick,
    /// As soon as health reaches zero
    Immediate,
}

/// Advance the game state by one fixed timestep.
/// Returns how the session ended, if it did on this tick.
pub fn tick(state: &mut GameState) -> Option<SessionEnd> {
    // Stopped clocks never fire
    if !state.clock.running {
        return None;
    }

    state.clock.ticks += 1;
    let dt = SIM_DT_MS / 1000.0;

    state.cooldowns.tick(TICK_BUDGET_MS);
    state.ledger.shield.tick(TICK_BUDGET_MS);

    update_emails(state, dt);
    update_effects(state, dt);

    if state.defeat_check == DefeatCheck::Immediate && state.ledger.is_dead() {
        return Some(SessionEnd::Defeat);
    }

    state.clock.second_ticks += 1;
    if state.clock.second_ticks >= TICKS_PER_SECOND {
        state.clock.second_ticks = 0;
        if let Some(end) = countdown(state) {
            return Some(end);
        }
    }

    advance_spawner(state, SIM_DT_MS);
    None
}

/// The 1 Hz step: decrement the timer, then check for defeat before victory
fn countdown(state: &mut GameState) -> Option<SessionEnd> {
    state.ledger.timer = state.ledger.timer.saturating_sub(1);
    if state.ledger.is_dead() {
        Some(SessionEnd::Defeat)
    } else if state.ledger.timer == 0 {
        Some(SessionEnd::Victory)
    } else {
        None
    }
}

fn update_emails(state: &mut GameState, dt: f32) {
    let field_height = state.field.y;
    let mut ignored_threats = Vec::new();

    state.emails.retain_mut(|email| {
        email.advance(dt, TICK_BUDGET_MS as f32);

        if email.in_quarantine_zone(field_height) {
            return false;
        }
        if email.is_expired() {
            if !email.analyzed && !email.quarantined && email.kind.is_threat() {
                ignored_threats.push(email.kind);
            }
            return false;
        }
        true
    });

    for kind in ignored_threats {
        state.damage(DamageSource::Threat(kind));
    }

    // Drop a dangling selection
    if let Some(id) = state.selected_email {
        if state.email(id).is_none() {
            state.selected_email = None;
        }
    }
}

fn update_effects(state: &mut GameState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.update(dt);
    }
    state.particles.retain(|p| !p.is_dead());

    for text in state.texts.iter_mut() {
        text.update(dt);
    }
    state.texts.retain(|t| !t.is_dead());
}
