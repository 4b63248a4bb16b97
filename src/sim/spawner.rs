//! Email spawner
//!
//! One self-rescheduling timer: every firing spawns an email and then
//! recomputes its own delay from the current difficulty. The longest interval
//! (4500 ms) is under 5 s, so the cadence never lags the curve by more than
//! one spawn.

use glam::Vec2;
use rand::Rng;

use super::difficulty::difficulty;
use super::email::{Email, EmailId};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Count the spawn timer down by `dt_ms`, firing as many times as it elapses.
/// Returns the number of emails spawned.
pub fn advance_spawner(state: &mut GameState, dt_ms: f32) -> u32 {
    if !state.clock.running {
        return 0;
    }
    let mut spawned = 0;
    state.clock.spawn_in_ms -= dt_ms;
    while state.clock.spawn_in_ms <= 0.0 {
        spawn_email(state);
        spawned += 1;
        // Carry the overshoot so the cadence does not drift
        let next = difficulty(state.elapsed_secs()).spawn_interval_ms;
        state.clock.spawn_in_ms += next;
    }
    spawned
}

/// Create one email from the current difficulty snapshot and add it to the pool
pub fn spawn_email(state: &mut GameState) -> EmailId {
    let snapshot = difficulty(state.elapsed_secs());

    let kind = snapshot.pick_kind(state.rng.random::<f32>());
    let id = state.next_entity_id();
    let mut email = Email::generate(id, kind, &mut state.rng);

    // Just past the right edge, inside the band between HUD and tool panel
    let band = (state.field.y - SPAWN_BAND_RESERVED).max(0.0);
    email.pos = Vec2::new(
        state.field.x + SPAWN_OFFSET_X,
        state.rng.random::<f32>() * band + SPAWN_BAND_TOP,
    );

    let (base_speed, speed_var) = snapshot.speed;
    email.vel = Vec2::new(
        -(base_speed + state.rng.random::<f32>() * speed_var),
        (state.rng.random::<f32>() - 0.5) * SPAWN_DRIFT_Y * 2.0,
    );

    let (base_life, life_var) = snapshot.lifetime_ms;
    email.max_time_on_screen = base_life + state.rng.random::<f32>() * life_var;

    log::debug!(
        "spawn #{} {} at t={}s (next in {:.0}ms)",
        id,
        kind.as_str(),
        state.ledger.elapsed_secs(),
        snapshot.spawn_interval_ms
    );

    state.emails.push(email);
    state.events.push(GameEvent::EmailSpawned { id, kind });

    if kind.is_threat() {
        state.events.push(GameEvent::AttackerPulse);
    }

    if snapshot.phase != state.last_phase {
        state.last_phase = snapshot.phase;
        log::info!("Phase {} - {}", snapshot.phase.number(), snapshot.phase.label());
        state.events.push(GameEvent::PhaseChanged { phase: snapshot.phase });
    }

    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Phase;
    use crate::sim::email::EmailKind;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT))
    }

    #[test]
    fn test_spawn_placement() {
        let mut state = new_state(11);
        for _ in 0..50 {
            spawn_email(&mut state);
        }
        for email in &state.emails {
            assert_eq!(email.pos.x, DEFAULT_FIELD_WIDTH + SPAWN_OFFSET_X);
            assert!(email.pos.y >= SPAWN_BAND_TOP);
            assert!(email.pos.y <= DEFAULT_FIELD_HEIGHT - SPAWN_BAND_RESERVED + SPAWN_BAND_TOP);
            assert!(email.vel.x <= -25.0 && email.vel.x >= -40.0);
            assert!(email.vel.y.abs() <= SPAWN_DRIFT_Y);
            assert!(email.max_time_on_screen >= 15000.0 && email.max_time_on_screen <= 23000.0);
        }
    }

    #[test]
    fn test_spawner_waits_one_interval() {
        let mut state = new_state(3);
        state.start_clock();
        assert_eq!(advance_spawner(&mut state, 4400.0), 0);
        assert_eq!(advance_spawner(&mut state, 100.0), 1);
        assert_eq!(state.emails.len(), 1);
        // Rescheduled from the current curve (t = 0 -> 4500 ms)
        assert_eq!(state.clock.spawn_in_ms, 4500.0);
    }

    #[test]
    fn test_spawner_rearms_from_current_difficulty() {
        let mut state = new_state(3);
        state.start_clock();
        // Jump deep into phase 4: the next delay must follow the new curve
        state.ledger.timer = 20; // elapsed 100 s
        advance_spawner(&mut state, 4500.0);
        assert!((state.clock.spawn_in_ms - 2170.0).abs() < 1e-3);
    }

    #[test]
    fn test_stopped_spawner_is_inert() {
        let mut state = new_state(3);
        state.start_clock();
        state.stop_clock();
        assert_eq!(advance_spawner(&mut state, 100_000.0), 0);
        assert!(state.emails.is_empty());
    }

    #[test]
    fn test_phase_change_fires_once() {
        let mut state = new_state(8);
        state.ledger.timer = 85; // elapsed 35 s, phase 2
        spawn_email(&mut state);
        spawn_email(&mut state);
        spawn_email(&mut state);

        let changes: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PhaseChanged { .. }))
            .collect();
        assert_eq!(changes, vec![GameEvent::PhaseChanged { phase: Phase::RampUp }]);
    }

    #[test]
    fn test_threats_pulse_attacker() {
        let mut state = new_state(21);
        state.ledger.timer = 10; // inferno: mostly threats
        for _ in 0..40 {
            spawn_email(&mut state);
        }
        let threats = state.emails.iter().filter(|e| e.kind != EmailKind::Safe).count();
        let pulses = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::AttackerPulse))
            .count();
        assert_eq!(threats, pulses);
    }
}
