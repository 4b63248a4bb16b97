//! Game state and core simulation types
//!
//! Everything one play session mutates lives in `GameState`. A fresh value is
//! built for every start/restart, so nothing from a previous run survives.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::difficulty::{Phase, difficulty, phase_at};
use super::effects::{FloatingText, Particle};
use super::email::{Email, EmailDetail, EmailId, EmailKind};
use super::ledger::{DamageSource, Ledger};
use super::tick::DefeatCheck;
use super::tools::{Cooldowns, Tool};
use crate::consts::*;

/// Advisory and feedback events for the UI, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged { phase: Phase },
    /// Cosmetic: a threat was just sent
    AttackerPulse,
    EmailSpawned { id: EmailId, kind: EmailKind },
    /// `hint` is the usage prompt for the armed tool
    ToolSelected { tool: Tool, hint: &'static str },
    ToolCoolingDown { tool: Tool },
    /// A targeted tool was used on empty space
    NeedsTarget { tool: Tool },
    EmailInspected { id: EmailId, scanned: bool },
    Blocked { id: EmailId, correct: bool, points: u64 },
    Quarantined { id: EmailId, correct: bool, points: u64 },
    Classified { id: EmailId, correct: bool, points: u64 },
    ShieldActivated { duration_ms: u32 },
    DamageTaken { source: DamageSource, amount: u8 },
    DamageAbsorbed { source: DamageSource },
    ComboMilestone { combo: f64 },
    SessionEnded { victory: bool },
    NewHighScore { score: u64 },
}

/// How a session finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionEnd {
    Victory,
    Defeat,
}

impl SessionEnd {
    pub fn is_victory(&self) -> bool {
        *self == SessionEnd::Victory
    }
}

/// The three timer sources of a session: the fixed tick, the 1 Hz countdown,
/// and the self-rescheduling spawn timer. All are disarmed together.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Clock {
    pub running: bool,
    /// Fixed ticks since start
    pub ticks: u64,
    /// Ticks since the last 1 Hz countdown step
    pub second_ticks: u32,
    /// Time until the spawner fires next (ms)
    pub spawn_in_ms: f32,
}

impl Clock {
    pub fn start(&mut self, first_spawn_ms: f32) {
        *self = Self {
            running: true,
            ticks: 0,
            second_ticks: 0,
            spawn_in_ms: first_spawn_ms,
        };
    }

    /// Idempotent
    pub fn stop(&mut self) {
        self.running = false;
        self.second_ticks = 0;
        self.spawn_in_ms = 0.0;
    }
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub ledger: Ledger,
    pub cooldowns: Cooldowns,
    pub selected_tool: Option<Tool>,
    /// Weak handle: may name an email that has since been removed
    pub selected_email: Option<EmailId>,
    /// Live emails in spawn order
    pub emails: Vec<Email>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub events: Vec<GameEvent>,
    pub clock: Clock,
    /// Phase seen by the spawner at its last firing
    pub last_phase: Phase,
    /// Play-field size in canvas pixels
    pub field: Vec2,
    pub max_particles: usize,
    pub show_tips: bool,
    pub defeat_check: DefeatCheck,
    next_id: EmailId,
}

impl GameState {
    pub fn new(seed: u64, field: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ledger: Ledger::default(),
            cooldowns: Cooldowns::default(),
            selected_tool: None,
            selected_email: None,
            emails: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            events: Vec::new(),
            clock: Clock::default(),
            last_phase: Phase::WarmUp,
            field,
            max_particles: MAX_PARTICLES,
            show_tips: true,
            defeat_check: DefeatCheck::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EmailId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Arm all timers. The first spawn waits one full interval.
    pub fn start_clock(&mut self) {
        let first = difficulty(self.elapsed_secs()).spawn_interval_ms;
        self.clock.start(first);
    }

    pub fn stop_clock(&mut self) {
        self.clock.stop();
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.ledger.elapsed_secs() as f32
    }

    pub fn phase(&self) -> Phase {
        phase_at(self.elapsed_secs())
    }

    pub fn email(&self, id: EmailId) -> Option<&Email> {
        self.emails.iter().find(|e| e.id == id)
    }

    pub fn email_mut(&mut self, id: EmailId) -> Option<&mut Email> {
        self.emails.iter_mut().find(|e| e.id == id)
    }

    /// First live, non-quarantined email under `point`
    pub fn email_at(&self, point: Vec2) -> Option<EmailId> {
        self.emails
            .iter()
            .find(|e| !e.quarantined && e.contains(point))
            .map(|e| e.id)
    }

    /// Remove an email; no-op if it is already gone
    pub fn remove_email(&mut self, id: EmailId) -> Option<Email> {
        let idx = self.emails.iter().position(|e| e.id == id)?;
        if self.selected_email == Some(id) {
            self.selected_email = None;
        }
        Some(self.emails.remove(idx))
    }

    /// Detail for the analysis panel, if the selection is still alive
    pub fn selected_detail(&self) -> Option<EmailDetail> {
        let id = self.selected_email?;
        self.email(id).map(|e| e.detail(self.show_tips))
    }

    /// Apply damage through the ledger and report it
    pub fn damage(&mut self, source: DamageSource) {
        use super::ledger::DamageOutcome;
        match self.ledger.apply_damage(source) {
            DamageOutcome::Absorbed => self.events.push(GameEvent::DamageAbsorbed { source }),
            DamageOutcome::Taken(amount) => {
                log::debug!("{} (-{} health)", source.message(), amount);
                self.events.push(GameEvent::DamageTaken { source, amount });
            }
        }
    }

    pub fn add_particles(&mut self, pos: Vec2, color: &'static str, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let particle = Particle::spawn(&mut self.rng, pos, color);
            self.particles.push(particle);
        }
    }

    pub fn add_text(&mut self, pos: Vec2, text: impl Into<String>, color: &'static str) {
        self.texts.push(FloatingText::new(pos, text, color));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec2 {
        Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42, field());
        assert_eq!(state.ledger.health, 100);
        assert_eq!(state.ledger.timer, 120);
        assert_eq!(state.ledger.combo, 1.0);
        assert!(state.emails.is_empty());
        assert!(!state.clock.running);
        assert_eq!(state.phase(), Phase::WarmUp);
    }

    #[test]
    fn test_ids_increase() {
        let mut state = GameState::new(1, field());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut state = GameState::new(1, field());
        let id = state.next_entity_id();
        let email = Email::generate(id, EmailKind::Spam, &mut state.rng);
        state.emails.push(email);
        state.selected_email = Some(id);
        assert!(state.selected_detail().is_some());

        assert!(state.remove_email(id).is_some());
        assert_eq!(state.selected_email, None);
        assert!(state.remove_email(id).is_none());
        assert!(state.selected_detail().is_none());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(1, field());
        state.max_particles = 12;
        state.add_particles(Vec2::ZERO, "#fff", 10);
        state.add_particles(Vec2::ZERO, "#fff", 10);
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_clock_start_stop() {
        let mut state = GameState::new(1, field());
        state.start_clock();
        assert!(state.clock.running);
        assert_eq!(state.clock.spawn_in_ms, 4500.0);
        state.stop_clock();
        state.stop_clock();
        assert!(!state.clock.running);
    }
}
