//! Score, combo and health bookkeeping

use serde::Serialize;

use super::email::EmailKind;
use crate::consts::*;

/// What caused a hit to health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSource {
    /// An ignored threat of this kind expired
    Threat(EmailKind),
    WrongAnalysis,
    WrongBlock,
    WrongQuarantine,
}

impl DamageSource {
    pub fn amount(&self) -> u8 {
        match self {
            DamageSource::Threat(EmailKind::Phishing) => 20,
            DamageSource::Threat(EmailKind::Malware) => 25,
            DamageSource::Threat(_) => 10,
            DamageSource::WrongAnalysis => 15,
            DamageSource::WrongBlock => 12,
            DamageSource::WrongQuarantine => 8,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DamageSource::Threat(EmailKind::Phishing) => "Phished!",
            DamageSource::Threat(EmailKind::Malware) => "Malware infection!",
            DamageSource::Threat(_) => "System under attack!",
            DamageSource::WrongAnalysis => "Wrong analysis!",
            DamageSource::WrongBlock => "Blocked a safe email!",
            DamageSource::WrongQuarantine => "Wrong quarantine!",
        }
    }
}

/// Result of `Ledger::apply_damage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield soaked it up; nothing changed
    Absorbed,
    /// Health lost (actual amount removed after clamping)
    Taken(u8),
}

/// Active shield window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Shield {
    pub active: bool,
    pub remaining_ms: u32,
}

impl Shield {
    pub fn activate(&mut self, duration_ms: u32) {
        self.active = true;
        self.remaining_ms = duration_ms;
    }

    /// Count down one tick; deactivates on reaching zero
    pub fn tick(&mut self, ms: u32) {
        if self.active {
            self.remaining_ms = self.remaining_ms.saturating_sub(ms);
            if self.remaining_ms == 0 {
                self.active = false;
            }
        }
    }
}

/// Mutable counters for one session
#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    pub score: u64,
    pub health: u8,
    /// Seconds remaining
    pub timer: u32,
    pub combo: f64,
    pub max_combo: f64,
    pub emails_analyzed: u32,
    pub correct_analyses: u32,
    pub shield: Shield,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            score: 0,
            health: MAX_HEALTH,
            timer: SESSION_LENGTH_SECS,
            combo: COMBO_MIN,
            max_combo: COMBO_MIN,
            emails_analyzed: 0,
            correct_analyses: 0,
            shield: Shield::default(),
        }
    }
}

impl Ledger {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seconds since the session started
    pub fn elapsed_secs(&self) -> u32 {
        SESSION_LENGTH_SECS.saturating_sub(self.timer)
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Subtract health for `source` unless shielded. Any damage taken resets the combo.
    pub fn apply_damage(&mut self, source: DamageSource) -> DamageOutcome {
        if self.shield.active {
            return DamageOutcome::Absorbed;
        }
        let before = self.health;
        self.health = self.health.saturating_sub(source.amount());
        self.reset_combo();
        DamageOutcome::Taken(before - self.health)
    }

    /// Add `floor(points * combo)` to the score, then grow the combo by `combo_step`.
    /// Returns the points awarded.
    pub fn apply_reward(&mut self, points: u32, combo_step: f64) -> u64 {
        let awarded = (points as f64 * self.combo).floor() as u64;
        self.score += awarded;
        self.bump_combo(combo_step);
        awarded
    }

    /// Manual classification: the combo grows first, then the (phase-boosted)
    /// factor multiplies the base points.
    pub fn apply_analysis_reward(&mut self, points: u32, combo_step: f64, phase_bonus: f64) -> u64 {
        self.bump_combo(combo_step);
        let awarded = (points as f64 * (self.combo + phase_bonus)).floor() as u64;
        self.score += awarded;
        awarded
    }

    pub fn reset_combo(&mut self) {
        self.combo = COMBO_MIN;
    }

    fn bump_combo(&mut self, step: f64) {
        self.combo = (self.combo + step).clamp(COMBO_MIN, COMBO_MAX);
        self.max_combo = self.max_combo.max(self.combo);
    }

    /// Record a manual classification for accuracy stats
    pub fn record_analysis(&mut self, correct: bool) {
        self.emails_analyzed += 1;
        if correct {
            self.correct_analyses += 1;
        }
    }

    /// correct / analyzed, or 0 when nothing was analyzed
    pub fn accuracy(&self) -> f32 {
        if self.emails_analyzed == 0 {
            0.0
        } else {
            self.correct_analyses as f32 / self.emails_analyzed as f32
        }
    }
}
