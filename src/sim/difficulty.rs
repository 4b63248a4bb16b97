//! Difficulty curve over the 120 s session
//!
//! A pure function of elapsed time. The random draws it parameterizes
//! (email kind, exact speed, exact lifetime) are made by the spawner.

use serde::Serialize;

use super::email::EmailKind;
use crate::consts::SESSION_LENGTH_SECS;

/// Difficulty tier (1-4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Phase {
    WarmUp = 1,
    RampUp = 2,
    Danger = 3,
    Inferno = 4,
}

impl Phase {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::WarmUp => "WARM-UP",
            Phase::RampUp => "RAMP-UP",
            Phase::Danger => "DANGER",
            Phase::Inferno => "INFERNO",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Phase::WarmUp => "#00ff88",
            Phase::RampUp => "#ffaa00",
            Phase::Danger => "#ff6666",
            Phase::Inferno => "#ff3366",
        }
    }

    /// Relative weights for [safe, spam, phishing, malware]
    pub fn type_weights(&self) -> [f32; 4] {
        match self {
            Phase::WarmUp => [0.70, 0.20, 0.08, 0.02],
            Phase::RampUp => [0.50, 0.30, 0.15, 0.05],
            Phase::Danger => [0.30, 0.25, 0.30, 0.15],
            Phase::Inferno => [0.15, 0.20, 0.35, 0.30],
        }
    }

    /// Leftward speed (base, variation) in px/s
    pub fn speed_range(&self) -> (f32, f32) {
        match self {
            Phase::WarmUp => (25.0, 15.0),
            Phase::RampUp => (30.0, 20.0),
            Phase::Danger => (40.0, 25.0),
            Phase::Inferno => (50.0, 30.0),
        }
    }

    /// Time-on-screen budget (base, variation) in ms
    pub fn lifetime_range(&self) -> (f32, f32) {
        match self {
            Phase::WarmUp | Phase::RampUp => (15000.0, 8000.0),
            Phase::Danger => (12000.0, 6000.0),
            Phase::Inferno => (10000.0, 4000.0),
        }
    }

    /// Bonus added to the combo factor on manual classification
    pub fn analysis_bonus(&self) -> f64 {
        self.number() as f64 * 0.2
    }
}

/// Everything the spawner and HUD need at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultySnapshot {
    pub phase: Phase,
    /// Milliseconds until the next spawn
    pub spawn_interval_ms: f32,
    pub speed: (f32, f32),
    pub lifetime_ms: (f32, f32),
    pub weights: [f32; 4],
}

impl DifficultySnapshot {
    /// Coarse HUD label for the spawn cadence
    pub fn spawn_rate_label(&self) -> &'static str {
        let rate = self.spawn_interval_ms;
        if rate > 3500.0 {
            "SLOW"
        } else if rate > 2500.0 {
            "NORMAL"
        } else if rate > 1800.0 {
            "FAST"
        } else {
            "EXTREME"
        }
    }

    /// Draw an email kind from this snapshot's weights given a uniform roll in [0, 1)
    pub fn pick_kind(&self, roll: f32) -> EmailKind {
        let items: Vec<(EmailKind, f32)> = EmailKind::ALL
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .collect();
        weighted_pick(&items, roll)
    }
}

/// Phase for a point in the session
pub fn phase_at(elapsed_secs: f32) -> Phase {
    let progress = elapsed_secs / SESSION_LENGTH_SECS as f32;
    if progress < 0.25 {
        Phase::WarmUp
    } else if progress < 0.5 {
        Phase::RampUp
    } else if progress < 0.75 {
        Phase::Danger
    } else {
        Phase::Inferno
    }
}

/// Piecewise-linear spawn interval (ms), decreasing within each phase
pub fn spawn_interval_ms(elapsed_secs: f32) -> f32 {
    let t = elapsed_secs;
    match phase_at(t) {
        Phase::WarmUp => 4500.0 - 50.0 * t,
        Phase::RampUp => 3500.0 - 30.0 * (t - 30.0),
        Phase::Danger => 2500.0 - 25.0 * (t - 60.0),
        Phase::Inferno => (2500.0 - 33.0 * (t - 90.0)).max(1500.0),
    }
}

/// Sample the full difficulty state at `elapsed_secs`
pub fn difficulty(elapsed_secs: f32) -> DifficultySnapshot {
    let phase = phase_at(elapsed_secs);
    DifficultySnapshot {
        phase,
        spawn_interval_ms: spawn_interval_ms(elapsed_secs),
        speed: phase.speed_range(),
        lifetime_ms: phase.lifetime_range(),
        weights: phase.type_weights(),
    }
}

/// Cumulative-sum weighted choice. `roll` is uniform in [0, 1) and is scaled
/// by the total weight, so weights need not sum to 1. Falls back to the last
/// item when rounding leaves the roll past the final bucket.
///
/// Panics if `items` is empty.
pub fn weighted_pick<T: Copy>(items: &[(T, f32)], roll: f32) -> T {
    let total: f32 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    let mut remaining = roll * total;
    for &(item, weight) in items {
        let weight = weight.max(0.0);
        if weight > 0.0 && remaining < weight {
            return item;
        }
        remaining -= weight;
    }
    items[items.len() - 1].0
}
