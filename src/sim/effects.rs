//! Purely visual entities: particle bursts and floating score text.
//! Nothing here feeds back into gameplay.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

/// Life lost per tick
pub const LIFE_DECAY: f32 = 0.02;

/// A spark from a click/tool burst
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    /// px/s
    pub vel: Vec2,
    pub color: &'static str,
    /// 1.0 at birth, dead at <= 0
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, color: &'static str) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 100.0,
                (rng.random::<f32>() - 0.5) * 100.0,
            ),
            color,
            life: 1.0,
            size: rng.random::<f32>() * 4.0 + 2.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life -= LIFE_DECAY;
        self.vel *= 0.98;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// "+25" / "WRONG!" text drifting upward
#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: &'static str,
    pub life: f32,
    /// px/s, negative is up
    pub vy: f32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: &'static str) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            life: 1.0,
            vy: -30.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
        self.life -= LIFE_DECAY;
        self.vy *= 0.95;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Burst colours
pub mod colors {
    pub const INSPECT: &str = "#00ffff";
    pub const BLOCK: &str = "#ff6666";
    pub const QUARANTINE: &str = "#ffaa00";
    pub const SHIELD: &str = "#9966ff";
    pub const CORRECT: &str = "#00ff88";
    pub const WRONG: &str = "#ff3366";
}
