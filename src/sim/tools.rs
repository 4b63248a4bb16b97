//! Player tools and their cooldowns

use serde::{Deserialize, Serialize};

use super::email::EmailKind;

/// Tool palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Reveal full email detail, entity stays
    Scan,
    /// Destroy an email, correct for any threat
    Block,
    /// Divert spam/phishing into quarantine
    Quarantine,
    /// Timed damage immunity, no target needed
    Shield,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Scan, Tool::Block, Tool::Quarantine, Tool::Shield];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Scan => "scan",
            Tool::Block => "block",
            Tool::Quarantine => "quarantine",
            Tool::Shield => "shield",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scan" => Some(Tool::Scan),
            "block" => Some(Tool::Block),
            "quarantine" => Some(Tool::Quarantine),
            "shield" => Some(Tool::Shield),
            _ => None,
        }
    }

    /// Reuse delay after the tool resolves (ms)
    pub fn cooldown_ms(&self) -> u32 {
        match self {
            Tool::Scan => 2000,
            Tool::Block => 4000,
            Tool::Quarantine => 6000,
            Tool::Shield => 12000,
        }
    }

    pub fn needs_target(&self) -> bool {
        *self != Tool::Shield
    }

    /// Tooltip shown when the tool is picked up
    pub fn hint(&self) -> &'static str {
        match self {
            Tool::Scan => "SCAN - inspect an email in detail",
            Tool::Block => "BLOCK - click an email to block it",
            Tool::Quarantine => "QUARANTINE - click an email to isolate it",
            Tool::Shield => "SHIELD - click anywhere to activate protection",
        }
    }

    /// Combo growth on a correct use
    pub fn combo_step(&self) -> f64 {
        match self {
            Tool::Block => 0.3,
            _ => 0.5,
        }
    }

    /// Base points for using this tool on `kind`, `None` when the use is wrong
    pub fn reward(&self, kind: EmailKind) -> Option<u32> {
        match (self, kind) {
            (Tool::Block, EmailKind::Spam) => Some(15),
            (Tool::Block, EmailKind::Phishing) => Some(25),
            (Tool::Block, EmailKind::Malware) => Some(30),
            (Tool::Quarantine, EmailKind::Spam) => Some(20),
            (Tool::Quarantine, EmailKind::Phishing) => Some(35),
            _ => None,
        }
    }
}

/// Base points for a correct manual classification
pub fn analysis_points(kind: EmailKind) -> u32 {
    match kind {
        EmailKind::Safe => 10,
        EmailKind::Spam => 15,
        EmailKind::Phishing => 25,
        EmailKind::Malware => 30,
    }
}

/// Combo growth on a correct manual classification
pub const ANALYSIS_COMBO_STEP: f64 = 0.5;

/// Remaining cooldown per tool (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Cooldowns {
    pub scan: u32,
    pub block: u32,
    pub quarantine: u32,
    pub shield: u32,
}

impl Cooldowns {
    pub fn get(&self, tool: Tool) -> u32 {
        match tool {
            Tool::Scan => self.scan,
            Tool::Block => self.block,
            Tool::Quarantine => self.quarantine,
            Tool::Shield => self.shield,
        }
    }

    fn slot(&mut self, tool: Tool) -> &mut u32 {
        match tool {
            Tool::Scan => &mut self.scan,
            Tool::Block => &mut self.block,
            Tool::Quarantine => &mut self.quarantine,
            Tool::Shield => &mut self.shield,
        }
    }

    pub fn is_ready(&self, tool: Tool) -> bool {
        self.get(tool) == 0
    }

    /// Start the tool's cooldown
    pub fn trigger(&mut self, tool: Tool) {
        *self.slot(tool) = tool.cooldown_ms();
    }

    /// Count all cooldowns down by `ms`, stopping at zero
    pub fn tick(&mut self, ms: u32) {
        for tool in Tool::ALL {
            let slot = self.slot(tool);
            *slot = slot.saturating_sub(ms);
        }
    }
}
