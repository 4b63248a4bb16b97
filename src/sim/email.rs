//! Email entities and their generated content
//!
//! Every email is exactly one `EmailKind` for its whole life. Content
//! (subject, sender, body) is drawn from fixed per-kind template pools.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable entity handle. Ids are never reused within a session.
pub type EmailId = u32;

/// Ground-truth category of an email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailKind {
    Safe,
    Spam,
    Phishing,
    Malware,
}

impl EmailKind {
    /// All kinds in weight-vector order
    pub const ALL: [EmailKind; 4] = [
        EmailKind::Safe,
        EmailKind::Spam,
        EmailKind::Phishing,
        EmailKind::Malware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailKind::Safe => "safe",
            EmailKind::Spam => "spam",
            EmailKind::Phishing => "phishing",
            EmailKind::Malware => "malware",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "safe" => Some(EmailKind::Safe),
            "spam" => Some(EmailKind::Spam),
            "phishing" => Some(EmailKind::Phishing),
            "malware" => Some(EmailKind::Malware),
            _ => None,
        }
    }

    /// Anything other than `Safe` hurts the player if ignored
    pub fn is_threat(&self) -> bool {
        *self != EmailKind::Safe
    }

    /// Card border colour
    pub fn color(&self) -> &'static str {
        match self {
            EmailKind::Safe => "#00ff88",
            EmailKind::Spam => "#ffaa00",
            EmailKind::Phishing => "#ff3366",
            EmailKind::Malware => "#333333",
        }
    }

    /// Fill ratio of the threat bar on the card
    pub fn threat_level(&self) -> f32 {
        match self {
            EmailKind::Safe => 0.2,
            EmailKind::Spam => 0.4,
            EmailKind::Phishing => 0.7,
            EmailKind::Malware => 0.9,
        }
    }

    fn subjects(&self) -> &'static [&'static str] {
        match self {
            EmailKind::Safe => &[
                "Weekly team meeting reminder",
                "Project update from your manager",
                "Company newsletter - March edition",
                "Notes from yesterday's meeting",
                "Invoice from Office Supplies Co.",
            ],
            EmailKind::Spam => &[
                "CONGRATULATIONS! You have won $1,000,000!!!",
                "Lose 20kg in 5 days - GUARANTEED!",
                "Crypto investment opportunity - 500% returns!",
                "Meet singles near you NOW!",
                "Free iPhone 15 - Limited offer!",
            ],
            EmailKind::Phishing => &[
                "URGENT: Your account will be locked",
                "Security alert - New device sign-in",
                "Payment failed - Update your card now",
                "Tax refund - Claim instantly",
                "Microsoft: Unusual activity detected",
            ],
            EmailKind::Malware => &[
                "Invoice_March_2024.exe",
                "Document requires macros - Enable to view",
                "System update available - Download now",
                "Photos from last night.scr",
                "Emergency patch for your computer",
            ],
        }
    }

    fn senders(&self) -> &'static [&'static str] {
        match self {
            EmailKind::Safe => &[
                "manager@company.com",
                "hr@company.com",
                "accounting@company.com",
                "support@company.com",
            ],
            EmailKind::Spam => &[
                "noreply@marketing123.com",
                "deals@cheapstuff.net",
                "winner@luckydraw.org",
            ],
            // Look-alike domains: bancl, paypaI (capital i), microsofft
            EmailKind::Phishing => &[
                "security@bancl.com",
                "support@paypaI.com",
                "noreply@microsofft.com",
            ],
            EmailKind::Malware => &[
                "system@update-center.net",
                "admin@securityfix.org",
                "noreply@windowsupdate.fake",
            ],
        }
    }

    fn bodies(&self) -> &'static [&'static str] {
        match self {
            EmailKind::Safe => &[
                "Hi team, just a reminder about the weekly meeting tomorrow at 2pm in the conference room.",
                "Please see the attached project update. Let me know if you have any questions.",
                "This month's newsletter contains important company updates and announcements.",
            ],
            EmailKind::Spam => &[
                "You have been selected as our lucky winner! Click here to claim your prize now!",
                "The amazing weight-loss secret doctors don't want you to know! Order today!",
                "Invest in crypto today and become a millionaire tomorrow! Spots are limited!",
            ],
            EmailKind::Phishing => &[
                "We detected suspicious activity on your account. Please verify your identity immediately using the link below.",
                "Your account will be suspended in 24 hours. Update your payment details to avoid service interruption.",
                "Security breach detected. Enter your password here to protect your account.",
            ],
            EmailKind::Malware => &[
                "Your system needs an urgent security update. Download and run the attached file immediately.",
                "Open the attached document to view your invoice. Enable macros when prompted.",
                "Critical vulnerability detected. Install this patch to protect your computer.",
            ],
        }
    }

    /// Red flags (or green flags) shown in the analysis panel
    pub fn indicators(&self) -> &'static [&'static str] {
        match self {
            EmailKind::Safe => &["Verified sender", "Company domain", "Normal business hours"],
            EmailKind::Spam => &["Promotional content", "Too good to be true", "Urgent language"],
            EmailKind::Phishing => &[
                "Suspicious domain",
                "Creates urgency",
                "Requests login credentials",
            ],
            EmailKind::Malware => &[
                "Suspicious attachment",
                "Executable file",
                "Fake system update",
            ],
        }
    }

    /// Educational tips shown alongside the detail view
    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            EmailKind::Safe => &[
                "Sender domain is verified",
                "Normal business language",
                "No urgent requests",
            ],
            EmailKind::Spam => &[
                "Offer is too good to be true",
                "Unsolicited promotional content",
                "Suspicious sender domain",
            ],
            EmailKind::Phishing => &[
                "Creates false urgency",
                "Asks for sensitive information",
                "Look-alike domain (misspelling)",
            ],
            EmailKind::Malware => &[
                "Suspicious attachment",
                "Asks you to enable macros",
                "Fake system update",
            ],
        }
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &'static [&'static str]) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

/// An email card moving across the play-field
#[derive(Debug, Clone)]
pub struct Email {
    pub id: EmailId,
    pub kind: EmailKind,
    pub subject: &'static str,
    pub sender: &'static str,
    pub body: &'static str,
    /// Top-left corner of the card
    pub pos: Vec2,
    /// Velocity in px/s
    pub vel: Vec2,
    pub size: Vec2,
    /// Accumulated lifetime (ms)
    pub time_on_screen: f32,
    /// Threat budget before forced expiry (ms)
    pub max_time_on_screen: f32,
    pub analyzed: bool,
    pub correctly_analyzed: bool,
    pub quarantined: bool,
}

impl Email {
    /// Generate an email of the given kind with random content.
    /// Position, velocity and lifetime are assigned by the spawner.
    pub fn generate<R: Rng + ?Sized>(id: EmailId, kind: EmailKind, rng: &mut R) -> Self {
        Self {
            id,
            kind,
            subject: pick(rng, kind.subjects()),
            sender: pick(rng, kind.senders()),
            body: pick(rng, kind.bodies()),
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: Vec2::new(EMAIL_WIDTH, EMAIL_HEIGHT),
            time_on_screen: 0.0,
            max_time_on_screen: 15000.0,
            analyzed: false,
            correctly_analyzed: false,
            quarantined: false,
        }
    }

    /// Axis-aligned hit test, edges inclusive
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x <= self.pos.x + self.size.x
            && point.y >= self.pos.y
            && point.y <= self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Advance one tick: move by `vel * dt` and charge `budget_ms` of lifetime
    pub fn advance(&mut self, dt: f32, budget_ms: f32) {
        self.pos += self.vel * dt;
        self.time_on_screen += budget_ms;
    }

    /// Lifetime fraction used (for the countdown bar)
    pub fn lifetime_progress(&self) -> f32 {
        if self.max_time_on_screen <= 0.0 {
            return 1.0;
        }
        (self.time_on_screen / self.max_time_on_screen).min(1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.pos.x < OFFSCREEN_X || self.time_on_screen > self.max_time_on_screen
    }

    /// Reached the bottom-left quarantine zone
    pub fn in_quarantine_zone(&self, field_height: f32) -> bool {
        self.quarantined
            && self.pos.x < QUARANTINE_ZONE_X
            && self.pos.y > field_height - QUARANTINE_ZONE_DEPTH
    }

    /// Redirect toward the quarantine corner with a short residual lifetime
    pub fn quarantine(&mut self) {
        self.quarantined = true;
        self.vel = Vec2::new(QUARANTINE_VELOCITY.0, QUARANTINE_VELOCITY.1);
        self.max_time_on_screen = self.time_on_screen + QUARANTINE_GRACE_MS;
    }

    /// What the canvas needs to draw this card
    pub fn view(&self) -> EmailView {
        EmailView {
            id: self.id,
            kind: self.kind,
            subject: self.subject,
            sender: self.sender,
            x: self.pos.x,
            y: self.pos.y,
            width: self.size.x,
            height: self.size.y,
            color: self.kind.color(),
            threat_level: self.kind.threat_level(),
            lifetime_progress: self.lifetime_progress(),
            quarantined: self.quarantined,
        }
    }

    /// Full detail for the analysis panel
    pub fn detail(&self, with_tips: bool) -> EmailDetail {
        EmailDetail {
            id: self.id,
            subject: self.subject.to_string(),
            sender: self.sender.to_string(),
            body: self.body.to_string(),
            indicators: self.kind.indicators().iter().map(|s| s.to_string()).collect(),
            tips: if with_tips {
                self.kind.tips().iter().map(|s| s.to_string()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// Render snapshot of one card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailView {
    pub id: EmailId,
    pub kind: EmailKind,
    pub subject: &'static str,
    pub sender: &'static str,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Card accent colour
    pub color: &'static str,
    /// Threat bar fill (0.0 - 1.0)
    pub threat_level: f32,
    /// Countdown bar fill (0.0 - 1.0)
    pub lifetime_progress: f32,
    pub quarantined: bool,
}

/// What the analysis panel shows for the selected email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDetail {
    pub id: EmailId,
    pub subject: String,
    pub sender: String,
    pub body: String,
    pub indicators: Vec<String>,
    pub tips: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_uses_kind_templates() {
        let mut rng = Pcg32::seed_from_u64(7);
        for kind in EmailKind::ALL {
            let email = Email::generate(1, kind, &mut rng);
            assert!(kind.subjects().contains(&email.subject));
            assert!(kind.senders().contains(&email.sender));
            assert!(kind.bodies().contains(&email.body));
            assert_eq!(email.size, Vec2::new(EMAIL_WIDTH, EMAIL_HEIGHT));
        }
    }

    #[test]
    fn test_view_carries_render_fields() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut email = Email::generate(9, EmailKind::Malware, &mut rng);
        email.pos = Vec2::new(40.0, 60.0);
        email.time_on_screen = 3000.0;
        email.max_time_on_screen = 12000.0;

        let view = email.view();
        assert_eq!(view.id, 9);
        assert_eq!((view.x, view.y), (40.0, 60.0));
        assert_eq!(view.color, EmailKind::Malware.color());
        assert_eq!(view.threat_level, 0.9);
        assert_eq!(view.lifetime_progress, 0.25);
        assert!(!view.quarantined);

        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"kind\":\"malware\""));
        assert!(json.contains("\"lifetime_progress\":0.25"));
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut email = Email::generate(1, EmailKind::Spam, &mut rng);
        email.pos = Vec2::new(100.0, 50.0);

        assert!(email.contains(Vec2::new(100.0, 50.0)));
        assert!(email.contains(Vec2::new(280.0, 170.0)));
        assert!(email.contains(Vec2::new(190.0, 110.0)));
        assert!(!email.contains(Vec2::new(99.9, 60.0)));
        assert!(!email.contains(Vec2::new(150.0, 170.1)));
    }

    #[test]
    fn test_quarantine_caps_lifetime() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut email = Email::generate(1, EmailKind::Phishing, &mut rng);
        email.time_on_screen = 4200.0;
        email.max_time_on_screen = 20000.0;

        email.quarantine();

        assert!(email.quarantined);
        assert_eq!(email.max_time_on_screen, 7200.0);
        assert_eq!(email.vel, Vec2::new(-100.0, 50.0));
    }

    #[test]
    fn test_detail_respects_tips_flag() {
        let mut rng = Pcg32::seed_from_u64(3);
        let email = Email::generate(9, EmailKind::Malware, &mut rng);

        let full = email.detail(true);
        assert_eq!(full.id, 9);
        assert_eq!(full.indicators.len(), 3);
        assert_eq!(full.tips.len(), 3);

        assert!(email.detail(false).tips.is_empty());
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        assert_eq!(EmailKind::from_str("Phishing"), Some(EmailKind::Phishing));
        assert_eq!(EmailKind::from_str("virus"), None);
        assert!(!EmailKind::Safe.is_threat());
        assert!(EmailKind::Malware.is_threat());
    }
}
