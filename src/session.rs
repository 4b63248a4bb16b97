//! Session controller
//!
//! Screen state machine and fixed-timestep driver around the simulation:
//! `Loading -> Menu <-> Tutorial`, `Menu -> Playing <-> Paused -> GameOver`,
//! with restart looping back to `Playing` and quit returning to `Menu`.
//! Inputs are only honoured while `Playing`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::{HighScore, HighScoreRecord};
use crate::persistence::{self, KeyValueStore};
use crate::settings::Settings;
use crate::sim::{
    self, ClickOutcome, Cooldowns, DifficultySnapshot, Email, EmailDetail, EmailId, EmailKind,
    EmailView, FloatingText, GameEvent, GameState, Ledger, Particle, Phase, SessionEnd, Tool,
};

pub use crate::sim::DefeatCheck;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Loading,
    Menu,
    Tutorial,
    Playing,
    Paused,
    GameOver,
}

impl Screen {
    /// A session is in progress (possibly paused)
    pub fn in_session(&self) -> bool {
        matches!(self, Screen::Playing | Screen::Paused)
    }
}

/// Per-session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Play-field size in canvas pixels
    pub field_width: f32,
    pub field_height: f32,
    /// Base RNG seed; each new run offsets it
    pub seed: u64,
    pub defeat_check: DefeatCheck,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            seed: 0,
            defeat_check: DefeatCheck::OnTimerTick,
        }
    }
}

impl SessionConfig {
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }
}

/// End-of-session summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performance {
    pub victory: bool,
    pub score: u64,
    /// correct / analyzed (0.0 - 1.0), 0 when nothing was analyzed
    pub accuracy: f32,
    pub elapsed_secs: u32,
    pub phase_reached: u8,
    pub max_combo: f64,
    pub emails_analyzed: u32,
    pub correct_analyses: u32,
    pub final_health: u8,
    pub new_high_score: bool,
}

impl Performance {
    pub fn from_state(state: &GameState, victory: bool) -> Self {
        let ledger = &state.ledger;
        Self {
            victory,
            score: ledger.score,
            accuracy: ledger.accuracy(),
            elapsed_secs: ledger.elapsed_secs(),
            phase_reached: state.phase().number(),
            max_combo: ledger.max_combo,
            emails_analyzed: ledger.emails_analyzed,
            correct_analyses: ledger.correct_analyses,
            final_health: ledger.health,
            new_high_score: false,
        }
    }

    /// Badges earned this session
    pub fn achievements(&self) -> Vec<&'static str> {
        let mut earned = Vec::new();
        if self.score >= 100 {
            earned.push("Apprentice Guardian");
        }
        if self.score >= 300 {
            earned.push("Security Specialist");
        }
        if self.score >= 500 {
            earned.push("Elite Defender");
        }
        if self.score >= 800 {
            earned.push("Master Guardian");
        }
        if self.max_combo >= 3.0 {
            earned.push("Combo Master");
        }
        if self.correct_analyses >= 10 {
            earned.push("Sharp Analyst");
        }
        if self.accuracy >= 0.9 {
            earned.push("Flawless Analyst");
        }
        earned
    }

    /// Lines shown after a defeat
    pub fn encouragement(&self) -> Vec<String> {
        const GENERAL: [&str; 4] = [
            "Try again right away, this time will be different!",
            "Tip: SCAN an email before deciding what to do with it.",
            "Don't forget the SHIELD when things get rough.",
            "Every round teaches you something new.",
        ];

        let mut lines = Vec::new();
        if self.accuracy >= 0.8 {
            lines.push("Great accuracy, you were nearly perfect!".to_string());
        }
        if self.max_combo >= 3.0 {
            lines.push(format!("Impressive x{:.1} combo!", self.max_combo));
        }
        if self.phase_reached >= 3 {
            lines.push("You made it through the hard phase!".to_string());
        }
        if self.elapsed_secs >= 90 {
            lines.push("So close! Only 30 seconds to go.".to_string());
        }
        if self.final_health <= 20 && self.elapsed_secs >= 60 {
            lines.push("You fought to the last second!".to_string());
        }

        if lines.is_empty() {
            lines.extend(GENERAL[..2].iter().map(|s| s.to_string()));
        } else {
            lines.push(GENERAL[self.score as usize % GENERAL.len()].to_string());
        }
        lines
    }
}

/// Everything the HUD draws, in one serializable value
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot {
    pub screen: Screen,
    pub score: u64,
    pub health: u8,
    pub timer: u32,
    pub combo: f64,
    pub shield_active: bool,
    pub shield_remaining_ms: u32,
    pub phase: u8,
    pub phase_label: &'static str,
    pub phase_color: &'static str,
    pub spawn_rate_label: &'static str,
    pub cooldowns: Cooldowns,
    pub selected_tool: Option<Tool>,
    pub high_score: u64,
}

/// One player's game: screens, the running simulation and persisted data
pub struct Session {
    config: SessionConfig,
    screen: Screen,
    state: GameState,
    /// Unsimulated frame time (ms)
    accumulator: f32,
    runs: u64,
    settings: Settings,
    high_score: HighScore,
    performance: Option<Performance>,
    store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Session backed by the platform's default store
    pub fn new(config: SessionConfig) -> Self {
        Self::with_store(config, persistence::default_store())
    }

    pub fn with_store(config: SessionConfig, store: Box<dyn KeyValueStore>) -> Self {
        let settings = Settings::load(store.as_ref());
        let high_score = HighScore::load(store.as_ref());
        let state = GameState::new(config.seed, config.field());
        Self {
            config,
            screen: Screen::Loading,
            state,
            accumulator: 0.0,
            runs: 0,
            settings,
            high_score,
            performance: None,
            store,
        }
    }

    // === Screens ===

    pub fn finish_loading(&mut self) {
        if self.screen == Screen::Loading {
            self.screen = Screen::Menu;
        }
    }

    pub fn show_tutorial(&mut self) {
        if self.screen == Screen::Menu {
            self.screen = Screen::Tutorial;
        }
    }

    pub fn back_to_menu(&mut self) {
        if self.screen == Screen::Tutorial {
            self.screen = Screen::Menu;
        }
    }

    /// Fresh ledger, empty pool, all timers armed
    pub fn start(&mut self) -> bool {
        if self.screen == Screen::Loading {
            return false;
        }
        self.state.stop_clock();

        let seed = self.config.seed.wrapping_add(self.runs);
        self.runs += 1;

        let mut state = GameState::new(seed, self.config.field());
        state.defeat_check = self.config.defeat_check;
        state.max_particles = self.settings.max_particles();
        state.show_tips = self.settings.show_tips;
        state.start_clock();

        self.state = state;
        self.accumulator = 0.0;
        self.performance = None;
        self.screen = Screen::Playing;
        log::info!("Session started (seed {})", seed);
        true
    }

    pub fn pause(&mut self) {
        if self.screen == Screen::Playing {
            self.screen = Screen::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Paused {
            self.screen = Screen::Playing;
            self.accumulator = 0.0;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.screen {
            Screen::Playing => self.pause(),
            Screen::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn restart(&mut self) -> bool {
        self.state.stop_clock();
        self.start()
    }

    /// Finish the running session. Idempotent: returns false if none is running.
    pub fn end(&mut self, victory: bool) -> bool {
        if !self.screen.in_session() {
            return false;
        }
        self.state.stop_clock();
        self.accumulator = 0.0;

        let mut performance = Performance::from_state(&self.state, victory);
        // The stored best may have changed since construction
        self.high_score = HighScore::load(self.store.as_ref());
        let record = HighScoreRecord {
            score: performance.score,
            phase_reached: performance.phase_reached,
            max_combo: performance.max_combo,
        };
        performance.new_high_score = self.high_score.submit(self.store.as_mut(), record);

        self.state.events.push(GameEvent::SessionEnded { victory });
        if performance.new_high_score {
            self.state.events.push(GameEvent::NewHighScore {
                score: performance.score,
            });
        }

        log::info!(
            "Session over ({}): score {}, accuracy {:.0}%, phase {}, max combo x{:.1}",
            if victory { "victory" } else { "defeat" },
            performance.score,
            performance.accuracy * 100.0,
            performance.phase_reached,
            performance.max_combo
        );

        self.performance = Some(performance);
        self.screen = Screen::GameOver;
        true
    }

    pub fn quit_to_menu(&mut self) {
        if self.screen == Screen::Loading {
            return;
        }
        self.state.stop_clock();
        self.accumulator = 0.0;
        self.screen = Screen::Menu;
    }

    // === Time ===

    /// Feed wall-clock frame time; runs as many fixed ticks as fit.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_ms: f32) -> u32 {
        if self.screen != Screen::Playing {
            return 0;
        }
        if frame_ms.is_finite() {
            self.accumulator += frame_ms.clamp(0.0, MAX_FRAME_MS);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT_MS;
            substeps += 1;
            if self.step().is_some() {
                break;
            }
        }
        substeps
    }

    /// Run exactly one fixed tick
    pub fn step(&mut self) -> Option<SessionEnd> {
        if self.screen != Screen::Playing {
            return None;
        }
        let end = sim::tick(&mut self.state);
        if let Some(end) = end {
            self.end(end.is_victory());
        }
        end
    }

    // === Input ===

    pub fn select_tool(&mut self, tool: Tool) -> bool {
        if self.screen != Screen::Playing {
            return false;
        }
        sim::select_tool(&mut self.state, tool)
    }

    /// Click at canvas-local coordinates
    pub fn pointer_down(&mut self, x: f32, y: f32) -> ClickOutcome {
        if self.screen != Screen::Playing {
            return ClickOutcome::Nothing;
        }
        let outcome = sim::pointer_down(&mut self.state, Vec2::new(x, y));
        self.check_immediate_defeat();
        outcome
    }

    /// Resolve a manual classification; `None` if the email is gone
    pub fn classify(&mut self, id: EmailId, chosen: EmailKind) -> Option<bool> {
        if self.screen != Screen::Playing {
            return None;
        }
        let result = sim::classify(&mut self.state, id, chosen);
        self.check_immediate_defeat();
        result
    }

    pub fn close_detail(&mut self) {
        if self.screen == Screen::Playing {
            sim::close_detail(&mut self.state);
            sim::clear_tool(&mut self.state);
        }
    }

    /// Keyboard shortcuts. Returns whether the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            " " | "Space" if self.screen.in_session() => {
                self.toggle_pause();
                true
            }
            "1" | "2" | "3" | "4" if self.screen == Screen::Playing => {
                let index = (key.as_bytes()[0] - b'1') as usize;
                self.select_tool(Tool::ALL[index]);
                true
            }
            "Escape" if self.screen == Screen::Playing => {
                self.close_detail();
                true
            }
            _ => false,
        }
    }

    fn check_immediate_defeat(&mut self) {
        if self.config.defeat_check == DefeatCheck::Immediate && self.state.ledger.is_dead() {
            self.end(false);
        }
    }

    // === Configuration ===

    /// Canvas resized; takes effect immediately
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.field_width = width;
        self.config.field_height = height;
        self.state.field = Vec2::new(width, height);
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.runs = 0;
    }

    pub fn set_settings(&mut self, mut settings: Settings) {
        settings.set_volume(settings.master_volume);
        self.state.max_particles = settings.max_particles();
        self.state.show_tips = settings.show_tips;
        settings.save(self.store.as_mut());
        self.settings = settings;
    }

    // === Snapshots ===

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    pub fn emails(&self) -> &[Email] {
        &self.state.emails
    }

    /// Render snapshots of the live cards, in draw order
    pub fn email_views(&self) -> Vec<EmailView> {
        self.state.emails.iter().map(|e| e.view()).collect()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn texts(&self) -> &[FloatingText] {
        &self.state.texts
    }

    pub fn difficulty(&self) -> DifficultySnapshot {
        sim::difficulty(self.state.elapsed_secs())
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.state.cooldowns
    }

    pub fn selected_tool(&self) -> Option<Tool> {
        self.state.selected_tool
    }

    pub fn selected_detail(&self) -> Option<EmailDetail> {
        self.state.selected_detail()
    }

    pub fn performance(&self) -> Option<&Performance> {
        self.performance.as_ref()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best_score()
    }

    /// Stored best with the phase and combo it was set with
    pub fn high_score_record(&self) -> Option<&HighScoreRecord> {
        self.high_score.record()
    }

    pub fn hud(&self) -> HudSnapshot {
        let ledger = &self.state.ledger;
        let difficulty = self.difficulty();
        HudSnapshot {
            screen: self.screen,
            score: ledger.score,
            health: ledger.health,
            timer: ledger.timer,
            combo: ledger.combo,
            shield_active: ledger.shield.active,
            shield_remaining_ms: ledger.shield.remaining_ms,
            phase: difficulty.phase.number(),
            phase_label: difficulty.phase.label(),
            phase_color: difficulty.phase.color(),
            spawn_rate_label: difficulty.spawn_rate_label(),
            cooldowns: self.state.cooldowns,
            selected_tool: self.state.selected_tool,
            high_score: self.high_score.best_score(),
        }
    }

    /// Take pending advisory/feedback events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::STORAGE_KEY;
    use crate::persistence::MemoryStore;

    fn session_with(config: SessionConfig) -> Session {
        let mut session = Session::with_store(config, Box::new(MemoryStore::new()));
        session.finish_loading();
        session
    }

    fn session() -> Session {
        session_with(SessionConfig {
            seed: 7,
            ..SessionConfig::default()
        })
    }

    fn put(session: &mut Session, kind: EmailKind) -> EmailId {
        let state = &mut session.state;
        let id = state.next_entity_id();
        let mut email = Email::generate(id, kind, &mut state.rng);
        email.pos = Vec2::new(600.0, 300.0);
        email.vel = Vec2::new(-30.0, 0.0);
        state.emails.push(email);
        id
    }

    fn run_ticks(session: &mut Session, ticks: u32) {
        for _ in 0..ticks {
            session.advance(SIM_DT_MS);
        }
    }

    #[test]
    fn test_screen_flow() {
        let mut s = Session::with_store(SessionConfig::default(), Box::new(MemoryStore::new()));
        assert_eq!(s.screen(), Screen::Loading);
        assert!(!s.start());

        s.finish_loading();
        assert_eq!(s.screen(), Screen::Menu);
        s.show_tutorial();
        assert_eq!(s.screen(), Screen::Tutorial);
        s.back_to_menu();
        assert_eq!(s.screen(), Screen::Menu);

        assert!(s.start());
        assert_eq!(s.screen(), Screen::Playing);
        s.pause();
        assert_eq!(s.screen(), Screen::Paused);
        s.resume();
        assert_eq!(s.screen(), Screen::Playing);

        s.quit_to_menu();
        assert_eq!(s.screen(), Screen::Menu);
        assert!(!s.state().clock.running);
    }

    #[test]
    fn test_countdown_through_advance() {
        let mut s = session();
        s.start();
        run_ticks(&mut s, 60);
        assert_eq!(s.ledger().timer, 119);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut s = session();
        s.start();
        let ran = s.advance(10_000.0);
        assert!(ran > 0 && ran <= MAX_SUBSTEPS);
        assert!(s.state().clock.ticks <= MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = session();
        s.start();
        let id = put(&mut s, EmailKind::Phishing);
        s.state.cooldowns.trigger(Tool::Block);
        run_ticks(&mut s, 30);

        s.pause();
        let pos = s.state().email(id).unwrap().pos;
        let cooldown = s.cooldowns().block;
        let count = s.emails().len();
        let ticks = s.state().clock.ticks;

        for _ in 0..600 {
            assert_eq!(s.advance(SIM_DT_MS), 0);
        }
        assert_eq!(s.state().email(id).unwrap().pos, pos);
        assert_eq!(s.cooldowns().block, cooldown);
        assert_eq!(s.emails().len(), count);
        assert_eq!(s.state().clock.ticks, ticks);
        assert_eq!(s.ledger().timer, 120);

        s.resume();
        run_ticks(&mut s, 1);
        assert!(s.state().email(id).unwrap().pos.x < pos.x);
    }

    #[test]
    fn test_inputs_ignored_unless_playing() {
        let mut s = session();
        s.start();
        let id = put(&mut s, EmailKind::Malware);
        s.pause();

        assert!(!s.select_tool(Tool::Block));
        assert_eq!(s.pointer_down(650.0, 350.0), ClickOutcome::Nothing);
        assert_eq!(s.classify(id, EmailKind::Malware), None);
        assert!(!s.handle_key("2"));
        assert!(s.state().email(id).is_some());
        assert_eq!(s.ledger().score, 0);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session();
        s.start();
        let id = put(&mut s, EmailKind::Malware);
        s.select_tool(Tool::Block);
        s.pointer_down(650.0, 350.0);
        assert_eq!(s.ledger().score, 30);
        put(&mut s, EmailKind::Spam);
        s.state.ledger.health = 40;
        run_ticks(&mut s, 300);
        assert!(s.state().email(id).is_none());

        assert!(s.restart());
        assert_eq!(s.screen(), Screen::Playing);
        assert_eq!(s.ledger().score, 0);
        assert_eq!(s.ledger().health, 100);
        assert_eq!(s.ledger().combo, 1.0);
        assert_eq!(s.ledger().timer, 120);
        assert!(s.emails().is_empty());
        assert!(s.particles().is_empty());
        assert!(s.cooldowns().is_ready(Tool::Block));
        assert_eq!(s.state().clock.spawn_in_ms, 4500.0);
    }

    #[test]
    fn test_victory_at_time_up() {
        let mut s = session();
        s.start();
        s.state.ledger.timer = 1;
        s.state.ledger.score = 42;
        run_ticks(&mut s, 60);

        assert_eq!(s.screen(), Screen::GameOver);
        let perf = s.performance().unwrap();
        assert!(perf.victory);
        assert_eq!(perf.elapsed_secs, 120);
        assert_eq!(perf.phase_reached, 4);
        assert!(!s.state().clock.running);

        // Stale frames after the end do nothing
        assert_eq!(s.advance(1000.0), 0);
    }

    #[test]
    fn test_defeat_when_health_gone() {
        let mut s = session();
        s.start();
        s.state.ledger.health = 0;
        run_ticks(&mut s, 59);
        assert_eq!(s.screen(), Screen::Playing);
        run_ticks(&mut s, 1);
        assert_eq!(s.screen(), Screen::GameOver);
        assert!(!s.performance().unwrap().victory);
        assert!(s.ledger().timer > 0);
    }

    #[test]
    fn test_immediate_defeat_on_wrong_action() {
        let mut s = session_with(SessionConfig {
            defeat_check: DefeatCheck::Immediate,
            ..SessionConfig::default()
        });
        s.start();
        s.state.ledger.health = 10;
        let id = put(&mut s, EmailKind::Safe);
        assert_eq!(s.classify(id, EmailKind::Malware), Some(false));
        assert_eq!(s.screen(), Screen::GameOver);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut s = session();
        s.start();
        assert!(s.end(true));
        assert!(!s.end(false));
        assert!(s.performance().unwrap().victory);

        let ends = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_high_score_persisted_only_when_beaten() {
        let mut s = session();
        s.start();
        s.state.ledger.score = 250;
        s.end(true);
        assert!(s.performance().unwrap().new_high_score);
        assert!(s.drain_events().contains(&GameEvent::NewHighScore { score: 250 }));
        assert_eq!(s.high_score(), 250);

        s.restart();
        s.state.ledger.score = 250;
        s.end(false);
        assert!(!s.performance().unwrap().new_high_score);

        let stored: HighScoreRecord = persistence::load_json(s.store.as_ref(), STORAGE_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, 250);
    }

    #[test]
    fn test_high_score_survives_new_session() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "900").unwrap();
        let s = Session::with_store(SessionConfig::default(), Box::new(store));
        assert_eq!(s.high_score(), 900);
        assert_eq!(s.hud().high_score, 900);
    }

    #[test]
    fn test_end_respects_best_written_elsewhere() {
        let mut s = session();
        s.start();
        s.store.set(STORAGE_KEY, "999").unwrap();
        s.state.ledger.score = 500;
        s.end(true);

        assert!(!s.performance().unwrap().new_high_score);
        assert_eq!(s.high_score(), 999);
        assert_eq!(s.store.get(STORAGE_KEY).unwrap().as_deref(), Some("999"));
        assert!(!s.drain_events().iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })));
    }

    #[test]
    fn test_high_score_record_carries_run_stats() {
        let mut s = session();
        assert!(s.high_score_record().is_none());
        s.start();
        s.state.ledger.score = 180;
        s.state.ledger.max_combo = 2.5;
        s.end(false);

        let record = s.high_score_record().unwrap();
        assert_eq!(record.score, 180);
        assert_eq!(record.phase_reached, 1);
        assert_eq!(record.max_combo, 2.5);
    }

    #[test]
    fn test_non_finite_frame_is_skipped() {
        let mut s = session();
        s.start();
        assert_eq!(s.advance(f32::NAN), 0);
        assert_eq!(s.advance(f32::INFINITY), 0);
        assert_eq!(s.state().clock.ticks, 0);
        assert_eq!(s.advance(SIM_DT_MS), 1);
        assert_eq!(s.state().clock.ticks, 1);
    }

    #[test]
    fn test_settings_volume_clamped() {
        let mut s = session();
        s.set_settings(Settings {
            master_volume: 3.0,
            ..Settings::default()
        });
        assert_eq!(s.settings().master_volume, 1.0);
        s.set_settings(Settings {
            master_volume: -0.5,
            ..Settings::default()
        });
        assert_eq!(s.settings().master_volume, 0.0);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut s = session();
        s.start();
        assert!(s.handle_key("2"));
        assert_eq!(s.selected_tool(), Some(Tool::Block));
        assert!(s.handle_key("Escape"));
        assert_eq!(s.selected_tool(), None);

        assert!(s.handle_key(" "));
        assert_eq!(s.screen(), Screen::Paused);
        assert!(s.handle_key(" "));
        assert_eq!(s.screen(), Screen::Playing);
        assert!(!s.handle_key("x"));
    }

    #[test]
    fn test_settings_apply_to_next_run() {
        let mut s = session();
        s.set_settings(Settings {
            particles: false,
            show_tips: false,
            ..Settings::default()
        });
        s.start();
        let id = put(&mut s, EmailKind::Spam);
        s.pointer_down(650.0, 350.0);
        assert!(s.particles().is_empty());
        assert!(s.selected_detail().unwrap().tips.is_empty());
        assert_eq!(s.selected_detail().unwrap().id, id);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = session();
        let mut b = session();
        a.start();
        b.start();
        run_ticks(&mut a, 60 * 20);
        run_ticks(&mut b, 60 * 20);
        let kinds_a: Vec<_> = a.emails().iter().map(|e| e.kind).collect();
        let kinds_b: Vec<_> = b.emails().iter().map(|e| e.kind).collect();
        assert_eq!(kinds_a, kinds_b);
        assert!(!kinds_a.is_empty());
    }

    #[test]
    fn test_hud_snapshot() {
        let mut s = session();
        s.start();
        let hud = s.hud();
        assert_eq!(hud.phase_label, "WARM-UP");
        assert_eq!(hud.spawn_rate_label, "SLOW");
        assert_eq!(hud.timer, 120);
        assert!(serde_json::to_string(&hud).unwrap().contains("\"screen\":\"playing\""));
    }

    #[test]
    fn test_performance_feedback() {
        let perf = Performance {
            victory: false,
            score: 520,
            accuracy: 0.95,
            elapsed_secs: 95,
            phase_reached: 4,
            max_combo: 3.5,
            emails_analyzed: 20,
            correct_analyses: 19,
            final_health: 0,
            new_high_score: false,
        };
        let badges = perf.achievements();
        assert!(badges.contains(&"Elite Defender"));
        assert!(!badges.contains(&"Master Guardian"));
        assert!(badges.contains(&"Combo Master"));
        assert!(badges.contains(&"Flawless Analyst"));
        assert_eq!(badges.len(), 6);

        // Four earned lines plus one general line
        assert_eq!(perf.encouragement().len(), 6);

        let rookie = Performance {
            score: 0,
            accuracy: 0.0,
            elapsed_secs: 20,
            phase_reached: 1,
            max_combo: 1.0,
            emails_analyzed: 0,
            correct_analyses: 0,
            final_health: 0,
            ..perf
        };
        assert!(rookie.achievements().is_empty());
        assert_eq!(rookie.encouragement().len(), 2);
    }
}
