//! Browser bindings
//!
//! A `WebSession` owned by the page script. Snapshots cross the boundary as
//! JSON strings; the page renders them on a 2D canvas.

use wasm_bindgen::prelude::*;

use crate::session::{Session, SessionConfig};
use crate::settings::Settings;
use crate::sim::{ClickOutcome, EmailKind, Tool};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {}", e).into());
    }
    log::info!("Cyber Guardian module loaded");
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, immediate_defeat: bool) -> WebSession {
        let seed = js_sys::Date::now() as u64;
        let config = SessionConfig {
            field_width: width,
            field_height: height,
            seed,
            defeat_check: if immediate_defeat {
                crate::session::DefeatCheck::Immediate
            } else {
                crate::session::DefeatCheck::OnTimerTick
            },
        };
        log::info!("Session created with seed: {}", seed);
        WebSession {
            inner: Session::new(config),
        }
    }

    #[wasm_bindgen(js_name = finishLoading)]
    pub fn finish_loading(&mut self) {
        self.inner.finish_loading();
    }

    #[wasm_bindgen(js_name = showTutorial)]
    pub fn show_tutorial(&mut self) {
        self.inner.show_tutorial();
    }

    #[wasm_bindgen(js_name = backToMenu)]
    pub fn back_to_menu(&mut self) {
        self.inner.back_to_menu();
    }

    #[wasm_bindgen(js_name = startSession)]
    pub fn start_session(&mut self) -> bool {
        self.inner.set_seed(js_sys::Date::now() as u64);
        self.inner.start()
    }

    #[wasm_bindgen(js_name = pauseSession)]
    pub fn pause_session(&mut self) {
        self.inner.pause();
    }

    #[wasm_bindgen(js_name = resumeSession)]
    pub fn resume_session(&mut self) {
        self.inner.resume();
    }

    #[wasm_bindgen(js_name = restartSession)]
    pub fn restart_session(&mut self) -> bool {
        self.inner.set_seed(js_sys::Date::now() as u64);
        self.inner.restart()
    }

    #[wasm_bindgen(js_name = endSession)]
    pub fn end_session(&mut self, victory: bool) -> bool {
        self.inner.end(victory)
    }

    #[wasm_bindgen(js_name = quitToMenu)]
    pub fn quit_to_menu(&mut self) {
        self.inner.quit_to_menu();
    }

    /// Call from `requestAnimationFrame` with the frame delta in ms
    pub fn advance(&mut self, frame_ms: f32) -> u32 {
        self.inner.advance(frame_ms)
    }

    /// Unknown tool names are ignored
    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&mut self, tool: &str) -> bool {
        match Tool::from_str(tool) {
            Some(tool) => self.inner.select_tool(tool),
            None => {
                log::warn!("Unknown tool: {}", tool);
                false
            }
        }
    }

    /// Returns a short outcome tag for UI feedback
    #[wasm_bindgen(js_name = handlePointerDown)]
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) -> String {
        match self.inner.pointer_down(x, y) {
            ClickOutcome::Nothing => "nothing",
            ClickOutcome::NeedsTarget(_) => "needs_target",
            ClickOutcome::Inspected(_) => "inspected",
            ClickOutcome::Blocked { .. } => "blocked",
            ClickOutcome::Quarantined { .. } => "quarantined",
            ClickOutcome::ShieldActivated => "shield",
        }
        .to_string()
    }

    /// `undefined` if the email is gone, otherwise whether the call was right
    pub fn classify(&mut self, email_id: u32, chosen: &str) -> Option<bool> {
        let kind = EmailKind::from_str(chosen)?;
        self.inner.classify(email_id, kind)
    }

    #[wasm_bindgen(js_name = closeDetail)]
    pub fn close_detail(&mut self) {
        self.inner.close_detail();
    }

    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }

    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.set_settings(settings);
        Ok(())
    }

    // === Snapshots ===

    pub fn screen(&self) -> Result<String, JsValue> {
        to_json(&self.inner.screen())
    }

    pub fn hud(&self) -> Result<String, JsValue> {
        to_json(&self.inner.hud())
    }

    pub fn ledger(&self) -> Result<String, JsValue> {
        to_json(self.inner.ledger())
    }

    pub fn emails(&self) -> Result<String, JsValue> {
        to_json(&self.inner.email_views())
    }

    pub fn effects(&self) -> Result<String, JsValue> {
        to_json(&(self.inner.particles(), self.inner.texts()))
    }

    pub fn difficulty(&self) -> Result<String, JsValue> {
        to_json(&self.inner.difficulty())
    }

    pub fn cooldowns(&self) -> Result<String, JsValue> {
        to_json(self.inner.cooldowns())
    }

    #[wasm_bindgen(js_name = selectedDetail)]
    pub fn selected_detail(&self) -> Result<String, JsValue> {
        to_json(&self.inner.selected_detail())
    }

    pub fn performance(&self) -> Result<String, JsValue> {
        let summary = self.inner.performance().map(|p| {
            serde_json::json!({
                "summary": p,
                "achievements": p.achievements(),
                "encouragement": if p.victory { Vec::new() } else { p.encouragement() },
            })
        });
        to_json(&summary)
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> u64 {
        self.inner.high_score()
    }

    /// Best result as `{score, phase_reached, max_combo}` or `null`
    #[wasm_bindgen(js_name = highScoreRecord)]
    pub fn high_score_record(&self) -> Result<String, JsValue> {
        to_json(&self.inner.high_score_record())
    }

    /// Volume slider, 0.0 - 1.0
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f32) {
        let mut settings = self.inner.settings().clone();
        settings.master_volume = volume;
        self.inner.set_settings(settings);
    }

    pub fn settings(&self) -> Result<String, JsValue> {
        to_json(self.inner.settings())
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        to_json(&self.inner.drain_events())
    }
}
