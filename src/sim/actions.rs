//! Player actions: tool selection, canvas clicks and manual classification
//!
//! Every action degrades to a no-op plus an advisory event; nothing here
//! can fail. Actions take effect in the same tick they are issued.

use glam::Vec2;

use super::effects::colors;
use super::email::{EmailId, EmailKind};
use super::ledger::DamageSource;
use super::state::{GameEvent, GameState};
use super::tools::{ANALYSIS_COMBO_STEP, Tool, analysis_points};
use crate::consts::SHIELD_DURATION_MS;

/// Combo level that earns a milestone callout
const COMBO_MILESTONE: f64 = 3.0;

/// What a canvas click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing under the pointer and no tool armed
    Nothing,
    /// A targeted tool was armed but the click missed
    NeedsTarget(Tool),
    /// Detail view opened (plain click or scan)
    Inspected(EmailId),
    Blocked { id: EmailId, correct: bool },
    Quarantined { id: EmailId, correct: bool },
    ShieldActivated,
}

/// Arm a tool. Rejected (with an advisory) while it is cooling down.
pub fn select_tool(state: &mut GameState, tool: Tool) -> bool {
    if !state.cooldowns.is_ready(tool) {
        state.events.push(GameEvent::ToolCoolingDown { tool });
        return false;
    }
    state.selected_tool = Some(tool);
    state.events.push(GameEvent::ToolSelected {
        tool,
        hint: tool.hint(),
    });
    true
}

pub fn clear_tool(state: &mut GameState) {
    state.selected_tool = None;
}

/// Close the analysis panel
pub fn close_detail(state: &mut GameState) {
    state.selected_email = None;
}

/// Resolve a click at canvas-local `point`
pub fn pointer_down(state: &mut GameState, point: Vec2) -> ClickOutcome {
    let hit = state.email_at(point);

    match (state.selected_tool, hit) {
        (Some(Tool::Shield), _) => {
            activate_shield(state);
            ClickOutcome::ShieldActivated
        }
        (None, Some(id)) => {
            inspect(state, id, false);
            ClickOutcome::Inspected(id)
        }
        (None, None) => ClickOutcome::Nothing,
        (Some(tool), None) => {
            state.events.push(GameEvent::NeedsTarget { tool });
            ClickOutcome::NeedsTarget(tool)
        }
        (Some(Tool::Scan), Some(id)) => {
            inspect(state, id, true);
            finish_tool(state, Tool::Scan);
            ClickOutcome::Inspected(id)
        }
        (Some(Tool::Block), Some(id)) => {
            let correct = block(state, id);
            finish_tool(state, Tool::Block);
            ClickOutcome::Blocked { id, correct }
        }
        (Some(Tool::Quarantine), Some(id)) => {
            let correct = quarantine(state, id);
            finish_tool(state, Tool::Quarantine);
            ClickOutcome::Quarantined { id, correct }
        }
    }
}

/// Spend the tool: start its cooldown and disarm it
fn finish_tool(state: &mut GameState, tool: Tool) {
    state.cooldowns.trigger(tool);
    state.selected_tool = None;
}

fn inspect(state: &mut GameState, id: EmailId, scanned: bool) {
    let Some(center) = state.email(id).map(|e| e.center()) else {
        return;
    };
    state.selected_email = Some(id);
    state.add_particles(center, colors::INSPECT, if scanned { 25 } else { 10 });
    state.events.push(GameEvent::EmailInspected { id, scanned });
}

/// Destroy the email. Correct for every threat kind.
fn block(state: &mut GameState, id: EmailId) -> bool {
    let Some(email) = state.remove_email(id) else {
        return false;
    };
    let correct = match Tool::Block.reward(email.kind) {
        Some(points) => {
            let awarded = state.ledger.apply_reward(points, Tool::Block.combo_step());
            state.add_text(email.pos, format!("+{awarded}"), colors::BLOCK);
            state.events.push(GameEvent::Blocked { id, correct: true, points: awarded });
            true
        }
        None => {
            state.damage(DamageSource::WrongBlock);
            state.events.push(GameEvent::Blocked { id, correct: false, points: 0 });
            false
        }
    };
    log::debug!("block #{} ({}) correct={}", id, email.kind.as_str(), correct);
    state.add_particles(email.center(), colors::BLOCK, 20);
    correct
}

/// Divert spam/phishing into quarantine; anything else is removed with a penalty
fn quarantine(state: &mut GameState, id: EmailId) -> bool {
    let Some((kind, pos, center)) = state.email(id).map(|e| (e.kind, e.pos, e.center())) else {
        return false;
    };
    let correct = match Tool::Quarantine.reward(kind) {
        Some(points) => {
            let awarded = state.ledger.apply_reward(points, Tool::Quarantine.combo_step());
            if let Some(email) = state.email_mut(id) {
                email.quarantine();
            }
            if state.selected_email == Some(id) {
                state.selected_email = None;
            }
            state.add_text(pos, format!("+{awarded}"), colors::QUARANTINE);
            state.events.push(GameEvent::Quarantined { id, correct: true, points: awarded });
            true
        }
        None => {
            state.remove_email(id);
            state.damage(DamageSource::WrongQuarantine);
            state.events.push(GameEvent::Quarantined { id, correct: false, points: 0 });
            false
        }
    };
    state.add_particles(center, colors::QUARANTINE, 15);
    log::debug!("quarantine #{} ({}) correct={}", id, kind.as_str(), correct);
    correct
}

/// Start the shield window. Its cooldown runs independently of the window.
pub fn activate_shield(state: &mut GameState) {
    state.ledger.shield.activate(SHIELD_DURATION_MS);
    state.cooldowns.trigger(Tool::Shield);
    state.selected_tool = None;
    let center = state.field / 2.0;
    state.add_particles(center, colors::SHIELD, 30);
    state.events.push(GameEvent::ShieldActivated {
        duration_ms: SHIELD_DURATION_MS,
    });
}

/// Manual classification from the detail view. The email is removed either way.
/// Returns `None` if the email no longer exists or was already quarantined.
pub fn classify(state: &mut GameState, id: EmailId, chosen: EmailKind) -> Option<bool> {
    if state.email(id)?.quarantined {
        return None;
    }
    let mut email = state.remove_email(id)?;
    let correct = chosen == email.kind;
    email.analyzed = true;
    email.correctly_analyzed = correct;
    state.ledger.record_analysis(correct);

    if correct {
        let bonus = state.phase().analysis_bonus();
        let awarded = state.ledger.apply_analysis_reward(
            analysis_points(email.kind),
            ANALYSIS_COMBO_STEP,
            bonus,
        );
        state.add_text(email.pos, format!("+{awarded}"), colors::CORRECT);
        state.events.push(GameEvent::Classified { id, correct, points: awarded });
        if state.ledger.combo >= COMBO_MILESTONE {
            state.events.push(GameEvent::ComboMilestone { combo: state.ledger.combo });
        }
    } else {
        state.ledger.reset_combo();
        state.add_text(email.pos, "WRONG!", colors::WRONG);
        state.events.push(GameEvent::Classified { id, correct, points: 0 });
        state.damage(DamageSource::WrongAnalysis);
    }

    log::debug!(
        "classify #{} as {} (was {}) correct={}",
        id,
        chosen.as_str(),
        email.kind.as_str(),
        email.correctly_analyzed
    );
    state.selected_tool = None;
    Some(correct)
}
