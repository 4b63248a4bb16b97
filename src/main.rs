//! Cyber Guardian entry point
//!
//! The browser build is driven from `web::WebSession`; natively this runs one
//! seeded session headless with a simple autopilot and logs the result.

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use cyber_guardian::consts::*;
    use cyber_guardian::sim::{EmailKind, GameEvent, Tool};
    use cyber_guardian::{Screen, Session, SessionConfig};

    /// Ticks between autopilot decisions
    const THINK_TICKS: u64 = 40;
    /// Chance of misjudging an email
    const MISTAKE_RATE: f32 = 0.15;

    pub fn run(seed: u64) {
        let config = SessionConfig {
            seed,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);

        session.finish_loading();
        session.start();

        let mut ticks: u64 = 0;
        while session.screen() == Screen::Playing {
            session.advance(SIM_DT_MS);
            ticks += 1;
            if ticks % THINK_TICKS == 0 {
                think(&mut session, &mut rng);
            }
            for event in session.drain_events() {
                match event {
                    GameEvent::PhaseChanged { phase } => {
                        log::info!("t={}s entering {}", session.ledger().elapsed_secs(), phase.label())
                    }
                    GameEvent::DamageTaken { source, amount } => {
                        log::debug!("{} (-{})", source.message(), amount)
                    }
                    _ => {}
                }
            }
        }

        let Some(perf) = session.performance() else {
            log::warn!("Session ended without a summary");
            return;
        };
        log::info!(
            "{} | score {} | accuracy {:.0}% ({}/{}) | phase {} | max combo x{:.1} | {}s",
            if perf.victory { "VICTORY" } else { "DEFEAT" },
            perf.score,
            perf.accuracy * 100.0,
            perf.correct_analyses,
            perf.emails_analyzed,
            perf.phase_reached,
            perf.max_combo,
            perf.elapsed_secs
        );
        for badge in perf.achievements() {
            log::info!("Achievement: {}", badge);
        }
        if !perf.victory {
            for line in perf.encouragement() {
                log::info!("{}", line);
            }
        }
    }

    /// Deal with the email closest to leaving the screen
    fn think(session: &mut Session, rng: &mut Pcg32) {
        if session.ledger().health < 40 && session.cooldowns().is_ready(Tool::Shield) {
            session.select_tool(Tool::Shield);
            session.pointer_down(0.0, 0.0);
            return;
        }

        let Some((id, kind, center)) = session
            .emails()
            .iter()
            .filter(|e| !e.quarantined)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|e| (e.id, e.kind, e.center()))
        else {
            return;
        };

        if kind == EmailKind::Malware && session.cooldowns().is_ready(Tool::Block) {
            session.select_tool(Tool::Block);
            session.pointer_down(center.x, center.y);
            return;
        }

        let guess = if rng.random::<f32>() < MISTAKE_RATE {
            EmailKind::ALL[rng.random_range(0..EmailKind::ALL.len())]
        } else {
            kind
        };
        session.pointer_down(center.x, center.y);
        session.classify(id, guess);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Cyber Guardian (native autopilot) starting with seed: {}", seed);
    log::info!("Run with `trunk serve` for the playable web version");

    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}
