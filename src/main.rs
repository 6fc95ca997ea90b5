//! Coin Dash entry point
//!
//! The browser build is driven from JS through `platform::web`. The native
//! binary is a headless smoke runner: it plays a level with a simple
//! autopilot and logs how the session went.
//!
//! Usage: `coin-dash [LEVEL_INDEX | LEVEL.json] [SECONDS]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use coin_dash::LevelDef;
    use coin_dash::consts::SIM_DT;
    use coin_dash::sim::{Session, SessionOptions, SessionPhase};

    env_logger::init();
    log::info!("Coin Dash (native) starting...");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) if path.ends_with(".json") => {
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Cannot read {path}: {e}");
                    std::process::exit(1);
                }
            };
            match LevelDef::from_json(&json) {
                Ok(level) => level,
                Err(e) => {
                    log::error!("{path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(index) => LevelDef::builtin(index.parse().unwrap_or(0)),
        None => LevelDef::builtin(0),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    let mut session = Session::new(level, SessionOptions::default());
    let frames = (seconds / SIM_DT) as u64;
    for _ in 0..frames {
        let input = autopilot::input(&session);
        session.advance(&input, SIM_DT);
        for event in session.events() {
            log::debug!("frame {}: {event:?}", session.frame());
        }
        if session.phase() == SessionPhase::Ended {
            break;
        }
    }

    log::info!(
        "'{}' finished: {:?} ({:?}), score {}, {}s left, {} frames",
        session.level().name,
        session.phase(),
        session.end_reason(),
        session.score(),
        session.time_remaining(),
        session.frame()
    );
    println!(
        "{}: score {} with {} on the clock",
        session.level().name,
        session.score(),
        coin_dash::sim::format_clock(session.time_remaining())
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

/// Demo player for the headless runner
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use coin_dash::level::PrimaryAction;
    use coin_dash::sim::{Session, TickInput};

    /// Horizontal slack before the autopilot bothers to move
    const REACH: f32 = 8.0;
    /// Frames between shots
    const FIRE_EVERY: u64 = 12;

    pub fn input(session: &Session) -> TickInput {
        let player = session.player();
        let center = player.pos.x + player.size.x / 2.0;
        let tuning = &session.level().tuning;
        let mut input = TickInput::default();

        if tuning.primary == PrimaryAction::Shoot {
            let nearest = session
                .entities()
                .live_enemies()
                .map(|e| e.pos.x + e.size.x / 2.0)
                .min_by(|a, b| (a - center).abs().total_cmp(&(b - center).abs()));
            if let Some(target) = nearest {
                // Turn to face the target, then hold position and fire
                input.move_left = target < center && player.facing.sign() > 0.0;
                input.move_right = target > center && player.facing.sign() < 0.0;
                input.primary = session.frame() % FIRE_EVERY == 0;
            }
            return input;
        }

        let target = session
            .entities()
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .map(|c| (c.pos.x + c.size.x / 2.0, c.pos.y))
            .min_by(|a, b| (a.0 - center).abs().total_cmp(&(b.0 - center).abs()));
        if let Some((x, y)) = target {
            input.move_left = x < center - REACH;
            input.move_right = x > center + REACH;
            // Coins above head height need a jump
            input.primary = player.grounded && y + 1.0 < player.pos.y;
        }
        input
    }
}
