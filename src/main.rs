//! Warehouse Cat entry point
//!
//! Native builds run a headless autopilot over the simulation; the browser
//! build is driven from JavaScript through `warehouse_cat::wasm`.
//!
//! Usage: `warehouse-cat [seed] [max_ticks] [name]`

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use warehouse_cat::Session;
    use warehouse_cat::audio::LogAudio;
    use warehouse_cat::persistence::FileStore;
    use warehouse_cat::sim::{Cell, Direction, GamePhase, GameState};

    const DEFAULT_SEED: u64 = 42;
    const DEFAULT_MAX_TICKS: u64 = 20_000;
    /// Ticks between autopilot moves
    const MOVE_EVERY: u64 = 2;
    const DATA_DIR_ENV: &str = "WAREHOUSE_CAT_DATA";

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let max_ticks = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_TICKS);
        let name = args.next().unwrap_or_else(|| "AUTOPILOT".to_string());

        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".warehouse-cat".to_string());
        log::info!("Seed {seed}, up to {max_ticks} ticks, data in {data_dir}");

        let mut session = Session::from_store(seed, Box::new(FileStore::new(data_dir)), Box::new(LogAudio));
        session.set_player_name(&name);
        session.start();

        let mut ticks = 0;
        while ticks < max_ticks {
            match session.game().phase {
                GamePhase::LevelComplete => {
                    session.next_level();
                    continue;
                }
                GamePhase::BossIntro => {
                    session.begin_boss();
                    continue;
                }
                GamePhase::GameOver | GamePhase::Victory | GamePhase::NotStarted => break,
                GamePhase::Playing => {}
            }

            if ticks % MOVE_EVERY == 0 {
                if let Some(direction) = choose_move(session.game()) {
                    session.press(direction);
                }
            }
            session.tick();
            ticks += 1;
        }

        let game = session.game();
        println!(
            "{:?} after {ticks} ticks: level {}, lives {}, food {}",
            game.phase, game.level_number, game.lives, game.total_food
        );
        match serde_json::to_string_pretty(session.leaderboard().entries()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Could not print leaderboard: {e}"),
        }
    }

    /// Greedy step toward the nearest food, or the exit once it is all eaten,
    /// never onto a cell an enemy currently covers
    fn choose_move(game: &GameState) -> Option<Direction> {
        if game.is_capturing() {
            return None;
        }
        let level = &game.level;
        let here = game.player.position;
        let target = if level.all_food_collected {
            level.board.exit.origin
        } else {
            level
                .food
                .iter()
                .map(|f| f.position)
                .min_by_key(|cell| manhattan(*cell, here))?
        };

        Direction::ALL
            .into_iter()
            .map(|dir| (dir, here + dir.delta()))
            .filter(|(_, cell)| !level.board.is_wall(*cell) && !level.enemy_at(*cell))
            .min_by_key(|(_, cell)| manhattan(*cell, target))
            .map(|(dir, _)| dir)
    }

    fn manhattan(a: Cell, b: Cell) -> i32 {
        (a - b).abs().element_sum()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Warehouse Cat (native) starting...");
    autopilot::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is warehouse_cat::wasm::wasm_main
}
