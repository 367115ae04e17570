//! Fixed timestep simulation tick
//!
//! Core game loop that advances the run deterministically. The driver calls
//! [`tick`] every `tick_ms` and [`apply_move`] for each directional intent
//! in between.

use super::ai::{Perception, advance_enemies};
use super::game::{ALL_FOOD_MESSAGE, GameEvent, GamePhase, GameState};
use super::state::Direction;

/// Advance the game by one tick of `dt_ms` milliseconds
pub fn tick(game: &mut GameState, dt_ms: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if game.phase != GamePhase::Playing {
        return events;
    }

    // Virtual clock and deadlines
    game.elapsed_ms = game.elapsed_ms.saturating_add(dt_ms);
    let now = game.elapsed_ms;
    if game.timers.hide.fire(now) {
        game.player.hidden = false;
        log::debug!("Hide window expired");
    }
    if game.timers.invulnerability.fire(now) {
        game.player.invulnerable = false;
        log::debug!("Invulnerability expired");
    }
    if game.is_capturing() {
        if game.timers.capture.fire(now) {
            resolve_capture(game, &mut events);
        }
        return events;
    }

    if !game.player.hidden {
        game.last_known = Some(game.player.position);
    }

    let perception = Perception {
        player: game.player.position,
        hidden: game.player.hidden,
        last_known: game.last_known,
    };
    advance_enemies(&mut game.level, &perception, &game.settings, &mut game.rng);

    collect_food(game, &mut events);

    if !game.player.hidden
        && !game.player.invulnerable
        && game.level.enemy_at(game.player.position)
    {
        begin_capture(game, &mut events);
        return events;
    }

    if game.level.all_food_collected && game.level.board.exit.contains(game.player.position) {
        finish_level(game, &mut events);
    }

    events
}

/// Apply one directional intent to the player
pub fn apply_move(game: &mut GameState, direction: Direction) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if game.phase != GamePhase::Playing || game.is_capturing() {
        return events;
    }

    let from = game.player.position;
    let to = from + direction.delta();
    let board = &game.level.board;
    if board.is_wall(to) {
        return events;
    }

    match (board.is_rack(from), board.is_rack(to)) {
        (false, true) => {
            game.player.hidden = true;
            game.timers
                .hide
                .arm(game.elapsed_ms, game.settings.hide_duration_ms);
            events.push(GameEvent::Hidden);
        }
        (true, false) => {
            game.player.hidden = false;
            game.timers.hide.cancel();
        }
        _ => {}
    }

    game.player.position = to;
    events
}

fn collect_food(game: &mut GameState, events: &mut Vec<GameEvent>) {
    let cell = game.player.position;
    let before = game.level.food.len();
    game.level.food.retain(|food| {
        if food.position == cell {
            events.push(GameEvent::FoodCollected { id: food.id, cell });
            false
        } else {
            true
        }
    });

    let eaten = (before - game.level.food.len()) as u32;
    if eaten == 0 {
        return;
    }
    game.level_food += eaten;
    game.total_food += eaten;

    if game.level.food.is_empty() && !game.level.all_food_collected {
        game.level.all_food_collected = true;
        game.message = Some(ALL_FOOD_MESSAGE.to_string());
        events.push(GameEvent::AllFoodCollected);
        log::info!("All food collected on level {}", game.level_number);
    }
}

fn begin_capture(game: &mut GameState, events: &mut Vec<GameEvent>) {
    let cell = game.player.position;
    game.captured_at = Some(cell);
    game.message = None;
    game.timers.hide.cancel();
    game.timers.invulnerability.cancel();
    game.timers
        .capture
        .arm(game.elapsed_ms, game.settings.capture_duration_ms);
    events.push(GameEvent::Captured { cell });
    log::info!("Player captured at {cell}");
}

fn resolve_capture(game: &mut GameState, events: &mut Vec<GameEvent>) {
    game.lives = game.lives.saturating_sub(1);

    if game.lives > 0 {
        game.player.position = game.level.board.spawn;
        game.player.hidden = false;
        game.player.invulnerable = true;
        game.captured_at = None;
        game.timers.hide.cancel();
        game.timers
            .invulnerability
            .arm(game.elapsed_ms, game.settings.invulnerability_ms);
        events.push(GameEvent::Respawned);
        log::info!("Respawned, {} lives left", game.lives);
    } else {
        game.phase = GamePhase::GameOver;
        game.captured_at = None;
        game.timers.cancel_all();
        events.push(GameEvent::GameOver {
            level: game.level_number,
            food: game.total_food,
        });
        log::info!(
            "Game over on level {} with {} food",
            game.level_number,
            game.total_food
        );
    }
}

fn finish_level(game: &mut GameState, events: &mut Vec<GameEvent>) {
    game.timers.cancel_all();
    if game.is_final_level() {
        game.phase = GamePhase::Victory;
        events.push(GameEvent::Victory {
            level: game.level_number,
            food: game.total_food,
        });
        log::info!("Victory with {} food", game.total_food);
    } else {
        game.phase = GamePhase::LevelComplete;
        events.push(GameEvent::LevelComplete {
            level: game.level_number,
        });
        log::info!("Level {} complete", game.level_number);
    }
}
