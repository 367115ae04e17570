//! Enemy decision making
//!
//! Every enemy decides against the positions of the previous tick. A
//! resolution pass afterwards walks the enemies in id order and reverts any
//! mover whose new footprint overlaps an earlier enemy's final footprint.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::collision::{is_move_valid, overlaps};
use super::pathing::step;
use super::state::{Board, Cell, Direction, Enemy, EnemyKind, EnemyState, Level};
use crate::settings::Settings;

/// What enemies know about the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perception {
    pub player: Cell,
    pub hidden: bool,
    /// Cell where the player was last seen uncovered
    pub last_known: Option<Cell>,
}

impl Perception {
    /// Where a chaser heads: the live cell if visible, else the trail
    pub fn chase_target(&self) -> Option<Cell> {
        if self.hidden {
            self.last_known
        } else {
            Some(self.player)
        }
    }
}

/// Advance every enemy by one tick
pub fn advance_enemies(level: &mut Level, perception: &Perception, settings: &Settings, rng: &mut Pcg32) {
    let previous = level.enemies.clone();
    let mut next: Vec<Enemy> = previous
        .iter()
        .map(|enemy| think(enemy, &level.board, &previous, perception, settings, rng))
        .collect();

    resolve_conflicts(&mut next, &previous);
    level.enemies = next;
}

/// One enemy's turn computed against the frozen previous positions
fn think(
    enemy: &Enemy,
    board: &Board,
    previous: &[Enemy],
    perception: &Perception,
    settings: &Settings,
    rng: &mut Pcg32,
) -> Enemy {
    let mut enemy = enemy.clone();

    if enemy.kind == EnemyKind::Patroller && rng.random_bool(settings.patroller_skip_chance) {
        return enemy;
    }

    enemy.move_counter += 1;
    if enemy.move_counter < enemy.speed {
        return enemy;
    }
    enemy.move_counter = 0;

    let from = enemy.position;
    let to = match enemy.kind {
        EnemyKind::Patroller => patroller_turn(&mut enemy, board, previous, perception, settings, rng),
        EnemyKind::Hauler | EnemyKind::Boss => hauler_turn(&mut enemy, board, previous, perception, rng),
    };

    if to != from {
        enemy.position = to;
        enemy.record_departure(from, settings.history_len);
    }
    enemy
}

/// Vision-gated patrol/chase state machine; returns the chosen anchor
fn patroller_turn(
    enemy: &mut Enemy,
    board: &Board,
    previous: &[Enemy],
    perception: &Perception,
    settings: &Settings,
    rng: &mut Pcg32,
) -> Cell {
    let distance = enemy.position.as_vec2().distance(perception.player.as_vec2());
    let in_range = distance <= settings.vision_range;
    let sees_player = !perception.hidden && in_range;

    match enemy.state {
        EnemyState::Patrolling if sees_player => {
            log::debug!("Enemy {} spotted the player at {}", enemy.id, perception.player);
            enemy.state = EnemyState::Chasing;
        }
        EnemyState::Chasing => {
            let trail_cold = perception.hidden
                && perception.last_known.is_none_or(|cell| cell == enemy.position);
            let lost_sight = !perception.hidden && !in_range;
            if trail_cold || lost_sight {
                log::debug!("Enemy {} gave up the chase", enemy.id);
                enemy.state = EnemyState::Patrolling;
                enemy.patrol_target = Some(board.random_open_cell(rng));
            }
        }
        EnemyState::Patrolling => {}
    }

    match enemy.state {
        EnemyState::Chasing => step(board, enemy, perception.chase_target(), previous, rng),
        EnemyState::Patrolling => {
            let reached = enemy.patrol_target.is_none_or(|t| t == enemy.position);
            if reached {
                enemy.patrol_target = Some(board.random_open_cell(rng));
            }
            step(board, enemy, enemy.patrol_target, previous, rng)
        }
    }
}

/// Permanent chase with oscillation escape and detours
fn hauler_turn(
    enemy: &mut Enemy,
    board: &Board,
    previous: &[Enemy],
    perception: &Perception,
    rng: &mut Pcg32,
) -> Cell {
    if is_oscillating(enemy) {
        enemy.patrol_target = None;
        if let Some(anchor) = evasive_move(enemy, board, previous, rng) {
            return anchor;
        }
        let detour = board.random_open_cell(rng);
        log::debug!("Enemy {} stuck at {}, detouring to {}", enemy.id, enemy.position, detour);
        enemy.patrol_target = Some(detour);
        return step(board, enemy, Some(detour), previous, rng);
    }

    if let Some(detour) = enemy.patrol_target {
        if !enemy.occupies(detour) {
            let next = step(board, enemy, Some(detour), previous, rng);
            if next != enemy.position {
                return next;
            }
        }
        enemy.patrol_target = None;
    }

    step(board, enemy, perception.chase_target(), previous, rng)
}

/// Back-and-forth between the same two cells
fn is_oscillating(enemy: &Enemy) -> bool {
    let n = enemy.history.len();
    n >= 2 && enemy.position == enemy.history[n - 2] && enemy.position != enemy.history[n - 1]
}

/// First valid shuffled direction that does not undo the last move
fn evasive_move(enemy: &Enemy, board: &Board, previous: &[Enemy], rng: &mut Pcg32) -> Option<Cell> {
    let mut dirs = Direction::ALL;
    dirs.shuffle(rng);
    let back = enemy.history.last().copied();

    dirs.into_iter()
        .map(|dir| enemy.position + dir.delta())
        .find(|anchor| Some(*anchor) != back && is_move_valid(board, enemy, *anchor, previous))
}

/// Revert movers that collide with an earlier enemy's final footprint
fn resolve_conflicts(next: &mut [Enemy], previous: &[Enemy]) {
    for i in 0..next.len() {
        if next[i].position == previous[i].position {
            continue;
        }
        let clash = next[..i]
            .iter()
            .any(|earlier| overlaps(earlier.position, earlier.footprint, next[i].position, next[i].footprint));
        if clash {
            log::debug!("Enemy {} move reverted", next[i].id);
            next[i].position = previous[i].position;
            next[i].history = previous[i].history.clone();
        }
    }
}
