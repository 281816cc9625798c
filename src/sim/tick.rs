//! Simulation tick
//!
//! Core game loop step: movement, formation sweep, enemy fire, projectiles,
//! collisions and wave regeneration. Deterministic given (state, input, dt).

use super::collision::{Bounds, collides, crossed_defense_line};
use super::state::{GameEvent, GamePhase, GameState};
use super::wave::generate_wave;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move-left held
    pub move_left: bool,
    /// Move-right held
    pub move_right: bool,
    /// Fire pressed since the last tick (edge, not level)
    pub fire: bool,
}

/// Horizontal sweep speed for a formation of `enemy_count`.
///
/// Fewer enemies sweep faster. The bonus term is clamped at zero so oversized
/// waves never reverse or stall the formation.
pub fn sweep_speed(enemy_count: usize) -> f32 {
    let bonus = (1.0 - enemy_count as f32 / WAVE_SIZE as f32).max(0.0);
    ENEMY_BASE_SPEED + bonus
}

/// Advance the game state by one tick. `dt_ms` is wall time since the previous tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.fire {
        state.player_shoot();
    }

    if state.phase == GamePhase::Active {
        state.time_ticks += 1;

        move_ship(state, input);
        advance_formation(state);
        update_enemy_fire(state, dt_ms);
        advance_projectiles(state);
        resolve_collisions(state);

        if state.enemies.is_empty() && state.phase == GamePhase::Active {
            state.enemies = generate_wave(state.arena.width);
            state.score += WAVE_CLEAR_BONUS;
            state.waves_cleared += 1;
            state.push_event(GameEvent::WaveCleared);
            log::info!("Wave {} cleared, score {}", state.waves_cleared, state.score);
        }
    }

    // Explosions keep animating after game over
    for particle in &mut state.particles {
        particle.update();
    }
    state.particles.retain(|p| p.is_alive());
}

fn move_ship(state: &mut GameState, input: &TickInput) {
    if input.move_left {
        state.ship.move_left(SHIP_SPEED);
    }
    if input.move_right {
        state.ship.move_right(SHIP_SPEED, state.arena.width);
    }
}

/// Sweep the formation sideways, or flip direction and drop when an edge is reached
fn advance_formation(state: &mut GameState) {
    let direction = state.sweep_direction;
    let arena_width = state.arena.width;
    let breached = state.enemies.iter().any(|enemy| {
        (direction < 0.0 && enemy.pos.x <= 0.0)
            || (direction > 0.0 && enemy.pos.x + enemy.size.x >= arena_width)
    });

    if breached {
        state.sweep_direction = -direction;
        for enemy in &mut state.enemies {
            enemy.pos.y += ENEMY_DESCENT;
        }
    } else {
        let dx = direction * sweep_speed(state.enemies.len());
        for enemy in &mut state.enemies {
            enemy.pos.x += dx;
        }
    }

    for enemy in &mut state.enemies {
        enemy.update();
    }
}

fn update_enemy_fire(state: &mut GameState, dt_ms: f32) {
    state.shoot_timer_ms += dt_ms;
    if state.shoot_timer_ms > state.shoot_threshold_ms {
        state.shoot_timer_ms = 0.0;
        state.enemy_shoot();
        state.reroll_shoot_threshold();
    }
}

fn advance_projectiles(state: &mut GameState) {
    let arena = state.arena;
    for projectile in &mut state.player_projectiles {
        projectile.update();
    }
    state.player_projectiles.retain(|p| !p.is_out_of_arena(&arena));

    for projectile in &mut state.enemy_projectiles {
        projectile.update();
    }
    state.enemy_projectiles.retain(|p| !p.is_out_of_arena(&arena));
}

fn resolve_collisions(state: &mut GameState) {
    // Player projectiles vs enemies: one kill per projectile
    let mut i = 0;
    while i < state.player_projectiles.len() {
        let projectile = &state.player_projectiles[i];
        let hit = state.enemies.iter().position(|e| collides(projectile, e));
        match hit {
            Some(j) => {
                state.player_projectiles.swap_remove(i);
                let enemy = state.enemies.swap_remove(j);
                state.score += ENEMY_KILL_SCORE;
                state.spawn_explosion(enemy.center(), enemy.color);
                state.push_event(GameEvent::EnemyDestroyed);
            }
            None => i += 1,
        }
    }

    // Enemy projectiles vs ship
    let mut i = 0;
    while i < state.enemy_projectiles.len() && !state.is_game_over() {
        if collides(&state.enemy_projectiles[i], &state.ship) {
            state.enemy_projectiles.swap_remove(i);
            state.lives = state.lives.saturating_sub(1);
            let (center, color) = (state.ship.center(), state.ship.color);
            state.spawn_explosion(center, color);
            state.push_event(GameEvent::PlayerHit);
            if state.lives == 0 {
                state.enter_game_over();
            }
        } else {
            i += 1;
        }
    }

    if state.is_game_over() {
        return;
    }

    // Enemy bodies vs ship and the defense line
    let arena = state.arena;
    let ship = state.ship.bounds();
    let overrun = state
        .enemies
        .iter()
        .any(|e| collides(e, &ship) || crossed_defense_line(&e.bounds(), &arena));
    if overrun {
        state.enter_game_over();
    }
}
