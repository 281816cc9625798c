//! Enemy wave layout

use glam::Vec2;

use super::state::Enemy;
use crate::Color;
use crate::consts::*;

/// Row color: top row red, next two yellow, the rest cyan
pub fn row_color(row: usize) -> Color {
    match row {
        0 => Color::RED,
        1 | 2 => Color::YELLOW,
        _ => Color::CYAN,
    }
}

/// Total width of the formation
pub fn grid_width() -> f32 {
    ENEMY_COLS as f32 * (ENEMY_WIDTH + ENEMY_PADDING) - ENEMY_PADDING
}

/// Build a fresh formation centered horizontally in an arena of `arena_width`
pub fn generate_wave(arena_width: f32) -> Vec<Enemy> {
    let start_x = (arena_width - grid_width()) / 2.0;
    let mut enemies = Vec::with_capacity(ENEMY_ROWS * ENEMY_COLS);

    for row in 0..ENEMY_ROWS {
        let color = row_color(row);
        let y = ENEMY_GRID_TOP + row as f32 * (ENEMY_HEIGHT + ENEMY_PADDING);
        for col in 0..ENEMY_COLS {
            let x = start_x + col as f32 * (ENEMY_WIDTH + ENEMY_PADDING);
            enemies.push(Enemy::new(Vec2::new(x, y), color));
        }
    }

    enemies
}
