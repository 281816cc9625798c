//! Scene draw pass
//!
//! Issues a bounded sequence of surface primitives for one frame: background,
//! starfield, ship, enemies, projectiles, particles, then the game over overlay.

use glam::Vec2;
use rand::Rng;

use super::surface::Surface;
use crate::Color;
use crate::sim::{Bounds, Enemy, GameState, Projectile, Rect, Ship};

/// Halo margin around projectiles
const GLOW_MARGIN: f32 = 3.0;
const GLOW_ALPHA: f32 = 0.3;

/// Draw one frame of `state`. Stars are re-rolled from `rng` every frame.
pub fn draw_scene<S, R>(state: &GameState, surface: &mut S, rng: &mut R, star_count: usize)
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    surface.clear(Color::BLACK);
    draw_stars(state, surface, rng, star_count);

    draw_ship(&state.ship, surface);

    for enemy in &state.enemies {
        draw_enemy(enemy, surface);
    }

    draw_projectiles(state, surface);

    if !state.particles.is_empty() {
        for particle in &state.particles {
            surface.set_global_alpha(particle.alpha());
            surface.fill_circle(particle.pos, particle.size, particle.color);
        }
        surface.set_global_alpha(1.0);
    }

    if state.is_game_over() {
        draw_game_over(state, surface);
    }
}

fn draw_stars<S, R>(state: &GameState, surface: &mut S, rng: &mut R, count: usize)
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    let arena = state.arena;
    for _ in 0..count {
        let x = rng.random_range(0.0..arena.width);
        let y = rng.random_range(0.0..arena.height);
        let diameter: f32 = rng.random_range(1.0..3.0);
        surface.fill_circle(Vec2::new(x, y), diameter / 2.0, Color::WHITE);
    }
}

fn draw_ship<S: Surface + ?Sized>(ship: &Ship, surface: &mut S) {
    let Vec2 { x, y } = ship.pos;
    let Vec2 { x: w, y: h } = ship.size;

    // Hull
    surface.fill_polygon(
        &[
            Vec2::new(x + w / 2.0, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ],
        ship.color,
    );
    // Cockpit
    surface.fill_rect(Rect::new(x + w / 2.0 - 5.0, y + 10.0, 10.0, 10.0), Color::DARK_GREEN);
}

fn draw_enemy<S: Surface + ?Sized>(enemy: &Enemy, surface: &mut S) {
    let Vec2 { x, y } = enemy.pos;
    let Vec2 { x: w, y: h } = enemy.size;

    surface.fill_rect(enemy.bounds(), enemy.color);

    // Eyes
    surface.fill_rect(Rect::new(x + 5.0, y + 5.0, 5.0, 5.0), Color::BLACK);
    surface.fill_rect(Rect::new(x + w - 10.0, y + 5.0, 5.0, 5.0), Color::BLACK);

    // Tentacles drop 5 units on the second animation frame
    let leg_y = if enemy.frame == 0 { y + h - 5.0 } else { y + h };
    surface.fill_rect(Rect::new(x - 5.0, leg_y, 5.0, 10.0), enemy.color);
    surface.fill_rect(Rect::new(x + w, leg_y, 5.0, 10.0), enemy.color);
}

/// Faint enlarged halos first, then the solid bolts on top
fn draw_projectiles<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    let projectiles: Vec<&Projectile> = state
        .player_projectiles
        .iter()
        .chain(state.enemy_projectiles.iter())
        .collect();
    if projectiles.is_empty() {
        return;
    }

    surface.set_global_alpha(GLOW_ALPHA);
    for projectile in &projectiles {
        let b = projectile.bounds();
        let halo = Rect::new(
            b.x - GLOW_MARGIN,
            b.y - GLOW_MARGIN,
            b.width + 2.0 * GLOW_MARGIN,
            b.height + 2.0 * GLOW_MARGIN,
        );
        surface.fill_rect(halo, projectile.color);
    }
    surface.set_global_alpha(1.0);

    for projectile in &projectiles {
        surface.fill_rect(projectile.bounds(), projectile.color);
    }
}

fn draw_game_over<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    let center = Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0);
    surface.fill_text("GAME OVER", center, 48.0, Color::RED);
    surface.fill_text(
        &format!("Final Score: {}", state.score),
        center + Vec2::new(0.0, 40.0),
        24.0,
        Color::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arena;
    use crate::renderer::{DrawCall, RecordingSurface};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn render(state: &GameState, stars: usize) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        let mut rng = Pcg32::seed_from_u64(5);
        draw_scene(state, &mut surface, &mut rng, stars);
        surface
    }

    #[test]
    fn test_frame_call_sequence() {
        let state = GameState::new(1, Arena::default());
        let surface = render(&state, 100);
        let calls = surface.last_frame();

        assert_eq!(calls[0], DrawCall::Clear(Color::BLACK));
        let stars = calls[1..101]
            .iter()
            .all(|c| matches!(c, DrawCall::Circle(_, r, Color::WHITE) if *r >= 0.5 && *r < 1.5));
        assert!(stars);
        assert!(matches!(calls[101], DrawCall::Polygon(ref pts, Color::GREEN) if pts.len() == 3));
        // Ship (2) + 50 enemies * 5 rects
        assert_eq!(calls.len(), 1 + 100 + 2 + 250);
        assert!(surface.last_frame_text().is_empty());
    }

    #[test]
    fn test_enemy_animation_frame_moves_tentacles() {
        let mut enemy = Enemy::new(Vec2::new(100.0, 100.0), Color::CYAN);
        let mut surface = RecordingSurface::new();
        draw_enemy(&enemy, &mut surface);
        assert_eq!(
            surface.calls[3],
            DrawCall::Rect(Rect::new(95.0, 125.0, 5.0, 10.0), Color::CYAN)
        );

        enemy.frame = 1;
        let mut surface = RecordingSurface::new();
        draw_enemy(&enemy, &mut surface);
        assert_eq!(
            surface.calls[3],
            DrawCall::Rect(Rect::new(95.0, 130.0, 5.0, 10.0), Color::CYAN)
        );
    }

    #[test]
    fn test_projectiles_drawn_with_glow() {
        let mut state = GameState::new(1, Arena::default());
        state.enemies.clear();
        state.player_shoot();
        let bolt = state.player_projectiles[0].bounds();
        let surface = render(&state, 0);
        let calls = surface.last_frame();

        // Clear, ship hull and cockpit, then the glow pass
        assert_eq!(calls[3], DrawCall::Alpha(GLOW_ALPHA));
        assert_eq!(
            calls[4],
            DrawCall::Rect(
                Rect::new(bolt.x - 3.0, bolt.y - 3.0, bolt.width + 6.0, bolt.height + 6.0),
                Color::GREEN
            )
        );
        assert_eq!(calls[5], DrawCall::Alpha(1.0));
        assert_eq!(calls[6], DrawCall::Rect(bolt, Color::GREEN));
        assert_eq!(calls.len(), 7);
    }

    #[test]
    fn test_particles_fade_and_alpha_resets() {
        let mut state = GameState::new(1, Arena::default());
        state.spawn_explosion(Vec2::new(100.0, 100.0), Color::YELLOW);
        for p in &mut state.particles {
            p.update();
        }
        let surface = render(&state, 0);
        let alphas: Vec<f32> = surface
            .last_frame()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Alpha(a) => Some(*a),
                _ => None,
            })
            .collect();

        assert_eq!(alphas.len(), 16);
        assert!(alphas[..15].iter().all(|a| *a > 0.9 && *a < 1.0));
        assert_eq!(alphas[15], 1.0);
    }

    #[test]
    fn test_game_over_overlay() {
        let mut state = GameState::new(1, Arena::default());
        state.score = 1200;
        state.enter_game_over();
        let surface = render(&state, 0);
        assert_eq!(
            surface.last_frame_text(),
            vec!["GAME OVER", "Final Score: 1200"]
        );
    }
}
