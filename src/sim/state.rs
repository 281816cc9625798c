//! Game state and core simulation types
//!
//! Entities are plain data with small per-tick update rules; the orchestration
//! lives in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use super::wave::generate_wave;
use crate::consts::*;
use crate::{Arena, Color};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation running
    Active,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Something that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player projectile launched
    PlayerShot,
    /// Enemy projectile launched
    EnemyShot,
    /// Enemy destroyed by a player projectile
    EnemyDestroyed,
    /// Ship hit by an enemy projectile
    PlayerHit,
    /// Last enemy of a wave removed and a new wave spawned
    WaveCleared,
    /// Transition into `GamePhase::GameOver` (emitted once per run)
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl Ship {
    /// Ship at its spawn point: centered horizontally, near the bottom
    pub fn spawn(arena: &Arena) -> Self {
        Self {
            pos: Vec2::new(
                arena.width / 2.0 - SHIP_WIDTH / 2.0,
                arena.height - SHIP_BOTTOM_OFFSET,
            ),
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            color: Color::GREEN,
        }
    }

    pub fn move_left(&mut self, speed: f32) {
        self.pos.x = (self.pos.x - speed).max(0.0);
    }

    pub fn move_right(&mut self, speed: f32, arena_width: f32) {
        self.pos.x = (self.pos.x + speed).min(arena_width - self.size.x);
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

impl Bounds for Ship {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// An invader in the formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    /// Animation phase, 0 or 1 (visual only)
    pub frame: u8,
    frame_timer: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            color,
            frame: 0,
            frame_timer: 0,
        }
    }

    /// Advance the animation timer, flipping the frame every `ENEMY_ANIMATION_TICKS`
    pub fn update(&mut self) {
        self.frame_timer += 1;
        if self.frame_timer >= ENEMY_ANIMATION_TICKS {
            self.frame_timer = 0;
            self.frame ^= 1;
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A bullet. Negative speed travels up (player), positive down (enemy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
    pub speed: f32,
}

impl Projectile {
    /// Upward shot centered on the ship's top edge
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            pos: Vec2::new(
                ship.pos.x + ship.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
                ship.pos.y,
            ),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            color: Color::GREEN,
            speed: PLAYER_PROJECTILE_SPEED,
        }
    }

    /// Downward shot from the enemy's bottom edge
    pub fn from_enemy(enemy: &Enemy) -> Self {
        Self {
            pos: Vec2::new(
                enemy.pos.x + enemy.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
                enemy.pos.y + enemy.size.y,
            ),
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            color: Color::RED,
            speed: ENEMY_PROJECTILE_SPEED,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    /// Whether the projectile has left the arena in its direction of travel
    pub fn is_out_of_arena(&self, arena: &Arena) -> bool {
        if self.speed < 0.0 {
            self.pos.y < 0.0
        } else {
            self.pos.y > arena.height
        }
    }
}

impl Bounds for Projectile {
    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Radius
    pub size: f32,
    /// Remaining life in ticks
    pub life: f32,
    initial_life: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, size: f32, color: Color, life: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            size,
            life,
            initial_life: life,
        }
    }

    /// Random spark around `center`
    pub fn spark<R: Rng + ?Sized>(center: Vec2, color: Color, rng: &mut R) -> Self {
        let vel = Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0));
        let size = rng.random_range(1.0..4.0);
        let life = rng.random_range(30.0..60.0);
        Self::new(center, vel, size, color, life)
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= 1.0;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Fade factor for rendering (1 = fresh, 0 = expired)
    pub fn alpha(&self) -> f32 {
        if self.initial_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.initial_life).clamp(0.0, 1.0)
    }
}

/// Draw a fresh enemy fire interval
fn roll_shoot_threshold<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random_range(ENEMY_SHOOT_MIN_MS..ENEMY_SHOOT_MAX_MS)
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG; every random draw goes through it
    pub rng: Pcg32,
    pub arena: Arena,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Waves cleared this run
    pub waves_cleared: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ship: Ship,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Horizontal sweep direction of the formation (+1 right, -1 left)
    pub sweep_direction: f32,
    /// Milliseconds accumulated toward the next enemy shot
    pub shoot_timer_ms: f32,
    /// Current enemy fire interval
    pub shoot_threshold_ms: f32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and the first wave
    pub fn new(seed: u64, arena: Arena) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let shoot_threshold_ms = roll_shoot_threshold(&mut rng);
        Self {
            seed,
            rng,
            arena,
            phase: GamePhase::Active,
            score: 0,
            lives: STARTING_LIVES,
            waves_cleared: 0,
            time_ticks: 0,
            ship: Ship::spawn(&arena),
            enemies: generate_wave(arena.width),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            particles: Vec::new(),
            sweep_direction: 1.0,
            shoot_timer_ms: 0.0,
            shoot_threshold_ms,
            events: Vec::new(),
        }
    }

    /// Restart the run in place. The RNG keeps its stream so restarts differ.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Active;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.waves_cleared = 0;
        self.time_ticks = 0;
        self.ship = Ship::spawn(&self.arena);
        self.enemies = generate_wave(self.arena.width);
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
        self.particles.clear();
        self.sweep_direction = 1.0;
        self.shoot_timer_ms = 0.0;
        self.shoot_threshold_ms = roll_shoot_threshold(&mut self.rng);
        self.events.clear();
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Fire from the ship. Returns false when rejected (game over or too many in flight).
    pub fn player_shoot(&mut self) -> bool {
        if self.is_game_over() || self.player_projectiles.len() >= MAX_PLAYER_PROJECTILES {
            return false;
        }
        self.player_projectiles.push(Projectile::from_ship(&self.ship));
        self.events.push(GameEvent::PlayerShot);
        true
    }

    /// Fire from a uniformly random enemy. No-op on an empty formation.
    pub fn enemy_shoot(&mut self) -> bool {
        if self.enemies.is_empty() {
            return false;
        }
        let index = self.rng.random_range(0..self.enemies.len());
        let projectile = Projectile::from_enemy(&self.enemies[index]);
        self.enemy_projectiles.push(projectile);
        self.events.push(GameEvent::EnemyShot);
        true
    }

    /// Redraw the enemy fire interval for the next cycle
    pub fn reroll_shoot_threshold(&mut self) {
        self.shoot_threshold_ms = roll_shoot_threshold(&mut self.rng);
    }

    /// Burst of sparks at `center`
    pub fn spawn_explosion(&mut self, center: Vec2, color: Color) {
        for _ in 0..EXPLOSION_PARTICLES {
            let particle = Particle::spark(center, color, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Latch into game over. Only the first call emits `GameEvent::GameOver`.
    pub fn enter_game_over(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!("Game over: score {} after {} waves", self.score, self.waves_cleared);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1, Arena::default());
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.len(), 50);
        assert!(state.shoot_threshold_ms >= 1000.0 && state.shoot_threshold_ms < 3000.0);
        assert_eq!(state.ship.pos, Vec2::new(375.0, 540.0));
        assert_eq!(state.ship.center(), Vec2::new(400.0, 555.0));
        assert_eq!(state.enemies[0].center(), Vec2::new(175.0, 65.0));
    }

    #[test]
    fn test_enemy_animation_flips_every_30_ticks() {
        let mut enemy = Enemy::new(Vec2::ZERO, Color::RED);
        for _ in 0..29 {
            enemy.update();
        }
        assert_eq!(enemy.frame, 0);
        enemy.update();
        assert_eq!(enemy.frame, 1);
        for _ in 0..30 {
            enemy.update();
        }
        assert_eq!(enemy.frame, 0);
    }

    #[test]
    fn test_particle_update() {
        let vel = Vec2::new(1.0, -1.0);
        let mut p = Particle::new(Vec2::new(10.0, 10.0), vel, 2.0, Color::RED, 2.0);
        p.update();
        assert_eq!(p.pos, Vec2::new(11.0, 9.0));
        assert!((p.vel.y - (-0.95)).abs() < 1e-6);
        assert_eq!(p.life, 1.0);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        p.update();
        assert!(!p.is_alive());
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn test_spark_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let p = Particle::spark(Vec2::ZERO, Color::CYAN, &mut rng);
            assert!(p.vel.x >= -2.0 && p.vel.x < 2.0);
            assert!(p.vel.y >= -2.0 && p.vel.y < 2.0);
            assert!(p.size >= 1.0 && p.size < 4.0);
            assert!(p.life >= 30.0 && p.life < 60.0);
            assert_eq!(p.alpha(), 1.0);
        }
    }

    #[test]
    fn test_projectile_exit() {
        let arena = Arena::default();
        let mut up = Projectile::from_ship(&Ship::spawn(&arena));
        assert_eq!(up.pos, Vec2::new(398.0, 540.0));
        up.pos.y = 5.0;
        up.update();
        assert!(up.is_out_of_arena(&arena));

        let mut down = Projectile::from_enemy(&Enemy::new(Vec2::new(100.0, 590.0), Color::RED));
        assert_eq!(down.pos, Vec2::new(113.0, 620.0));
        down.update();
        assert!(down.is_out_of_arena(&arena));
    }

    #[test]
    fn test_shoot_rate_limit() {
        let mut state = GameState::new(3, Arena::default());
        assert!(state.player_shoot());
        assert!(state.player_shoot());
        assert!(state.player_shoot());
        assert!(!state.player_shoot());
        assert_eq!(state.player_projectiles.len(), 3);
    }

    #[test]
    fn test_game_over_latches_once() {
        let mut state = GameState::new(3, Arena::default());
        state.enter_game_over();
        state.enter_game_over();
        let over_events = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::GameOver)
            .count();
        assert_eq!(over_events, 1);
        assert!(!state.player_shoot());
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_arena(
            start in 0.0f32..750.0,
            moves in proptest::collection::vec((any::<bool>(), 0.0f32..50.0), 0..64),
        ) {
            let arena = Arena::default();
            let mut ship = Ship::spawn(&arena);
            ship.pos.x = start;
            for (left, speed) in moves {
                if left {
                    ship.move_left(speed);
                } else {
                    ship.move_right(speed, arena.width);
                }
                prop_assert!(ship.pos.x >= 0.0);
                prop_assert!(ship.pos.x + ship.size.x <= arena.width);
            }
        }
    }
}
