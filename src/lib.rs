//! Star Invaders - A wallet-gated arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, waves, collisions, tick)
//! - `session`: Game session owning state plus injected render/audio capabilities
//! - `renderer`: Surface abstraction and the scene draw pass
//! - `platform`: Browser/native platform abstraction (input, frame timing)
//! - `audio`: Sound effect capability

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (logical units)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Ship defaults
    pub const SHIP_WIDTH: f32 = 50.0;
    pub const SHIP_HEIGHT: f32 = 30.0;
    /// Ship spawns this far above the bottom edge
    pub const SHIP_BOTTOM_OFFSET: f32 = 60.0;
    /// Horizontal movement per tick
    pub const SHIP_SPEED: f32 = 5.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 4.0;
    pub const PROJECTILE_HEIGHT: f32 = 15.0;
    pub const PLAYER_PROJECTILE_SPEED: f32 = -10.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 5.0;
    /// Max player projectiles in flight
    pub const MAX_PLAYER_PROJECTILES: usize = 3;

    /// Enemy grid layout
    pub const ENEMY_ROWS: usize = 5;
    pub const ENEMY_COLS: usize = 10;
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_PADDING: f32 = 20.0;
    pub const ENEMY_GRID_TOP: f32 = 50.0;
    /// Full wave size, used by the sweep speed ramp
    pub const WAVE_SIZE: usize = ENEMY_ROWS * ENEMY_COLS;

    /// Base horizontal sweep speed (units/tick)
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    /// Vertical drop applied when the formation touches an edge
    pub const ENEMY_DESCENT: f32 = 20.0;
    /// Ticks between animation phase flips
    pub const ENEMY_ANIMATION_TICKS: u32 = 30;
    /// Enemies whose bottom edge reaches `ARENA_HEIGHT - DEFENSE_MARGIN` end the game
    pub const DEFENSE_MARGIN: f32 = 50.0;

    /// Enemy fire interval range (milliseconds, half-open)
    pub const ENEMY_SHOOT_MIN_MS: f32 = 1000.0;
    pub const ENEMY_SHOOT_MAX_MS: f32 = 3000.0;

    /// Particles
    pub const EXPLOSION_PARTICLES: usize = 15;
    pub const PARTICLE_GRAVITY: f32 = 0.05;

    /// Scoring
    pub const ENEMY_KILL_SCORE: u64 = 100;
    pub const WAVE_CLEAR_BONUS: u64 = 500;
    pub const STARTING_LIVES: u8 = 3;

    /// Background stars drawn per frame
    pub const STAR_COUNT: usize = 100;
}

/// Logical arena dimensions, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: consts::ARENA_WIDTH,
            height: consts::ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate enemies must not reach
    #[inline]
    pub fn defense_line(&self) -> f32 {
        self.height - consts::DEFENSE_MARGIN
    }
}

/// RGB color, rendered as a CSS hex string by the canvas backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const DARK_GREEN: Color = Color::rgb(0x00, 0x77, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::RED.to_css(), "#ff0000");
        assert_eq!(Color::DARK_GREEN.to_css(), "#007700");
    }

    #[test]
    fn test_defense_line() {
        assert_eq!(Arena::default().defense_line(), 550.0);
    }
}
