//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only enters through the tick's `dt_ms`
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Bounds, Rect, collides, crossed_defense_line, is_colliding};
pub use state::{Enemy, GameEvent, GamePhase, GameState, Particle, Projectile, Ship};
pub use tick::{TickInput, sweep_speed, tick};
pub use wave::generate_wave;
