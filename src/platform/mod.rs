//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key names to tick intents)
//! - Frame timing (timestamps to tick deltas)

pub mod input;
pub mod time;

pub use input::KeyState;
pub use time::FrameClock;
