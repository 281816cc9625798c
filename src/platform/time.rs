//! Frame timing

/// Turns consecutive `requestAnimationFrame` timestamps into tick deltas.
///
/// The first frame after construction or [`FrameClock::reset`] reports zero.
/// Later frames report the raw gap, so time spent in a background tab still
/// counts toward the enemy fire timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp (restart)
    pub fn reset(&mut self) {
        self.last_time = None;
    }

    /// Milliseconds since the previous frame
    pub fn delta_ms(&mut self, now: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last_time = Some(now);
        dt as f32
    }
}
