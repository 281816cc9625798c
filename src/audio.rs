//! Audio capability
//!
//! The simulation only ever asks for "play effect K". In the browser the
//! effects are procedurally generated with the Web Audio API.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// An enemy fires
    EnemyShoot,
    /// Enemy destroyed
    Explosion,
    /// Ship hit
    PlayerHit,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerShot => Some(SoundEffect::Shoot),
            GameEvent::EnemyShot => Some(SoundEffect::EnemyShoot),
            GameEvent::EnemyDestroyed => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit => Some(SoundEffect::PlayerHit),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            GameEvent::WaveCleared => None,
        }
    }
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every effect (headless runs, native builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Remembers every effect played, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Combined master/sfx volume, 0 when muted
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effective_volume(),
            }
        }

        /// Apply volume/mute preferences
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One oscillator with an exponential gain fade and optional pitch sweep
        fn blip(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            freq: (f32, Option<f32>),
            peak_gain: f32,
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq.0, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(peak_gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + duration)
                .ok();
            osc.frequency().set_value_at_time(freq.0, t).ok();
            if let Some(end) = freq.1 {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + duration)
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + duration).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                // Short square chirp
                SoundEffect::Shoot => {
                    self.blip(ctx, OscillatorType::Square, (440.0, None), vol * 0.1, 0.2)
                }
                // Lower, buzzier chirp
                SoundEffect::EnemyShoot => {
                    self.blip(ctx, OscillatorType::Sawtooth, (220.0, None), vol * 0.1, 0.3)
                }
                SoundEffect::Explosion => self.blip(
                    ctx,
                    OscillatorType::Square,
                    (100.0, Some(20.0)),
                    vol * 0.3,
                    0.3,
                ),
                SoundEffect::PlayerHit => self.blip(
                    ctx,
                    OscillatorType::Sine,
                    (300.0, Some(150.0)),
                    vol * 0.3,
                    0.5,
                ),
                // Slow descending tone
                SoundEffect::GameOver => self.blip(
                    ctx,
                    OscillatorType::Sine,
                    (220.0, Some(110.0)),
                    vol * 0.3,
                    1.0,
                ),
            }
        }
    }
}
