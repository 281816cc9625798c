//! Game session
//!
//! Owns the game state plus the injected render and audio capabilities, turns
//! frame timestamps into ticks, and dispatches simulation events to sound and
//! the host's game over hook.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::Arena;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::STAR_COUNT;
use crate::platform::FrameClock;
use crate::renderer::{Surface, draw_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};

/// Stream offset so the starfield never shares draws with gameplay
const STAR_STREAM: u64 = 0x5eed_57a2;

type GameOverHook = Box<dyn FnMut(u64)>;

/// A running game bound to a surface and an audio sink
pub struct Session<S: Surface, A: AudioSink> {
    state: GameState,
    surface: S,
    audio: A,
    clock: FrameClock,
    star_rng: Pcg32,
    star_count: usize,
    running: bool,
    on_game_over: Option<GameOverHook>,
}

impl<S: Surface, A: AudioSink> Session<S, A> {
    /// Build a session with its first wave. Call [`Session::start`] to begin.
    pub fn new(seed: u64, arena: Arena, surface: S, audio: A) -> Self {
        Self {
            state: GameState::new(seed, arena),
            surface,
            audio,
            clock: FrameClock::new(),
            star_rng: Pcg32::seed_from_u64(seed ^ STAR_STREAM),
            star_count: STAR_COUNT,
            running: false,
            on_game_over: None,
        }
    }

    /// Apply visual preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.star_count = settings.effective_star_count();
    }

    /// Called with the final score once per transition into game over
    pub fn set_on_game_over(&mut self, hook: impl FnMut(u64) + 'static) {
        self.on_game_over = Some(Box::new(hook));
    }

    /// Begin or restart the run from a fresh state
    pub fn start(&mut self) {
        self.state.reset();
        self.clock.reset();
        self.running = true;
        log::info!("Session started (seed {})", self.state.seed);
    }

    /// Halt. Further frames are ignored until the next start.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Session stopped at score {}", self.state.score);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Player fire action outside the tick (e.g. a UI button). Ignored while stopped.
    pub fn shoot(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let fired = self.state.player_shoot();
        self.dispatch_events();
        fired
    }

    /// One scheduler callback: tick with the elapsed time, then draw
    pub fn frame(&mut self, timestamp_ms: f64, input: &TickInput) {
        if !self.running {
            return;
        }
        let dt_ms = self.clock.delta_ms(timestamp_ms);
        self.step(input, dt_ms);
        self.render();
    }

    /// Advance the simulation without drawing
    pub fn step(&mut self, input: &TickInput, dt_ms: f32) {
        tick(&mut self.state, input, dt_ms);
        self.dispatch_events();
    }

    pub fn render(&mut self) {
        draw_scene(
            &self.state,
            &mut self.surface,
            &mut self.star_rng,
            self.star_count,
        );
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            if event == GameEvent::GameOver {
                if let Some(hook) = self.on_game_over.as_mut() {
                    hook(self.state.score);
                }
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for scripted scenarios and debugging
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::audio::RecordingAudio;
    use crate::consts::*;
    use crate::renderer::{DrawCall, RecordingSurface};
    use crate::sim::{GamePhase, Projectile};

    type TestSession = Session<RecordingSurface, RecordingAudio>;

    fn started() -> TestSession {
        let mut session = Session::new(
            42,
            Arena::default(),
            RecordingSurface::new(),
            RecordingAudio::default(),
        );
        session.start();
        session
    }

    fn hit_ship(session: &mut TestSession) {
        let state = session.state_mut();
        let mut projectile = Projectile::from_ship(&state.ship);
        projectile.speed = ENEMY_PROJECTILE_SPEED;
        projectile.pos.y = state.ship.pos.y - 10.0;
        state.enemy_projectiles.push(projectile);
    }

    #[test]
    fn test_start_state() {
        let session = started();
        assert!(session.is_running());
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 3);
        assert_eq!(session.state().enemies.len(), 50);
        assert_eq!(session.state().phase, GamePhase::Active);
    }

    #[test]
    fn test_frame_ticks_and_draws() {
        let mut session = started();
        session.frame(1000.0, &TickInput::default());
        assert_eq!(session.state().time_ticks, 1);
        // First frame carries no elapsed time
        assert_eq!(session.state().shoot_timer_ms, 0.0);
        assert_eq!(session.surface().calls[0], DrawCall::Clear(crate::Color::BLACK));

        session.frame(1016.0, &TickInput::default());
        assert_eq!(session.state().shoot_timer_ms, 16.0);
    }

    #[test]
    fn test_stopped_session_ignores_frames() {
        let mut session = started();
        session.stop();
        session.frame(1000.0, &TickInput::default());
        session.frame(1016.0, &TickInput::default());
        assert_eq!(session.state().time_ticks, 0);
        assert!(session.surface().calls.is_empty());
    }

    #[test]
    fn test_stopped_session_ignores_shoot() {
        let mut session = started();
        session.stop();
        assert!(!session.shoot());
        assert!(session.state().player_projectiles.is_empty());
        assert!(session.audio().played.is_empty());
    }

    #[test]
    fn test_long_frame_gap_fires_enemy_shot() {
        let mut session = started();
        session.state_mut().shoot_threshold_ms = 1000.0;
        session.frame(0.0, &TickInput::default());
        session.frame(5000.0, &TickInput::default());

        assert_eq!(session.state().enemy_projectiles.len(), 1);
        assert_eq!(session.state().shoot_timer_ms, 0.0);
        assert_eq!(session.audio().played, vec![SoundEffect::EnemyShoot]);
    }

    #[test]
    fn test_rapid_shots_capped_and_sounded() {
        let mut session = started();
        let fired: Vec<bool> = (0..4).map(|_| session.shoot()).collect();
        assert_eq!(fired, vec![true, true, true, false]);
        assert_eq!(session.state().player_projectiles.len(), 3);
        assert_eq!(session.audio().played, vec![SoundEffect::Shoot; 3]);
    }

    #[test]
    fn test_kill_plays_explosion() {
        let mut session = started();
        let mut projectile = Projectile::from_ship(&session.state().ship);
        projectile.pos = Vec2::new(173.0, 70.0);
        session.state_mut().player_projectiles.push(projectile);

        session.step(&TickInput::default(), 0.0);

        assert_eq!(session.score(), 100);
        assert_eq!(session.state().enemies.len(), 49);
        assert_eq!(session.state().particles.len(), EXPLOSION_PARTICLES);
        assert_eq!(session.audio().played, vec![SoundEffect::Explosion]);
    }

    #[test]
    fn test_game_over_hook_fires_once() {
        let mut session = started();
        let calls = Rc::new(Cell::new(0u32));
        let final_score = Rc::new(Cell::new(None));
        {
            let calls = calls.clone();
            let final_score = final_score.clone();
            session.set_on_game_over(move |score| {
                calls.set(calls.get() + 1);
                final_score.set(Some(score));
            });
        }
        session.state_mut().score = 700;

        for _ in 0..3 {
            hit_ship(&mut session);
            session.step(&TickInput::default(), 0.0);
        }
        assert_eq!(session.lives(), 0);
        assert_eq!(session.state().phase, GamePhase::GameOver);

        // Latched: more hits and frames change nothing
        hit_ship(&mut session);
        for t in 0..10 {
            session.frame(t as f64 * 16.0, &TickInput::default());
        }
        assert_eq!(session.lives(), 0);
        assert_eq!(calls.get(), 1);
        assert_eq!(final_score.get(), Some(700));

        let played = &session.audio().played;
        assert_eq!(played.iter().filter(|e| **e == SoundEffect::PlayerHit).count(), 3);
        assert_eq!(played.last(), Some(&SoundEffect::GameOver));
        assert_eq!(
            session.surface().last_frame_text(),
            vec!["GAME OVER", "Final Score: 700"]
        );
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = started();
        session.state_mut().score = 2300;
        session.shoot();
        session.state_mut().enemies.truncate(7);
        session.state_mut().enter_game_over();
        session.step(&TickInput::default(), 0.0);
        session.state_mut().spawn_explosion(Vec2::new(10.0, 10.0), crate::Color::RED);

        session.start();

        let state = session.state();
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.enemies.len(), 50);
        assert!(state.player_projectiles.is_empty());
        assert!(state.enemy_projectiles.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.ship.pos, Vec2::new(375.0, 540.0));

        // Clock restarted: a late first frame adds no time
        session.frame(987_654.0, &TickInput::default());
        assert_eq!(session.state().shoot_timer_ms, 0.0);
    }

    #[test]
    fn test_game_over_hook_fires_again_after_restart() {
        let mut session = started();
        let calls = Rc::new(Cell::new(0u32));
        {
            let calls = calls.clone();
            session.set_on_game_over(move |_| calls.set(calls.get() + 1));
        }
        session.state_mut().enemies[0].pos.y = 540.0;
        session.step(&TickInput::default(), 0.0);
        session.start();
        session.state_mut().enemies[0].pos.y = 540.0;
        session.step(&TickInput::default(), 0.0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_starfield_setting() {
        let mut session = started();
        session.apply_settings(&Settings {
            starfield: false,
            ..Default::default()
        });
        session.render();
        let circles = session
            .surface()
            .last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle(..)))
            .count();
        assert_eq!(circles, 0);
    }
}
