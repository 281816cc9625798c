//! Star Invaders entry point
//!
//! On the web the wallet gate calls the exported `start_game` once the player
//! is connected; the frame loop then runs on `requestAnimationFrame` until
//! `stop_game`. The native binary runs a short headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use star_invaders::audio::AudioManager;
    use star_invaders::platform::KeyState;
    use star_invaders::platform::input::KeyAction;
    use star_invaders::renderer::CanvasSurface;
    use star_invaders::{Arena, Session, Settings};

    const CANVAS_ID: &str = "game-canvas";
    const SCORE_ID: &str = "score";
    const LIVES_ID: &str = "lives";
    const RESTART_ID: &str = "restart-button";

    /// Browser host holding the session and the frame loop handle
    struct Host {
        session: Session<CanvasSurface, AudioManager>,
        keys: KeyState,
        settings: Settings,
        /// Pending `requestAnimationFrame` id, if a frame is scheduled
        frame_handle: Option<i32>,
        /// Last (score, lives) written to the HUD
        hud: Option<(u64, u8)>,
    }

    impl Host {
        fn update_hud(&mut self) {
            let current = (self.session.score(), self.session.lives());
            if self.hud == Some(current) {
                return;
            }
            self.hud = Some(current);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id(SCORE_ID) {
                el.set_text_content(Some(&format!("Score: {}", current.0)));
            }
            if let Some(el) = document.get_element_by_id(LIVES_ID) {
                el.set_text_content(Some(&format!("Lives: {}", current.1)));
            }
        }

        /// Flip sound on or off and persist the choice
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.session.audio_mut().apply_settings(&self.settings);
            self.settings.save();
            log::info!("Sound {}", if muted { "off" } else { "on" });
        }

        /// Cancel the pending frame so no further ticks fire
        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    if let Err(e) = window.cancel_animation_frame(handle) {
                        log::warn!("cancelAnimationFrame failed: {:?}", e);
                    }
                }
            }
        }
    }

    thread_local! {
        static HOST: RefCell<Option<Rc<RefCell<Host>>>> = const { RefCell::new(None) };
    }

    fn current_host() -> Option<Rc<RefCell<Host>>> {
        HOST.with(|h| h.borrow().clone())
    }

    fn set_restart_visible(visible: bool) {
        let button = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(RESTART_ID))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(button) = button {
            let display = if visible { "block" } else { "none" };
            let _ = button.style().set_property("display", display);
        }
    }

    fn create_host() -> Result<Rc<RefCell<Host>>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| JsValue::from_str("no game canvas"))?
            .dyn_into()?;

        let arena = Arena::default();
        let surface = CanvasSurface::new(&canvas, arena.width as u32, arena.height as u32)?;

        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(seed, arena, surface, audio);
        session.apply_settings(&settings);
        session.set_on_game_over(|score| {
            log::info!("Final score: {}", score);
            set_restart_visible(true);
        });

        log::info!("Game initialized with seed: {}", seed);

        let host = Rc::new(RefCell::new(Host {
            session,
            keys: KeyState::new(),
            settings,
            frame_handle: None,
            hud: None,
        }));

        setup_input_handlers(host.clone())?;
        setup_restart_button()?;

        Ok(host)
    }

    fn setup_input_handlers(host: Rc<RefCell<Host>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut h = host.borrow_mut();
                if KeyAction::from_key(&key) == Some(KeyAction::Mute) && !event.repeat() {
                    h.toggle_mute();
                }
                if h.keys.key_down(&key) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut().keys.key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: keys released elsewhere never reach us
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                host.borrow_mut().keys.release_all();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let Some(button) = document.get_element_by_id(RESTART_ID) else {
            log::warn!("No #{} element, restart only via start_game()", RESTART_ID);
            return Ok(());
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            if let Err(e) = start() {
                log::error!("Restart failed: {:?}", e);
            }
        });
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = host.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(next, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => host.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            h.frame_handle = None;
            if !h.session.is_running() {
                return;
            }

            let input = h.keys.take_input();
            h.session.frame(time, &input);
            h.update_hud();
        }

        request_animation_frame(host);
    }

    /// Begin or restart the game
    pub fn start() -> Result<(), JsValue> {
        let host = match current_host() {
            Some(host) => host,
            None => {
                let host = create_host()?;
                HOST.with(|h| *h.borrow_mut() = Some(host.clone()));
                host
            }
        };

        set_restart_visible(false);
        {
            let mut h = host.borrow_mut();
            h.keys.release_all();
            h.session.start();
            h.hud = None;
            h.update_hud();
        }

        if host.borrow().frame_handle.is_none() {
            request_animation_frame(host);
        }
        Ok(())
    }

    /// Halt the game and deregister the pending frame
    pub fn stop() {
        if let Some(host) = current_host() {
            let mut h = host.borrow_mut();
            h.session.stop();
            h.cancel_frame();
        }
    }
}

/// Called by the wallet gate once the player is connected
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    wasm_game::start()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    wasm_game::stop();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }
    log::info!("Star Invaders loaded, waiting for wallet");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use star_invaders::audio::SilentAudio;
    use star_invaders::renderer::RecordingSurface;
    use star_invaders::sim::TickInput;
    use star_invaders::{Arena, Session, Settings};

    env_logger::init();
    log::info!("Star Invaders (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");

    let seed = 2024;
    let mut session = Session::new(seed, Arena::default(), RecordingSurface::new(), SilentAudio);
    session.apply_settings(&Settings::load());
    session.set_on_game_over(|score| log::info!("Demo over, final score {}", score));
    session.start();

    // Simple autopilot: sweep back and forth, firing whenever possible
    let mut time = 0.0;
    let mut heading_left = false;
    for frame in 0..3_600u32 {
        let ship_x = session.state().ship.pos.x;
        if ship_x <= 0.0 {
            heading_left = false;
        } else if ship_x >= session.state().arena.width - session.state().ship.size.x {
            heading_left = true;
        }
        let input = TickInput {
            move_left: heading_left,
            move_right: !heading_left,
            fire: frame % 8 == 0,
        };
        session.frame(time, &input);
        time += 1000.0 / 60.0;

        if session.state().is_game_over() && session.state().particles.is_empty() {
            break;
        }
    }

    println!(
        "Demo finished: score {}, lives {}, waves cleared {}, {} draw calls last frame",
        session.score(),
        session.lives(),
        session.state().waves_cleared,
        session.surface().last_frame().len()
    );
}
