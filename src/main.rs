//! Capi Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use capi_jump::audio::{Chiptune, WebSynth};
    use capi_jump::consts::*;
    use capi_jump::platform::{InputState, Key};
    use capi_jump::renderer::CanvasRenderer;
    use capi_jump::sim::GamePhase;
    use capi_jump::{HudSnapshot, Session, Settings};

    /// Everything the browser callbacks share
    struct Game {
        session: Session<Chiptune<WebSynth>>,
        renderer: CanvasRenderer,
        input: InputState,
        document: Document,
        /// Pending requestAnimationFrame handle
        frame_handle: Option<i32>,
        /// HUD setInterval handle
        hud_handle: Option<i32>,
        stopped: bool,
    }

    impl Game {
        fn update(&mut self, now: f64) {
            if self.input.take_activate() {
                let seed = js_sys::Date::now() as u64;
                if self.session.activate(now, seed) {
                    self.set_overlay(GamePhase::Playing);
                }
            }
            let intent = self.input.intent();
            self.session.frame(now, intent);
        }

        /// Browsers only start audio from inside a user gesture
        fn unlock_audio(&self) {
            self.session.audio().synth().resume();
        }

        fn render(&self, now: f64) {
            self.renderer.render(&self.session.scene(now));
        }

        /// Driven by setInterval, which already paces the sampling
        fn update_hud(&self, now: f64) {
            let hud = self.session.hud(now);
            self.write_hud(&hud);
            self.set_overlay(hud.phase);
        }

        fn write_hud(&self, hud: &HudSnapshot) {
            self.set_text("score", &hud.score.to_string());
            self.set_text("lives", &"♥".repeat(hud.lives as usize));
            self.set_text("level", &hud.level.to_string());
            self.set_text(
                "golden",
                &hud.golden_secs.map(|s| format!("{s}s")).unwrap_or_default(),
            );
            self.set_text(
                "boss-hp",
                &hud.boss_hp
                    .map(|(hp, max)| format!("{hp}/{max}"))
                    .unwrap_or_default(),
            );
            self.set_text(
                "high-score",
                &hud.high_score.unwrap_or(0).to_string(),
            );
            self.set_text("music", if hud.music_on { "♪ ON" } else { "♪ OFF" });
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Show the screen matching `phase`, hide the others
        fn set_overlay(&self, phase: GamePhase) {
            let screens = [
                ("start-screen", GamePhase::Start),
                ("game-over-screen", GamePhase::GameOver),
                ("win-screen", GamePhase::Win),
            ];
            for (id, shown_in) in screens {
                if let Some(el) = self.document.get_element_by_id(id) {
                    let class = if phase == shown_in { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }

        /// Stop the loops and silence the session
        fn teardown(&mut self) {
            if self.stopped {
                return;
            }
            self.stopped = true;
            if let Some(window) = web_sys::window() {
                if let Some(handle) = self.frame_handle.take() {
                    let _ = window.cancel_animation_frame(handle);
                }
                if let Some(handle) = self.hud_handle.take() {
                    window.clear_interval_with_handle(handle);
                }
            }
            self.input.clear();
            self.session.dispose();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Capi Jump starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };
        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::default();
        let synth = WebSynth::new(settings.master_volume);
        let audio = Chiptune::new(synth, settings.music_enabled, settings.sfx_enabled);

        let game = Rc::new(RefCell::new(Game {
            session: Session::new(&settings, audio),
            renderer,
            input: InputState::new(),
            document,
            frame_handle: None,
            hud_handle: None,
            stopped: false,
        }));
        game.borrow().set_overlay(GamePhase::Start);

        setup_input_handlers(&canvas, game.clone());
        setup_hud_sampler(game.clone());
        setup_teardown(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Capi Jump running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(key) = Key::from_dom(&event.key()) {
                    event.prevent_default();
                    if !event.repeat() {
                        g.input.key_down(key);
                        g.unlock_audio();
                    }
                    return;
                }
                if matches!(event.key().as_str(), "m" | "M") && !event.repeat() {
                    g.session.toggle_music();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f64 - rect.left();
                let mut g = game.borrow_mut();
                g.input.pointer_down(x as f32, rect.width() as f32);
                g.unlock_audio();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    let mut g = game.borrow_mut();
                    g.input.pointer_down(x as f32, rect.width() as f32);
                    g.unlock_audio();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if event.touches().length() == 0 {
                    game.borrow_mut().input.pointer_up();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_hud_sampler(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_clone = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let g = game_clone.borrow();
            if !g.stopped {
                g.update_hud(now_ms());
            }
        });
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            HUD_SAMPLE_MS as i32,
        );
        closure.forget();
        game.borrow_mut().hud_handle = handle.ok();
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
            log::info!("Capi Jump stopped");
        });
        let _ = window
            .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_clone = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_clone, time);
        });
        let handle = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
        game.borrow_mut().frame_handle = handle.ok();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if g.stopped {
                return;
            }
            g.update(time);
            g.render(time);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use capi_jump::audio::SilentAudio;
    use capi_jump::consts::SIM_DT_MS;
    use capi_jump::session::autopilot;
    use capi_jump::sim::{GamePhase, Intent};
    use capi_jump::{Session, Settings};

    env_logger::init();
    log::info!("Capi Jump (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::from_path(std::path::Path::new(&path)) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring settings file {}: {}", path, err);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let entropy = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut session = Session::new(&settings, SilentAudio::new(settings.music_enabled));
    let mut runs = 0u32;
    for frame in 0..settings.frames {
        let now = frame as f64 * SIM_DT_MS;
        if session.world().phase != GamePhase::Playing
            && session.activate(now, entropy.wrapping_add(runs as u64))
        {
            runs += 1;
        }
        let intent = if settings.autopilot {
            autopilot(session.world())
        } else {
            Intent::None
        };
        session.frame(now, intent);
        if let Some(hud) = session.sample_hud(now) {
            log::trace!("{:?}", hud);
        }
    }

    let hud = session.hud(settings.frames as f64 * SIM_DT_MS);
    log::info!(
        "{} frames, {} runs; last run: score {} level {} lives {} ({:?})",
        settings.frames,
        runs,
        hud.score,
        hud.level,
        hud.lives,
        hud.phase
    );
    for (rank, entry) in session.high_scores().entries.iter().enumerate() {
        log::info!(
            "#{:>2} {:>6} level {:>3} {:?}",
            rank + 1,
            entry.score,
            entry.level,
            entry.outcome
        );
    }
    session.dispose();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
