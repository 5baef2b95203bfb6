//! Star Mixer entry point
//!
//! On the web, wires pointer input and the animation-frame loop to a mixing
//! session and hands render snapshots to the page's drawing code. Natively,
//! runs a scripted session headless and logs the score.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, PointerEvent};

    use star_mixer::audio::WebAudioCues;
    use star_mixer::sim::{MixPhase, PointerSample};
    use star_mixer::{CuePlayer, MixGame, MixTuning, QuantitySelector, Settings};

    /// Simulation space the page draws the bowl in
    const SIM_WIDTH: f32 = 1000.0;
    const SIM_HEIGHT: f32 = 600.0;

    // Drawing lives in the page; it receives one JSON snapshot per frame
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.starMixerFrame === 'function') {
                window.starMixerFrame(JSON.parse(json));
            }
        }

        export function present_instances(bytes) {
            if (typeof window.starMixerInstances === 'function') {
                window.starMixerInstances(bytes.slice());
            }
        }

        export function present_score(score) {
            if (typeof window.starMixerScore === 'function') {
                window.starMixerScore(score);
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn present_instances(bytes: &[u8]);
        fn present_score(score: u32);
    }

    /// Game instance holding all state
    struct Game {
        mix: MixGame,
        settings: Settings,
        selector: QuantitySelector,
        /// Shared with the session's cue port; dial cues play here directly
        audio: Rc<RefCell<WebAudioCues>>,
        /// Latest pointer sample in simulation coordinates
        pointer: PointerSample,
        canvas: HtmlCanvasElement,
    }

    impl Game {
        /// Convert client coordinates into simulation space
        fn to_sim(&self, client_x: f32, client_y: f32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let w = (rect.width() as f32).max(1.0);
            let h = (rect.height() as f32).max(1.0);
            Vec2::new(
                (client_x - rect.left() as f32) * SIM_WIDTH / w,
                (client_y - rect.top() as f32) * SIM_HEIGHT / h,
            )
        }

        fn start_session(&mut self) {
            match self.selector.confirm() {
                Ok(quantity) => self.mix.begin(quantity),
                Err(cue) => {
                    log::info!("Nothing selected to mix");
                    self.audio.borrow_mut().play(cue);
                }
            }
        }

        /// M toggles mute. Dial keys: Q/A, W/S and E/D roll the hundreds,
        /// tens and ones wheels; Enter pours. Dial keys are ignored while a
        /// session is live.
        fn handle_key(&mut self, key: &str) {
            if key == "m" {
                self.toggle_mute();
                return;
            }
            if self.mix.is_active() {
                return;
            }
            let roll = match key {
                "q" => Some((0, true)),
                "a" => Some((0, false)),
                "w" => Some((1, true)),
                "s" => Some((1, false)),
                "e" => Some((2, true)),
                "d" => Some((2, false)),
                _ => None,
            };
            if let Some((digit, up)) = roll {
                if let Some(cue) = self.selector.roll(digit, up) {
                    self.audio.borrow_mut().play(cue);
                }
                log::debug!("Dial at {}", self.selector.value());
            } else if key == "Enter" {
                self.start_session();
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.settings.save();
            self.audio.borrow_mut().apply_settings(&self.settings);
            log::info!("Cues {}", if self.settings.muted { "muted" } else { "unmuted" });
        }

        fn frame(&mut self) {
            let input = self.pointer;
            self.mix.step(&input);
            // One-shot input is consumed by the frame that saw it
            self.pointer.just_pressed = false;

            if self.mix.tutorial_seen() && !self.settings.knead_tutorial_seen {
                self.settings.knead_tutorial_seen = true;
                self.settings.save();
            }

            if let Some(view) = self.mix.render_state() {
                match serde_json::to_string(&view) {
                    Ok(json) => present_frame(&json),
                    Err(e) => log::warn!("Render snapshot failed: {}", e),
                }
                // Packed seed sprites for pages that draw with a GPU buffer
                present_instances(&view.instance_bytes());
            }
        }

        fn finish(&mut self) {
            if self.mix.phase() != Some(MixPhase::TimeUp) {
                return;
            }
            if let Some(score) = self.mix.end() {
                present_score(score.score);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Mixer starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("Canvas element #canvas not found");
            return;
        };

        let settings = Settings::load();
        let tuning = canvas
            .get_attribute("data-tuning")
            .and_then(|json| match MixTuning::from_json(&json) {
                Ok(tuning) => Some(tuning),
                Err(e) => {
                    log::warn!("Ignoring bad tuning override: {}", e);
                    None
                }
            })
            .unwrap_or_default();
        let quantity = attribute_u32(&canvas, "data-quantity").unwrap_or(10);
        let max = attribute_u32(&canvas, "data-max").unwrap_or(999);

        let audio = Rc::new(RefCell::new(WebAudioCues::new(&settings)));
        let seed = js_sys::Date::now() as u64;
        let mix = MixGame::new(tuning.clone(), seed)
            .with_tutorial_seen(settings.knead_tutorial_seen)
            .with_cue_player(Box::new(Rc::clone(&audio)))
            .with_material_consumer(|quantity| {
                log::info!("Consumed materials for {} stars", quantity);
            });
        log::info!("Mixer initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            mix,
            audio,
            settings,
            selector: QuantitySelector::new(quantity, max),
            pointer: PointerSample::idle(tuning.bowl_center),
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        game.borrow_mut().start_session();

        request_animation_frame(game);
        log::info!("Star Mixer running!");
    }

    fn attribute_u32(canvas: &HtmlCanvasElement, name: &str) -> Option<u32> {
        canvas.get_attribute(name)?.trim().parse().ok()
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                // Browsers only start audio after a user gesture
                g.audio.borrow().resume();
                let pos = g.to_sim(event.client_x() as f32, event.client_y() as f32);
                g.pointer = PointerSample::press(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.pointer.pos = g.to_sim(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for kind in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().pointer.pressed = false;
            });
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().handle_key(&event.key());
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Result screen "next" button scores the session
        if let Some(btn) = document.get_element_by_id("mix-next-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().finish();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaving early discards the session with no score
        if let Some(btn) = document.get_element_by_id("mix-cancel-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().mix.cancel();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mix-again-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start_session();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
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
    env_logger::init();
    log::info!("Star Mixer (native) starting...");
    log::info!("Native mode runs a scripted session - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let quantity = args.next().and_then(|q| q.parse().ok()).unwrap_or(10);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => star_mixer::MixTuning::default(),
    };

    let score = scripted_session(tuning, quantity);
    println!("Mixed {} stars, score {}/{}", quantity, score, star_mixer::consts::MAX_SCORE);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> star_mixer::MixTuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| star_mixer::MixTuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Using default tuning ({}: {})", path, e);
            star_mixer::MixTuning::default()
        }
    }
}

/// Pour, wait out the warm-up, then stir in circles until time runs out
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session(tuning: star_mixer::MixTuning, quantity: u32) -> u32 {
    use glam::Vec2;
    use star_mixer::MixGame;
    use star_mixer::sim::{MixPhase, PointerSample};

    let center = tuning.bowl_center;
    let mut game = MixGame::new(tuning, 2024)
        .with_tutorial_seen(true)
        .with_material_consumer(|q| log::info!("Consumed materials for {} stars", q));
    game.begin(quantity);

    let mut frame = 0u32;
    while game.phase().is_some_and(|p| p != MixPhase::TimeUp) {
        let angle = frame as f32 * 0.15;
        let pos = center + Vec2::new(angle.cos(), angle.sin()) * 90.0;
        let pressed = game.phase() == Some(MixPhase::Mixing);
        game.step(&PointerSample {
            pos,
            pressed,
            just_pressed: false,
        });
        frame += 1;
    }

    if let Some(view) = game.render_state() {
        log::info!(
            "Finished after {} frames at {:.1}% ({:?})",
            frame,
            view.progress,
            view.dough
        );
    }
    game.end().map(|s| s.score).unwrap_or(0)
}
