//! Vole entry point
//!
//! Browser: wires DOM input into the action queue and runs one tick per
//! animation frame. Native: plays a headless session with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent,
        PageTransitionEvent, TouchEvent, Window,
    };

    use vole::assets::{self, Assets, ImageKey, MUSIC_TRACK};
    use vole::audio::{Cue, CuePlayer, MusicPlayer};
    use vole::consts::BODY_DRAW_SIZE;
    use vole::renderer::{RenderState, build_scene};
    use vole::sim::{GamePhase, GameState, Playfield, tick};
    use vole::{ActionQueue, Settings, Tuning};

    /// Backing size in physical pixels and logical size in CSS pixels
    type CanvasSize = ((u32, u32), (f32, f32));

    /// Game instance holding all state
    struct Game {
        state: GameState,
        queue: ActionQueue,
        settings: Settings,
        render_state: Option<RenderState>,
        assets: Rc<RefCell<Assets>>,
        music: MusicPlayer,
        cues: CuePlayer,
        sprite: Option<HtmlElement>,
        /// Resize waiting to be applied at the start of the next tick
        pending_resize: Option<CanvasSize>,
        /// Pending animation frame, cancelled on teardown
        frame_id: Option<i32>,
        running: bool,
        // Last values pushed to the DOM
        shown_phase: Option<GamePhase>,
        shown_score: Option<u32>,
        shown_music: &'static str,
    }

    impl Game {
        /// Run one simulation tick
        fn update(&mut self, time: f64) {
            if let Some((size, logical)) = self.pending_resize.take() {
                self.state.resize(logical.0, logical.1);
                if let Some(render_state) = self.render_state.as_mut() {
                    render_state.resize(size, logical);
                }
            }

            let input = self.queue.take(time);
            tick(&mut self.state, &input);

            for event in &self.state.events {
                if let Some(cue) = Cue::for_event(event) {
                    self.cues.play(cue);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let sprite_ready = self.assets.borrow().player_sprite_ready();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state.snapshot(), &self.settings, sprite_ready);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Move the player sprite over the canvas, or hide it so the
        /// fallback circle shows
        fn update_sprite(&self) {
            let Some(sprite) = &self.sprite else { return };
            let style = sprite.style();
            if !self.assets.borrow().player_sprite_ready() {
                let _ = style.set_property("display", "none");
                return;
            }

            let snapshot = self.state.snapshot();
            let half = BODY_DRAW_SIZE / 2.0;
            let tilt = self.settings.effective_tilt(snapshot.body.tilt());
            let _ = style.set_property("display", "block");
            let _ = style.set_property(
                "transform",
                &format!(
                    "translate({:.2}px, {:.2}px) rotate({:.4}rad)",
                    snapshot.body_x - half,
                    snapshot.body.y - half,
                    tilt
                ),
            );
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let phase = self.state.phase;
            if self.shown_phase != Some(phase) {
                set_hidden(&document, "hud", !phase.shows_score());
                set_hidden(&document, "start-overlay", phase != GamePhase::Start);
                set_hidden(&document, "gameover-overlay", phase != GamePhase::GameOver);
                set_hidden(&document, "won-overlay", phase != GamePhase::Won);
                self.shown_phase = Some(phase);
            }

            let score = self.state.score;
            if self.shown_score != Some(score) {
                let text = score.to_string();
                set_text(&document, "score", &text);
                set_text(&document, "gameover-score", &text);
                self.shown_score = Some(score);
            }

            let label = self.music.label();
            if self.shown_music != label {
                set_text(&document, "music-btn", label);
                self.shown_music = label;
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn canvas_size(window: &Window, canvas: &HtmlCanvasElement) -> CanvasSize {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(0);
        let client_h = canvas.client_height().max(0);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        ((width, height), (client_w as f32, client_h as f32))
    }

    /// Tuning override from `data-tuning`, defaults on any problem
    fn load_tuning(canvas: &HtmlCanvasElement) -> Tuning {
        let Some(json) = canvas.get_attribute("data-tuning") else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Using tuning override: {:?}", tuning);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning override: {}", e);
                Tuning::default()
            }
        }
    }

    /// Presentation override from `data-settings`, defaults on any problem
    fn load_settings(canvas: &HtmlCanvasElement) -> Settings {
        let Some(json) = canvas.get_attribute("data-settings") else {
            return Settings::default();
        };
        Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring settings override: {}", e);
            Settings::default()
        })
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        (size, logical): CanvasSize,
        clear_color: [f32; 4],
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {:?}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {:?}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, size, logical, clear_color).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {:?}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Vole starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let canvas_dims = canvas_size(&window, &canvas);
        let ((width, height), (logical_w, logical_h)) = canvas_dims;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = load_tuning(&canvas);
        let mut settings = load_settings(&canvas);
        if let Some(hex) = canvas.get_attribute("data-pipe-color") {
            settings.set_pipe_color_hex(&hex);
        }

        // Images: the sim never waits on these
        let assets = Rc::new(RefCell::new(Assets::new()));
        let sprite = image_element(&document, "player-sprite");
        for (id, key) in [
            ("player-sprite", ImageKey::Player),
            ("pipe-image", ImageKey::Pipe),
            ("background", ImageKey::Background),
            ("won-box", ImageKey::WinBox),
        ] {
            if let Some(img) = image_element(&document, id) {
                assets::web::load_into(&img, key, assets.clone());
            }
        }

        let music = MusicPlayer::new(MUSIC_TRACK, settings.music_volume);
        music.autoplay();
        let cues = CuePlayer::new(settings.effective_sfx_volume());

        let render_state = init_renderer(canvas.clone(), canvas_dims, settings.background_color).await;
        if render_state.is_none() {
            log::warn!("Running without a renderer");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, Playfield::new(logical_w, logical_h), tuning),
            queue: ActionQueue::new(),
            settings,
            render_state,
            assets,
            music,
            cues,
            sprite: sprite.map(|img| img.unchecked_into::<HtmlElement>()),
            pending_resize: None,
            frame_id: None,
            running: true,
            shown_phase: None,
            shown_score: None,
            shown_music: "",
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());
        setup_teardown(game.clone());

        request_animation_frame(game);

        log::info!("Vole running!");
    }

    fn image_element(document: &Document, id: &str) -> Option<HtmlImageElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().queue.push_activate();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (default prevented so no emulated mousedown follows)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().queue.push_activate();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    // Keep the page from scrolling
                    event.prevent_default();
                    game.borrow_mut().queue.push_activate();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Restart controls on the game-over and win screens
        for id in ["restart-btn", "won-restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    event.stop_propagation();
                    game.borrow_mut().queue.push_restart();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Music toggle
        if let Some(btn) = document.get_element_by_id("music-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                game.borrow().music.toggle();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dims = canvas_size(&window_clone, &canvas);
            canvas.set_width(dims.0.0);
            canvas.set_height(dims.0.1);
            game.borrow_mut().pending_resize = Some(dims);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the frame loop when the page goes away; resume if it comes back
    /// from the back/forward cache
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PageTransitionEvent| {
                let mut g = game.borrow_mut();
                g.running = false;
                if let Some(id) = g.frame_id.take() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(id);
                    }
                }
                log::info!("Frame loop stopped");
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                let resume = {
                    let mut g = game.borrow_mut();
                    let resume = event.persisted() && !g.running;
                    g.running = true;
                    resume
                };
                if resume {
                    log::info!("Frame loop resumed");
                    request_animation_frame(game.clone());
                }
            });
            let _ =
                window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let game_clone = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().frame_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_id = None;
            if g.running {
                g.update(time);
                g.render();
                g.update_sprite();
                g.update_hud();
            }
            g.running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Vole (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let state = headless::run(seed);

    log::info!(
        "Session ended: {:?} with score {} after {} ticks",
        state.phase,
        state.score,
        state.time_ticks
    );
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use vole::ActionQueue;
    use vole::consts::BODY_SIZE;
    use vole::sim::{GameState, Playfield, tick};
    use vole::tuning::Tuning;

    /// One minute at 60 Hz
    const MAX_TICKS: u32 = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play one session from the title screen until it ends or times out
    pub fn run(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Playfield::new(440.0, 956.0), Tuning::default());
        let mut queue = ActionQueue::new();
        queue.push_activate();

        for frame in 0..MAX_TICKS {
            let input = queue.take(frame as f64 * FRAME_MS);
            tick(&mut state, &input);
            if state.phase.is_terminal() {
                break;
            }
            if wants_flap(&state) {
                queue.push_activate();
            }
        }
        state
    }

    /// Aim for a point in the lower part of the next gap. Far below it, flap
    /// every tick; close to it, flap only once falling again.
    fn wants_flap(state: &GameState) -> bool {
        let snap = state.snapshot();
        let body_left = snap.body_x - BODY_SIZE / 2.0;
        let target = snap
            .obstacles
            .iter()
            .find(|o| o.right(snap.pipe_width) >= body_left)
            .map(|o| o.gap_top + snap.pipe_gap * 0.65)
            .unwrap_or(snap.playfield.height / 2.0);

        let below = snap.body.y - target;
        below > 30.0 || (below > 0.0 && snap.body.velocity > 0.0)
    }
}
