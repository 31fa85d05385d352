//! Pounce entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pounce::audio::WebAudioSink;
    use pounce::renderer::{Painter, RenderState, Scene, draw};
    use pounce::sim::{EntityKind, Viewport};
    use pounce::{Error, Result, Session, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        painter: Painter,
        canvas: HtmlCanvasElement,
        start_time: Option<f64>,
        last_time: f64,
        last_score: u64,
    }

    impl Game {
        fn new(session: Session, canvas: HtmlCanvasElement) -> Self {
            Self {
                session,
                render_state: None,
                painter: Painter::new(),
                canvas,
                start_time: None,
                last_time: 0.0,
                last_score: 0,
            }
        }

        /// Canvas-relative CSS pixel position of a client coordinate
        fn canvas_point(&self, client_x: i32, client_y: i32) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            (
                (client_x as f64 - rect.left()) as f32,
                (client_y as f64 - rect.top()) as f32,
            )
        }

        /// Match the backing store to the canvas' CSS size
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width();
            let client_h = self.canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            let viewport = Viewport::new(client_w as f32, client_h as f32);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, viewport);
            }
            self.session
                .resize(viewport.width, viewport.height, self.last_time);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let elapsed = time - self.start_time.unwrap_or(time);
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let scene = Scene::from_simulator(self.session.simulator(), elapsed);
            draw(&mut self.painter, &scene);

            match render_state.render(self.painter.vertices()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update the score readout in the DOM
        fn update_hud(&mut self) {
            let score = self.session.score();
            if score == self.last_score {
                return;
            }
            self.last_score = score;

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score.to_string()));
            }
        }
    }

    fn js_error(what: &str) -> Error {
        Error::Surface(format!("{what} unavailable"))
    }

    /// `?mode=bird` style selection; unknown names are a startup error
    fn requested_mode(window: &web_sys::Window) -> Result<EntityKind> {
        let search = window.location().search().unwrap_or_default();
        let mode = web_sys::UrlSearchParams::new_with_str(&search)
            .ok()
            .and_then(|params| params.get("mode"));
        match mode {
            Some(name) => name.parse(),
            None => Ok(EntityKind::default()),
        }
    }

    pub async fn run() -> Result<()> {
        log::info!("Pounce starting...");

        let window = web_sys::window().ok_or_else(|| js_error("window"))?;
        let document = window.document().ok_or_else(|| js_error("document"))?;

        let mode = requested_mode(&window)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_error("#canvas"))?
            .dyn_into()
            .map_err(|_| Error::Surface("#canvas is not a canvas".into()))?;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            mode,
            Tuning::default(),
            Settings::default(),
            Box::new(WebAudioSink::new()),
            seed,
        );
        let game = Rc::new(RefCell::new(Game::new(session, canvas.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let dpr = window.device_pixel_ratio();
        let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let width = (viewport.width as f64 * dpr) as u32;
        let height = (viewport.height as f64 * dpr) as u32;
        let render_state = RenderState::new(surface, &adapter, width, height, viewport).await?;

        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            // Spawn on the rAF clock so the first decisions are not already due
            if let Some(performance) = window.performance() {
                g.last_time = performance.now();
            }
            g.fit_canvas();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());
        setup_mode_keys(game.clone());

        request_animation_frame(game);

        log::info!("Pounce running in {} mode!", mode);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let (x, y) = g.canvas_point(event.client_x(), event.client_y());
                g.session.pointer(x, y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: every contact counts, for multi-paw pouncing
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let touches = event.touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let (x, y) = g.canvas_point(touch.client_x(), touch.client_y());
                        g.session.pointer(x, y);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Number keys 1-5 switch prey kind
    fn setup_mode_keys(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let index = match event.key().as_str() {
                "1" => 0,
                "2" => 1,
                "3" => 2,
                "4" => 3,
                "5" => 4,
                _ => return,
            };
            let mut g = game.borrow_mut();
            let now = g.last_time;
            g.session.set_mode(EntityKind::ALL[index], now);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.start_time.is_none() {
                g.start_time = Some(time);
            }
            g.last_time = time;

            g.session.frame(time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Pounce failed to start: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = native::run() {
        log::error!("{e}");
        eprintln!("pounce: {e}");
        std::process::exit(1);
    }
}

/// Headless demo: a simulated paw swats at the prey for a while
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use pounce::audio::LogSink;
    use pounce::consts::{DEMO_FRAMES, FRAME_MS};
    use pounce::renderer::{Painter, Scene, draw};
    use pounce::sim::EntityKind;
    use pounce::{Result, Session, Settings, Tuning};

    /// Frames between swats
    const SWAT_EVERY: u32 = 30;
    /// How far off target a swat can land (px)
    const SWAT_SPREAD: f32 = 60.0;

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let mode: EntityKind = match args.next() {
            Some(name) => name.parse()?,
            None => EntityKind::default(),
        };
        let tuning = match args.next() {
            Some(path) => Tuning::load(Path::new(&path))?,
            None => Tuning::default(),
        };

        log::info!("Pounce (native) starting...");
        log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let mut session = Session::new(mode, tuning, Settings::default(), Box::new(LogSink), seed);
        session.resize(1280.0, 800.0, 0.0);

        let mut paw = Pcg32::seed_from_u64(seed.rotate_left(17));
        let mut painter = Painter::new();
        let mut swats = 0u32;

        for frame in 0..DEMO_FRAMES {
            let now = frame as f64 * FRAME_MS;
            session.frame(now);

            if frame % SWAT_EVERY == 0 {
                let target = session
                    .simulator()
                    .entities()
                    .iter()
                    .find(|e| e.is_active())
                    .map(|e| e.pos);
                if let Some(target) = target {
                    let x = target.x + paw.random_range(-SWAT_SPREAD..SWAT_SPREAD);
                    let y = target.y + paw.random_range(-SWAT_SPREAD..SWAT_SPREAD);
                    session.pointer(x, y);
                    swats += 1;
                }
            }

            draw(&mut painter, &Scene::from_simulator(session.simulator(), now));
        }

        println!(
            "{} mode: {} catches from {} swats over {:.1}s ({} vertices in the last frame)",
            mode,
            session.score(),
            swats,
            DEMO_FRAMES as f64 * FRAME_MS / 1000.0,
            painter.vertices().len()
        );
        Ok(())
    }
}
