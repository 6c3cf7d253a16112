use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::assets::Assets;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::event::Event;
use crate::geom::Color;
use crate::input::{DragTracker, PointerId};
use crate::render::{create_graphics, Graphics, GraphicsEvent};
use crate::scene::Scene;

/// Game logic driven by the engine.
pub trait Game {
    /// Called once before the window opens; register textures here.
    fn preload(&mut self, _assets: &mut Assets) {}

    fn handle(&mut self, scene: &mut Scene, event: &Event);
}

enum State {
    Ready(Graphics),
    Init(Option<EventLoopProxy<GraphicsEvent>>),
}

pub struct EngineContext {
    config: EngineConfig,
    event_loop: EventLoop<GraphicsEvent>,
}

struct App<G: Game> {
    state: State,
    config: EngineConfig,
    scene: Scene,
    tracker: DragTracker,
    game: G,
}

impl<G: Game> App<G> {
    fn new(event_loop: &EventLoop<GraphicsEvent>, config: EngineConfig, mut game: G) -> Self {
        let mut assets = Assets::new();
        game.preload(&mut assets);
        let viewport = Vec2::new(config.width as f32, config.height as f32);
        Self {
            state: State::Init(Some(event_loop.create_proxy())),
            config,
            scene: Scene::new(viewport, assets),
            tracker: DragTracker::new(),
            game,
        }
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }
        for event in &events {
            self.game.handle(&mut self.scene, event);
        }
        self.request_redraw();
    }

    fn request_redraw(&self) {
        if let State::Ready(gfx) = &self.state {
            gfx.request_redraw();
        }
    }

    fn draw(&mut self) {
        if let State::Ready(gfx) = &mut self.state {
            gfx.draw(&self.scene);
        }
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        if let State::Ready(gfx) = &mut self.state {
            gfx.resize(size);
        }
        let viewport = Vec2::new(size.width as f32, size.height as f32);
        if size.width == 0 || size.height == 0 || viewport == self.scene.viewport() {
            return;
        }
        log::debug!("viewport resized to {}x{}", size.width, size.height);
        self.scene.set_viewport(viewport);
        self.dispatch(vec![Event::Resize {
            width: size.width,
            height: size.height,
        }]);
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let position = Vec2::new(position.x as f32, position.y as f32);
        let events = self.tracker.pointer_moved(&self.scene, PointerId::Mouse, position);
        self.dispatch(events);
    }

    fn mouse_input(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let position = self.tracker.mouse_position();
        let events = match state {
            ElementState::Pressed => self.tracker.pointer_pressed(&self.scene, PointerId::Mouse, position),
            ElementState::Released => self.tracker.pointer_released(&self.scene, PointerId::Mouse, position),
        };
        self.dispatch(events);
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) {
        let pointer = PointerId::Touch(id);
        let position = Vec2::new(location.x as f32, location.y as f32);
        let events = match phase {
            TouchPhase::Started => self.tracker.pointer_pressed(&self.scene, pointer, position),
            TouchPhase::Moved => self.tracker.pointer_moved(&self.scene, pointer, position),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.tracker.pointer_released(&self.scene, pointer, position)
            }
        };
        self.dispatch(events);
    }

    fn keyboard(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if let PhysicalKey::Code(code) = event.physical_key {
            self.dispatch(vec![Event::Key(code)]);
        }
    }
}

impl<G: Game> ApplicationHandler<GraphicsEvent> for App<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let State::Init(proxy) = &mut self.state {
            if let Some(proxy) = proxy.take() {
                let mut win_attr = Window::default_attributes();

                #[cfg(not(target_arch = "wasm32"))]
                {
                    win_attr = win_attr
                        .with_title(self.config.title.clone())
                        .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
                }

                #[cfg(target_arch = "wasm32")]
                {
                    use winit::platform::web::WindowAttributesExtWebSys;
                    win_attr = win_attr.with_append(true);
                }

                let window = match event_loop.create_window(win_attr) {
                    Ok(window) => Arc::new(window),
                    Err(err) => {
                        log::error!("{}", EngineError::from(err));
                        event_loop.exit();
                        return;
                    }
                };
                let clear_color = Color::from_rgb_hex(self.config.clear_color);

                #[cfg(target_arch = "wasm32")]
                wasm_bindgen_futures::spawn_local(create_graphics(window, proxy, clear_color));

                #[cfg(not(target_arch = "wasm32"))]
                pollster::block_on(create_graphics(window, proxy, clear_color));
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsEvent) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                log::error!("graphics initialisation failed: {err}");
                event_loop.exit();
                return;
            }
        };
        let size = graphics.window().inner_size();
        self.state = State::Ready(graphics);
        if size.width > 0 && size.height > 0 {
            self.scene
                .set_viewport(Vec2::new(size.width as f32, size.height as f32));
        }
        log::info!("graphics ready, viewport {}", self.scene.viewport());
        self.dispatch(vec![Event::Init]);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::RedrawRequested => self.draw(),
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(state, button),
            WindowEvent::Touch(touch) => self.touch(touch.id, touch.phase, touch.location),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard(event),
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn run_app<G: Game + 'static>(event_loop: EventLoop<GraphicsEvent>, app: App<G>) -> Result<()> {
    // Sets up panics to go to the console.error in browser environments
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let level = app.config.log_filter.parse().unwrap_or(log::Level::Error);
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }

    // Runs the app async via the browsers event loop
    use winit::platform::web::EventLoopExtWebSys;
    event_loop.spawn_app(app);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn run_app<G: Game + 'static>(event_loop: EventLoop<GraphicsEvent>, mut app: App<G>) -> Result<()> {
    // Allows the setting of the log level through RUST_LOG env var.
    // It also allows wgpu logs to be seen.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(app.config.log_filter.as_str()),
    )
    .try_init();

    // Runs the app on the current thread.
    event_loop.run_app(&mut app)?;
    Ok(())
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let event_loop = EventLoop::<GraphicsEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        Ok(Self { config, event_loop })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens the window and hands control to the event loop until it exits.
    pub fn run<G: Game + 'static>(self, game: G) -> Result<()> {
        let app = App::new(&self.event_loop, self.config, game);
        run_app(self.event_loop, app)
    }
}
