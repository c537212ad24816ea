//! Water pool - animated water with reflections, refraction and caustics.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use water_pool::cli::Args;
use water_pool::error::InitError;
use water_pool::input::InputState;
use water_pool::params::SceneParams;
use water_pool::rendering::RenderSystem;
use water_pool::scene::Scene;

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    scene: Scene,
    input: InputState,
    last_frame: Instant,
    /// Set when startup failed; the event loop exits and main reports it
    error: Option<InitError>,
}

impl App {
    fn new(params: SceneParams) -> Self {
        Self {
            window: None,
            render_system: None,
            scene: Scene::new(params),
            input: InputState::new(),
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), InitError> {
        let render = &self.scene.params.render;
        let window_attributes = Window::default_attributes()
            .with_title("Water Pool")
            .with_inner_size(winit::dpi::LogicalSize::new(
                render.window_width,
                render.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.scene))?;

        let (width, height) = render_system.size();
        self.scene.resize(width, height);

        log::info!("WASD move, Space/LCtrl up/down, arrows look, Space pauses, Esc quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
        Ok(())
    }

    /// Update the scene and render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let frame = self.scene.update(&mut self.input, dt);

        match render_system.render(&frame, &self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.scene.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => match (key, state) {
                (KeyCode::Escape, ElementState::Pressed) => event_loop.exit(),
                (key, ElementState::Pressed) => self.input.press(key),
                (key, ElementState::Released) => self.input.release(key),
            },
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

fn run(args: Args) -> Result<(), InitError> {
    let params = args.scene_params();
    params.validate().map_err(InitError::Config)?;

    log::info!(
        "Pool {}x{}m, grid {}x{}, caustics {}px, assets in {}",
        params.pool.floor_width_m,
        params.pool.floor_depth_m,
        params.pool.grid_cells_x,
        params.pool.grid_cells_z,
        params.pool.caustics_resolution,
        params.render.asset_root.display()
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
