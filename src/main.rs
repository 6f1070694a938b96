//! Shakebox - a window-shake rigid-body sandbox
//!
//! Spawn shapes into a walled box, then drag the window around to shake them.

use glam::Vec3;
use rand::rngs::ThreadRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use shakebox::config::AppConfig;
use shakebox::gui;
use shakebox::input::{InputAction, InputMapper};
use shakebox::systems::{RenderSystem, SimulationSystem, WindowSystem};
use shakebox_input::{CameraController, ShakeTracker};
use shakebox_physics::{PhysicsSettings, PhysicsWorld};
use shakebox_render::{Camera, RenderError};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    /// Live-tunable settings edited by the GUI
    settings: PhysicsSettings,
    world: PhysicsWorld,
    camera: Camera,
    controller: CameraController,
    shake: ShakeTracker,
    simulation: SimulationSystem,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    rng: ThreadRng,
    /// Set when start-up failed and the process should exit non-zero
    failed: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let mut world = PhysicsWorld::with_config(config.physics.to_physics_config());
        world.create_boundary_walls();

        let camera = Camera::new(
            Vec3::from(config.camera.start_position),
            config.camera.yaw,
            config.camera.pitch,
        )
        .with_pitch_limit(config.camera.pitch_limit);

        let controller = CameraController::new()
            .with_move_speed(config.camera.move_speed)
            .with_rotation_speed(config.camera.rotation_speed);

        Self {
            settings: config.settings,
            world,
            camera,
            controller,
            shake: ShakeTracker::new(config.physics.shake_threshold),
            simulation: SimulationSystem::new(),
            window: None,
            render: None,
            rng: rand::thread_rng(),
            failed: false,
            config,
        }
    }

    /// Create the window and GPU state
    fn init_graphics(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let window = WindowSystem::create(event_loop, &self.config.window)?;
        let render = RenderSystem::new(
            window.window().clone(),
            &self.config.rendering,
            &self.config.camera,
            self.config.window.vsync,
            self.config.physics.boundary_size,
        )?;

        let (width, height) = render.size();
        log::info!("Renderer ready at {}x{}", width, height);

        self.window = Some(window);
        self.render = Some(render);
        Ok(())
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                self.camera.reset();
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
        }
    }

    /// One frame: simulate, build the GUI, apply its actions and the shake, render
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let step = self
            .simulation
            .update(&mut self.world, &mut self.camera, &mut self.controller);
        if step.substeps > 0 {
            log::debug!("Stepped {} substeps over {:.4}s", step.substeps, step.dt);
        }

        let (Some(window), Some(render)) = (&self.window, &mut self.render) else {
            return;
        };

        let object_count = self.world.object_count();
        let settings = &mut self.settings;
        let mut actions = Vec::new();
        let gui_output = render.run_gui(window.window(), |ctx| {
            actions = gui::show(ctx, settings, object_count);
        });

        let spawn_position = self.config.physics.spawn_position;
        for action in actions {
            gui::apply_action(action, &mut self.world, &self.settings, spawn_position);
        }

        SimulationSystem::apply_shake(
            &mut self.world,
            &mut self.shake,
            &self.settings,
            &mut self.rng,
        );

        let (Some(window), Some(render)) = (&mut self.window, &mut self.render) else {
            return;
        };
        window.update_title(self.world.object_count());

        match render.render_frame(&self.camera, &self.world, &gui_output) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => render.reconfigure(),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Initialization failed: {}", e);
            self.failed = true;
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // The GUI sees every event first
        let gui_consumed = match (&self.window, &mut self.render) {
            (Some(window), Some(render)) => render.on_gui_event(window.window(), &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::Focused(focused) => {
                self.controller.on_focus_changed(focused);
            }

            WindowEvent::Moved(position) => {
                self.shake
                    .on_window_moved(position.x, position.y, !self.world.is_empty());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let gui_focused = gui_consumed
                    || self.render.as_ref().is_some_and(|r| r.gui_wants_keyboard());

                // Releases always reach the controller so no key stays held
                if gui_focused && event.state == ElementState::Pressed {
                    return;
                }
                if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                    self.handle_action(action, event_loop);
                }
                self.controller.process_keyboard(key, event.state);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    // Load configuration before logging so the log level can come from it
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Shakebox");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
    if app.failed {
        std::process::exit(1);
    }
}
