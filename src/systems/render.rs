//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Scene pipeline (skybox, objects, boundary)
//! - The egui overlay
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use shakebox_physics::PhysicsWorld;
use shakebox_render::{
    Camera, MeshDetail, ObjectInstances, Projection, RenderContext, RenderError, ScenePipeline,
    SceneUniforms,
};
use crate::config::{CameraConfig, RenderingConfig};
use crate::gui::{EguiFrameOutput, EguiIntegration};

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: ScenePipeline,
    egui: EguiIntegration,
    projection: Projection,
    /// Lighting and colors; camera fields are filled per frame
    base_uniforms: SceneUniforms,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// Fails if no adapter or device is available, or if a shader or
    /// pipeline does not validate.
    pub fn new(
        window: Arc<Window>,
        render_config: &RenderingConfig,
        camera_config: &CameraConfig,
        vsync: bool,
        boundary_size: f32,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::new(window.clone(), vsync))?;

        let detail = MeshDetail {
            sphere_latitudes: render_config.sphere_latitudes,
            sphere_longitudes: render_config.sphere_longitudes,
            round_segments: render_config.round_segments,
        };
        let mut pipeline = ScenePipeline::new(&context.device, context.config.format, detail)?;
        pipeline.ensure_depth_texture(&context.device, context.size.width, context.size.height);
        pipeline.set_boundary(&context.queue, boundary_size);

        let egui = EguiIntegration::new(&context.device, context.config.format, &window);

        let projection = Projection {
            fov_y: camera_config.fov,
            near: camera_config.near,
            far: camera_config.far,
        };

        Ok(Self {
            context,
            pipeline,
            egui,
            projection,
            base_uniforms: scene_uniforms(render_config),
            clear_color: clear_color(render_config.background_color),
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Reconfigure the surface after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Forward a window event to the GUI; true if it consumed the event
    pub fn on_gui_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui.on_window_event(window, event)
    }

    /// Whether the GUI has keyboard focus
    pub fn gui_wants_keyboard(&self) -> bool {
        self.egui.wants_keyboard_input()
    }

    /// Build this frame's GUI
    pub fn run_gui(
        &mut self,
        window: &Window,
        build_ui: impl FnMut(&egui::Context),
    ) -> EguiFrameOutput {
        self.egui.run(window, build_ui)
    }

    /// Render a single frame: scene pass, then the GUI on top
    pub fn render_frame(
        &mut self,
        camera: &Camera,
        world: &PhysicsWorld,
        gui: &EguiFrameOutput,
    ) -> Result<(), RenderError> {
        let uniforms = self
            .base_uniforms
            .with_camera(camera, &self.projection, self.context.aspect_ratio());
        self.pipeline.update_uniforms(&self.context.queue, &uniforms);

        let instances = ObjectInstances::from_world(world);
        self.pipeline
            .upload_instances(&self.context.device, &self.context.queue, &instances);

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline
            .render(&mut encoder, &view, self.clear_color, &instances)?;

        let size = [self.context.size.width, self.context.size.height];
        let gui_buffers = self.egui.render(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &view,
            size,
            gui,
        );

        self.context
            .queue
            .submit(gui_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

fn scene_uniforms(config: &RenderingConfig) -> SceneUniforms {
    let vec4 = |c: [f32; 3]| [c[0], c[1], c[2], 1.0];
    SceneUniforms {
        light_pos: vec4(config.light_position),
        light_color: vec4(config.light_color),
        sky_top: vec4(config.sky_top_color),
        sky_bottom: vec4(config.sky_bottom_color),
        line_color: vec4(config.boundary_color),
        ..SceneUniforms::default()
    }
}

fn clear_color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: c[0] as f64,
        g: c[1] as f64,
        b: c[2] as f64,
        a: c[3] as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_from_config() {
        let config = RenderingConfig {
            light_position: [1.0, 2.0, 3.0],
            boundary_color: [0.5, 0.5, 0.5],
            ..RenderingConfig::default()
        };
        let uniforms = scene_uniforms(&config);
        assert_eq!(uniforms.light_pos, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.line_color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(uniforms.sky_bottom, [0.118, 0.565, 1.0, 1.0]);
    }

    #[test]
    fn test_clear_color_conversion() {
        let color = clear_color([0.25, 0.5, 0.75, 1.0]);
        assert_eq!(color.r, 0.25);
        assert_eq!(color.g, 0.5);
        assert_eq!(color.b, 0.75);
        assert_eq!(color.a, 1.0);
    }
}
