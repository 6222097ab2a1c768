//! WGPU-based rendering engine for the demo scenes
//!
//! Owns the surface, device and pipelines. Each frame draws the scene into
//! an HDR target, runs the post-processing chain into the surface and lets
//! the UI draw on top.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    error::RenderError,
    gfx::{
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            texture_resource::TextureResource,
        },
        scene::{
            lighting::srgb_to_linear,
            object::{DrawObject, Shading},
            scene::Scene,
        },
    },
    wgpu_utils::{
        binding_builder::{BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    post_process::PostProcessChain,
    shaders,
};

/// Core rendering engine managing GPU resources and draw calls
///
/// - Surface and device management
/// - Pipeline creation for every [`Shading`] and post-processing pass
/// - Camera and light uniform updates
/// - UI overlay rendering
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    /// Format the surface is viewed as; never sRGB, the composite encodes
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    post_process: PostProcessChain,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Initial surface size in pixels
    /// * `vsync` - Whether presentation waits for the display refresh
    ///
    /// # Errors
    /// Returns [`RenderError`] when no adapter or device is available or a
    /// shader or pipeline fails to build.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let format = surface_format.remove_srgb_suffix();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: choose_present_mode(vsync, &surface_capabilities.present_modes),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: if format == surface_format {
                vec![]
            } else {
                vec![format]
            },
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Object Bind Group Layout");

        let post_process = PostProcessChain::new(&device, config.width, config.height);

        // Wrap device and queue in Arc for pipeline manager
        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        for (name, source) in shaders::all_shaders()? {
            pipeline_manager.load_shader(name, &source)?;
        }

        let scene_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            object_layout.layout.clone(),
        ];
        let scene_pipeline = |shader: &str| {
            PipelineConfig::default_with_shader(shader)
                .with_label(shader)
                .with_bind_group_layouts(scene_layouts.clone())
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(TextureResource::HDR_FORMAT)
        };

        pipeline_manager.register_pipeline(Shading::Cell.pipeline_name(), scene_pipeline("cell"));
        pipeline_manager.register_pipeline(Shading::Blob.pipeline_name(), scene_pipeline("blob"));
        pipeline_manager.register_pipeline(
            Shading::BlobWireframe.pipeline_name(),
            scene_pipeline("blob")
                .with_label("blob wireframe")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None),
        );
        pipeline_manager.register_pipeline(
            Shading::Lines.pipeline_name(),
            scene_pipeline("lines")
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_cull_mode(None),
        );

        for pass in ["bloom_bright", "bloom_blur"] {
            pipeline_manager.register_pipeline(
                pass,
                PipelineConfig::default_with_shader(pass)
                    .with_label(pass)
                    .with_bind_group_layouts(vec![post_process.bloom_layout().clone()])
                    .with_color_format(TextureResource::HDR_FORMAT)
                    .with_cull_mode(None)
                    .with_no_vertex_buffers(),
            );
        }
        pipeline_manager.register_pipeline(
            "composite",
            PipelineConfig::default_with_shader("composite")
                .with_label("composite")
                .with_bind_group_layouts(vec![post_process.composite_layout().clone()])
                .with_color_format(format)
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| {
                for error in &errors {
                    log::error!("{}", error);
                }
                RenderError::Pipelines(errors)
            })?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            post_process,
        })
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// Surface loss reconfigures and skips the frame; the next redraw
    /// renders normally.
    ///
    /// # Arguments
    /// * `scene` - Scene to draw; missing GPU resources are created here
    /// * `ui_callback` - Optional function that records UI draws onto the surface view
    pub fn render_frame<F>(&mut self, scene: &mut Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("Surface timed out, skipping frame");
                return;
            }
            Err(error) => {
                log::error!("Failed to acquire surface texture: {}", error);
                return;
            }
        };

        let surface_texture_view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.format),
            ..Default::default()
        });

        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera_manager.camera.uniform,
            &scene.lighting,
        );
        scene.prepare_gpu_resources(&self.device, &self.queue, &self.object_layout);
        self.post_process.update(&self.queue, &scene.post_process);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: Scene into the HDR target
        {
            let [r, g, b] = scene.background.map(srgb_to_linear);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post_process.scene_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.post_process.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            let mut current: Option<Shading> = None;
            for object in scene.objects.iter().filter(|object| object.visible) {
                if current != Some(object.shading) {
                    let Some(pipeline) = self
                        .pipeline_manager
                        .pipeline(object.shading.pipeline_name())
                    else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    current = Some(object.shading);
                }
                render_pass.draw_object(object);
            }
        }

        // PASS 2: Bloom and tone mapping into the surface
        self.post_process.encode(
            &mut encoder,
            &self.pipeline_manager,
            &scene.post_process,
            &surface_texture_view,
        );

        // PASS 3: UI overlay (if provided)
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the surface and every offscreen target
    ///
    /// Zero sizes (minimised windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.post_process.resize(&self.device, width, height);
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Format UI renderers must target
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn choose_present_mode(vsync: bool, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|mode| supported.contains(mode))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::PresentMode;

    #[test]
    fn test_present_mode_selection() {
        let all = [PresentMode::Fifo, PresentMode::Mailbox, PresentMode::Immediate];
        assert_eq!(choose_present_mode(true, &all), PresentMode::Fifo);
        assert_eq!(choose_present_mode(false, &all), PresentMode::Immediate);
        assert_eq!(
            choose_present_mode(false, &[PresentMode::Fifo, PresentMode::Mailbox]),
            PresentMode::Mailbox
        );
        assert_eq!(choose_present_mode(false, &[PresentMode::Fifo]), PresentMode::Fifo);
    }
}
