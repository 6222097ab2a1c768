//! Offscreen targets and the passes between the scene and the surface
//!
//! The scene is drawn into an HDR target. When bloom is on, a bright pass
//! and two blur passes run at half resolution. A final composite adds the
//! bloom, applies tone mapping and writes sRGB into the surface.

use crate::{
    gfx::resources::texture_resource::TextureResource,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::pipeline_manager::PipelineManager;

/// Operator mapping HDR scene colour into displayable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    #[default]
    None,
    Linear,
    Reinhard,
    Cineon,
    AcesFilmic,
}

impl ToneMapping {
    pub const ALL: [ToneMapping; 5] = [
        ToneMapping::None,
        ToneMapping::Linear,
        ToneMapping::Reinhard,
        ToneMapping::Cineon,
        ToneMapping::AcesFilmic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToneMapping::None => "None",
            ToneMapping::Linear => "Linear",
            ToneMapping::Reinhard => "Reinhard",
            ToneMapping::Cineon => "Cineon",
            ToneMapping::AcesFilmic => "ACESFilmic",
        }
    }

    /// Value of the `tone_mapping` field read by `composite.wgsl`
    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    pub strength: f32,
    /// Spread of the blur in `[0, 1]`
    pub radius: f32,
    /// Luminance below which pixels do not bloom
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 0.5,
            radius: 0.2,
            threshold: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcessSettings {
    pub bloom: BloomSettings,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            bloom: BloomSettings::default(),
            tone_mapping: ToneMapping::None,
            exposure: 1.0,
        }
    }
}

/// MUST match `PassParams` in `bloom_bindings.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PassUniform {
    texel_size: [f32; 2],
    direction: [f32; 2],
    threshold: f32,
    radius: f32,
    padding: [f32; 2],
}

impl PassUniform {
    fn new(size: (u32, u32), direction: [f32; 2], bloom: &BloomSettings) -> Self {
        Self {
            texel_size: [1.0 / size.0.max(1) as f32, 1.0 / size.1.max(1) as f32],
            direction,
            threshold: bloom.threshold,
            radius: bloom.radius,
            padding: [0.0; 2],
        }
    }
}

/// MUST match `CompositeParams` in `composite.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniform {
    exposure: f32,
    tone_mapping: u32,
    bloom_strength: f32,
    bloom_enabled: u32,
}

impl From<&PostProcessSettings> for CompositeUniform {
    fn from(settings: &PostProcessSettings) -> Self {
        Self {
            exposure: settings.exposure,
            tone_mapping: settings.tone_mapping.id(),
            bloom_strength: settings.bloom.strength,
            bloom_enabled: settings.bloom.enabled as u32,
        }
    }
}

/// Bloom targets are half the surface size, never empty
pub fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

struct BindGroups {
    bright: wgpu::BindGroup,
    blur_horizontal: wgpu::BindGroup,
    blur_vertical: wgpu::BindGroup,
    composite: wgpu::BindGroup,
}

pub struct PostProcessChain {
    scene_target: TextureResource,
    depth_target: TextureResource,
    bloom_ping: TextureResource,
    bloom_pong: TextureResource,
    sampler: wgpu::Sampler,
    bloom_layout: BindGroupLayoutWithDesc,
    composite_layout: BindGroupLayoutWithDesc,
    bright_uniform: UniformBuffer<PassUniform>,
    blur_horizontal_uniform: UniformBuffer<PassUniform>,
    blur_vertical_uniform: UniformBuffer<PassUniform>,
    composite_uniform: UniformBuffer<CompositeUniform>,
    bind_groups: BindGroups,
}

impl PostProcessChain {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let bloom_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Bloom Bind Group Layout");

        let composite_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d()) // scene
            .next_binding_fragment(binding_types::texture_2d()) // bloom
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Composite Bind Group Layout");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Post Process Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let (scene_target, depth_target, bloom_ping, bloom_pong) =
            Self::create_targets(device, width, height);

        let bright_uniform = UniformBuffer::new(device);
        let blur_horizontal_uniform = UniformBuffer::new(device);
        let blur_vertical_uniform = UniformBuffer::new(device);
        let composite_uniform = UniformBuffer::new(device);

        let bind_groups = Self::create_bind_groups(
            device,
            &bloom_layout,
            &composite_layout,
            &sampler,
            [&scene_target, &bloom_ping, &bloom_pong],
            [
                &bright_uniform,
                &blur_horizontal_uniform,
                &blur_vertical_uniform,
            ],
            &composite_uniform,
        );

        Self {
            scene_target,
            depth_target,
            bloom_ping,
            bloom_pong,
            sampler,
            bloom_layout,
            composite_layout,
            bright_uniform,
            blur_horizontal_uniform,
            blur_vertical_uniform,
            composite_uniform,
            bind_groups,
        }
    }

    fn create_targets(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (
        TextureResource,
        TextureResource,
        TextureResource,
        TextureResource,
    ) {
        let (bloom_width, bloom_height) = bloom_size(width, height);
        let hdr = TextureResource::HDR_FORMAT;

        (
            TextureResource::create_render_target(device, width, height, hdr, "Scene Target"),
            TextureResource::create_depth_texture(device, width, height, "Scene Depth"),
            TextureResource::create_render_target(device, bloom_width, bloom_height, hdr, "Bloom Ping"),
            TextureResource::create_render_target(device, bloom_width, bloom_height, hdr, "Bloom Pong"),
        )
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        bloom_layout: &BindGroupLayoutWithDesc,
        composite_layout: &BindGroupLayoutWithDesc,
        sampler: &wgpu::Sampler,
        [scene, ping, pong]: [&TextureResource; 3],
        [bright, horizontal, vertical]: [&UniformBuffer<PassUniform>; 3],
        composite: &UniformBuffer<CompositeUniform>,
    ) -> BindGroups {
        let bloom_group = |source: &TextureResource, uniform: &UniformBuffer<PassUniform>, label| {
            BindGroupBuilder::new(bloom_layout)
                .texture(&source.view)
                .sampler(sampler)
                .resource(uniform.binding_resource())
                .create(device, label)
        };

        BindGroups {
            // scene -> ping -> pong -> ping
            bright: bloom_group(scene, bright, "Bloom Bright Bind Group"),
            blur_horizontal: bloom_group(ping, horizontal, "Bloom Blur H Bind Group"),
            blur_vertical: bloom_group(pong, vertical, "Bloom Blur V Bind Group"),
            composite: BindGroupBuilder::new(composite_layout)
                .texture(&scene.view)
                .texture(&ping.view)
                .sampler(sampler)
                .resource(composite.binding_resource())
                .create(device, "Composite Bind Group"),
        }
    }

    /// Recreates every target at the new size; bind groups follow
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (scene_target, depth_target, bloom_ping, bloom_pong) =
            Self::create_targets(device, width, height);
        self.scene_target = scene_target;
        self.depth_target = depth_target;
        self.bloom_ping = bloom_ping;
        self.bloom_pong = bloom_pong;

        self.bind_groups = Self::create_bind_groups(
            device,
            &self.bloom_layout,
            &self.composite_layout,
            &self.sampler,
            [&self.scene_target, &self.bloom_ping, &self.bloom_pong],
            [
                &self.bright_uniform,
                &self.blur_horizontal_uniform,
                &self.blur_vertical_uniform,
            ],
            &self.composite_uniform,
        );
    }

    pub fn bloom_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bloom_layout.layout
    }

    pub fn composite_layout(&self) -> &wgpu::BindGroupLayout {
        &self.composite_layout.layout
    }

    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.scene_target.view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_target.view
    }

    /// Writes this frame's settings into the pass uniforms
    pub fn update(&mut self, queue: &wgpu::Queue, settings: &PostProcessSettings) {
        let size = self.bloom_ping.size();
        let bloom = &settings.bloom;

        self.bright_uniform
            .update_content(queue, PassUniform::new(size, [0.0, 0.0], bloom));
        self.blur_horizontal_uniform
            .update_content(queue, PassUniform::new(size, [1.0, 0.0], bloom));
        self.blur_vertical_uniform
            .update_content(queue, PassUniform::new(size, [0.0, 1.0], bloom));
        self.composite_uniform
            .update_content(queue, CompositeUniform::from(settings));
    }

    /// Records the bloom passes (when enabled) and the composite into `output`
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        pipelines: &PipelineManager,
        settings: &PostProcessSettings,
        output: &wgpu::TextureView,
    ) {
        if settings.bloom.enabled {
            let passes = [
                ("Bloom Bright Pass", "bloom_bright", &self.bind_groups.bright, &self.bloom_ping.view),
                ("Bloom Blur H Pass", "bloom_blur", &self.bind_groups.blur_horizontal, &self.bloom_pong.view),
                ("Bloom Blur V Pass", "bloom_blur", &self.bind_groups.blur_vertical, &self.bloom_ping.view),
            ];
            for (label, pipeline, bind_group, target) in passes {
                fullscreen_pass(encoder, label, pipelines, pipeline, bind_group, target);
            }
        }

        fullscreen_pass(
            encoder,
            "Composite Pass",
            pipelines,
            "composite",
            &self.bind_groups.composite,
            output,
        );
    }
}

fn fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipelines: &PipelineManager,
    pipeline: &str,
    bind_group: &wgpu::BindGroup,
    target: &wgpu::TextureView,
) {
    let Some(pipeline) = pipelines.pipeline(pipeline) else {
        log::warn!("{}: pipeline '{}' is not available", label, pipeline);
        return;
    };

    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    });

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_match_shaders() {
        assert_eq!(std::mem::size_of::<PassUniform>(), 32);
        assert_eq!(std::mem::size_of::<CompositeUniform>(), 16);
    }

    #[test]
    fn test_tone_mapping_ids_and_labels() {
        let ids: Vec<u32> = ToneMapping::ALL.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(ToneMapping::AcesFilmic.label(), "ACESFilmic");
        assert_eq!(ToneMapping::from_index(3), Some(ToneMapping::Cineon));
        assert_eq!(ToneMapping::from_index(5), None);
    }

    #[test]
    fn test_composite_uniform_from_settings() {
        let mut settings = PostProcessSettings {
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.5,
            ..Default::default()
        };
        settings.bloom.enabled = true;
        settings.bloom.strength = 2.0;

        let uniform = CompositeUniform::from(&settings);
        assert_eq!(
            uniform,
            CompositeUniform {
                exposure: 1.5,
                tone_mapping: 4,
                bloom_strength: 2.0,
                bloom_enabled: 1,
            }
        );
    }

    #[test]
    fn test_bloom_targets_are_half_size() {
        assert_eq!(bloom_size(800, 600), (400, 300));
        assert_eq!(bloom_size(1, 1), (1, 1));
    }
}
