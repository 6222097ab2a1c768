//! Global uniform bindings for camera and lighting data
//!
//! Manages the uniform buffer and bind group for per-frame state shared by
//! every object in a scene. Bound to slot 0 in all scene pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::lighting::Lighting},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `common.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    ambient: [f32; 4],
    point_color: [f32; 4],
    point_position: [f32; 4],
    directional_color: [f32; 4],
    directional_direction: [f32; 4],
}
// Total: 64 + 6 * 16 = 160 bytes

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lighting: &Lighting) -> Self {
        let scaled = |color: [f32; 3], intensity: f32| {
            [
                color[0] * intensity,
                color[1] * intensity,
                color[2] * intensity,
                0.0,
            ]
        };
        let [px, py, pz] = lighting.point.position;
        let [dx, dy, dz] = lighting.directional.direction();

        Self {
            view_proj: camera.view_proj,
            eye: camera.view_position,
            ambient: scaled(lighting.ambient.color, lighting.ambient.intensity),
            point_color: scaled(lighting.point.color, lighting.point.intensity),
            point_position: [px, py, pz, 1.0],
            directional_color: scaled(
                lighting.directional.color,
                lighting.directional.intensity,
            ),
            directional_direction: [dx, dy, dz, 0.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lighting: &Lighting,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lighting));
}

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the layout and binds `ubo` to it
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + lights
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 160);
    }

    #[test]
    fn test_light_colours_are_premultiplied() {
        let lighting = Lighting::white(0.5, 0.2, [0.0, 5.0, 10.0], 0.5, [0.0, 0.0, 2.0]);
        let content = GlobalUBOContent::new(CameraUniform::default(), &lighting);
        assert_eq!(content.ambient, [0.5, 0.5, 0.5, 0.0]);
        assert_eq!(content.point_color, [0.2, 0.2, 0.2, 0.0]);
        assert_eq!(content.point_position, [0.0, 5.0, 10.0, 1.0]);
        assert_eq!(content.directional_direction, [0.0, 0.0, 1.0, 0.0]);
    }
}
