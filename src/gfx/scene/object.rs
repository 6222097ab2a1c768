use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{camera::camera_utils::convert_matrix4_to_array, geometry::GeometryData},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
        uniform_buffer::UniformBuffer,
    },
};

use super::vertex::Vertex3D;

/// Which pipeline draws an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Rainbow cell with a border mask driven by `params`
    Cell,
    /// Lit, noise-displaced surface
    Blob,
    /// Same displacement as `Blob`, drawn as edges
    BlobWireframe,
    /// Unlit edges in a flat colour
    Lines,
}

impl Shading {
    pub fn pipeline_name(self) -> &'static str {
        match self {
            Shading::Cell => "cell",
            Shading::Blob => "blob",
            Shading::BlobWireframe => "blob_wireframe",
            Shading::Lines => "lines",
        }
    }

    /// Whether the object is drawn from its line-list indices
    pub fn uses_lines(self) -> bool {
        matches!(self, Shading::BlobWireframe | Shading::Lines)
    }
}

/// Vertex data plus both triangle and edge index lists
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    line_indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    line_index_buffer: Option<wgpu::Buffer>,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let line_indices = if geometry.indices.is_empty() {
            // A bare segment list: consecutive vertex pairs
            (0..geometry.vertex_count() as u32).collect()
        } else {
            geometry.wireframe_indices()
        };

        Self {
            vertices: geometry.to_vertices(),
            indices: geometry.indices.clone(),
            line_indices,
            vertex_buffer: None,
            index_buffer: None,
            line_index_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn line_index_count(&self) -> u32 {
        self.line_indices.len() as u32
    }

    fn upload(&mut self, device: &wgpu::Device) {
        if self.vertex_buffer.is_some() {
            return;
        }

        let create = |label: &str, contents: &[u8], usage| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
        };

        self.vertex_buffer = Some(create(
            "Vertex Buffer",
            bytemuck::cast_slice(&self.vertices),
            wgpu::BufferUsages::VERTEX,
        ));
        if !self.indices.is_empty() {
            self.index_buffer = Some(create(
                "Index Buffer",
                bytemuck::cast_slice(&self.indices),
                wgpu::BufferUsages::INDEX,
            ));
        }
        if !self.line_indices.is_empty() {
            self.line_index_buffer = Some(create(
                "Line Index Buffer",
                bytemuck::cast_slice(&self.line_indices),
                wgpu::BufferUsages::INDEX,
            ));
        }
    }
}

/// Per-object uniform block
///
/// MUST match the `ObjectUniform` struct in `common.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    /// Shader-specific values, e.g. `{time, is_centre}` or the noise settings
    pub params: [f32; 4],
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, params: [f32; 4], color: [f32; 4]) -> Self {
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        Self {
            model: convert_matrix4_to_array(model),
            normal: convert_matrix4_to_array(normal),
            params,
            color,
        }
    }
}

pub struct ObjectGpuResources {
    pub uniform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// A drawable mesh with its transform and shading inputs
pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    pub params: [f32; 4],
    /// Linear RGBA
    pub color: [f32; 4],
    pub shading: Shading,
    pub visible: bool,
    pub gpu_resources: Option<ObjectGpuResources>, // None until prepare_gpu_resources
}

impl Object {
    pub fn new(name: impl Into<String>, geometry: &GeometryData, shading: Shading) -> Self {
        Self {
            name: name.into(),
            mesh: Mesh::from_geometry(geometry),
            transform: Matrix4::identity(),
            params: [0.0; 4],
            color: [1.0; 4],
            shading,
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = [color[0], color[1], color[2], 1.0];
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform::new(self.transform, self.params, self.color)
    }

    /// Uploads mesh buffers on first use, then syncs the uniform block
    pub fn prepare_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        self.mesh.upload(device);

        let content = self.uniform();
        match &mut self.gpu_resources {
            Some(resources) => resources.uniform.update_content(queue, content),
            None => {
                let uniform = UniformBuffer::new_with_data(device, &content);
                let bind_group = BindGroupBuilder::new(layout)
                    .resource(uniform.binding_resource())
                    .create(device, &format!("{} Object Bind Group", self.name));
                self.gpu_resources = Some(ObjectGpuResources {
                    uniform,
                    bind_group,
                });
            }
        }
    }
}

pub trait DrawObject {
    fn draw_object(&mut self, object: &Object);
}

impl DrawObject for wgpu::RenderPass<'_> {
    /// Binds the object's uniforms on group 1 and issues its draw
    fn draw_object(&mut self, object: &Object) {
        let (Some(resources), Some(vertex_buffer)) =
            (&object.gpu_resources, &object.mesh.vertex_buffer)
        else {
            return; // Skip drawing if not uploaded
        };

        let (index_buffer, count) = if object.shading.uses_lines() {
            (&object.mesh.line_index_buffer, object.mesh.line_index_count())
        } else {
            (&object.mesh.index_buffer, object.mesh.index_count())
        };
        let Some(index_buffer) = index_buffer else {
            return;
        };

        self.set_bind_group(1, &resources.bind_group, &[]);
        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_box, generate_segment};

    #[test]
    fn test_uniform_size_matches_shader() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 1.0, 0.5);
        let uniform = ObjectUniform::new(model, [0.0; 4], [1.0; 4]);
        assert_eq!(uniform.normal[0][0], 0.5);
        assert_eq!(uniform.normal[1][1], 1.0);
        assert_eq!(uniform.normal[2][2], 2.0);
    }

    #[test]
    fn test_degenerate_model_falls_back_to_identity_normal() {
        let model = Matrix4::from_nonuniform_scale(0.0, 1.0, 1.0);
        let uniform = ObjectUniform::new(model, [0.0; 4], [1.0; 4]);
        assert_eq!(
            uniform.normal,
            convert_matrix4_to_array(Matrix4::identity())
        );
    }

    #[test]
    fn test_mesh_index_lists() {
        let cell = Mesh::from_geometry(&generate_box(1.0, 1.0, 1.0));
        assert_eq!(cell.index_count(), 36);
        assert_eq!(cell.line_index_count(), 60);

        let axis = Mesh::from_geometry(&generate_segment([0.0; 3], [20.0, 0.0, 0.0]));
        assert_eq!(axis.index_count(), 0);
        assert_eq!(axis.line_index_count(), 2);
    }

    #[test]
    fn test_shader_declares_object_uniform() {
        let common = include_str!("../shaders/common.wgsl");
        assert!(common.contains("struct ObjectUniform {"));
    }
}
