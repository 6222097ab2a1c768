use wgpu::util::DeviceExt;

/// Typed uniform buffer that only uploads when its content changes
///
/// Every [`Object`](crate::gfx::scene::Object) and post-processing pass
/// owns one; most frames leave them untouched.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    /// Last uploaded value; `None` until the first write
    uploaded: Option<Content>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn label() -> String {
        format!("UniformBuffer: {}", short_type_name::<Content>())
    }

    /// Zero-initialised buffer; the first [`Self::update_content`] always uploads
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&Self::label()),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            uploaded: None,
        }
    }

    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&Self::label()),
            contents: bytemuck::bytes_of(initial_content),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            uploaded: Some(*initial_content),
        }
    }

    /// Writes `content` unless it is byte-identical to the last upload
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        if !needs_upload(self.uploaded.as_ref(), &content) {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.uploaded = Some(content);
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

fn needs_upload<Content: bytemuck::Pod>(uploaded: Option<&Content>, next: &Content) -> bool {
    uploaded.map_or(true, |previous| {
        bytemuck::bytes_of(previous) != bytemuck::bytes_of(next)
    })
}

/// Type name without its module path, for buffer labels
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_skipped_for_identical_content() {
        let previous = [1.0f32, 2.0, 3.0, 4.0];
        assert!(needs_upload::<[f32; 4]>(None, &previous));
        assert!(!needs_upload(Some(&previous), &previous));
        assert!(needs_upload(Some(&previous), &[1.0, 2.0, 3.0, 5.0]));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<UniformBuffer<f32>>(), "UniformBuffer<f32>");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
