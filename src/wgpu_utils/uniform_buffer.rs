use std::marker::PhantomData;

/// Typed uniform buffer that skips writes when the content has not changed
///
/// Both the global camera/light block and every node's model uniform go through this type,
/// so a scene where nothing moves uploads nothing per frame.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    last_upload: Vec<u8>,
}

/// Last path segment of a type name, used for buffer labels
fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    match type_name.rfind("::") {
        Some(pos) => &type_name[pos + 2..],
        None => type_name,
    }
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn create(device: &wgpu::Device, mapped_at_creation: bool) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Uniform<{}>", short_type_name::<Content>())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation,
        })
    }

    /// Zero-initialised buffer; the first `update_content` always uploads
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            buffer: Self::create(device, false),
            content_type: PhantomData,
            last_upload: Vec::new(),
        }
    }

    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = Self::create(device, true);
        let bytes = bytemuck::bytes_of(initial_content);
        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytes);
        buffer.unmap();

        Self {
            buffer,
            content_type: PhantomData,
            last_upload: bytes.to_vec(),
        }
    }

    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let bytes = bytemuck::bytes_of(&content);
        if self.last_upload == bytes {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.last_upload = bytes.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
