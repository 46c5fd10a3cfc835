//! Per-node GPU buffers
//!
//! Each renderable scene node owns a vertex buffer, an index buffer and a small uniform
//! with its world matrix and material colour. Geometry is re-uploaded only when the node's
//! renderable revision moves past the one uploaded last.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    gfx::scene::{Material, Renderable},
    wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc, UniformBuffer},
};

/// MUST match the `NodeUniform` struct in `shader.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x roughness, yzw unused
    pub params: [f32; 4],
}

impl NodeUniform {
    pub fn new(world: Matrix4<f32>, material: &Material) -> Self {
        Self {
            model: world.into(),
            color: material.base_color,
            params: [material.roughness, 0.0, 0.0, 0.0],
        }
    }
}

pub struct NodeGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform: UniformBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
    revision: u64,
}

impl NodeGpuResources {
    pub fn new(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        renderable: &Renderable,
        uniform: NodeUniform,
        label: &str,
    ) -> Self {
        let (vertex_buffer, index_buffer, index_count) = create_geometry_buffers(device, renderable, label);
        let uniform = UniformBuffer::new_with_data(device, &uniform);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("{} Bind Group", label));

        Self {
            vertex_buffer,
            index_buffer,
            index_count,
            uniform,
            bind_group,
            revision: renderable.revision(),
        }
    }

    /// True when the node's geometry changed since the last upload
    pub fn is_stale(&self, renderable: &Renderable) -> bool {
        self.revision != renderable.revision()
    }

    pub fn upload_geometry(&mut self, device: &wgpu::Device, renderable: &Renderable, label: &str) {
        let (vertex_buffer, index_buffer, index_count) = create_geometry_buffers(device, renderable, label);
        self.vertex_buffer = vertex_buffer;
        self.index_buffer = index_buffer;
        self.index_count = index_count;
        self.revision = renderable.revision();
    }

    pub fn update_uniform(&mut self, queue: &wgpu::Queue, uniform: NodeUniform) {
        self.uniform.update_content(queue, uniform);
    }
}

fn create_geometry_buffers(
    device: &wgpu::Device,
    renderable: &Renderable,
    label: &str,
) -> (wgpu::Buffer, wgpu::Buffer, u32) {
    let vertices = renderable.geometry.to_vertices();

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", label)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", label)),
        contents: bytemuck::cast_slice(&renderable.geometry.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    (
        vertex_buffer,
        index_buffer,
        renderable.geometry.indices.len() as u32,
    )
}

pub trait DrawNode<'a> {
    fn draw_node(&mut self, node: &'a NodeGpuResources);
}

impl<'a, 'b> DrawNode<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_node(&mut self, node: &'b NodeGpuResources) {
        if node.index_count == 0 {
            return;
        }
        self.set_bind_group(1, &node.bind_group, &[]);
        self.set_vertex_buffer(0, node.vertex_buffer.slice(..));
        self.set_index_buffer(node.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..node.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<NodeUniform>(), 96);
    }

    #[test]
    fn test_uniform_carries_translation_and_colour() {
        let material = Material::from_hex("table", 0x2e8b57).with_roughness(0.3);
        let uniform = NodeUniform::new(
            Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0)),
            &material,
        );
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.color, material.base_color);
        assert_eq!(uniform.params[0], 0.3);
    }
}
