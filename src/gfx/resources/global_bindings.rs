//! Global uniform bindings for camera and scene lighting
//!
//! Everything here is shared by every draw in a frame and bound at slot 0 in all render
//! pipelines.

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `shader.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Unit vector pointing from the scene toward the light; w unused
    light_direction: [f32; 4],
    /// rgb colour, a intensity
    light_color: [f32; 4],
    /// rgb colour, a intensity
    ambient: [f32; 4],
}
// 16 + 64 + 16 + 16 + 16 = 128 bytes

unsafe impl bytemuck::Pod for GlobalUBOContent {}
unsafe impl bytemuck::Zeroable for GlobalUBOContent {}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, light: &LightConfig) -> Self {
        let direction = Vector3::from(light.position);
        let direction = if direction.magnitude2() > f32::EPSILON {
            direction.normalize()
        } else {
            Vector3::unit_y()
        };

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_direction: direction.extend(0.0).into(),
            light_color: Vector3::from(light.color)
                .extend(light.intensity)
                .into(),
            ambient: Vector3::from(light.ambient_color)
                .extend(light.ambient_intensity)
                .into(),
        }
    }
}

/// One ambient term plus one directional light
///
/// The directional light shines from `position` toward the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 5.0],
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes camera and light data for the coming frame
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: &LightConfig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, light));
}

/// Layout and bind group for the global uniform buffer
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

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
    fn test_layout_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);
    }

    #[test]
    fn test_light_direction_is_normalized() {
        let content = GlobalUBOContent::new(CameraUniform::default(), &LightConfig::default());
        let [x, y, z, _] = content.light_direction;
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-6);
        assert!((x - y).abs() < 1e-6 && (y - z).abs() < 1e-6);
        assert_eq!(content.light_color[3], 0.8);
        assert_eq!(content.ambient[3], 0.5);
    }

    #[test]
    fn test_light_at_origin_falls_back_to_overhead() {
        let light = LightConfig {
            position: [0.0; 3],
            ..Default::default()
        };
        let content = GlobalUBOContent::new(CameraUniform::default(), &light);
        assert_eq!(content.light_direction, [0.0, 1.0, 0.0, 0.0]);
    }
}
