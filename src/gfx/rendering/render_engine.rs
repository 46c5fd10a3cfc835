//! WGPU-based rendering engine for the room
//!
//! One forward pass draws every attached renderable in the scene graph: opaque nodes
//! first, then translucent nodes from far to near with depth writes off. Back faces are
//! culled unless the node's material is double-sided. The UI overlay, if any, is recorded
//! into the same encoder afterwards.

use std::{collections::HashMap, sync::Arc};

use cgmath::{InnerSpace, Matrix4, Vector3};
use wgpu::TextureFormat;

use super::{
    node_resources::{DrawNode, NodeGpuResources, NodeUniform},
    pipeline_manager::{PipelineConfig, PipelineManager},
};
use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
            texture_resource::TextureResource,
        },
        scene::{Material, NodeId, SceneGraph, Side},
    },
    wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
};

/// Pipeline variant a material is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Opaque,
    OpaqueDoubleSided,
    Translucent,
    TranslucentDoubleSided,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 4] = [
        PipelineKind::Opaque,
        PipelineKind::OpaqueDoubleSided,
        PipelineKind::Translucent,
        PipelineKind::TranslucentDoubleSided,
    ];

    pub fn for_material(material: &Material) -> Self {
        match (material.is_transparent(), material.side) {
            (false, Side::Front) => PipelineKind::Opaque,
            (false, Side::Double) => PipelineKind::OpaqueDoubleSided,
            (true, Side::Front) => PipelineKind::Translucent,
            (true, Side::Double) => PipelineKind::TranslucentDoubleSided,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::Opaque => "Opaque",
            PipelineKind::OpaqueDoubleSided => "OpaqueDoubleSided",
            PipelineKind::Translucent => "Translucent",
            PipelineKind::TranslucentDoubleSided => "TranslucentDoubleSided",
        }
    }

    pub fn is_translucent(self) -> bool {
        matches!(
            self,
            PipelineKind::Translucent | PipelineKind::TranslucentDoubleSided
        )
    }

    fn config(self, format: TextureFormat, layouts: Vec<wgpu::BindGroupLayout>) -> PipelineConfig {
        let cull_mode = match self {
            PipelineKind::Opaque | PipelineKind::Translucent => Some(wgpu::Face::Back),
            PipelineKind::OpaqueDoubleSided | PipelineKind::TranslucentDoubleSided => None,
        };
        let (blend, depth_write) = if self.is_translucent() {
            (Some(wgpu::BlendState::ALPHA_BLENDING), false)
        } else {
            (Some(wgpu::BlendState::REPLACE), true)
        };

        PipelineConfig::default()
            .with_label(self.name())
            .with_shader("room")
            .with_cull_mode(cull_mode)
            .with_bind_group_layouts(layouts)
            .with_depth_stencil(TextureResource::DEPTH_FORMAT, depth_write)
            .with_color_target(format, blend)
    }
}

/// One node to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub kind: PipelineKind,
    /// Squared distance from the eye to the node origin
    pub depth: f32,
}

/// Opaque items keep scene order grouped by pipeline; translucent items follow far to near
pub fn order_draw_items(items: &mut [DrawItem]) {
    items.sort_by(|a, b| {
        a.kind
            .is_translucent()
            .cmp(&b.kind.is_translucent())
            .then_with(|| {
                if a.kind.is_translucent() {
                    b.depth.total_cmp(&a.depth)
                } else {
                    (a.kind as u8).cmp(&(b.kind as u8))
                }
            })
    });
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    node_layout: BindGroupLayoutWithDesc,
    nodes: HashMap<NodeId, NodeGpuResources>,
    light_config: LightConfig,
    clear_color: wgpu::Color,
    eye: Vector3<f32>,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        light_config: LightConfig,
        clear_color: [f64; 3],
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
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let present_mode = if surface_capabilities
            .present_modes
            .contains(&wgpu::PresentMode::Mailbox)
        {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let node_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Node Bind Group Layout");

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("room", include_str!("shader.wgsl"));
        for kind in PipelineKind::ALL {
            pipeline_manager.register_pipeline(
                kind.name(),
                kind.config(
                    format,
                    vec![
                        global_bindings.bind_group_layout().clone(),
                        node_layout.layout.clone(),
                    ],
                ),
            );
        }
        pipeline_manager.create_all_pipelines()?;

        let [r, g, b] = clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            node_layout,
            nodes: HashMap::new(),
            light_config,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            eye: Vector3::new(0.0, 0.0, 0.0),
        })
    }

    /// Uploads camera and light uniforms for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        let [x, y, z, _] = camera_uniform.view_position;
        self.eye = Vector3::new(x, y, z);
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            &self.light_config,
        );
    }

    /// Brings per-node GPU state in line with the scene and returns the ordered draw list
    fn sync_scene(&mut self, scene: &SceneGraph) -> Vec<DrawItem> {
        let renderables: Vec<(NodeId, Matrix4<f32>)> = scene.renderables();
        let mut items = Vec::with_capacity(renderables.len());

        for (id, world) in &renderables {
            let node = &scene[*id];
            let Some(renderable) = node.renderable() else {
                continue;
            };
            let uniform = NodeUniform::new(*world, &renderable.material);

            match self.nodes.get_mut(id) {
                Some(resources) => {
                    if resources.is_stale(renderable) {
                        log::debug!("Re-uploading geometry for '{}'", node.name);
                        resources.upload_geometry(&self.device, renderable, &node.name);
                    }
                    resources.update_uniform(&self.queue, uniform);
                }
                None => {
                    let resources = NodeGpuResources::new(
                        &self.device,
                        &self.node_layout,
                        renderable,
                        uniform,
                        &node.name,
                    );
                    self.nodes.insert(*id, resources);
                }
            }

            let origin = world.w.truncate();
            items.push(DrawItem {
                node: *id,
                kind: PipelineKind::for_material(&renderable.material),
                depth: (origin - self.eye).magnitude2(),
            });
        }

        // Drop buffers for nodes that left the scene
        if self.nodes.len() > renderables.len() {
            self.nodes
                .retain(|id, _| renderables.iter().any(|(live, _)| live == id));
        }

        order_draw_items(&mut items);
        items
    }

    /// Renders the scene followed by an optional UI overlay
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<F>(&mut self, scene: &SceneGraph, ui_callback: Option<F>) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(err) => {
                log::warn!("Skipping frame: {}", err);
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let items = self.sync_scene(scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
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

            let mut current = None;
            for item in &items {
                let Some(resources) = self.nodes.get(&item.node) else {
                    continue;
                };
                if current != Some(item.kind) {
                    render_pass.set_pipeline(self.pipeline_manager.get_pipeline(item.kind.name())?);
                    current = Some(item.kind);
                }
                render_pass.draw_node(resources);
            }
        }

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
        Ok(())
    }

    /// Reconfigures the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn light(&self) -> LightConfig {
        self.light_config
    }

    pub fn set_light(&mut self, light_config: LightConfig) {
        self.light_config = light_config;
    }
}
