//! Dear ImGui overlay drawn on top of the room
//!
//! The overlay renders in its own pass after the scene, loading the colour target rather
//! than clearing it. Pointer events it claims are not forwarded to the drag controller.

pub mod panel;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE_PIXELS: f32 = 18.0;

/// Which inputs ImGui claimed after seeing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiCapture {
    pub mouse: bool,
    pub keyboard: bool,
}

/// Only pointer, keyboard and focus events matter to the overlay
fn is_overlay_input(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_)
    )
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    pub fn new(
        device: &Device,
        queue: &Queue,
        surface_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        // Locked scale: display_size is kept in physical pixels by `update_display_size`
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE_PIXELS,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: surface_format,
                ..Default::default()
            },
        );
        log::debug!(
            "UI overlay ready (scale factor {}, format {:?})",
            window.scale_factor(),
            surface_format
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Feeds a window event to ImGui and reports what it now wants to own
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        window_id: WindowId,
        event: &WindowEvent,
    ) -> UiCapture {
        if !is_overlay_input(event) {
            return UiCapture::default();
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &wrapped);

        let io = self.context.io();
        UiCapture {
            mouse: io.want_capture_mouse,
            keyboard: io.want_capture_keyboard,
        }
    }

    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    /// Builds this frame's widgets and records them into `encoder` over `target`
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        target: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Skipping UI frame: {}", err);
            return;
        }

        let ui = self.context.frame();
        run_ui(ui);

        let cursor = ui.mouse_cursor();
        if cursor != self.last_cursor {
            self.last_cursor = cursor;
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        // Minimised window: a zero-sized scissor rect would fail validation
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ui_overlay_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("Failed to render UI overlay: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{dpi::PhysicalSize, event::DeviceId};

    #[test]
    fn test_overlay_input_filter() {
        assert!(is_overlay_input(&WindowEvent::Focused(false)));
        let device_id = unsafe { DeviceId::dummy() };
        assert!(is_overlay_input(&WindowEvent::CursorMoved {
            device_id,
            position: (10.0, 20.0).into(),
        }));

        assert!(!is_overlay_input(&WindowEvent::Resized(PhysicalSize::new(800, 600))));
        assert!(!is_overlay_input(&WindowEvent::CursorLeft { device_id }));
        assert!(!is_overlay_input(&WindowEvent::RedrawRequested));
    }
}
