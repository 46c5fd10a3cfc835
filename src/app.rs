use anyhow::{anyhow, Context};
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window, WindowAttributes, WindowId},
};

use crate::{
    config::{RoomConfig, WindowResizeConfig},
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        picking::Viewport,
        rendering::RenderEngine,
        scene::{CursorHint, SceneGraph},
        ui::{
            panel::{room_panel, PanelAction, RoomPanelView},
            UiCapture, UiManager,
        },
    },
    interaction::DragController,
    room::{build_room_scene, RoomLayout},
};

pub struct RoomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: RoomConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: SceneGraph,
    layout: RoomLayout,
    camera_manager: CameraManager,
    drag: DragController,
    cursor_position: Option<PhysicalPosition<f64>>,
    cursor_icon: CursorIcon,
    started: Instant,
    pending_resize: Option<WindowResizeConfig>,
    error: Option<anyhow::Error>,
}

impl RoomApp {
    /// Builds the room and the input controllers; the window opens once `run` starts
    pub fn new(config: RoomConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let (width, height) = config.window_size;
        let camera_config = config.camera;
        let mut camera = OrbitCamera::looking_at(
            camera_config.eye,
            camera_config.target,
            width as f32 / height.max(1) as f32,
            camera_config.fovy.into(),
        );
        camera.znear = camera_config.znear;
        camera.zfar = camera_config.zfar;
        camera.bounds.min_distance = Some(camera_config.min_distance);
        camera.bounds.max_distance = Some(camera_config.max_distance);
        camera.update_view_proj();

        let controller =
            CameraController::new(camera_config.rotate_speed, camera_config.zoom_speed);

        let mut drag = DragController::new(config.drag, Viewport::new(width as f32, height as f32));
        let mut scene = SceneGraph::new();
        let layout = build_room_scene(&mut scene, &mut drag);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                pending_resize: config.window_resize,
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                layout,
                camera_manager: CameraManager::new(camera, controller),
                drag,
                cursor_position: None,
                cursor_icon: CursorIcon::Default,
                started: Instant::now(),
                error: None,
            },
        })
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.app_state.scene
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.app_state.layout
    }

    /// Runs the event loop until the window closes or the renderer fails
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("Event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated abnormally")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn set_cursor_icon(&mut self, icon: CursorIcon) {
        if self.cursor_icon == icon {
            return;
        }
        self.cursor_icon = icon;
        if let Some(window) = self.window.as_ref() {
            window.set_cursor(icon);
        }
    }

    fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor_position = Some(position);
        let (x, y) = (position.x as f32, position.y as f32);

        if self.drag.is_dragging() {
            self.drag
                .on_pointer_move(x, y, &mut self.scene, &self.camera_manager.camera);
            self.set_cursor_icon(CursorIcon::Grabbing);
            return;
        }

        let hint = self
            .drag
            .hover_cursor(x, y, &self.scene, &self.camera_manager.camera);
        let icon = match hint {
            CursorHint::Pointer => CursorIcon::Pointer,
            CursorHint::Default => CursorIcon::Default,
        };
        self.set_cursor_icon(icon);
    }

    fn on_left_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if let Some(position) = self.cursor_position {
                    let started = self.drag.on_pointer_down(
                        position.x as f32,
                        position.y as f32,
                        &self.scene,
                        &self.camera_manager.camera,
                        &mut self.camera_manager.controller,
                    );
                    if started {
                        self.set_cursor_icon(CursorIcon::Grabbing);
                    }
                }
            }
            ElementState::Released => {
                if self.drag.is_dragging() {
                    self.drag.on_pointer_up(&mut self.camera_manager.controller);
                    self.set_cursor_icon(CursorIcon::Pointer);
                }
            }
        }
        self.camera_manager
            .process_mouse_button(MouseButton::Left, state);
    }

    /// The pointer left the window or the window lost focus; a held button may never be released
    fn on_pointer_lost(&mut self) {
        self.cursor_position = None;
        if self.drag.is_dragging() {
            self.drag.on_pointer_leave(&mut self.camera_manager.controller);
        }
        self.camera_manager
            .process_mouse_button(MouseButton::Left, ElementState::Released);
        self.set_cursor_icon(CursorIcon::Default);
    }

    fn on_resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera_manager.camera.resize_projection(width, height);
        self.drag.set_viewport(width as f32, height as f32);
        if let Some(render_engine) = self.render_engine.as_mut() {
            render_engine.resize(width, height);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(width, height);
        }
    }

    fn on_keyboard(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
            event_loop.exit();
            return;
        }
        self.camera_manager.process_keyboard_event(event);
    }

    fn apply_pending_resize(&mut self) {
        let Some(resize) = self.pending_resize else {
            return;
        };
        if self.started.elapsed() >= resize.delay {
            self.layout
                .resize_window(&mut self.scene, resize.width, resize.height);
            self.pending_resize = None;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_pending_resize();
        self.camera_manager.camera.update_view_proj();

        let (Some(render_engine), Some(window)) =
            (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };
        render_engine.update(self.camera_manager.camera.uniform);

        let mut action = None;
        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) if self.config.show_ui => {
                let panel = RoomPanelView::capture(
                    &self.scene,
                    &self.drag,
                    &self.camera_manager.controller,
                    &self.camera_manager.camera,
                );
                render_engine.render_frame(
                    &self.scene,
                    Some(
                        |device: &wgpu::Device,
                         queue: &wgpu::Queue,
                         encoder: &mut wgpu::CommandEncoder,
                         target: &wgpu::TextureView| {
                            ui_manager.draw(device, queue, encoder, window, target, |ui| {
                                action = room_panel(ui, &panel);
                            });
                        },
                    ),
                )
            }
            _ => render_engine.render_frame(
                &self.scene,
                None::<
                    fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
                >,
            ),
        };

        if let Err(err) = result {
            self.fail(event_loop, anyhow::Error::new(err).context("Failed to render frame"));
            return;
        }

        if action == Some(PanelAction::ResetCamera) {
            log::info!("Resetting camera to default position");
            self.camera_manager.camera.reset_to_default();
        }
    }
}

/// Window events after which no release for a held button can be relied on
fn ends_pointer_session(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false)
    )
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let attributes = WindowAttributes::default()
            .with_title(self.config.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("Failed to create window"));
                return;
            }
        };
        self.window = Some(window.clone());

        let PhysicalSize { width, height } = window.inner_size();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.light,
            self.config.clear_color,
        ));
        let renderer = match renderer {
            Ok(renderer) => renderer,
            Err(err) => {
                self.fail(event_loop, anyhow::Error::new(err).context("Failed to start renderer"));
                return;
            }
        };

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.started = Instant::now();
        self.on_resized(width, height);
        log::info!("Window opened at {}x{}", width, height);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Events the panel claims belong to the UI
        let ui_capture = match self.ui_manager.as_mut() {
            Some(ui_manager) if self.config.show_ui => {
                ui_manager.handle_window_event(&window, window_id, &event)
            }
            _ => UiCapture::default(),
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } if !ui_capture.keyboard => {
                self.on_keyboard(event_loop, &event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if ui_capture.mouse {
                    self.cursor_position = None;
                    self.set_cursor_icon(CursorIcon::Default);
                } else {
                    self.on_cursor_moved(position);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                // A release always ends the drag, even over the panel
                if !ui_capture.mouse || state == ElementState::Released {
                    self.on_left_button(state);
                }
            }
            ref lost if ends_pointer_session(lost) => {
                self.on_pointer_lost();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.on_resized(width, height);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if self.config.show_ui && ui_manager.wants_mouse() {
                return;
            }
        }

        self.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
