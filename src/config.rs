//! Application settings
//!
//! Every knob has a default matching the stock room; the binary starts from
//! [`RoomConfig::default`] and library users can override fields before calling
//! [`RoomApp::new`](crate::app::RoomApp::new).

use std::time::Duration;

use cgmath::{Deg, Vector3};

use crate::gfx::resources::global_bindings::LightConfig;

#[derive(Debug, Clone)]
pub struct RoomConfig {
    pub window_title: String,
    /// Initial logical window size in pixels
    pub window_size: (u32, u32),
    pub camera: CameraConfig,
    pub drag: DragConfig,
    pub light: LightConfig,
    /// One-shot resize of the window pane after start-up; `None` disables it
    pub window_resize: Option<WindowResizeConfig>,
    /// Show the imgui overlay panel
    pub show_ui: bool,
    pub clear_color: [f64; 3],
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            window_title: "Room Planner".to_string(),
            window_size: (1200, 800),
            camera: CameraConfig::default(),
            drag: DragConfig::default(),
            light: LightConfig::default(),
            window_resize: Some(WindowResizeConfig::default()),
            show_ui: true,
            clear_color: [0.1, 0.2, 0.3],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vector3::new(10.0, 8.0, 10.0),
            target: Vector3::new(0.0, 0.0, 0.0),
            fovy: Deg(75.0),
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 1.1,
            max_distance: 60.0,
        }
    }
}

/// Limits applied to dragged furniture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Dragged objects keep `|x| <= half_extent` and `|z| <= half_extent`
    pub half_extent: f32,
    /// Height of the horizontal plane pointer rays are projected onto
    pub ground_height: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            half_extent: 4.0,
            ground_height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowResizeConfig {
    pub delay: Duration,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowResizeConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
            width: 1.5,
            height: 1.2,
        }
    }
}
