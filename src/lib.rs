//! Room Planner
//!
//! A small furnished room rendered with wgpu and winit. The camera orbits the room and the
//! ping-pong table and sofa can be dragged across the floor with the mouse.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
pub mod room;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::RoomApp;
pub use config::RoomConfig;
pub use error::RenderError;

/// Creates an application with the stock room and default settings
pub fn default() -> anyhow::Result<RoomApp> {
    RoomApp::new(RoomConfig::default())
}
