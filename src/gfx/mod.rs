//! # Graphics Module
//!
//! Everything needed to show the room and to find what the pointer is over.
//!
//! - **Camera** ([`camera`]) - Orbit camera and its mouse/keyboard controller
//! - **Geometry** ([`geometry`]) - Box, plane and disc generators
//! - **Picking** ([`picking`]) - Pointer rays, ground plane and triangle-level raycasting
//! - **Rendering** ([`rendering`]) - Forward renderer with per-node uniforms
//! - **Resources** ([`resources`]) - Global uniforms and depth texture
//! - **Scene** ([`scene`]) - Arena-backed node hierarchy
//! - **UI** ([`ui`]) - Dear ImGui overlay

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use rendering::RenderEngine;
pub use scene::SceneGraph;
