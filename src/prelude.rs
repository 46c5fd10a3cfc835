//! # Room Planner Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use room_planner::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let mut drag = DragController::new(DragConfig::default(), Viewport::new(800.0, 600.0));
//! let layout = build_room_scene(&mut scene, &mut drag);
//! assert_eq!(scene[layout.sofa].position, Vector3::new(4.0, 0.25, 2.0));
//! ```

// Re-export core application types
pub use crate::app::RoomApp;
pub use crate::config::{CameraConfig, DragConfig, RoomConfig, WindowResizeConfig};
pub use crate::error::RenderError;

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraController, NavigationToggle, OrbitCamera};
pub use crate::gfx::geometry::{generate_box, generate_circle, generate_plane, GeometryData};
pub use crate::gfx::picking::{Plane, Ray, Raycaster, Viewport};
pub use crate::gfx::scene::{CursorHint, Material, NodeId, SceneGraph, Side};

// Re-export interaction and room construction
pub use crate::interaction::{DragController, DragState, DraggableRegistry};
pub use crate::room::{build_room_scene, RoomLayout};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
