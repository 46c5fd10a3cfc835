//! # Interaction
//!
//! Pointer-driven repositioning of scene nodes.
//!
//! - [`DraggableRegistry`] remembers which nodes may be moved
//! - [`DragController`] turns pointer events into position updates on the ground plane and
//!   switches camera navigation off for the duration of a drag

pub mod drag_controller;
pub mod registry;

pub use drag_controller::{clamp_to_floor, DragController, DragSession, DragState};
pub use registry::DraggableRegistry;
