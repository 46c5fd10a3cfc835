//! Core rendering functionality
//!
//! Handles render pipelines, per-node GPU buffers and frame rendering.

pub mod node_resources;
pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{PipelineKind, RenderEngine};
