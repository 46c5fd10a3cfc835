//! GPU resource management
//!
//! Depth targets and the global uniform buffer shared by all pipelines.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig};
pub use texture_resource::TextureResource;
