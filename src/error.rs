//! Error types for GPU setup and frame submission

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,

    #[error("shader '{0}' has not been loaded")]
    MissingShader(String),

    #[error("pipeline '{0}' has not been registered")]
    MissingPipeline(String),

    #[error("GPU is out of memory")]
    OutOfMemory,
}
