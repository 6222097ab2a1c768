//! Error types for renderer start-up and the application loop

use thiserror::Error;

use crate::gfx::rendering::{pipeline_manager::PipelineError, shader_composer::ShaderError};

/// Failures while bringing up the GPU side of a window
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open the graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("the surface reports no usable texture format")]
    NoSurfaceFormat,
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("{} render pipelines failed to build", .0.len())]
    Pipelines(Vec<PipelineError>),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("renderer initialisation failed: {0}")]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_wraps_into_app_error() {
        let error: AppError = RenderError::NoSurfaceFormat.into();
        assert_eq!(
            error.to_string(),
            "renderer initialisation failed: the surface reports no usable texture format"
        );
    }
}
