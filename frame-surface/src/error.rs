//! Error types for surface initialization and rendering

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the frame surface
#[derive(Error, Debug)]
pub enum InitError {
    /// Failed to read a shader source file from disk
    #[error("Failed to read shader source {}: {source}", path.display())]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an OpenGL shader object
    #[error("Failed to create shader: {0}")]
    CreateShader(String),

    /// Shader stage failed to compile; the driver's diagnostic log is attached.
    /// Fatal for the run: there is no fallback program.
    #[error("Failed to compile {stage} shader: {log}")]
    CompileShader { stage: &'static str, log: String },

    /// Failed to link the shader program
    #[error("Failed to link program: {0}")]
    LinkProgram(String),

    /// Failed to create an OpenGL buffer object
    #[error("Failed to create buffer object: {0}")]
    CreateBufferObject(String),

    /// Failed to create the vertex array object
    #[error("Failed to create vertex array: {0}")]
    CreateVertexArray(String),
}

/// Errors that can occur during the per-frame scene pass
#[derive(Error, Debug)]
pub enum RenderError {
    /// The surface's GPU resources were already released
    #[error("Surface resources were destroyed")]
    SurfaceDestroyed,
}

/// Result type for initialization operations
pub type InitResult<T> = Result<T, InitError>;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
