//! Startup error type.

use std::path::PathBuf;

use thiserror::Error;

/// Anything that can stop the renderer from starting
#[derive(Error, Debug)]
pub enum InitError {
    /// Parameter validation failed
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Surface reports no usable texture format
    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,

    /// Image file missing or undecodable
    #[error("Failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Cubemap faces are not square or differ in size
    #[error("Cubemap face {path} is {width}x{height}, expected {expected}x{expected}")]
    CubemapFace {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },

    /// Shader compilation or pipeline validation failed
    #[error("Shader '{label}' failed validation: {message}")]
    Shader { label: String, message: String },
}

pub type Result<T> = std::result::Result<T, InitError>;
