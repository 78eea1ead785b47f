//! Error types for scene generation and rendering setup

use thiserror::Error;

/// Errors raised while generating or presenting the dome scene
#[derive(Debug, Error)]
pub enum GeodomeError {
    /// A dome descriptor carries a non-finite or non-positive geometric input
    #[error("invalid dome descriptor #{index}: {reason}")]
    InvalidDescriptor { index: usize, reason: String },

    /// The interior constants would push a wall into a table ensemble
    #[error(
        "dome #{dome}: a wall passes within {clearance:.3} units of a table ensemble \
         (needs at least {required:.3})"
    )]
    WallIntersectsTable {
        dome: usize,
        clearance: f32,
        required: f32,
    },

    /// A texture could not be read or decoded
    #[error("failed to load resource '{path}': {reason}")]
    ResourceLoadFailure { path: String, reason: String },

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// A frame could not be acquired and the surface cannot be recovered
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, GeodomeError>;
