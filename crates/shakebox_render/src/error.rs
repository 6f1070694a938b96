//! Render error types

use std::fmt;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// No GPU adapter compatible with the window surface
    NoAdapter,
    /// Device request failed
    Device(String),
    /// Surface could not be created or configured
    Surface(String),
    /// A shader module or pipeline failed validation
    Shader { label: String, message: String },
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoAdapter => write!(f, "No compatible GPU adapter"),
            RenderError::Device(msg) => write!(f, "Device request failed: {}", msg),
            RenderError::Surface(msg) => write!(f, "Surface error: {}", msg),
            RenderError::Shader { label, message } => {
                write!(f, "Shader '{}' failed: {}", label, message)
            }
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Run GPU object creation inside a validation error scope
///
/// wgpu reports invalid WGSL and pipeline mismatches asynchronously; this
/// turns them into a [`RenderError::Shader`] instead of a panic.
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(RenderError::Shader {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(value),
    }
}
