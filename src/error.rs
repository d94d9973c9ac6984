//! Error types for Constellation.
//!
//! Startup failures (no surface, no adapter, bad config) are fatal before the
//! frame loop ever runs. A render fault during a frame propagates out of
//! [`FrameScheduler::tick`](crate::FrameScheduler::tick) and ends the loop.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format or alpha mode.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::UnsupportedSurface => {
                write!(f, "Surface has no supported texture format or alpha mode")
            }
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// A fault raised while rendering one frame.
///
/// Lost and outdated surfaces are handled inside the renderer by
/// reconfiguring; anything that reaches the scheduler stops the loop.
#[derive(Debug)]
pub enum RenderError {
    /// The surface could not provide a texture for this frame.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Surface(e) => write!(f, "Failed to acquire surface texture: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Surface(e) => Some(e),
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io(std::io::Error),
    /// The config file is not valid JSON for this schema.
    Json(serde_json::Error),
    /// A value is out of its accepted range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur when running a background.
#[derive(Debug)]
pub enum BackgroundError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for BackgroundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            BackgroundError::Window(e) => write!(f, "Failed to create window: {}", e),
            BackgroundError::Gpu(e) => write!(f, "GPU error: {}", e),
            BackgroundError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for BackgroundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackgroundError::EventLoop(e) => Some(e),
            BackgroundError::Window(e) => Some(e),
            BackgroundError::Gpu(e) => Some(e),
            BackgroundError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for BackgroundError {
    fn from(e: winit::error::EventLoopError) -> Self {
        BackgroundError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for BackgroundError {
    fn from(e: winit::error::OsError) -> Self {
        BackgroundError::Window(e)
    }
}

impl From<GpuError> for BackgroundError {
    fn from(e: GpuError) -> Self {
        BackgroundError::Gpu(e)
    }
}

impl From<ConfigError> for BackgroundError {
    fn from(e: ConfigError) -> Self {
        BackgroundError::Config(e)
    }
}
