//! Error types for emberfield.
//!
//! The particle field itself never fails: a zero-sized surface degrades to
//! an empty field. Errors only come from loading configuration and from
//! standing up a host (window, GPU, browser canvas).

use std::fmt;

/// Errors that can occur while loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    Io(std::io::Error),
    /// The config document is not valid JSON for a field config.
    Json(serde_json::Error),
    /// The config parsed but describes an unusable field.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read field config: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse field config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid field config: {}", msg),
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

/// Errors that can occur during GPU initialization of the native presenter.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// The surface reports no texture format it can present.
    NoSurfaceFormat,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

#[cfg(not(target_arch = "wasm32"))]
impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::NoSurfaceFormat => write!(f, "Window surface supports no presentable texture format"),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter | GpuError::NoSurfaceFormat => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when starting a host for a particle field.
#[derive(Debug)]
pub enum HostError {
    /// Failed to create event loop.
    #[cfg(not(target_arch = "wasm32"))]
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    #[cfg(not(target_arch = "wasm32"))]
    Window(winit::error::OsError),
    /// GPU initialization failed.
    #[cfg(not(target_arch = "wasm32"))]
    Gpu(GpuError),
    /// The drawing surface the field should render into does not exist.
    MissingSurface(String),
    /// A browser API call failed.
    Script(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            HostError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            #[cfg(not(target_arch = "wasm32"))]
            HostError::Window(e) => write!(f, "Failed to create window: {}", e),
            #[cfg(not(target_arch = "wasm32"))]
            HostError::Gpu(e) => write!(f, "GPU error: {}", e),
            HostError::MissingSurface(id) => write!(f, "No drawing surface named '{}'", id),
            HostError::Script(msg) => write!(f, "Browser call failed: {}", msg),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            HostError::EventLoop(e) => Some(e),
            #[cfg(not(target_arch = "wasm32"))]
            HostError::Window(e) => Some(e),
            #[cfg(not(target_arch = "wasm32"))]
            HostError::Gpu(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<winit::error::EventLoopError> for HostError {
    fn from(e: winit::error::EventLoopError) -> Self {
        HostError::EventLoop(e)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<winit::error::OsError> for HostError {
    fn from(e: winit::error::OsError) -> Self {
        HostError::Window(e)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<GpuError> for HostError {
    fn from(e: GpuError) -> Self {
        HostError::Gpu(e)
    }
}

/// Run one independent page effect's setup, logging instead of propagating failure.
///
/// Returns `true` if the effect started. A failing effect is reported with
/// `log::error!` and the caller moves on to the next one.
///
/// ```ignore
/// isolate("Embers", || emberfield::web::start("particles-canvas", FieldConfig::ember()));
/// isolate("Navbar", init_navbar);
/// ```
pub fn isolate<F, E>(name: &str, setup: F) -> bool
where
    F: FnOnce() -> Result<(), E>,
    E: fmt::Display,
{
    match setup() {
        Ok(()) => true,
        Err(e) => {
            log::error!("{}: {}", name, e);
            false
        }
    }
}
