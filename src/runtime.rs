use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::Result as OrtResult;
use std::fmt;
use std::sync::Once;

static INIT: Once = Once::new();

/// The compute device a classifier's session is bound to for its lifetime.
///
/// Resolved exactly once at construction from [`RuntimeConfig`] and hardware
/// availability; every input tensor is fed to the session on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Accelerated,
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Accelerated => write!(f, "accelerated (CUDA)"),
            Device::Cpu => write!(f, "cpu"),
        }
    }
}

#[derive(Debug)]
pub struct RuntimeConfig {
    /// Bind the session to the accelerated device when one is present.
    /// Resolution still falls back to `Cpu` when no accelerator is available.
    pub prefer_accelerated: bool,
    pub inter_threads: usize,
    pub intra_threads: usize,
    pub optimization_level: GraphOptimizationLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            prefer_accelerated: true,
            inter_threads: 0, // Let ONNX Runtime decide
            intra_threads: 0, // Let ONNX Runtime decide
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}

impl Clone for RuntimeConfig {
    fn clone(&self) -> Self {
        Self {
            prefer_accelerated: self.prefer_accelerated,
            inter_threads: self.inter_threads,
            intra_threads: self.intra_threads,
            optimization_level: match self.optimization_level {
                GraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
                GraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
                GraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
                GraphOptimizationLevel::Disable => GraphOptimizationLevel::Disable,
            },
        }
    }
}

fn init_onnx_environment() -> OrtResult<()> {
    ort::init().with_name("tonality").commit()?;
    Ok(())
}

pub fn ensure_initialized() -> OrtResult<()> {
    INIT.call_once(|| {
        init_onnx_environment().expect("Failed to initialize ONNX Runtime environment");
    });
    Ok(())
}

/// Resolves the compute device for a new session.
pub fn resolve_device(config: &RuntimeConfig) -> Device {
    if config.prefer_accelerated
        && CUDAExecutionProvider::default()
            .is_available()
            .unwrap_or(false)
    {
        Device::Accelerated
    } else {
        Device::Cpu
    }
}

pub fn create_session_builder(config: &RuntimeConfig, device: Device) -> OrtResult<SessionBuilder> {
    ensure_initialized()?;
    let mut builder = Session::builder()?;

    // Configure threading
    if config.inter_threads > 0 {
        builder = builder.with_inter_threads(config.inter_threads)?;
    }
    if config.intra_threads > 0 {
        builder = builder.with_intra_threads(config.intra_threads)?;
    }

    // Set optimization level
    let opt_level = match config.optimization_level {
        GraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        GraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        GraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        GraphOptimizationLevel::Disable => GraphOptimizationLevel::Disable,
    };
    builder = builder.with_optimization_level(opt_level)?;

    if device == Device::Accelerated {
        builder = builder.with_execution_providers([CUDAExecutionProvider::default().build()])?;
    }

    Ok(builder)
}
