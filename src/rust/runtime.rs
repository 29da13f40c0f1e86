use std::env;
use std::str::FromStr;
use std::sync::Once;

use log::warn;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::Result as OrtResult;

use crate::classifier::ScanError;

static INIT: Once = Once::new();

/// Graph optimization applied when a session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationLevel {
    Disable,
    Level1,
    Level2,
    #[default]
    Level3,
}

impl OptimizationLevel {
    fn to_ort(self) -> GraphOptimizationLevel {
        match self {
            Self::Disable => GraphOptimizationLevel::Disable,
            Self::Level1 => GraphOptimizationLevel::Level1,
            Self::Level2 => GraphOptimizationLevel::Level2,
            Self::Level3 => GraphOptimizationLevel::Level3,
        }
    }
}

impl FromStr for OptimizationLevel {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable" | "0" => Ok(Self::Disable),
            "1" | "level1" => Ok(Self::Level1),
            "2" | "level2" => Ok(Self::Level2),
            "3" | "level3" => Ok(Self::Level3),
            other => Err(ScanError::Config(format!("Unknown optimization level: {}", other))),
        }
    }
}

/// ONNX Runtime session settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    /// 0 lets ONNX Runtime decide
    pub inter_threads: usize,
    /// 0 lets ONNX Runtime decide
    pub intra_threads: usize,
    pub optimization: OptimizationLevel,
}

impl RuntimeConfig {
    pub const INTER_THREADS_VAR: &'static str = "ORALSCAN_INTER_THREADS";
    pub const INTRA_THREADS_VAR: &'static str = "ORALSCAN_INTRA_THREADS";
    pub const OPT_LEVEL_VAR: &'static str = "ORALSCAN_OPT_LEVEL";

    /// Reads overrides from the environment, keeping defaults for unset variables.
    ///
    /// # Errors
    /// `Config` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ScanError> {
        let mut config = Self::default();
        if let Some(n) = read_var::<usize>(Self::INTER_THREADS_VAR)? {
            config.inter_threads = n;
        }
        if let Some(n) = read_var::<usize>(Self::INTRA_THREADS_VAR)? {
            config.intra_threads = n;
        }
        if let Some(level) = read_var::<OptimizationLevel>(Self::OPT_LEVEL_VAR)? {
            config.optimization = level;
        }
        Ok(config)
    }
}

fn read_var<T>(name: &str) -> Result<Option<T>, ScanError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ScanError::Config(format!("Invalid value for {}: {} ({})", name, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ScanError::Config(format!("Invalid value for {}: {}", name, e))),
    }
}

fn init_onnx_environment() -> OrtResult<()> {
    ort::init()
        .with_name("oralscan")
        .commit()?;
    Ok(())
}

/// Initializes the process-wide ONNX Runtime environment once.
pub fn ensure_initialized() {
    INIT.call_once(|| {
        if let Err(e) = init_onnx_environment() {
            warn!("Failed to configure ONNX Runtime environment, using defaults: {}", e);
        }
    });
}

pub fn create_session_builder(config: &RuntimeConfig) -> OrtResult<SessionBuilder> {
    ensure_initialized();
    let mut builder = Session::builder()?;

    if config.inter_threads > 0 {
        builder = builder.with_inter_threads(config.inter_threads)?;
    }
    if config.intra_threads > 0 {
        builder = builder.with_intra_threads(config.intra_threads)?;
    }

    builder = builder.with_optimization_level(config.optimization.to_ort())?;

    Ok(builder)
}
