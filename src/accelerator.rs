//! Device selection and fallback model acquisition.
//!
//! Loading a model is modelled as an ordered list of accelerator attempts.
//! The first attempt that loads wins; every failure is logged and kept so a
//! total failure can report all of them at once.

use crate::error::{AvatarError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A concrete device a model can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Cuda(usize),
    Cpu,
}

impl Accelerator {
    pub fn is_gpu(&self) -> bool {
        matches!(self, Accelerator::Cuda(_))
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
            Accelerator::Cpu => write!(f, "cpu"),
        }
    }
}

/// Process-wide accelerator setting, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorPreference {
    /// Prefer the GPU, fall back to the CPU.
    #[default]
    Auto,
    /// Ask for the GPU explicitly; the CPU remains the baseline fallback.
    Gpu,
    /// Never touch the GPU.
    Cpu,
}

impl AcceleratorPreference {
    /// Ordered attempts for this preference.
    pub fn attempts(&self, gpu_device: usize) -> Vec<Accelerator> {
        match self {
            AcceleratorPreference::Auto | AcceleratorPreference::Gpu => {
                vec![Accelerator::Cuda(gpu_device), Accelerator::Cpu]
            }
            AcceleratorPreference::Cpu => vec![Accelerator::Cpu],
        }
    }
}

impl FromStr for AcceleratorPreference {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(AcceleratorPreference::Auto),
            "gpu" | "cuda" => Ok(AcceleratorPreference::Gpu),
            "cpu" => Ok(AcceleratorPreference::Cpu),
            other => Err(AvatarError::ConfigInvalidValue {
                key: "runtime.accelerator".to_string(),
                message: format!("expected auto, gpu or cpu, got '{other}'"),
            }),
        }
    }
}

/// A model together with the accelerator it ended up on.
#[derive(Debug)]
pub struct Acquired<T> {
    pub model: T,
    pub accelerator: Accelerator,
}

/// Try `load` on each accelerator in order and return the first success.
///
/// `what` names the model in log lines and in the final error.
pub fn acquire<T, F>(what: &str, attempts: &[Accelerator], mut load: F) -> Result<Acquired<T>>
where
    F: FnMut(Accelerator) -> Result<T>,
{
    let mut failures = Vec::with_capacity(attempts.len());

    for &accelerator in attempts {
        tracing::debug!(model = what, %accelerator, "loading");
        match load(accelerator) {
            Ok(model) => {
                tracing::info!(model = what, %accelerator, "model loaded");
                return Ok(Acquired { model, accelerator });
            }
            Err(e) => {
                tracing::warn!(model = what, %accelerator, error = %e, "load failed");
                failures.push(format!("{accelerator}: {e}"));
            }
        }
    }

    Err(AvatarError::ModelUnavailable {
        what: what.to_string(),
        failures,
    })
}
