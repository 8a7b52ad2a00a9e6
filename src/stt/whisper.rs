//! Whisper-based speech-to-text transcription.
//!
//! This module provides a Whisper implementation of the Transcriber trait using whisper-rs.
//!
//! # Feature Gate
//!
//! Real inference requires the `whisper` feature (and cmake at build time).
//! Without it, [`WhisperTranscriber`] is a stub that validates its model
//! path but refuses to transcribe.

use crate::accelerator::Accelerator;
use crate::defaults;
use crate::error::{AvatarError, Result};
use crate::stt::transcriber::{Transcriber, TranscriptionResult};
use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use std::sync::Once;
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,
    /// Language code (e.g., "en", "es", "fr") or "auto"
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
    /// Use fused attention kernels on the GPU
    pub flash_attn: bool,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-medium.bin"),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
            flash_attn: true,
        }
    }
}

/// Whisper-based transcriber implementation.
///
/// The context is immutable after loading; every call creates its own
/// decoding state, so one transcriber can serve concurrent callers.
#[cfg(feature = "whisper")]
pub struct WhisperTranscriber {
    context: WhisperContext,
    config: WhisperConfig,
    accelerator: Accelerator,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("config", &self.config)
            .field("accelerator", &self.accelerator)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper-based transcriber placeholder (without whisper feature).
///
/// This is a stub implementation that returns errors when used.
/// Enable the `whisper` feature to use real transcription.
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperTranscriber {
    config: WhisperConfig,
    accelerator: Accelerator,
    model_name: String,
}

fn check_model_path(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AvatarError::TranscriptionModelNotFound {
            path: path.to_string_lossy().to_string(),
        });
    }

    Ok(path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string())
}

/// A CUDA attempt on a build without CUDA would silently run on the CPU.
fn check_accelerator(accelerator: Accelerator) -> Result<()> {
    if accelerator.is_gpu() && !cfg!(feature = "cuda") {
        return Err(AvatarError::ModelLoad {
            what: format!("Whisper on {accelerator}"),
            message: "this build has no CUDA support".to_string(),
        });
    }
    Ok(())
}

#[cfg(feature = "whisper")]
impl WhisperTranscriber {
    /// Load a Whisper model onto `accelerator`.
    ///
    /// # Errors
    /// Returns `AvatarError::TranscriptionModelNotFound` if the model file doesn't exist
    /// Returns `AvatarError::ModelLoad` if the device is unusable or model loading fails
    pub fn new(config: WhisperConfig, accelerator: Accelerator) -> Result<Self> {
        // Route whisper.cpp output through the log hooks instead of stderr (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        let model_name = check_model_path(&config.model_path)?;
        check_accelerator(accelerator)?;

        let mut context_params = WhisperContextParameters::default();
        context_params.use_gpu(accelerator.is_gpu());
        if let Accelerator::Cuda(ordinal) = accelerator {
            context_params.gpu_device(ordinal as i32);
        }
        context_params.flash_attn(config.flash_attn && accelerator.is_gpu());

        let model_path = config
            .model_path
            .to_str()
            .ok_or_else(|| AvatarError::ModelLoad {
                what: config.model_path.to_string_lossy().to_string(),
                message: "Invalid UTF-8 in model path".to_string(),
            })?;

        let context = WhisperContext::new_with_params(model_path, context_params).map_err(|e| {
            AvatarError::ModelLoad {
                what: format!("Whisper model {model_name}"),
                message: e.to_string(),
            }
        })?;

        tracing::debug!(model = %model_name, %accelerator, "whisper context created");

        Ok(Self {
            context,
            config,
            accelerator,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Device the model was loaded onto
    pub fn accelerator(&self) -> Accelerator {
        self.accelerator
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperTranscriber {
    /// Create a new Whisper transcriber (stub implementation).
    ///
    /// Validates the model path and device like the real implementation.
    pub fn new(config: WhisperConfig, accelerator: Accelerator) -> Result<Self> {
        let model_name = check_model_path(&config.model_path)?;
        check_accelerator(accelerator)?;

        Ok(Self {
            config,
            accelerator,
            model_name,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Device the model was loaded onto
    pub fn accelerator(&self) -> Accelerator {
        self.accelerator
    }
}

#[cfg(feature = "whisper")]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio: &[f32]) -> Result<TranscriptionResult> {
        let inference_error = |what: &str, e: whisper_rs::WhisperError| {
            AvatarError::TranscriptionInferenceFailed {
                message: format!("{what}: {e}"),
            }
        };

        let mut state = self
            .context
            .create_state()
            .map_err(|e| inference_error("Failed to create Whisper state", e))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        if self.config.language == defaults::AUTO_LANGUAGE {
            params.set_language(None);
        } else {
            params.set_language(Some(&self.config.language));
        }

        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }

        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, audio)
            .map_err(|e| inference_error("Whisper inference failed", e))?;

        let lang_id = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(lang_id).unwrap_or("").to_string();

        let mut transcription = String::new();
        for segment in state.as_iter() {
            transcription.push_str(&segment.to_string());
        }

        tracing::debug!(
            model = %self.model_name,
            %language,
            samples = audio.len(),
            "transcription finished"
        );

        Ok(TranscriptionResult {
            text: transcription.trim().to_string(),
            language,
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(not(feature = "whisper"))]
impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, _audio: &[f32]) -> Result<TranscriptionResult> {
        Err(AvatarError::TranscriptionInferenceFailed {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release (whisper is enabled by default)\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn is_ready(&self) -> bool {
        false
    }
}
