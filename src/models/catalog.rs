//! Whisper model metadata catalog.
//!
//! GGML conversions of the OpenAI Whisper checkpoints, as published in the
//! whisper.cpp HuggingFace repository.

/// HuggingFace repository holding the GGML Whisper models.
pub const SPEECH_MODEL_REPO: &str = "ggerganov/whisper.cpp";

/// Metadata for a Whisper model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Model identifier (e.g., "tiny.en", "base", "medium")
    pub name: &'static str,
    /// Model size in megabytes
    pub size_mb: u32,
    /// Whether this model supports English only
    pub english_only: bool,
}

impl ModelInfo {
    /// Filename of the model inside [`SPEECH_MODEL_REPO`].
    pub fn hf_filename(&self) -> String {
        format!("ggml-{}.bin", self.name)
    }
}

/// Catalog of available Whisper models, smallest first.
///
/// The `.en` suffix marks English-only models, which are faster for English.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "tiny.en",
        size_mb: 75,
        english_only: true,
    },
    ModelInfo {
        name: "tiny",
        size_mb: 75,
        english_only: false,
    },
    ModelInfo {
        name: "base.en",
        size_mb: 142,
        english_only: true,
    },
    ModelInfo {
        name: "base",
        size_mb: 142,
        english_only: false,
    },
    ModelInfo {
        name: "small.en",
        size_mb: 466,
        english_only: true,
    },
    ModelInfo {
        name: "small",
        size_mb: 466,
        english_only: false,
    },
    ModelInfo {
        name: "medium.en",
        size_mb: 1533,
        english_only: true,
    },
    ModelInfo {
        name: "medium",
        size_mb: 1533,
        english_only: false,
    },
    ModelInfo {
        name: "large-v3",
        size_mb: 3095,
        english_only: false,
    },
];

/// Find a model by name.
pub fn get_model(name: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.name == name)
}

/// Get all available models.
pub fn list_models() -> &'static [ModelInfo] {
    MODELS
}
