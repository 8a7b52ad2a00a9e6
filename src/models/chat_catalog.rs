//! Catalog of quantized Flan-T5 models used for reply generation.

/// Metadata for a T5 chat model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatModelInfo {
    /// Short name used in config and CLI (e.g. "flan-t5-base").
    pub name: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Approximate download size in MB.
    pub size_mb: u32,
    /// HuggingFace repository containing the model.
    pub hf_repo: &'static str,
    /// GGUF model filename within the repository.
    pub hf_filename: &'static str,
    /// JSON config filename within the repository.
    pub config_filename: &'static str,
}

/// Shared tokenizer filename; all Flan-T5 variants use the same tokenizer.
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// HuggingFace repository for quantized T5 models.
pub const CHAT_MODEL_REPO: &str = "lmz/candle-quantized-t5";

/// Available chat models, ordered by size (smallest first).
pub const CHAT_MODELS: &[ChatModelInfo] = &[
    ChatModelInfo {
        name: "flan-t5-small",
        display_name: "Flan-T5 Small (64 MB)",
        size_mb: 64,
        hf_repo: CHAT_MODEL_REPO,
        hf_filename: "model.gguf",
        config_filename: "config.json",
    },
    ChatModelInfo {
        name: "flan-t5-base",
        display_name: "Flan-T5 Base (263 MB)",
        size_mb: 263,
        hf_repo: CHAT_MODEL_REPO,
        hf_filename: "model-flan-t5-base.gguf",
        config_filename: "config-flan-t5-base.json",
    },
    ChatModelInfo {
        name: "flan-t5-large",
        display_name: "Flan-T5 Large (852 MB)",
        size_mb: 852,
        hf_repo: CHAT_MODEL_REPO,
        hf_filename: "model-flan-t5-large.gguf",
        config_filename: "config-flan-t5-large.json",
    },
];

/// Look up a chat model by name.
pub fn get_chat_model(name: &str) -> Option<&'static ChatModelInfo> {
    CHAT_MODELS.iter().find(|m| m.name == name)
}

/// List all available chat models.
pub fn list_chat_models() -> &'static [ChatModelInfo] {
    CHAT_MODELS
}
