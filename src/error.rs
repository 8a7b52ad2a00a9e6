//! Error types for avatar-chat.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvatarError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Model acquisition errors
    #[error("Unknown model: {name}")]
    ModelNotFound { name: String },

    #[error("Failed to fetch model artifact {artifact}: {message}")]
    ModelDownload { artifact: String, message: String },

    #[error("Failed to load {what}: {message}")]
    ModelLoad { what: String, message: String },

    #[error("No usable configuration for {what}: {}", failures.join("; "))]
    ModelUnavailable { what: String, failures: Vec<String> },

    // Reply generation errors
    #[error("Generation failed: {message}")]
    Generation { message: String },

    // Audio errors
    #[error("Audio decode failed: {message}")]
    AudioDecode { message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    TranscriptionModelNotFound { path: String },

    #[error("Transcription inference failed: {message}")]
    TranscriptionInferenceFailed { message: String },

    #[error("Transcription produced no text for {path}")]
    TranscriptionEmpty { path: String },

    // Output errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AvatarError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = AvatarError::ConfigInvalidValue {
            key: "chat.max_messages".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for chat.max_messages: must be at least 1"
        );
    }

    #[test]
    fn test_model_not_found_display() {
        let error = AvatarError::ModelNotFound {
            name: "gpt-9".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown model: gpt-9");
    }

    #[test]
    fn test_model_unavailable_lists_every_failure() {
        let error = AvatarError::ModelUnavailable {
            what: "whisper medium".to_string(),
            failures: vec![
                "cuda:0: no CUDA device".to_string(),
                "cpu: out of memory".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "No usable configuration for whisper medium: cuda:0: no CUDA device; cpu: out of memory"
        );
    }

    #[test]
    fn test_model_download_display() {
        let error = AvatarError::ModelDownload {
            artifact: "tokenizer.json".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch model artifact tokenizer.json: connection refused"
        );
    }

    #[test]
    fn test_audio_decode_display() {
        let error = AvatarError::AudioDecode {
            message: "no audio track found".to_string(),
        };
        assert_eq!(error.to_string(), "Audio decode failed: no audio track found");
    }

    #[test]
    fn test_transcription_empty_display() {
        let error = AvatarError::TranscriptionEmpty {
            path: "test.mp3".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription produced no text for test.mp3"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: AvatarError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_error = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let error: AvatarError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let error: AvatarError = json_error.into();
        assert!(error.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: AvatarError = io_error.into();
        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<AvatarError>();
        assert_sync::<AvatarError>();
    }
}
