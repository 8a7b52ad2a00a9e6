use crate::accelerator::AcceleratorPreference;
use crate::defaults;
use crate::error::{AvatarError, Result};
use crate::models::catalog::get_model;
use crate::models::chat_catalog::get_chat_model;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub speech: SpeechConfig,
    pub runtime: RuntimeConfig,
}

/// Reply generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub max_messages: usize,
    pub max_decode_tokens: usize,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Catalog name or path to a GGML model file
    pub model: String,
    pub language: String,
    pub audio_path: PathBuf,
    pub threads: Option<usize>,
}

/// Device placement configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub accelerator: AcceleratorPreference,
    pub gpu_device: usize,
    pub flash_attn: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_CHAT_MODEL.to_string(),
            max_messages: defaults::MAX_MESSAGES,
            max_decode_tokens: defaults::MAX_DECODE_TOKENS,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_SPEECH_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            audio_path: PathBuf::from(defaults::DEFAULT_AUDIO_PATH),
            threads: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            accelerator: AcceleratorPreference::Auto,
            gpu_device: 0,
            flash_attn: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(AvatarError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Load configuration the way the binaries do.
    ///
    /// Priority order:
    /// 1. Custom config path from CLI (--config), which must exist
    /// 2. Default config path (~/.config/avatar-chat/config.toml)
    /// 3. Built-in defaults
    ///
    /// Environment variable overrides are applied on top.
    pub fn resolve(custom_path: Option<&Path>) -> Result<Self> {
        let config = match custom_path {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(&Self::default_path())?,
        };
        config.with_env_overrides()
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - AVATAR_CHAT_MODEL → chat.model
    /// - AVATAR_SPEECH_MODEL → speech.model
    /// - AVATAR_LANGUAGE → speech.language
    /// - AVATAR_AUDIO_PATH → speech.audio_path
    /// - AVATAR_ACCELERATOR → runtime.accelerator
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(model) = non_empty_env("AVATAR_CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Some(model) = non_empty_env("AVATAR_SPEECH_MODEL") {
            self.speech.model = model;
        }

        if let Some(language) = non_empty_env("AVATAR_LANGUAGE") {
            self.speech.language = language;
        }

        if let Some(path) = non_empty_env("AVATAR_AUDIO_PATH") {
            self.speech.audio_path = PathBuf::from(path);
        }

        if let Some(accelerator) = non_empty_env("AVATAR_ACCELERATOR") {
            self.runtime.accelerator = accelerator.parse()?;
        }

        Ok(self)
    }

    /// Check the `[chat]` values that serde cannot reject on its own.
    ///
    /// Speech settings are not looked at; each binary validates only its
    /// own pipeline.
    pub fn validate_chat(&self) -> Result<()> {
        if self.chat.max_messages == 0 {
            return Err(AvatarError::ConfigInvalidValue {
                key: "chat.max_messages".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.chat.max_decode_tokens == 0 {
            return Err(AvatarError::ConfigInvalidValue {
                key: "chat.max_decode_tokens".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if get_chat_model(&self.chat.model).is_none() {
            return Err(AvatarError::ConfigInvalidValue {
                key: "chat.model".to_string(),
                message: format!("unknown chat model '{}'", self.chat.model),
            });
        }

        Ok(())
    }

    /// Check the `[speech]` values that serde cannot reject on its own.
    pub fn validate_speech(&self) -> Result<()> {
        if get_model(&self.speech.model).is_none() && !Path::new(&self.speech.model).is_file() {
            return Err(AvatarError::ConfigInvalidValue {
                key: "speech.model".to_string(),
                message: format!(
                    "'{}' is neither a known model nor an existing file",
                    self.speech.model
                ),
            });
        }

        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/avatar-chat/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("avatar-chat")
            .join("config.toml")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_avatar_env() {
        for key in [
            "AVATAR_CHAT_MODEL",
            "AVATAR_SPEECH_MODEL",
            "AVATAR_LANGUAGE",
            "AVATAR_AUDIO_PATH",
            "AVATAR_ACCELERATOR",
        ] {
            remove_env(key);
        }
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.chat.model, "flan-t5-base");
        assert_eq!(config.chat.max_messages, 3);
        assert_eq!(config.chat.max_decode_tokens, 128);

        assert_eq!(config.speech.model, "medium");
        assert_eq!(config.speech.language, "auto");
        assert_eq!(config.speech.audio_path, PathBuf::from("test.mp3"));
        assert_eq!(config.speech.threads, None);

        assert_eq!(config.runtime.accelerator, AcceleratorPreference::Auto);
        assert_eq!(config.runtime.gpu_device, 0);
        assert!(config.runtime.flash_attn);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate_chat().is_ok());
        assert!(Config::default().validate_speech().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_file = write_config(
            r#"
            [chat]
            model = "flan-t5-small"
            max_messages = 5
            max_decode_tokens = 64

            [speech]
            model = "small.en"
            language = "en"
            audio_path = "clips/hello.wav"
            threads = 4

            [runtime]
            accelerator = "cpu"
            gpu_device = 1
            flash_attn = false
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.chat.model, "flan-t5-small");
        assert_eq!(config.chat.max_messages, 5);
        assert_eq!(config.chat.max_decode_tokens, 64);
        assert_eq!(config.speech.model, "small.en");
        assert_eq!(config.speech.language, "en");
        assert_eq!(config.speech.audio_path, PathBuf::from("clips/hello.wav"));
        assert_eq!(config.speech.threads, Some(4));
        assert_eq!(config.runtime.accelerator, AcceleratorPreference::Cpu);
        assert_eq!(config.runtime.gpu_device, 1);
        assert!(!config.runtime.flash_attn);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let temp_file = write_config(
            r#"
            [chat]
            max_messages = 1
        "#,
        );

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.chat.max_messages, 1);
        assert_eq!(config.chat.model, "flan-t5-base");
        assert_eq!(config.speech, SpeechConfig::default());
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let temp_file = write_config("[chat\nmodel = \"broken");
        let result = Config::load(temp_file.path());
        assert!(matches!(result, Err(AvatarError::Config(_))));
    }

    #[test]
    fn test_unknown_accelerator_in_file_is_rejected() {
        let temp_file = write_config("[runtime]\naccelerator = \"tpu\"\n");
        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_avatar_chat_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_errors_on_invalid_toml() {
        let temp_file = write_config("[speech\nmodel = ");
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let temp_file = write_config("[chat]\nmax_messages = \"three\"\n");
        match Config::load(temp_file.path()) {
            Err(AvatarError::Config(e)) => assert!(e.to_string().contains("max_messages")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_messages() {
        let mut config = Config::default();
        config.chat.max_messages = 0;

        match config.validate_chat() {
            Err(AvatarError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "chat.max_messages")
            }
            other => panic!("Expected ConfigInvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_decode_tokens() {
        let mut config = Config::default();
        config.chat.max_decode_tokens = 0;
        assert!(config.validate_chat().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_chat_model() {
        let mut config = Config::default();
        config.chat.model = "blenderbot-400m".to_string();
        assert!(config.validate_chat().is_err());
    }

    #[test]
    fn test_validate_accepts_speech_model_file() {
        let model_file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.speech.model = model_file.path().to_string_lossy().to_string();
        assert!(config.validate_speech().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_speech_model() {
        let mut config = Config::default();
        config.speech.model = "whisper-ultra".to_string();
        assert!(config.validate_speech().is_err());
    }

    #[test]
    fn test_unknown_chat_model_does_not_block_speech() {
        let mut config = Config::default();
        config.chat.model = "my-own-t5".to_string();
        config.chat.max_messages = 0;

        assert!(config.validate_chat().is_err());
        assert!(config.validate_speech().is_ok());
    }

    #[test]
    fn test_unknown_speech_model_does_not_block_chat() {
        let mut config = Config::default();
        config.speech.model = "whisper-ultra".to_string();

        assert!(config.validate_speech().is_err());
        assert!(config.validate_chat().is_ok());
    }

    #[test]
    fn test_env_override_models() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        set_env("AVATAR_CHAT_MODEL", "flan-t5-large");
        set_env("AVATAR_SPEECH_MODEL", "tiny");
        let config = Config::default().with_env_overrides().unwrap();

        assert_eq!(config.chat.model, "flan-t5-large");
        assert_eq!(config.speech.model, "tiny");
        assert_eq!(config.speech.language, "auto");

        clear_avatar_env();
    }

    #[test]
    fn test_env_override_audio_and_language() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        set_env("AVATAR_LANGUAGE", "fr");
        set_env("AVATAR_AUDIO_PATH", "/tmp/bonjour.ogg");
        let config = Config::default().with_env_overrides().unwrap();

        assert_eq!(config.speech.language, "fr");
        assert_eq!(config.speech.audio_path, PathBuf::from("/tmp/bonjour.ogg"));

        clear_avatar_env();
    }

    #[test]
    fn test_env_override_accelerator() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        set_env("AVATAR_ACCELERATOR", "cpu");
        let config = Config::default().with_env_overrides().unwrap();
        assert_eq!(config.runtime.accelerator, AcceleratorPreference::Cpu);

        set_env("AVATAR_ACCELERATOR", "quantum");
        assert!(Config::default().with_env_overrides().is_err());

        clear_avatar_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        set_env("AVATAR_CHAT_MODEL", "");
        let config = Config::default().with_env_overrides().unwrap();
        assert_eq!(config.chat.model, "flan-t5-base");

        clear_avatar_env();
    }

    #[test]
    fn test_default_path_ends_with_app_config() {
        let path = Config::default_path();
        assert!(path.ends_with("avatar-chat/config.toml"));
    }

    #[test]
    fn test_resolve_custom_path_applies_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        let temp_file = write_config("[chat]\nmodel = \"flan-t5-small\"\n");
        set_env("AVATAR_LANGUAGE", "de");
        let config = Config::resolve(Some(temp_file.path())).unwrap();

        assert_eq!(config.chat.model, "flan-t5-small");
        assert_eq!(config.speech.language, "de");

        clear_avatar_env();
    }

    #[test]
    fn test_resolve_missing_custom_path_is_error() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_avatar_env();

        let result = Config::resolve(Some(Path::new("/nonexistent/avatar.toml")));
        assert!(matches!(result, Err(AvatarError::Io(_))));
    }
}
