//! Command-line interfaces for the avatar-chat binaries
//!
//! Provides argument parsing using clap derive macros.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Reply to one utterance with avatar messages as JSON
#[derive(Parser, Debug)]
#[command(
    name = "avatar-chat",
    version,
    about = "Reply to one utterance with avatar messages as JSON"
)]
pub struct ChatCli {
    /// What the user said
    #[arg(value_name = "UTTERANCE", required_unless_present = "list_models")]
    pub utterance: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Chat model (default: flan-t5-base)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// List chat models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Suppress diagnostics except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose diagnostics on stderr (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ChatCli {
    /// Apply CLI overrides on top of file and environment settings.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.chat.model = model.clone();
        }
    }
}

/// Transcribe an audio file with Whisper
#[derive(Parser, Debug)]
#[command(
    name = "avatar-transcribe",
    version,
    about = "Transcribe an audio file with Whisper"
)]
pub struct TranscribeCli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Audio file to transcribe (default: test.mp3)
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// Whisper model name or path to a GGML file (default: medium)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Language code for transcription (default: auto-detect). Examples: auto, en, de, es, fr
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// List Whisper models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Suppress diagnostics except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose diagnostics on stderr (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl TranscribeCli {
    /// Apply CLI overrides on top of file and environment settings.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(audio) = &self.audio {
            config.speech.audio_path = audio.clone();
        }
        if let Some(model) = &self.model {
            config.speech.model = model.clone();
        }
        if let Some(language) = &self.language {
            config.speech.language = language.clone();
        }
    }
}
