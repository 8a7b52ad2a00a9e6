//! One-shot audio file transcription.
//!
//! decode file → transcribe → print labelled transcript

use crate::audio::decode::decode_file;
use crate::defaults::TRANSCRIPT_LABEL;
use crate::error::{AvatarError, Result};
use crate::stt::transcriber::Transcriber;
use std::path::Path;

#[cfg(feature = "model-download")]
use crate::accelerator::{Accelerator, acquire};
#[cfg(feature = "model-download")]
use crate::config::Config;
#[cfg(feature = "model-download")]
use crate::models::download::resolve_speech_model;
#[cfg(feature = "model-download")]
use crate::stt::whisper::{WhisperConfig, WhisperTranscriber};

/// Decode `path` and transcribe it, returning the trimmed text.
///
/// A transcript that is empty after trimming is an error.
pub fn transcribe_file<T: Transcriber + ?Sized>(transcriber: &T, path: &Path) -> Result<String> {
    let samples = decode_file(path)?;
    tracing::debug!(
        path = %path.display(),
        samples = samples.len(),
        model = transcriber.model_name(),
        "transcribing"
    );

    let result = transcriber.transcribe(&samples)?;
    let text = result.text.trim();
    if text.is_empty() {
        return Err(AvatarError::TranscriptionEmpty {
            path: path.display().to_string(),
        });
    }

    if !result.language.is_empty() {
        tracing::info!(language = %result.language, "detected language");
    }

    Ok(text.to_string())
}

/// Format the single stdout line for a transcript.
pub fn format_transcript(text: &str) -> String {
    format!("{TRANSCRIPT_LABEL} {text}")
}

/// Resolve the configured Whisper model and load it on the first usable device.
#[cfg(feature = "model-download")]
pub fn load_transcriber(config: &Config) -> Result<WhisperTranscriber> {
    let model_path = resolve_speech_model(&config.speech.model)?;
    let attempts = config
        .runtime
        .accelerator
        .attempts(config.runtime.gpu_device);

    let acquired = acquire(
        &format!("whisper {}", config.speech.model),
        &attempts,
        |accelerator: Accelerator| {
            let whisper_config = WhisperConfig {
                model_path: model_path.clone(),
                language: config.speech.language.clone(),
                threads: config.speech.threads,
                flash_attn: config.runtime.flash_attn,
            };
            WhisperTranscriber::new(whisper_config, accelerator)
        },
    )?;

    Ok(acquired.model)
}

/// Transcribe `speech.audio_path` and print the labelled transcript.
#[cfg(feature = "model-download")]
pub fn run(config: &Config) -> Result<()> {
    let transcriber = load_transcriber(config)?;
    let text = transcribe_file(&transcriber, &config.speech.audio_path)?;
    println!("{}", format_transcript(&text));
    Ok(())
}
