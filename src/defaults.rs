//! Default configuration constants for avatar-chat.
//!
//! Shared by the config layer, the CLI and the pipelines so that every
//! entry point agrees on the same baseline behaviour.

/// Number of messages a reply is packaged into.
pub const MAX_MESSAGES: usize = 3;

/// Upper bound on tokens produced by one greedy decode.
pub const MAX_DECODE_TOKENS: usize = 128;

/// Default chat model from the chat catalog.
pub const DEFAULT_CHAT_MODEL: &str = "flan-t5-base";

/// Default Whisper model name.
///
/// "medium" (multilingual) trades memory for accuracy on mixed-language input.
pub const DEFAULT_SPEECH_MODEL: &str = "medium";

/// Default language code for transcription.
pub const DEFAULT_LANGUAGE: &str = "auto";

/// Language value that triggers automatic language detection.
pub const AUTO_LANGUAGE: &str = "auto";

/// Audio file transcribed when nothing else is configured.
pub const DEFAULT_AUDIO_PATH: &str = "test.mp3";

/// Audio sample rate in Hz expected by Whisper.
pub const SAMPLE_RATE: u32 = 16000;

/// Label printed in front of the transcript.
pub const TRANSCRIPT_LABEL: &str = "Multilingual Transcription:";

/// Report the GPU backend compiled into this build.
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") { "CUDA" } else { "CPU" }
}
