//! avatar-chat - Talking-avatar reply backend
//!
//! Generates a reply with a seq2seq model and packages it into avatar
//! messages (text + facial expression + animation), plus a one-shot
//! multilingual Whisper transcriber.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod accelerator;
pub mod audio;
pub mod chat;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod stt;
pub mod transcription;

// Composition root for the chat binary
#[cfg(feature = "generation")]
pub mod app;

// Core traits (generator → messages, audio → transcript)
pub use chat::generator::Generator;
pub use stt::transcriber::{Transcriber, TranscriptionResult};

// Chat
pub use chat::message::{Animation, FacialExpression, Message, build_messages, to_json};
pub use chat::responder::ChatResponder;

// Device selection
pub use accelerator::{Accelerator, AcceleratorPreference, acquire};

// Error handling
pub use error::{AvatarError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
