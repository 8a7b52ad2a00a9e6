//! Chat entry point.
//!
//! Orchestrates the response flow:
//! resolve artifacts → load generator → generate → package → print JSON

use crate::accelerator::{Accelerator, acquire};
use crate::chat::candle_t5::CandleT5Generator;
use crate::chat::responder::ChatResponder;
use crate::config::Config;
use crate::error::{AvatarError, Result};
use crate::models::chat_catalog::get_chat_model;
use crate::models::download::fetch_chat_model;

/// Load the configured chat model and wrap it in a responder.
///
/// Artifacts are resolved once up front; only device placement is retried
/// across the accelerator attempts.
pub fn load_chat_responder(config: &Config) -> Result<ChatResponder<CandleT5Generator>> {
    let info = get_chat_model(&config.chat.model).ok_or_else(|| AvatarError::ModelNotFound {
        name: config.chat.model.clone(),
    })?;

    let files = fetch_chat_model(info)?;
    let attempts = config
        .runtime
        .accelerator
        .attempts(config.runtime.gpu_device);

    let acquired = acquire(info.display_name, &attempts, |accelerator: Accelerator| {
        CandleT5Generator::load(info.name, &files, accelerator, config.chat.max_decode_tokens)
    })?;

    Ok(ChatResponder::new(acquired.model).with_max_messages(config.chat.max_messages))
}

/// Answer one utterance and print the message array as a single JSON line.
pub fn run_chat(config: &Config, utterance: &str) -> Result<()> {
    let mut responder = load_chat_responder(config)?;
    let json = responder.respond_json(utterance, &mut rand::rng())?;
    println!("{json}");
    Ok(())
}
