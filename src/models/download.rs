//! Model artifact resolution.
//!
//! Artifacts are fetched through the HuggingFace Hub cache on first use and
//! reused from `~/.cache/huggingface` afterwards.

use crate::error::{AvatarError, Result};
use crate::models::catalog::{ModelInfo, SPEECH_MODEL_REPO, get_model};
use crate::models::chat_catalog::{ChatModelInfo, TOKENIZER_FILENAME};
use hf_hub::Cache;
use hf_hub::api::sync::{Api, ApiRepo};
use std::path::{Path, PathBuf};

/// Local paths of everything a T5 chat model needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatModelFiles {
    pub weights: PathBuf,
    pub config: PathBuf,
    pub tokenizer: PathBuf,
}

fn hub_repo(repo: &str) -> Result<ApiRepo> {
    let api = Api::new().map_err(|e| AvatarError::ModelDownload {
        artifact: repo.to_string(),
        message: format!("HF Hub API init: {e}"),
    })?;
    Ok(api.model(repo.to_string()))
}

fn fetch(repo: &ApiRepo, filename: &str) -> Result<PathBuf> {
    tracing::debug!(artifact = filename, "resolving model artifact");
    repo.get(filename).map_err(|e| AvatarError::ModelDownload {
        artifact: filename.to_string(),
        message: e.to_string(),
    })
}

/// Resolve a Whisper model to a file on disk.
///
/// An existing file path is used as-is; otherwise the name is looked up in
/// the speech catalog and downloaded on first use.
pub fn resolve_speech_model(name: &str) -> Result<PathBuf> {
    let local = Path::new(name);
    if local.is_file() {
        return Ok(local.to_path_buf());
    }

    let info = get_model(name).ok_or_else(|| AvatarError::ModelNotFound {
        name: name.to_string(),
    })?;

    let repo = hub_repo(SPEECH_MODEL_REPO)?;
    fetch(&repo, &info.hf_filename())
}

/// Resolve the weights, config and tokenizer of a chat model.
pub fn fetch_chat_model(info: &ChatModelInfo) -> Result<ChatModelFiles> {
    let repo = hub_repo(info.hf_repo)?;
    Ok(ChatModelFiles {
        weights: fetch(&repo, info.hf_filename)?,
        config: fetch(&repo, info.config_filename)?,
        tokenizer: fetch(&repo, TOKENIZER_FILENAME)?,
    })
}

/// Check whether a file is already in the local HuggingFace cache.
fn is_cached(repo: &str, filename: &str) -> bool {
    Cache::default().model(repo.to_string()).get(filename).is_some()
}

/// Check whether a speech model has already been downloaded.
pub fn is_speech_model_cached(model: &ModelInfo) -> bool {
    is_cached(SPEECH_MODEL_REPO, &model.hf_filename())
}

/// Check whether every artifact of a chat model has already been downloaded.
pub fn is_chat_model_cached(info: &ChatModelInfo) -> bool {
    [info.hf_filename, info.config_filename, TOKENIZER_FILENAME]
        .iter()
        .all(|f| is_cached(info.hf_repo, f))
}

fn status_label(cached: bool) -> &'static str {
    if cached { "[cached]" } else { "[not downloaded]" }
}

/// Format a speech model for display.
pub fn format_speech_model(model: &ModelInfo) -> String {
    let language = if model.english_only { "en" } else { "multi" };
    format!(
        "{:12} {:5} MB  {:5}  {}",
        model.name,
        model.size_mb,
        language,
        status_label(is_speech_model_cached(model))
    )
}

/// Format a chat model for display.
pub fn format_chat_model(info: &ChatModelInfo) -> String {
    format!(
        "{:14} {:5} MB  {}",
        info.name,
        info.size_mb,
        status_label(is_chat_model_cached(info))
    )
}
