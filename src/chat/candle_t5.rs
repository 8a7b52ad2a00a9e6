//! Flan-T5 reply generator using candle quantized models.
//!
//! Runs greedy sequence-to-sequence decoding on the user utterance and
//! returns the decoded reply with special tokens stripped.

use crate::accelerator::Accelerator;
use crate::chat::generator::Generator;
use crate::error::{AvatarError, Result};
use crate::models::download::ChatModelFiles;

use candle_core::{Device, Tensor};
use candle_transformers::models::quantized_t5::{Config as T5Config, T5ForConditionalGeneration};
use candle_transformers::quantized_var_builder::VarBuilder;
use tokenizers::Tokenizer;

/// T5 pad token, also used as the decoder start token.
const PAD_TOKEN_ID: u32 = 0;

/// T5 end-of-sequence token.
const EOS_TOKEN_ID: u32 = 1;

fn generation_error(context: &str, e: impl std::fmt::Display) -> AvatarError {
    AvatarError::Generation {
        message: format!("{context}: {e}"),
    }
}

fn load_error(what: &str, e: impl std::fmt::Display) -> AvatarError {
    AvatarError::ModelLoad {
        what: what.to_string(),
        message: e.to_string(),
    }
}

fn device_for(accelerator: Accelerator) -> Result<Device> {
    match accelerator {
        Accelerator::Cpu => Ok(Device::Cpu),
        Accelerator::Cuda(ordinal) => {
            Device::new_cuda(ordinal).map_err(|e| AvatarError::ModelLoad {
                what: format!("CUDA device {ordinal}"),
                message: e.to_string(),
            })
        }
    }
}

/// Greedy pick from decoder logits shaped `[1, vocab]`.
///
/// The quantized T5 decoder already keeps only the last position, so there
/// is no sequence axis left to index.
fn select_next_token(logits: &Tensor) -> Result<u32> {
    logits
        .squeeze(0)
        .and_then(|l| l.argmax(candle_core::D::Minus1))
        .and_then(|t| t.to_scalar::<u32>())
        .map_err(|e| generation_error("Select next token", e))
}

/// Flan-T5 generator that runs quantized inference via candle.
pub struct CandleT5Generator {
    model: T5ForConditionalGeneration,
    tokenizer: Tokenizer,
    device: Device,
    model_name: String,
    max_decode_tokens: usize,
}

impl CandleT5Generator {
    /// Load a quantized Flan-T5 model onto `accelerator`.
    pub fn load(
        model_name: &str,
        files: &ChatModelFiles,
        accelerator: Accelerator,
        max_decode_tokens: usize,
    ) -> Result<Self> {
        let device = device_for(accelerator)?;

        let config_bytes = std::fs::read(&files.config)?;
        let config: T5Config = serde_json::from_slice(&config_bytes)
            .map_err(|e| load_error("T5 config", e))?;

        let vb = VarBuilder::from_gguf(&files.weights, &device)
            .map_err(|e| load_error(&files.weights.display().to_string(), e))?;
        let model = T5ForConditionalGeneration::load(vb, &config)
            .map_err(|e| load_error("T5 model", e))?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| load_error(&files.tokenizer.display().to_string(), e))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            model_name: model_name.to_string(),
            max_decode_tokens,
        })
    }

    fn token_tensor(&self, ids: &[u32]) -> Result<Tensor> {
        Tensor::new(ids, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| generation_error("Create token tensor", e))
    }

    /// Encode the prompt and run greedy decoding.
    fn decode_greedy(&mut self, prompt: &str) -> Result<String> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| generation_error("Tokenize", e))?;

        let input_tensor = self.token_tensor(encoding.get_ids())?;
        let encoder_output = self
            .model
            .encode(&input_tensor)
            .map_err(|e| generation_error("Encoder forward", e))?;

        // Incremental KV cache: the first step feeds the start token, later
        // steps feed only the newest token.
        let mut decoded_ids: Vec<u32> = Vec::new();
        let mut next_input = PAD_TOKEN_ID;

        for _ in 0..self.max_decode_tokens {
            let decoder_input = self.token_tensor(&[next_input])?;
            let logits = self
                .model
                .decode(&decoder_input, &encoder_output)
                .map_err(|e| generation_error("Decoder forward", e))?;

            let next_token = select_next_token(&logits)?;

            if next_token == EOS_TOKEN_ID {
                break;
            }

            decoded_ids.push(next_token);
            next_input = next_token;
        }

        self.tokenizer
            .decode(&decoded_ids, true)
            .map_err(|e| generation_error("Detokenize", e))
    }
}

impl Generator for CandleT5Generator {
    fn generate(&mut self, prompt: &str) -> Result<String> {
        // Drop cached keys/values from the previous request before decoding.
        self.model.clear_kv_cache();
        self.decode_greedy(prompt)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
