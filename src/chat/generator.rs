//! Generator trait for reply generation.

use crate::error::{AvatarError, Result};

/// Trait for text-to-text reply generation.
///
/// Implementations hold a loaded model for the lifetime of the process and
/// may keep per-call scratch state, hence `&mut self`.
pub trait Generator: Send {
    /// Generate a reply for the given prompt.
    ///
    /// The returned text is decoded with special tokens stripped. An empty
    /// string is a valid reply.
    fn generate(&mut self, prompt: &str) -> Result<String>;

    /// Return the name of this generator for logging.
    fn name(&self) -> &str;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&mut self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock generator for testing
#[derive(Debug, Clone)]
pub struct MockGenerator {
    name: String,
    response: String,
    should_fail: bool,
    prompts: Vec<String>,
}

impl MockGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: "mock reply".to_string(),
            should_fail: false,
            prompts: Vec::new(),
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on generate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Generator for MockGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        if self.should_fail {
            Err(AvatarError::Generation {
                message: "mock generation failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
