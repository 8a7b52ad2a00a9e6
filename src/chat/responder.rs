//! Reply generation plus avatar message packaging.

use crate::chat::generator::Generator;
use crate::chat::message::{Message, build_messages, to_json};
use crate::defaults;
use crate::error::Result;
use rand::Rng;

/// Long-lived chat service that owns the loaded generator.
///
/// Built once per process and reused for every request.
pub struct ChatResponder<G: Generator> {
    generator: G,
    max_messages: usize,
}

impl<G: Generator> ChatResponder<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            max_messages: defaults::MAX_MESSAGES,
        }
    }

    /// Override how many messages each reply is packaged into.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate a reply and package it into avatar messages.
    ///
    /// Generation errors propagate unchanged.
    pub fn respond<R: Rng + ?Sized>(&mut self, utterance: &str, rng: &mut R) -> Result<Vec<Message>> {
        let reply = self.generator.generate(utterance)?;
        tracing::debug!(
            generator = self.generator.name(),
            reply_chars = reply.chars().count(),
            "reply generated"
        );
        Ok(build_messages(&reply, self.max_messages, rng))
    }

    /// Like [`respond`](Self::respond), serialized to the JSON wire format.
    pub fn respond_json<R: Rng + ?Sized>(&mut self, utterance: &str, rng: &mut R) -> Result<String> {
        let messages = self.respond(utterance, rng)?;
        to_json(&messages)
    }
}
