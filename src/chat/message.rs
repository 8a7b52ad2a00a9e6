//! Avatar message records and their JSON encoding.
//!
//! A generated reply is packaged into a fixed number of [`Message`]s, each
//! tagged with a facial expression and an animation for the avatar renderer.
//! Only the first message carries the reply; the rest are numbered
//! placeholders.

use crate::error::Result;
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facial expression tag understood by the avatar renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacialExpression {
    Smile,
    Sad,
    Angry,
    Surprised,
    FunnyFace,
    Shocked,
    Thinking,
    Default,
}

impl FacialExpression {
    pub const ALL: [FacialExpression; 8] = [
        FacialExpression::Smile,
        FacialExpression::Sad,
        FacialExpression::Angry,
        FacialExpression::Surprised,
        FacialExpression::FunnyFace,
        FacialExpression::Shocked,
        FacialExpression::Thinking,
        FacialExpression::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacialExpression::Smile => "smile",
            FacialExpression::Sad => "sad",
            FacialExpression::Angry => "angry",
            FacialExpression::Surprised => "surprised",
            FacialExpression::FunnyFace => "funnyFace",
            FacialExpression::Shocked => "shocked",
            FacialExpression::Thinking => "thinking",
            FacialExpression::Default => "default",
        }
    }
}

impl fmt::Display for FacialExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<FacialExpression> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FacialExpression {
        FacialExpression::ALL[rng.random_range(0..FacialExpression::ALL.len())]
    }
}

/// Animation clip name understood by the avatar renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animation {
    #[serde(rename = "Talking_0")]
    Talking0,
    #[serde(rename = "Talking_1")]
    Talking1,
    #[serde(rename = "Talking_2")]
    Talking2,
    Crying,
    Laughing,
    Rumba,
    Idle,
    Terrified,
    Angry,
}

impl Animation {
    pub const ALL: [Animation; 9] = [
        Animation::Talking0,
        Animation::Talking1,
        Animation::Talking2,
        Animation::Crying,
        Animation::Laughing,
        Animation::Rumba,
        Animation::Idle,
        Animation::Terrified,
        Animation::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::Talking0 => "Talking_0",
            Animation::Talking1 => "Talking_1",
            Animation::Talking2 => "Talking_2",
            Animation::Crying => "Crying",
            Animation::Laughing => "Laughing",
            Animation::Rumba => "Rumba",
            Animation::Idle => "Idle",
            Animation::Terrified => "Terrified",
            Animation::Angry => "Angry",
        }
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<Animation> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Animation {
        Animation::ALL[rng.random_range(0..Animation::ALL.len())]
    }
}

/// One unit of chat output: display text plus two presentation tags.
///
/// Field order here is the field order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub facial_expression: FacialExpression,
    pub animation: Animation,
}

/// Text of the placeholder message at `index` (1-based continuation).
pub fn follow_up_text(index: usize) -> String {
    format!("Follow-up message {index}")
}

/// Package a reply into exactly `max_messages` messages.
///
/// Message 0 carries `reply` verbatim (even when empty). Every message gets an
/// expression and then an animation drawn uniformly from `rng`.
pub fn build_messages<R: Rng + ?Sized>(
    reply: &str,
    max_messages: usize,
    rng: &mut R,
) -> Vec<Message> {
    (0..max_messages)
        .map(|i| {
            let text = if i == 0 {
                reply.to_string()
            } else {
                follow_up_text(i)
            };
            let facial_expression: FacialExpression = rng.random();
            let animation: Animation = rng.random();
            Message {
                text,
                facial_expression,
                animation,
            }
        })
        .collect()
}

/// Encode messages as a compact JSON array.
pub fn to_json(messages: &[Message]) -> Result<String> {
    Ok(serde_json::to_string(messages)?)
}
