//! Chat reply generation and avatar message packaging.

#[cfg(feature = "generation")]
pub mod candle_t5;
pub mod generator;
pub mod message;
pub mod responder;
