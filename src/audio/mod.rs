//! Audio file input.

pub mod decode;
