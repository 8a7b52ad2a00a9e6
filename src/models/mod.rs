//! Model catalogs and artifact downloads.

pub mod catalog;
pub mod chat_catalog;
#[cfg(feature = "model-download")]
pub mod download;
