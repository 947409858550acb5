//! AI implementations for the discovery pipeline.
//!
//! Reference implementations of the `AI` trait. Callers can use these
//! directly or implement their own.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAI, DEFAULT_MODEL};
