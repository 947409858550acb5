//! Core trait abstractions for the discovery pipeline.
//!
//! External providers and storage sit behind these traits so the pipeline
//! can run against Tavily, an OpenAI-compatible model and SQLite in
//! production, and against the doubles in [`crate::testing`] in tests.

pub mod ai;
pub mod searcher;
pub mod sleeper;
pub mod store;
