//! Data types flowing through the discovery pipeline.

pub mod candidate;
pub mod restaurant;
pub mod run;
pub mod source;
pub mod target;
