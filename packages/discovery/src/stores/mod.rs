//! Storage implementations for the discovery pipeline.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage (always available)
//! - `SqliteStore` - SQLite file-based storage (requires `sqlite` feature)

pub mod memory;
pub mod seed;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;
pub use seed::{seed_sources, DEFAULT_SOURCES};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
