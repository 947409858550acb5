pub mod deps;
pub mod scheduled_tasks;

pub use deps::{open_store, SentinelDeps};
pub use scheduled_tasks::start_scheduler;
