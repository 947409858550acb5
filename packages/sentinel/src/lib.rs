// Restaurant Sentinel - scheduled discovery over a watchlist
//
// Reads the watchlist, runs the discovery pipeline once per target and
// remembers what it found. Runs once per invocation or on a cron schedule.

pub mod batch;
pub mod config;
pub mod kernel;

pub use batch::{BatchReport, Sentinel};
pub use config::Config;
