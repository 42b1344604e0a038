pub mod activity;
pub mod config;
pub mod log;
pub mod stats;
pub mod streak;
pub mod timer;
