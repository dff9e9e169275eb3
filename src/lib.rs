pub mod areas;
pub mod config;
pub mod metrics;
pub mod output;
pub mod ranking;
pub mod scoring;
