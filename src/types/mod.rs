pub mod config;
pub mod features;
pub mod report;
pub mod scoring;
pub mod transaction;
