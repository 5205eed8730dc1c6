pub mod config;
pub mod helpers;
pub mod integrations;
pub mod jobs;

pub use config::AppConfig;
pub use jobs::{run_vendor_update_scan, ScanReport};
