pub mod vendor_update_scan;

pub use vendor_update_scan::{run_vendor_update_scan, ScanReport};
