//! Common utility functions.

pub mod fs;

// Re-export commonly used items
pub use fs::{ensure_log_directory, expand_path, install_dir};
