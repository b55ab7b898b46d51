//! applog entry point.
//!
//! Applies the logging configuration once, before anything else runs, then
//! emits a few records so both destinations can be inspected:
//! `<install-dir>/logs/app.log` and standard output.

use anyhow::{Context, Result};
use applog_core::log::{self, Logger};
use applog_types::Severity;

fn main() -> Result<()> {
    let dir = log::init_default().context("logging setup failed")?;

    let logger = applog_core::logger!();
    applog_core::info!(logger, "logging to {}", dir.display());
    applog_core::debug!(logger, "console only: below the file threshold");

    let module = Logger::get(applog_core::config::MODULE_CHANNEL);
    module.debug("dropped: below the my_module threshold");
    module.log(Severity::Warning, "module-scoped warning");

    // Plain tracing events are routed by target
    tracing::info!(target: "my_module::worker", jobs = 3, "worker pool ready");

    let root = Logger::root();
    applog_core::error!(root, "disk full");
    Ok(())
}
