//! Process-wide logging state.
//!
//! The first [`install`] sets a registry with a reloadable
//! [`RoutingLayer`] as the global default subscriber. Later installs
//! swap the routing layer through the kept reload handle.

use std::sync::Arc;
use applog_types::{LogError, Result};
use parking_lot::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, Registry};

use crate::log::RoutingLayer;

type ReloadHandle = reload::Handle<RoutingLayer, Registry>;

/// Global logging state.
#[derive(Debug, Default)]
pub struct State {
    handle: Option<ReloadHandle>,
}

impl State {
    /// Create new state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get global state instance.
    pub fn global() -> Arc<Mutex<State>> {
        use once_cell::sync::Lazy;
        static INSTANCE: Lazy<Arc<Mutex<State>>> = Lazy::new(|| {
            Arc::new(Mutex::new(State::new()))
        });
        INSTANCE.clone()
    }

    /// Whether a configuration has been installed.
    pub fn is_configured(&self) -> bool {
        self.handle.is_some()
    }
}

/// Install `layer` globally, replacing a previously installed one.
pub(crate) fn install(layer: RoutingLayer) -> Result<()> {
    let state = State::global();
    let mut state = state.lock();

    match &state.handle {
        Some(handle) => {
            // Fails only when the subscriber is gone, leaving nothing to flush
            let _ = handle.with_current(|current| current.flush());
            handle.reload(layer).map_err(|e| {
                LogError::ConfigurationApplication(format!(
                    "failed to replace logging configuration: {}",
                    e
                ))
            })?;
        }
        None => {
            let (layer, handle) = reload::Layer::new(layer);
            tracing_subscriber::registry().with(layer).try_init().map_err(|e| {
                LogError::ConfigurationApplication(format!(
                    "failed to install logging configuration: {}",
                    e
                ))
            })?;
            state.handle = Some(handle);
        }
    }

    Ok(())
}
