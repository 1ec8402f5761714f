//! Application state for the OB engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::engine::Engine;

/// Shared application state.
///
/// Holds the engine and the directory its configuration was loaded from, so
/// an admin reload can read it again.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
    config_dir: PathBuf,
}

impl AppState {
    /// Creates application state from a loaded configuration.
    pub fn new(loader: ConfigLoader) -> Self {
        let config_dir = loader.path().to_path_buf();
        Self {
            engine: Arc::new(Engine::new(loader.into_config())),
            config_dir,
        }
    }

    /// Creates application state around an existing engine.
    pub fn with_engine(engine: Arc<Engine>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            config_dir: config_dir.into(),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the configuration directory used for reloads.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}
