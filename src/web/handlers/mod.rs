//! API handlers for listgate.

pub mod intake;
pub mod lists;
pub mod members;

pub use intake::*;
pub use lists::*;
pub use members::*;

use crate::engine::SharedEngine;
use crate::lists::ListSettings;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Mailing-list engine.
    pub engine: SharedEngine,
    /// Site-wide list settings.
    pub settings: ListSettings,
}

impl AppState {
    /// Create a new application state.
    pub fn new(engine: SharedEngine, settings: ListSettings) -> Self {
        Self { engine, settings }
    }
}
