//! List lifecycle for listgate.
//!
//! This module provides list creation, enumeration and lookup. Updating
//! and deleting lists are left to the engine's own tooling.

mod service;
mod types;

pub use service::ListService;
pub use types::{CreateList, ListSettings};
