//! Mailing-list engine interface.
//!
//! The engine owns list storage, per-list mutual exclusion, membership and
//! the outbound queues. The API layer only talks to it through
//! [`ListEngine`], so the services can be driven by any backend:
//!
//! - [`MemoryEngine`]: process-local, used by tests and `backend = "memory"`
//! - `SqliteEngine`: sqlx over SQLite, used by `backend = "sqlite"`

mod memory;
#[cfg(feature = "sqlite")]
mod schema;
#[cfg(feature = "sqlite")]
mod sqlite;
mod types;

pub use memory::MemoryEngine;
#[cfg(feature = "sqlite")]
pub use schema::MIGRATIONS;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEngine;
pub use types::{ListUpdate, MailingList, NewList, PendingKind, PendingRequest, QueuedMessage};

use std::sync::Arc;

use axum::async_trait;
use tracing::info;

use crate::config::EngineConfig;
use crate::{ListGateError, Result};

/// Shared handle to an engine.
pub type SharedEngine = Arc<dyn ListEngine>;

/// Operations the API layer needs from the mailing-list engine.
///
/// Every method opens the record it needs, applies at most one mutation and
/// releases it before returning. Mutations on a missing list fail with
/// [`ListGateError::UnknownList`].
#[async_trait]
pub trait ListEngine: Send + Sync {
    /// Returns the name of the backend.
    fn backend_name(&self) -> &'static str;

    /// Names of every list, sorted.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Load a list with its members and ban list.
    async fn get_list(&self, name: &str) -> Result<Option<MailingList>>;

    /// Create a list. Returns `false` if the name is taken.
    async fn create_list(&self, new_list: &NewList) -> Result<bool>;

    /// Change list attributes. Returns `false` if the list does not exist.
    async fn update_list(&self, name: &str, update: &ListUpdate) -> Result<bool>;

    /// Add a member. Returns `false` if already subscribed.
    async fn add_member(&self, list: &str, address: &str) -> Result<bool>;

    /// Remove a member. Returns `false` if not subscribed.
    async fn remove_member(&self, list: &str, address: &str) -> Result<bool>;

    /// Add an address or `^` pattern to the ban list. Returns `false` if
    /// already present.
    async fn ban_address(&self, list: &str, entry: &str) -> Result<bool>;

    /// Record a subscription awaiting confirmation and/or approval.
    async fn enqueue_request(&self, request: &PendingRequest) -> Result<()>;

    /// Pending subscriptions for a list, oldest first.
    async fn pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>>;

    /// Hand a message to the distribution queue.
    async fn enqueue_message(&self, message: &QueuedMessage) -> Result<()>;

    /// Queued messages for a list, oldest first.
    async fn queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>>;

    /// Remove and return the pending subscriptions for a list, oldest first.
    ///
    /// This is how a confirmation or moderation worker takes ownership of
    /// requests; they are not returned again.
    async fn take_pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>>;

    /// Remove and return the queued messages for a list, oldest first.
    async fn take_queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>>;
}

/// Open the engine selected by the configuration.
pub async fn open(config: &EngineConfig) -> Result<SharedEngine> {
    match config.backend.as_str() {
        "memory" => {
            info!("Using in-memory list engine; state is lost on exit");
            Ok(Arc::new(MemoryEngine::new()))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let engine = SqliteEngine::open(&config.database_path).await?;
            Ok(Arc::new(engine))
        }
        other => Err(ListGateError::Config(format!(
            "unsupported engine backend: {other}"
        ))),
    }
}
