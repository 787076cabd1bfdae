//! listgate - REST gateway for a mailing-list engine
//!
//! Creates and enumerates lists, manages subscriptions and accepts inbound
//! mail for distribution. Every operation answers with a small integer
//! [`Outcome`] code.

pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod lists;
pub mod logging;
pub mod members;
pub mod outcome;
pub mod password;
pub mod policy;
pub mod validation;
pub mod web;

pub use config::Config;
pub use engine::{
    ListEngine, ListUpdate, MailingList, MemoryEngine, NewList, PendingKind, PendingRequest,
    QueuedMessage, SharedEngine,
};
#[cfg(feature = "sqlite")]
pub use engine::SqliteEngine;
pub use error::{ListGateError, Result};
pub use intake::{InboundMessage, IntakeService, MessageFields};
pub use lists::{CreateList, ListService, ListSettings};
pub use members::MemberService;
pub use outcome::Outcome;
pub use policy::{resolve, ArchiveVisibility, Resolution, SubscribePolicy};
pub use validation::{ParamValue, ValidationError};
pub use web::{create_router, AppState, WebServer};
