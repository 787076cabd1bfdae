//! Mail intake for listgate.
//!
//! Accepts an inbound message addressed to a list and hands it to the
//! engine's distribution queue.

mod service;
mod types;

pub use service::IntakeService;
pub use types::{InboundMessage, MessageFields};
