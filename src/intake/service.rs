//! Mail intake service.

use tracing::{debug, info};

use crate::engine::{ListEngine, QueuedMessage};
use crate::validation::{normalize_list_name, validate_message};
use crate::{ListGateError, Outcome, Result};

use super::types::MessageFields;

/// Service for submitting mail to a list.
pub struct IntakeService<'a> {
    engine: &'a dyn ListEngine,
}

impl<'a> IntakeService<'a> {
    /// Create a new IntakeService over the given engine.
    pub fn new(engine: &'a dyn ListEngine) -> Self {
        Self { engine }
    }

    /// Submit a message for distribution.
    ///
    /// The list is looked up before the fields are checked, so an unknown
    /// list wins over missing fields. Replies and new threads are accepted
    /// alike.
    ///
    /// # Errors
    ///
    /// Returns [`ListGateError::UnknownList`] if the list does not exist, or
    /// an engine error if the queue could not be written.
    pub async fn submit(&self, list_name: &str, fields: &MessageFields) -> Result<Outcome> {
        let name = normalize_list_name(list_name);
        if self.engine.get_list(&name).await?.is_none() {
            return Err(ListGateError::UnknownList(name));
        }

        let message = match validate_message(fields) {
            Ok(message) => message,
            Err(e) => {
                debug!(list = %name, error = %e, "Rejected inbound message");
                return Ok(e.outcome());
            }
        };

        let queued = QueuedMessage::new(name.as_str(), message);
        self.engine.enqueue_message(&queued).await?;

        info!(
            list = %name,
            queue_id = %queued.id,
            message_id = %queued.message.message_id,
            reply = queued.message.is_reply(),
            "Message queued for distribution"
        );
        Ok(Outcome::Ok)
    }
}
