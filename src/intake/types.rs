//! Inbound message types.

/// Raw message fields as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct MessageFields {
    /// List posting address (`email_to`).
    pub recipient: Option<String>,
    pub message_id: Option<String>,
    /// Sender IP (`ip_from`).
    pub origin_ip: Option<String>,
    pub timestamp: Option<String>,
    /// Sender display name (`name_from`).
    pub sender_name: Option<String>,
    /// Sender address (`email_from`).
    pub sender_address: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub in_reply_to: Option<String>,
}

/// A message with every required field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub recipient: String,
    pub message_id: String,
    pub origin_ip: String,
    /// Date as supplied by the sender; not reparsed.
    pub timestamp: String,
    pub sender_name: String,
    pub sender_address: String,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
}

impl InboundMessage {
    /// Whether this message continues an existing thread.
    pub fn is_reply(&self) -> bool {
        self.in_reply_to.is_some()
    }
}
