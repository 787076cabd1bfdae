//! Records exchanged with the mailing-list engine.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::intake::InboundMessage;
use crate::policy::{ArchiveVisibility, SubscribePolicy};

/// A mailing list as stored by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MailingList {
    /// Unique, lowercase list name.
    pub name: String,
    /// List owner address.
    pub admin_address: String,
    /// Opaque admin credential (PHC string).
    pub admin_password_hash: String,
    /// Subscribe policy.
    pub subscribe_policy: SubscribePolicy,
    /// Archive visibility.
    pub archive_private: ArchiveVisibility,
    /// Subscribed addresses.
    pub members: BTreeSet<String>,
    /// Banned addresses and `^` patterns.
    pub ban_list: Vec<String>,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
}

impl MailingList {
    /// Build a fresh record from a creation request.
    pub fn from_new(new_list: &NewList) -> Self {
        Self {
            name: new_list.name.clone(),
            admin_address: new_list.admin_address.clone(),
            admin_password_hash: new_list.admin_password_hash.clone(),
            subscribe_policy: new_list.subscribe_policy,
            archive_private: new_list.archive_private,
            members: BTreeSet::new(),
            ban_list: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether an address is subscribed.
    pub fn is_member(&self, address: &str) -> bool {
        self.members.contains(address)
    }

    /// Apply an attribute update in place.
    pub fn apply(&mut self, update: &ListUpdate) {
        if let Some(policy) = update.subscribe_policy {
            self.subscribe_policy = policy;
        }
        if let Some(archive) = update.archive_private {
            self.archive_private = archive;
        }
    }
}

/// New list for creation.
#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub admin_address: String,
    pub admin_password_hash: String,
    pub subscribe_policy: SubscribePolicy,
    pub archive_private: ArchiveVisibility,
}

/// Attribute changes for an existing list.
#[derive(Debug, Clone, Default)]
pub struct ListUpdate {
    pub subscribe_policy: Option<SubscribePolicy>,
    pub archive_private: Option<ArchiveVisibility>,
}

impl ListUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subscribe policy.
    pub fn subscribe_policy(mut self, policy: SubscribePolicy) -> Self {
        self.subscribe_policy = Some(policy);
        self
    }

    /// Set the archive visibility.
    pub fn archive_private(mut self, archive: ArchiveVisibility) -> Self {
        self.archive_private = Some(archive);
        self
    }
}

/// Workflow a pending subscription is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingKind {
    Confirmation,
    Approval,
    ConfirmationAndApproval,
}

impl PendingKind {
    /// Storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            PendingKind::Confirmation => "confirmation",
            PendingKind::Approval => "approval",
            PendingKind::ConfirmationAndApproval => "confirmation_and_approval",
        }
    }

    /// Parse a storage name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmation" => Some(PendingKind::Confirmation),
            "approval" => Some(PendingKind::Approval),
            "confirmation_and_approval" => Some(PendingKind::ConfirmationAndApproval),
            _ => None,
        }
    }
}

/// A subscription waiting for confirmation and/or approval.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub id: Uuid,
    pub list_name: String,
    pub address: String,
    pub kind: PendingKind,
    pub created_at: DateTime<Utc>,
}

impl PendingRequest {
    /// Create a new pending request with a fresh id.
    pub fn new(list_name: impl Into<String>, address: impl Into<String>, kind: PendingKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_name: list_name.into(),
            address: address.into(),
            kind,
            created_at: Utc::now(),
        }
    }
}

/// An accepted inbound message waiting for distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedMessage {
    pub id: Uuid,
    pub list_name: String,
    pub message: InboundMessage,
    pub received_at: DateTime<Utc>,
}

impl QueuedMessage {
    /// Wrap a validated message for the given list.
    pub fn new(list_name: impl Into<String>, message: InboundMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_name: list_name.into(),
            message,
            received_at: Utc::now(),
        }
    }

    /// Header block a distributor would emit for this message.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let msg = &self.message;
        let mut headers = vec![
            (
                "From",
                format!("\"{}\" <{}>", msg.sender_name.replace('"', "'"), msg.sender_address),
            ),
            ("To", msg.recipient.clone()),
            ("Subject", msg.subject.clone()),
            ("Message-ID", bracket_message_id(&msg.message_id)),
        ];
        if let Some(parent) = &msg.in_reply_to {
            headers.push(("In-Reply-To", bracket_message_id(parent)));
        }
        headers.push(("Date", msg.timestamp.clone()));
        headers.push(("X-Originating-IP", msg.origin_ip.clone()));
        headers
    }
}

fn bracket_message_id(id: &str) -> String {
    let id = id.trim();
    if id.starts_with('<') && id.ends_with('>') {
        id.to_string()
    } else {
        format!("<{id}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(in_reply_to: Option<&str>) -> InboundMessage {
        InboundMessage {
            recipient: "list@lists.example.com".to_string(),
            message_id: "1".to_string(),
            origin_ip: "127.0.0.1".to_string(),
            timestamp: "Mon, 05 Jan 2026 10:00:00 +0000 (UTC)".to_string(),
            sender_name: "user \"test\"".to_string(),
            sender_address: "user@email.com".to_string(),
            subject: "subject test".to_string(),
            body: "body test".to_string(),
            in_reply_to: in_reply_to.map(str::to_string),
        }
    }

    #[test]
    fn test_pending_kind_round_trip_names() {
        for kind in [
            PendingKind::Confirmation,
            PendingKind::Approval,
            PendingKind::ConfirmationAndApproval,
        ] {
            assert_eq!(PendingKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(PendingKind::parse("other"), None);
    }

    #[test]
    fn test_list_update_applies_only_set_fields() {
        let mut list = MailingList::from_new(&NewList {
            name: "devel".to_string(),
            admin_address: "owner@example.com".to_string(),
            admin_password_hash: "opaque".to_string(),
            subscribe_policy: SubscribePolicy::Confirm,
            archive_private: ArchiveVisibility::Public,
        });

        list.apply(&ListUpdate::new().subscribe_policy(SubscribePolicy::Open));
        assert_eq!(list.subscribe_policy, SubscribePolicy::Open);
        assert_eq!(list.archive_private, ArchiveVisibility::Public);
    }

    #[test]
    fn test_headers_without_reply() {
        let queued = QueuedMessage::new("list", message(None));
        let headers = queued.headers();

        assert!(headers.iter().all(|(name, _)| *name != "In-Reply-To"));
        assert!(headers.contains(&("Message-ID", "<1>".to_string())));
        assert!(headers.contains(&("From", "\"user 'test'\" <user@email.com>".to_string())));
    }

    #[test]
    fn test_headers_with_reply() {
        let queued = QueuedMessage::new("list", message(Some("<parent@example.com>")));
        let headers = queued.headers();

        assert!(headers.contains(&("In-Reply-To", "<parent@example.com>".to_string())));
        assert!(headers.contains(&("X-Originating-IP", "127.0.0.1".to_string())));
    }
}
