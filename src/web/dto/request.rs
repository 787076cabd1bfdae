//! Request DTOs for Web API.
//!
//! Every field is optional so that a missing value reaches validation and
//! is answered with its outcome code instead of a decoding failure.

use serde::Deserialize;

use crate::intake::MessageFields;
use crate::lists::CreateList;
use crate::validation::ParamValue;

/// List creation request (`PUT /:list`).
#[derive(Debug, Default, Deserialize)]
pub struct CreateListRequest {
    /// Admin address.
    #[serde(default)]
    pub admin: Option<ParamValue>,
    /// Admin password.
    #[serde(default)]
    pub password: Option<ParamValue>,
    /// Archive visibility (0 public, 1 private).
    #[serde(default)]
    pub archive_private: Option<ParamValue>,
    /// Subscribe policy (0-3).
    #[serde(default)]
    pub subscribe_policy: Option<ParamValue>,
}

impl CreateListRequest {
    /// Convert into a creation request for the named list.
    pub fn into_create_list(self, name: &str) -> CreateList {
        CreateList {
            name: name.to_string(),
            admin: self.admin.map(|v| v.to_text()),
            password: self.password.map(|v| v.to_text()),
            archive_private: self.archive_private,
            subscribe_policy: self.subscribe_policy,
        }
    }
}

/// Subscribe or unsubscribe request (`PUT`/`DELETE /:list/members`).
#[derive(Debug, Default, Deserialize)]
pub struct MemberRequest {
    /// Member address.
    #[serde(default)]
    pub address: Option<ParamValue>,
}

impl MemberRequest {
    /// Address as text, if given.
    pub fn address(&self) -> Option<String> {
        self.address.as_ref().map(ParamValue::to_text)
    }
}

/// Mail submission request (`POST /:list`).
#[derive(Debug, Default, Deserialize)]
pub struct SendMailRequest {
    #[serde(default)]
    pub email_to: Option<ParamValue>,
    #[serde(default)]
    pub message_id: Option<ParamValue>,
    #[serde(default)]
    pub ip_from: Option<ParamValue>,
    #[serde(default)]
    pub timestamp: Option<ParamValue>,
    #[serde(default)]
    pub name_from: Option<ParamValue>,
    #[serde(default)]
    pub email_from: Option<ParamValue>,
    #[serde(default)]
    pub subject: Option<ParamValue>,
    #[serde(default)]
    pub body: Option<ParamValue>,
    /// Message id of the parent message, for replies.
    #[serde(default)]
    pub in_reply_to: Option<ParamValue>,
}

impl From<SendMailRequest> for MessageFields {
    fn from(req: SendMailRequest) -> Self {
        let text = |v: Option<ParamValue>| v.map(|v| v.to_text());
        Self {
            recipient: text(req.email_to),
            message_id: text(req.message_id),
            origin_ip: text(req.ip_from),
            timestamp: text(req.timestamp),
            sender_name: text(req.name_from),
            sender_address: text(req.email_from),
            subject: text(req.subject),
            body: text(req.body),
            in_reply_to: text(req.in_reply_to).filter(|s| !s.trim().is_empty()),
        }
    }
}
