//! Response DTOs for Web API.

use serde::Serialize;

use crate::engine::MailingList;
use crate::lists::ListSettings;

/// List summary record.
///
/// Never carries the admin credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse {
    /// List name.
    pub listname: String,
    /// Posting address.
    pub list_address: String,
    /// Subscribe policy code (0-3).
    pub subscribe_policy: i64,
    /// Archive visibility code (0 public, 1 private).
    pub archive_private: i64,
}

impl ListResponse {
    /// Build the summary of a list.
    pub fn from_list(list: &MailingList, settings: &ListSettings) -> Self {
        Self {
            listname: list.name.clone(),
            list_address: settings.list_address(&list.name),
            subscribe_policy: list.subscribe_policy.code(),
            archive_private: list.archive_private.code(),
        }
    }
}
