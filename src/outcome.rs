//! Outcome codes returned by every API operation.
//!
//! The API never signals results through HTTP status. Each operation answers
//! with one small integer from this table as its JSON body.

use serde::{Serialize, Serializer};

/// Result code of an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Success, or immediate effect.
    Ok,
    /// Success, pending confirmation by the subscriber.
    PendingConfirm,
    /// Success, pending approval by a moderator.
    PendingApproval,
    /// Address is already a member.
    AlreadyMember,
    /// Address is banned from the list.
    Banned,
    /// Address is syntactically invalid.
    InvalidEmail,
    /// Address is not a member of the list.
    NotMember,
    /// Inbound message is missing required fields.
    MissingFields,
    /// Admin password is empty or missing.
    InvalidPassword,
    /// List does not exist.
    UnknownList,
    /// A list with that name already exists.
    AlreadyExists,
    /// Creation parameters could not be parsed.
    InvalidParams,
    /// Success, pending confirmation and then moderator approval.
    PendingConfirmAndApproval,
    /// The engine failed (storage or lock error). Not retried.
    EngineFailure,
}

impl Outcome {
    /// Integer code sent on the wire.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Ok => 0,
            Outcome::PendingConfirm => 1,
            Outcome::PendingApproval => 2,
            Outcome::AlreadyMember => 3,
            Outcome::Banned => 4,
            Outcome::InvalidEmail => 5,
            Outcome::NotMember => 7,
            Outcome::MissingFields => 8,
            Outcome::InvalidPassword => 11,
            Outcome::UnknownList => 12,
            Outcome::AlreadyExists => 13,
            Outcome::InvalidParams => 14,
            Outcome::PendingConfirmAndApproval => 15,
            Outcome::EngineFailure => 16,
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
