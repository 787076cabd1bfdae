//! Subscription policy resolution.
//!
//! Decides what a subscribe request against a list turns into. Ban and
//! membership checks run before the policy branch, so a banned or existing
//! member never reaches the confirmation/approval workflow.

use regex::RegexBuilder;
use tracing::warn;

use crate::engine::{MailingList, PendingKind};
use crate::Outcome;

/// How joining a list is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscribePolicy {
    /// Anyone may join immediately.
    Open,
    /// Subscriber must confirm by email.
    Confirm,
    /// A moderator must approve.
    Approval,
    /// Subscriber confirms, then a moderator approves.
    ConfirmAndApproval,
}

impl SubscribePolicy {
    /// Parse the stored integer value.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SubscribePolicy::Open),
            1 => Some(SubscribePolicy::Confirm),
            2 => Some(SubscribePolicy::Approval),
            3 => Some(SubscribePolicy::ConfirmAndApproval),
            _ => None,
        }
    }

    /// Integer value as stored by the engine.
    pub fn code(self) -> i64 {
        match self {
            SubscribePolicy::Open => 0,
            SubscribePolicy::Confirm => 1,
            SubscribePolicy::Approval => 2,
            SubscribePolicy::ConfirmAndApproval => 3,
        }
    }
}

/// Archive visibility of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveVisibility {
    Public,
    Private,
}

impl ArchiveVisibility {
    /// Parse the stored integer value.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ArchiveVisibility::Public),
            1 => Some(ArchiveVisibility::Private),
            _ => None,
        }
    }

    /// Integer value as stored by the engine.
    pub fn code(self) -> i64 {
        match self {
            ArchiveVisibility::Public => 0,
            ArchiveVisibility::Private => 1,
        }
    }
}

/// What a subscribe request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Address matches the ban list; nothing happens.
    Banned,
    /// Address is already subscribed; nothing happens.
    AlreadyMember,
    /// Add the member right away.
    Subscribe,
    /// Record a pending request of the given kind.
    Pending(PendingKind),
}

impl Resolution {
    /// Outcome code reported to the caller.
    pub fn outcome(self) -> Outcome {
        match self {
            Resolution::Banned => Outcome::Banned,
            Resolution::AlreadyMember => Outcome::AlreadyMember,
            Resolution::Subscribe => Outcome::Ok,
            Resolution::Pending(PendingKind::Confirmation) => Outcome::PendingConfirm,
            Resolution::Pending(PendingKind::Approval) => Outcome::PendingApproval,
            Resolution::Pending(PendingKind::ConfirmationAndApproval) => {
                Outcome::PendingConfirmAndApproval
            }
        }
    }
}

/// Resolve a subscribe request for an already-normalized address.
///
/// First match wins: ban list, then membership, then the list's policy.
pub fn resolve(list: &MailingList, address: &str) -> Resolution {
    if is_banned(&list.ban_list, address) {
        return Resolution::Banned;
    }

    if list.is_member(address) {
        return Resolution::AlreadyMember;
    }

    match list.subscribe_policy {
        SubscribePolicy::Open => Resolution::Subscribe,
        SubscribePolicy::Confirm => Resolution::Pending(PendingKind::Confirmation),
        SubscribePolicy::Approval => Resolution::Pending(PendingKind::Approval),
        SubscribePolicy::ConfirmAndApproval => {
            Resolution::Pending(PendingKind::ConfirmationAndApproval)
        }
    }
}

/// Check an address against a ban list.
///
/// Entries starting with `^` are regular expressions; anything else is
/// compared as a literal address. Both match case-insensitively.
pub fn is_banned(ban_list: &[String], address: &str) -> bool {
    ban_list.iter().any(|entry| {
        if entry.starts_with('^') {
            match RegexBuilder::new(entry).case_insensitive(true).build() {
                Ok(re) => re.is_match(address),
                Err(e) => {
                    warn!(pattern = %entry, error = %e, "Ignoring invalid ban pattern");
                    false
                }
            }
        } else {
            entry.trim().eq_ignore_ascii_case(address)
        }
    })
}
