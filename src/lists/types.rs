//! List lifecycle types.

use crate::config::EngineConfig;
use crate::policy::{ArchiveVisibility, SubscribePolicy};
use crate::validation::{normalize_list_name, ParamValue};
use crate::{ListGateError, Result};

/// Site-wide settings that shape list creation and enumeration.
#[derive(Debug, Clone)]
pub struct ListSettings {
    /// Reserved list hidden from enumeration.
    pub site_list: String,
    /// Domain used to build list posting addresses.
    pub email_host: String,
    /// Whether new lists may use the open subscribe policy.
    pub allow_open_subscribe: bool,
    /// Policy stored when none (or an out-of-range one) is given.
    pub default_subscribe_policy: SubscribePolicy,
    /// Archive visibility stored when none (or an out-of-range one) is given.
    pub default_archive_private: ArchiveVisibility,
}

impl ListSettings {
    /// Build settings from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let default_subscribe_policy = SubscribePolicy::from_code(config.default_subscribe_policy)
            .ok_or_else(|| {
                ListGateError::Config(format!(
                    "default_subscribe_policy must be 0-3, got {}",
                    config.default_subscribe_policy
                ))
            })?;
        let default_archive_private = ArchiveVisibility::from_code(config.default_archive_private)
            .ok_or_else(|| {
                ListGateError::Config(format!(
                    "default_archive_private must be 0 or 1, got {}",
                    config.default_archive_private
                ))
            })?;

        Ok(Self {
            site_list: normalize_list_name(&config.site_list),
            email_host: config.email_host.clone(),
            allow_open_subscribe: config.allow_open_subscribe,
            default_subscribe_policy,
            default_archive_private,
        })
    }

    /// Whether a list name is the reserved site list.
    pub fn is_site_list(&self, name: &str) -> bool {
        normalize_list_name(name) == self.site_list
    }

    /// Posting address of a list.
    pub fn list_address(&self, name: &str) -> String {
        format!("{}@{}", name, self.email_host)
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        // EngineConfig defaults are always in range.
        Self {
            site_list: "mailman".to_string(),
            email_host: "lists.example.com".to_string(),
            allow_open_subscribe: false,
            default_subscribe_policy: SubscribePolicy::Confirm,
            default_archive_private: ArchiveVisibility::Public,
        }
    }
}

/// Request to create a list, with parameters still unparsed.
#[derive(Debug, Clone, Default)]
pub struct CreateList {
    pub name: String,
    pub admin: Option<String>,
    pub password: Option<String>,
    pub archive_private: Option<ParamValue>,
    pub subscribe_policy: Option<ParamValue>,
}

impl CreateList {
    /// Create a request with the required fields.
    pub fn new(
        name: impl Into<String>,
        admin: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            admin: Some(admin.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Set the archive_private parameter.
    pub fn archive_private(mut self, value: ParamValue) -> Self {
        self.archive_private = Some(value);
        self
    }

    /// Set the subscribe_policy parameter.
    pub fn subscribe_policy(mut self, value: ParamValue) -> Self {
        self.subscribe_policy = Some(value);
        self
    }
}
