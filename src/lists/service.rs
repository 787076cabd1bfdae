//! List lifecycle service.

use tracing::{debug, info};

use crate::engine::{ListEngine, MailingList, NewList};
use crate::password::hash_admin_password;
use crate::validation::{
    normalize_archive_private, normalize_list_name, normalize_subscribe_policy, parse_int_param,
    validate_email, validate_list_name, validate_password, ValidationError,
};
use crate::{ListGateError, Outcome, Result};

use super::types::{CreateList, ListSettings};

/// Service for creating and looking up lists.
pub struct ListService<'a> {
    engine: &'a dyn ListEngine,
    settings: &'a ListSettings,
}

impl<'a> ListService<'a> {
    /// Create a new ListService.
    pub fn new(engine: &'a dyn ListEngine, settings: &'a ListSettings) -> Self {
        Self { engine, settings }
    }

    /// Create a list.
    ///
    /// Checks run in order: list name, admin address, password, then the
    /// integer parameters. Well-typed but out-of-range parameters are
    /// replaced by the site defaults rather than rejected.
    pub async fn create(&self, request: &CreateList) -> Result<Outcome> {
        let new_list = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(e) => {
                debug!(list = %request.name, error = %e, "Rejected list creation");
                return Ok(e.outcome());
            }
        };

        if self.engine.get_list(&new_list.name).await?.is_some() {
            return Ok(Outcome::AlreadyExists);
        }

        let password = request.password.clone().unwrap_or_default();
        let hash = tokio::task::spawn_blocking(move || hash_admin_password(&password))
            .await
            .map_err(|e| ListGateError::Credential(e.to_string()))??;

        let new_list = NewList {
            admin_password_hash: hash,
            ..new_list
        };

        // A concurrent create can still win between the lookup and here.
        if !self.engine.create_list(&new_list).await? {
            return Ok(Outcome::AlreadyExists);
        }

        info!(
            list = %new_list.name,
            subscribe_policy = new_list.subscribe_policy.code(),
            archive_private = new_list.archive_private.code(),
            "List created"
        );
        Ok(Outcome::Ok)
    }

    /// Validate a creation request into a record without a credential.
    fn prepare(&self, request: &CreateList) -> std::result::Result<NewList, ValidationError> {
        let name = validate_list_name(&request.name)?;
        let admin_address = validate_email(request.admin.as_deref().unwrap_or_default())?;
        validate_password(request.password.as_deref())?;

        let archive = parse_int_param("archive_private", request.archive_private.as_ref())?;
        let policy = parse_int_param("subscribe_policy", request.subscribe_policy.as_ref())?;

        Ok(NewList {
            name,
            admin_address,
            admin_password_hash: String::new(),
            subscribe_policy: normalize_subscribe_policy(
                policy,
                self.settings.default_subscribe_policy,
                self.settings.allow_open_subscribe,
            ),
            archive_private: normalize_archive_private(
                archive,
                self.settings.default_archive_private,
            ),
        })
    }

    /// Every list except the reserved site list, sorted by name.
    pub async fn list_all(&self) -> Result<Vec<MailingList>> {
        let mut lists = Vec::new();
        for name in self.engine.list_names().await? {
            if self.settings.is_site_list(&name) {
                continue;
            }
            // A list removed since list_names() is simply skipped.
            if let Some(list) = self.engine.get_list(&name).await? {
                lists.push(list);
            }
        }
        Ok(lists)
    }

    /// Look up a single list.
    ///
    /// # Errors
    ///
    /// Returns [`ListGateError::UnknownList`] if the list does not exist.
    pub async fn describe(&self, name: &str) -> Result<MailingList> {
        let name = normalize_list_name(name);
        self.engine
            .get_list(&name)
            .await?
            .ok_or(ListGateError::UnknownList(name))
    }
}
