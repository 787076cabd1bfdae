//! Subscription service.

use tracing::{debug, info};

use crate::engine::{ListEngine, PendingRequest};
use crate::policy::{resolve, Resolution};
use crate::validation::{normalize_address, normalize_list_name, validate_email};
use crate::{ListGateError, Outcome, Result};

/// Service for list membership.
pub struct MemberService<'a> {
    engine: &'a dyn ListEngine,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService over the given engine.
    pub fn new(engine: &'a dyn ListEngine) -> Self {
        Self { engine }
    }

    /// Subscribe an address to a list.
    ///
    /// Returns the resolver's outcome: immediate, pending (confirmation,
    /// approval or both), banned, or already a member. Banned and duplicate
    /// requests leave the list untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ListGateError::UnknownList`] if the list does not exist.
    pub async fn subscribe(&self, list_name: &str, address: Option<&str>) -> Result<Outcome> {
        let name = normalize_list_name(list_name);
        let list = self
            .engine
            .get_list(&name)
            .await?
            .ok_or_else(|| ListGateError::UnknownList(name.clone()))?;

        let address = match validate_email(address.unwrap_or_default()) {
            Ok(address) => address,
            Err(e) => {
                debug!(list = %name, error = %e, "Rejected subscribe request");
                return Ok(e.outcome());
            }
        };

        let resolution = resolve(&list, &address);
        match resolution {
            Resolution::Banned | Resolution::AlreadyMember => {
                debug!(list = %name, address = %address, ?resolution, "Subscribe skipped");
            }
            Resolution::Subscribe => {
                if !self.engine.add_member(&name, &address).await? {
                    return Ok(Outcome::AlreadyMember);
                }
                info!(list = %name, address = %address, "Member subscribed");
            }
            Resolution::Pending(kind) => {
                let request = PendingRequest::new(name.as_str(), address.as_str(), kind);
                self.engine.enqueue_request(&request).await?;
                info!(
                    list = %name,
                    address = %address,
                    kind = kind.as_str(),
                    request_id = %request.id,
                    "Subscription pending"
                );
            }
        }

        Ok(resolution.outcome())
    }

    /// Unsubscribe an address from a list.
    ///
    /// Addresses are not syntax-checked; a malformed one is simply not a
    /// member.
    pub async fn unsubscribe(&self, list_name: &str, address: Option<&str>) -> Result<Outcome> {
        let name = normalize_list_name(list_name);
        let list = self
            .engine
            .get_list(&name)
            .await?
            .ok_or_else(|| ListGateError::UnknownList(name.clone()))?;

        let address = normalize_address(address.unwrap_or_default());
        if !list.is_member(&address) {
            return Ok(Outcome::NotMember);
        }

        // Another request may have removed it since the lookup.
        if !self.engine.remove_member(&name, &address).await? {
            return Ok(Outcome::NotMember);
        }

        info!(list = %name, address = %address, "Member unsubscribed");
        Ok(Outcome::Ok)
    }

    /// Current members of a list, in engine order.
    pub async fn members(&self, list_name: &str) -> Result<Vec<String>> {
        let name = normalize_list_name(list_name);
        let list = self
            .engine
            .get_list(&name)
            .await?
            .ok_or(ListGateError::UnknownList(name))?;
        Ok(list.members.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ListUpdate, MemoryEngine, NewList, PendingKind};
    use crate::policy::{ArchiveVisibility, SubscribePolicy};

    const ADDRESS: &str = "user@email.com";

    async fn engine_with_policy(policy: SubscribePolicy) -> MemoryEngine {
        let engine = MemoryEngine::new();
        engine
            .create_list(&NewList {
                name: "list".to_string(),
                admin_address: "owner@example.com".to_string(),
                admin_password_hash: "opaque".to_string(),
                subscribe_policy: policy,
                archive_private: ArchiveVisibility::Public,
            })
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_subscribe_open_adds_member() {
        let engine = engine_with_policy(SubscribePolicy::Open).await;
        let service = MemberService::new(&engine);

        assert_eq!(
            service.subscribe("list", Some(ADDRESS)).await.unwrap(),
            Outcome::Ok
        );
        assert_eq!(service.members("list").await.unwrap(), vec![ADDRESS]);
    }

    #[tokio::test]
    async fn test_subscribe_pending_does_not_add_member() {
        for (policy, outcome, kind) in [
            (
                SubscribePolicy::Confirm,
                Outcome::PendingConfirm,
                PendingKind::Confirmation,
            ),
            (
                SubscribePolicy::Approval,
                Outcome::PendingApproval,
                PendingKind::Approval,
            ),
            (
                SubscribePolicy::ConfirmAndApproval,
                Outcome::PendingConfirmAndApproval,
                PendingKind::ConfirmationAndApproval,
            ),
        ] {
            let engine = engine_with_policy(policy).await;
            let service = MemberService::new(&engine);

            assert_eq!(service.subscribe("list", Some(ADDRESS)).await.unwrap(), outcome);
            assert!(service.members("list").await.unwrap().is_empty());

            let pending = engine.pending_requests("list").await.unwrap();
            assert_eq!(pending.len(), 1);
            assert_eq!(pending[0].kind, kind);
            assert_eq!(pending[0].address, ADDRESS);
        }
    }

    #[tokio::test]
    async fn test_subscribe_banned() {
        let engine = engine_with_policy(SubscribePolicy::Open).await;
        engine.ban_address("list", ADDRESS).await.unwrap();
        let service = MemberService::new(&engine);

        assert_eq!(
            service.subscribe("list", Some(ADDRESS)).await.unwrap(),
            Outcome::Banned
        );
        assert!(service.members("list").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_already_member() {
        let engine = engine_with_policy(SubscribePolicy::Approval).await;
        engine.add_member("list", ADDRESS).await.unwrap();
        let service = MemberService::new(&engine);

        assert_eq!(
            service.subscribe("list", Some("User@Email.com")).await.unwrap(),
            Outcome::AlreadyMember
        );
        assert!(engine.pending_requests("list").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_invalid_email() {
        let engine = engine_with_policy(SubscribePolicy::Open).await;
        let service = MemberService::new(&engine);

        assert_eq!(
            service.subscribe("list", Some("user@emailcom")).await.unwrap(),
            Outcome::InvalidEmail
        );
        assert_eq!(
            service.subscribe("list", None).await.unwrap(),
            Outcome::InvalidEmail
        );
        assert!(service.members("list").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_follows_policy_change() {
        let engine = engine_with_policy(SubscribePolicy::Confirm).await;
        engine
            .update_list("list", &ListUpdate::new().subscribe_policy(SubscribePolicy::Open))
            .await
            .unwrap();
        let service = MemberService::new(&engine);

        assert_eq!(
            service.subscribe("list", Some(ADDRESS)).await.unwrap(),
            Outcome::Ok
        );
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let engine = engine_with_policy(SubscribePolicy::Open).await;
        engine.add_member("list", ADDRESS).await.unwrap();
        let service = MemberService::new(&engine);

        assert_eq!(
            service.unsubscribe("list", Some(ADDRESS)).await.unwrap(),
            Outcome::Ok
        );
        assert_eq!(
            service.unsubscribe("list", Some(ADDRESS)).await.unwrap(),
            Outcome::NotMember
        );
        assert_eq!(
            service.unsubscribe("list", Some("garbage")).await.unwrap(),
            Outcome::NotMember
        );
    }

    #[tokio::test]
    async fn test_unknown_list() {
        let engine = MemoryEngine::new();
        let service = MemberService::new(&engine);

        assert!(matches!(
            service.subscribe("list14", Some(ADDRESS)).await,
            Err(ListGateError::UnknownList(_))
        ));
        assert!(matches!(
            service.unsubscribe("list14", Some(ADDRESS)).await,
            Err(ListGateError::UnknownList(_))
        ));
        assert!(matches!(
            service.members("list14").await,
            Err(ListGateError::UnknownList(_))
        ));
    }
}
