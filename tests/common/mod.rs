//! Test helpers for the HTTP API tests.
//!
//! Fixtures talk to the engine directly, the way an operator's tooling
//! would, and the requests under test go through the router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::async_trait;
use axum_test::TestServer;

use listgate::{
    create_router, AppState, ArchiveVisibility, ListEngine, ListGateError, ListSettings,
    ListUpdate, MailingList, NewList, PendingRequest, QueuedMessage, Result, SharedEngine,
    SubscribePolicy,
};

/// List created for every test.
pub const LIST: &str = "list";

/// Address used by the subscription tests.
pub const ADDRESS: &str = "user@email.com";

/// Test server together with the engine behind it.
pub struct TestContext {
    pub server: TestServer,
    pub engine: SharedEngine,
    pub settings: ListSettings,
}

impl TestContext {
    /// Start a server over the given engine with default settings.
    pub fn new(engine: SharedEngine) -> Self {
        Self::with_settings(engine, ListSettings::default())
    }

    /// Start a server over the given engine.
    pub fn with_settings(engine: SharedEngine, settings: ListSettings) -> Self {
        let state = Arc::new(AppState::new(engine.clone(), settings.clone()));
        let router = create_router(state, &[]);
        let server = TestServer::new(router).expect("Failed to create test server");
        Self {
            server,
            engine,
            settings,
        }
    }

    /// Start a server over a fresh in-memory engine holding [`LIST`].
    pub async fn with_list() -> Self {
        let ctx = Self::new(Arc::new(listgate::MemoryEngine::new()));
        ctx.create_list(LIST).await;
        ctx
    }

    /// Create a list with default attributes.
    pub async fn create_list(&self, name: &str) {
        let created = self
            .engine
            .create_list(&NewList {
                name: name.to_string(),
                admin_address: "owner@example.com".to_string(),
                admin_password_hash: "opaque".to_string(),
                subscribe_policy: SubscribePolicy::Confirm,
                archive_private: ArchiveVisibility::Public,
            })
            .await
            .expect("Failed to create list");
        assert!(created, "list {name} already exists");
    }

    /// Set the subscribe policy of a list.
    pub async fn change_subscribe_policy(&self, name: &str, code: i64) {
        let policy = SubscribePolicy::from_code(code).expect("Invalid policy code");
        self.engine
            .update_list(name, &ListUpdate::new().subscribe_policy(policy))
            .await
            .expect("Failed to update list");
    }

    /// Add an entry to the ban list of a list.
    pub async fn ban(&self, name: &str, entry: &str) {
        self.engine
            .ban_address(name, entry)
            .await
            .expect("Failed to ban address");
    }

    /// Add a member to a list.
    pub async fn add_member(&self, name: &str, address: &str) {
        self.engine
            .add_member(name, address)
            .await
            .expect("Failed to add member");
    }

    /// Current members of a list, straight from the engine.
    pub async fn members(&self, name: &str) -> Vec<String> {
        self.engine
            .get_list(name)
            .await
            .expect("Failed to load list")
            .map(|list| list.members.into_iter().collect())
            .unwrap_or_default()
    }
}

/// Engine whose storage is unavailable: every call fails.
pub struct FailingEngine;

fn unavailable<T>() -> Result<T> {
    Err(ListGateError::Engine("storage unavailable".to_string()))
}

#[async_trait]
impl ListEngine for FailingEngine {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        unavailable()
    }

    async fn get_list(&self, _name: &str) -> Result<Option<MailingList>> {
        unavailable()
    }

    async fn create_list(&self, _new_list: &NewList) -> Result<bool> {
        unavailable()
    }

    async fn update_list(&self, _name: &str, _update: &ListUpdate) -> Result<bool> {
        unavailable()
    }

    async fn add_member(&self, _list: &str, _address: &str) -> Result<bool> {
        unavailable()
    }

    async fn remove_member(&self, _list: &str, _address: &str) -> Result<bool> {
        unavailable()
    }

    async fn ban_address(&self, _list: &str, _entry: &str) -> Result<bool> {
        unavailable()
    }

    async fn enqueue_request(&self, _request: &PendingRequest) -> Result<()> {
        unavailable()
    }

    async fn pending_requests(&self, _list: &str) -> Result<Vec<PendingRequest>> {
        unavailable()
    }

    async fn enqueue_message(&self, _message: &QueuedMessage) -> Result<()> {
        unavailable()
    }

    async fn queued_messages(&self, _list: &str) -> Result<Vec<QueuedMessage>> {
        unavailable()
    }

    async fn take_pending_requests(&self, _list: &str) -> Result<Vec<PendingRequest>> {
        unavailable()
    }

    async fn take_queued_messages(&self, _list: &str) -> Result<Vec<QueuedMessage>> {
        unavailable()
    }
}
