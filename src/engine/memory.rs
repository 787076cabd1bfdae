//! In-memory list engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::{ListEngine, ListUpdate, MailingList, NewList, PendingRequest, QueuedMessage};
use crate::{ListGateError, Result};

/// Process-local engine.
///
/// Pending requests and queued messages stay in memory until a worker
/// takes them with [`ListEngine::take_pending_requests`] or
/// [`ListEngine::take_queued_messages`].
///
/// The map lock is only held long enough to find a record; each list then
/// has its own mutex, so requests against different lists never wait on
/// each other.
#[derive(Default)]
pub struct MemoryEngine {
    lists: RwLock<BTreeMap<String, Arc<Mutex<MailingList>>>>,
    pending: Mutex<Vec<PendingRequest>>,
    queue: Mutex<Vec<QueuedMessage>>,
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    async fn record(&self, name: &str) -> Result<Arc<Mutex<MailingList>>> {
        self.lists
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ListGateError::UnknownList(name.to_string()))
    }
}

#[async_trait]
impl ListEngine for MemoryEngine {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.lists.read().await.keys().cloned().collect())
    }

    async fn get_list(&self, name: &str) -> Result<Option<MailingList>> {
        let record = self.lists.read().await.get(name).cloned();
        match record {
            Some(record) => Ok(Some(record.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn create_list(&self, new_list: &NewList) -> Result<bool> {
        let mut lists = self.lists.write().await;
        if lists.contains_key(&new_list.name) {
            return Ok(false);
        }
        lists.insert(
            new_list.name.clone(),
            Arc::new(Mutex::new(MailingList::from_new(new_list))),
        );
        debug!(list = %new_list.name, "List created");
        Ok(true)
    }

    async fn update_list(&self, name: &str, update: &ListUpdate) -> Result<bool> {
        match self.record(name).await {
            Ok(record) => {
                record.lock().await.apply(update);
                Ok(true)
            }
            Err(ListGateError::UnknownList(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn add_member(&self, list: &str, address: &str) -> Result<bool> {
        let record = self.record(list).await?;
        let inserted = record.lock().await.members.insert(address.to_string());
        Ok(inserted)
    }

    async fn remove_member(&self, list: &str, address: &str) -> Result<bool> {
        let record = self.record(list).await?;
        let removed = record.lock().await.members.remove(address);
        Ok(removed)
    }

    async fn ban_address(&self, list: &str, entry: &str) -> Result<bool> {
        let record = self.record(list).await?;
        let mut list = record.lock().await;
        if list.ban_list.iter().any(|e| e == entry) {
            return Ok(false);
        }
        list.ban_list.push(entry.to_string());
        Ok(true)
    }

    async fn enqueue_request(&self, request: &PendingRequest) -> Result<()> {
        self.record(&request.list_name).await?;
        self.pending.lock().await.push(request.clone());
        Ok(())
    }

    async fn pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>> {
        Ok(self
            .pending
            .lock()
            .await
            .iter()
            .filter(|r| r.list_name == list)
            .cloned()
            .collect())
    }

    async fn enqueue_message(&self, message: &QueuedMessage) -> Result<()> {
        self.record(&message.list_name).await?;
        self.queue.lock().await.push(message.clone());
        Ok(())
    }

    async fn queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>> {
        Ok(self
            .queue
            .lock()
            .await
            .iter()
            .filter(|m| m.list_name == list)
            .cloned()
            .collect())
    }

    async fn take_pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>> {
        let mut pending = self.pending.lock().await;
        let (taken, kept): (Vec<_>, Vec<_>) = pending.drain(..).partition(|r| r.list_name == list);
        *pending = kept;
        Ok(taken)
    }

    async fn take_queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>> {
        let mut queue = self.queue.lock().await;
        let (taken, kept): (Vec<_>, Vec<_>) = queue.drain(..).partition(|m| m.list_name == list);
        *queue = kept;
        Ok(taken)
    }
}
