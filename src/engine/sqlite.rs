//! SQLite list engine built on sqlx.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use axum::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteRow,
};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use super::schema::MIGRATIONS;
use super::{
    ListEngine, ListUpdate, MailingList, NewList, PendingKind, PendingRequest, QueuedMessage,
};
use crate::intake::InboundMessage;
use crate::policy::{ArchiveVisibility, SubscribePolicy};
use crate::{ListGateError, Result};

/// Engine backed by an SQLite database.
///
/// Each mutation runs in its own transaction; the primary keys on
/// `lists`, `members` and `bans` make duplicate inserts no-ops.
pub struct SqliteEngine {
    pool: SqlitePool,
}

impl SqliteEngine {
    /// Open (or create) a database file and apply migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening list database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let engine = Self { pool };
        engine.migrate().await?;
        Ok(engine)
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory list database");
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // A second connection would see a different, empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let engine = Self { pool };
        engine.migrate().await?;
        Ok(engine)
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(&self.pool)
                .await?;
        Ok(version)
    }

    /// Apply pending migrations.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&self.pool)
        .await?;

        let current_version = self.schema_version().await?;
        if current_version as usize >= MIGRATIONS.len() {
            debug!("List database is up to date (version {})", current_version);
            return Ok(());
        }

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = self.pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        info!(
            "List database migration complete (now at version {})",
            MIGRATIONS.len()
        );
        Ok(())
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ListGateError::Engine(format!("bad timestamp {s:?}: {e}")))
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| ListGateError::Engine(format!("bad id {s:?}: {e}")))
}

async fn ensure_list(conn: &mut SqliteConnection, name: &str) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM lists WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    match exists {
        Some(_) => Ok(()),
        None => Err(ListGateError::UnknownList(name.to_string())),
    }
}

fn list_from_row(row: &SqliteRow) -> Result<MailingList> {
    let policy: i64 = row.try_get("subscribe_policy")?;
    let archive: i64 = row.try_get("archive_private")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(MailingList {
        name: row.try_get("name")?,
        admin_address: row.try_get("admin_address")?,
        admin_password_hash: row.try_get("admin_password")?,
        subscribe_policy: SubscribePolicy::from_code(policy).ok_or_else(|| {
            ListGateError::Engine(format!("stored subscribe_policy out of range: {policy}"))
        })?,
        archive_private: ArchiveVisibility::from_code(archive).ok_or_else(|| {
            ListGateError::Engine(format!("stored archive_private out of range: {archive}"))
        })?,
        members: Default::default(),
        ban_list: Vec::new(),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn pending_from_row(row: &SqliteRow) -> Result<PendingRequest> {
    let id: String = row.try_get("id")?;
    let kind: String = row.try_get("kind")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(PendingRequest {
        id: parse_id(&id)?,
        list_name: row.try_get("list_name")?,
        address: row.try_get("address")?,
        kind: PendingKind::parse(&kind)
            .ok_or_else(|| ListGateError::Engine(format!("unknown pending kind: {kind}")))?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn queued_from_row(row: &SqliteRow) -> Result<QueuedMessage> {
    let id: String = row.try_get("id")?;
    let received_at: String = row.try_get("received_at")?;

    Ok(QueuedMessage {
        id: parse_id(&id)?,
        list_name: row.try_get("list_name")?,
        message: InboundMessage {
            recipient: row.try_get("recipient")?,
            message_id: row.try_get("message_id")?,
            origin_ip: row.try_get("origin_ip")?,
            timestamp: row.try_get("sent_at")?,
            sender_name: row.try_get("sender_name")?,
            sender_address: row.try_get("sender_address")?,
            subject: row.try_get("subject")?,
            body: row.try_get("body")?,
            in_reply_to: row.try_get("in_reply_to")?,
        },
        received_at: parse_timestamp(&received_at)?,
    })
}

#[async_trait]
impl ListEngine for SqliteEngine {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_names(&self) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM lists ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn get_list(&self, name: &str) -> Result<Option<MailingList>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT name, admin_address, admin_password, subscribe_policy, archive_private, created_at
             FROM lists WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.commit().await?;
            return Ok(None);
        };
        let mut list = list_from_row(&row)?;

        let members: Vec<String> =
            sqlx::query_scalar("SELECT address FROM members WHERE list_name = ? ORDER BY address")
                .bind(name)
                .fetch_all(&mut *tx)
                .await?;
        list.members = members.into_iter().collect();

        list.ban_list =
            sqlx::query_scalar("SELECT entry FROM bans WHERE list_name = ? ORDER BY rowid")
                .bind(name)
                .fetch_all(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(Some(list))
    }

    async fn create_list(&self, new_list: &NewList) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO lists (name, admin_address, admin_password, subscribe_policy, archive_private, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(name) DO NOTHING",
        )
        .bind(&new_list.name)
        .bind(&new_list.admin_address)
        .bind(&new_list.admin_password_hash)
        .bind(new_list.subscribe_policy.code())
        .bind(new_list.archive_private.code())
        .bind(timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_list(&self, name: &str, update: &ListUpdate) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE lists
             SET subscribe_policy = COALESCE(?, subscribe_policy),
                 archive_private = COALESCE(?, archive_private)
             WHERE name = ?",
        )
        .bind(update.subscribe_policy.map(SubscribePolicy::code))
        .bind(update.archive_private.map(ArchiveVisibility::code))
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, list: &str, address: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        ensure_list(&mut *tx, list).await?;

        let result = sqlx::query("INSERT OR IGNORE INTO members (list_name, address) VALUES (?, ?)")
            .bind(list)
            .bind(address)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, list: &str, address: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        ensure_list(&mut *tx, list).await?;

        let result = sqlx::query("DELETE FROM members WHERE list_name = ? AND address = ?")
            .bind(list)
            .bind(address)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ban_address(&self, list: &str, entry: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        ensure_list(&mut *tx, list).await?;

        let result = sqlx::query("INSERT OR IGNORE INTO bans (list_name, entry) VALUES (?, ?)")
            .bind(list)
            .bind(entry)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn enqueue_request(&self, request: &PendingRequest) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        ensure_list(&mut *tx, &request.list_name).await?;

        sqlx::query(
            "INSERT INTO pending_requests (id, list_name, address, kind, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(request.id.to_string())
        .bind(&request.list_name)
        .bind(&request.address)
        .bind(request.kind.as_str())
        .bind(timestamp(&request.created_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>> {
        let rows = sqlx::query(
            "SELECT id, list_name, address, kind, created_at
             FROM pending_requests WHERE list_name = ? ORDER BY created_at, rowid",
        )
        .bind(list)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(pending_from_row).collect()
    }

    async fn enqueue_message(&self, message: &QueuedMessage) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        ensure_list(&mut *tx, &message.list_name).await?;

        let msg = &message.message;
        sqlx::query(
            "INSERT INTO message_queue (
                id, list_name, recipient, message_id, in_reply_to, origin_ip, sent_at,
                sender_name, sender_address, subject, body, received_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(&message.list_name)
        .bind(&msg.recipient)
        .bind(&msg.message_id)
        .bind(&msg.in_reply_to)
        .bind(&msg.origin_ip)
        .bind(&msg.timestamp)
        .bind(&msg.sender_name)
        .bind(&msg.sender_address)
        .bind(&msg.subject)
        .bind(&msg.body)
        .bind(timestamp(&message.received_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>> {
        let rows = sqlx::query(
            "SELECT id, list_name, recipient, message_id, in_reply_to, origin_ip, sent_at,
                    sender_name, sender_address, subject, body, received_at
             FROM message_queue WHERE list_name = ? ORDER BY received_at, rowid",
        )
        .bind(list)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(queued_from_row).collect()
    }

    async fn take_pending_requests(&self, list: &str) -> Result<Vec<PendingRequest>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT id, list_name, address, kind, created_at
             FROM pending_requests WHERE list_name = ? ORDER BY created_at, rowid",
        )
        .bind(list)
        .fetch_all(&mut *tx)
        .await?;
        let requests = rows
            .iter()
            .map(pending_from_row)
            .collect::<Result<Vec<_>>>()?;

        sqlx::query("DELETE FROM pending_requests WHERE list_name = ?")
            .bind(list)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(requests)
    }

    async fn take_queued_messages(&self, list: &str) -> Result<Vec<QueuedMessage>> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT id, list_name, recipient, message_id, in_reply_to, origin_ip, sent_at,
                    sender_name, sender_address, subject, body, received_at
             FROM message_queue WHERE list_name = ? ORDER BY received_at, rowid",
        )
        .bind(list)
        .fetch_all(&mut *tx)
        .await?;
        let messages = rows
            .iter()
            .map(queued_from_row)
            .collect::<Result<Vec<_>>>()?;

        sqlx::query("DELETE FROM message_queue WHERE list_name = ?")
            .bind(list)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(messages)
    }
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine").finish()
    }
}
