//! SQLite schema and migrations for the list engine.
//!
//! Migrations are applied in order when the database is opened; the
//! schema_version table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: lists, membership and ban list
    r#"
CREATE TABLE lists (
    name              TEXT PRIMARY KEY,
    admin_address     TEXT NOT NULL,
    admin_password    TEXT NOT NULL,           -- Argon2 PHC string
    subscribe_policy  INTEGER NOT NULL DEFAULT 1,
    archive_private   INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL
);

CREATE TABLE members (
    list_name  TEXT NOT NULL REFERENCES lists(name) ON DELETE CASCADE,
    address    TEXT NOT NULL,
    PRIMARY KEY (list_name, address)
);

CREATE TABLE bans (
    list_name  TEXT NOT NULL REFERENCES lists(name) ON DELETE CASCADE,
    entry      TEXT NOT NULL,                  -- address or ^pattern
    PRIMARY KEY (list_name, entry)
);
"#,
    // v2: pending subscriptions and distribution queue
    r#"
CREATE TABLE pending_requests (
    id          TEXT PRIMARY KEY,
    list_name   TEXT NOT NULL REFERENCES lists(name) ON DELETE CASCADE,
    address     TEXT NOT NULL,
    kind        TEXT NOT NULL,                 -- 'confirmation', 'approval', 'confirmation_and_approval'
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_pending_requests_list ON pending_requests(list_name, created_at);

CREATE TABLE message_queue (
    id              TEXT PRIMARY KEY,
    list_name       TEXT NOT NULL REFERENCES lists(name) ON DELETE CASCADE,
    recipient       TEXT NOT NULL,
    message_id      TEXT NOT NULL,
    in_reply_to     TEXT,
    origin_ip       TEXT NOT NULL,
    sent_at         TEXT NOT NULL,
    sender_name     TEXT NOT NULL,
    sender_address  TEXT NOT NULL,
    subject         TEXT NOT NULL,
    body            TEXT NOT NULL,
    received_at     TEXT NOT NULL
);

CREATE INDEX idx_message_queue_list ON message_queue(list_name, received_at);
"#,
];
