//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS projects (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    title             TEXT    NOT NULL,
    description       TEXT    NOT NULL,
    short_description TEXT,
    image_url         TEXT,
    demo_url          TEXT,
    github_url        TEXT,
    featured          INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    order_index       INTEGER NOT NULL DEFAULT 0
);

-- One row per technology tag, in display order.
CREATE TABLE IF NOT EXISTS project_technologies (
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    position   INTEGER NOT NULL,
    name       TEXT    NOT NULL,
    PRIMARY KEY (project_id, position)
);

CREATE TABLE IF NOT EXISTS experience (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT    NOT NULL,
    company         TEXT    NOT NULL,
    company_url     TEXT,
    company_logo    TEXT,
    location        TEXT,
    start_date      TEXT    NOT NULL,   -- YYYY-MM-DD
    end_date        TEXT,               -- NULL while ongoing
    description     TEXT,
    experience_type TEXT    NOT NULL DEFAULT 'work'
                    CHECK (experience_type IN ('work', 'education', 'volunteer')),
    order_index     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS skills (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    category    TEXT    NOT NULL,
    proficiency INTEGER NOT NULL DEFAULT 50 CHECK (proficiency BETWEEN 0 AND 100),
    icon_class  TEXT,
    order_index INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS contact_messages (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT    NOT NULL,
    email      TEXT    NOT NULL,
    subject    TEXT,
    message    TEXT    NOT NULL,
    created_at TEXT    NOT NULL,
    read       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS site_settings (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    key   TEXT    NOT NULL UNIQUE,
    value TEXT    NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS project_technologies_name_idx
    ON project_technologies(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS projects_order_idx       ON projects(order_index);
CREATE INDEX IF NOT EXISTS experience_start_idx     ON experience(start_date);
CREATE INDEX IF NOT EXISTS skills_category_idx      ON skills(category, order_index);
CREATE INDEX IF NOT EXISTS contact_messages_read_idx ON contact_messages(read);

PRAGMA user_version = 1;
";
