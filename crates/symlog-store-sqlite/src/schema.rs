//! SQL schema for the symlog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    username    TEXT PRIMARY KEY,
    password    TEXT NOT NULL,   -- plaintext, compared verbatim
    email       TEXT NOT NULL,
    is_admin    INTEGER,
    created_at  TEXT NOT NULL,
    last_login  TEXT
);

CREATE TABLE IF NOT EXISTS episodes (
    episode_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username           TEXT NOT NULL REFERENCES users(username),
    episode_date       TEXT NOT NULL,   -- YYYY-MM-DD
    trigger_ids        TEXT NOT NULL DEFAULT '[]',
    menstrual_period   INTEGER NOT NULL DEFAULT 0,
    morning_severity   INTEGER NOT NULL DEFAULT 0,
    afternoon_severity INTEGER NOT NULL DEFAULT 0,
    evening_severity   INTEGER NOT NULL DEFAULT 0,
    notes              TEXT,
    UNIQUE (username, episode_date)
);

-- Owned by exactly one episode; removed with it.
CREATE TABLE IF NOT EXISTS medicine_logs (
    medicine_log_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    episode_id        INTEGER NOT NULL REFERENCES episodes(episode_id) ON DELETE CASCADE,
    username          TEXT NOT NULL,
    medicine_log_date TEXT NOT NULL,
    medicine_name     TEXT,
    dose              TEXT,
    relief            INTEGER,
    time_taken        TEXT NOT NULL,
    notes             TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS medicine_logs_episode_idx ON medicine_logs(episode_id);

PRAGMA user_version = 1;
";
