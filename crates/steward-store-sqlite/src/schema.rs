//! SQL schema for the Steward SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   TEXT PRIMARY KEY,
    handle      TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

-- One row per grant. A person holds each name at most once.
CREATE TABLE IF NOT EXISTS roles (
    role_id     TEXT PRIMARY KEY,
    person_id   TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    name        TEXT NOT NULL CHECK (name IN ('admin', 'spotlight', 'moderator')),
    created_at  TEXT NOT NULL,
    UNIQUE (person_id, name)
);

CREATE INDEX IF NOT EXISTS roles_name_idx ON roles(name);

PRAGMA user_version = 1;
";
