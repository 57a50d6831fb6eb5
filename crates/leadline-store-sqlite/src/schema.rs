//! SQL schema for the Leadline SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per named slot. The lead collection lives in a single row as a JSON
-- array and is replaced wholesale on every write.
CREATE TABLE IF NOT EXISTS slots (
    name        TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    written_at  TEXT NOT NULL
);
";
