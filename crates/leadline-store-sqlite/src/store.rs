//! [`SqliteStore`]: the SQLite implementation of [`LeadStore`].

use std::{path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use leadline_core::{
  lead::Lead,
  store::{DEFAULT_SLOT, LeadStore},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lead store backed by one named row of a SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Clones made
/// with [`SqliteStore::with_slot`] share the connection but address a
/// different slot.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  slot: Arc<str>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      slot: Arc::from(DEFAULT_SLOT),
    })
  }

  /// Address the slot called `name` on the same database.
  pub fn with_slot(&self, name: &str) -> Self {
    Self {
      conn: self.conn.clone(),
      slot: Arc::from(name),
    }
  }

  pub fn slot(&self) -> &str { &self.slot }

  /// The slot's stored text, exactly as last written.
  pub async fn raw(&self) -> Result<Option<String>> {
    let slot = self.slot.to_string();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM slots WHERE name = ?1",
              rusqlite::params![slot],
              |row| row.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  fn json_error(&self, source: serde_json::Error) -> Error {
    Error::Json {
      slot: self.slot.to_string(),
      source,
    }
  }
}

// ─── LeadStore impl ──────────────────────────────────────────────────────────

impl LeadStore for SqliteStore {
  type Error = Error;

  async fn try_read(&self) -> Result<Vec<Lead>> {
    match self.raw().await? {
      None => Ok(Vec::new()),
      Some(raw) => serde_json::from_str(&raw).map_err(|e| self.json_error(e)),
    }
  }

  async fn write(&self, leads: &[Lead]) -> Result<()> {
    let value = serde_json::to_string(leads).map_err(|e| self.json_error(e))?;
    let slot = self.slot.to_string();
    let written_at = Utc::now().to_rfc3339();
    let count = leads.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO slots (name, value, written_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(name) DO UPDATE
             SET value = excluded.value, written_at = excluded.written_at",
          rusqlite::params![slot, value, written_at],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(slot = %self.slot, count, "lead slot written");
    Ok(())
  }
}
