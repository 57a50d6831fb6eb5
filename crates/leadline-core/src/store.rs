//! The `LeadStore` trait, a name-addressed durable slot holding the whole
//! lead collection, plus an in-memory implementation.
//!
//! Backends persist the collection as one serialized JSON array. There is no
//! record-level addressing and no cross-process locking: concurrent writers
//! resolve as last-write-wins.

use std::{
  future::Future,
  sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;

use crate::lead::Lead;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "leads";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable home of the lead collection.
///
/// All methods return `Send` futures so stores can sit behind axum handlers on
/// a multi-threaded runtime.
pub trait LeadStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the collection, in insertion order. An absent slot is an empty
  /// collection; a corrupt one is an error.
  fn try_read(
    &self,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + '_;

  /// Replace the stored collection with `leads`.
  fn write<'a>(
    &'a self,
    leads: &'a [Lead],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Read the collection, never failing: unreadable or corrupt contents are
  /// logged and treated as empty.
  fn read(&self) -> impl Future<Output = Vec<Lead>> + Send + '_ {
    async move {
      match self.try_read().await {
        Ok(leads) => leads,
        Err(e) => {
          tracing::warn!(error = %e, "lead store unreadable; treating as empty");
          Vec::new()
        }
      }
    }
  }
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("write rejected by store")]
  WriteRejected,

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

/// A [`LeadStore`] that keeps the serialized slot in process memory.
///
/// Writes can be made to fail on demand, which is how callers exercise the
/// optimistic-update path without a real storage fault.
#[derive(Debug, Default)]
pub struct MemoryStore {
  slot:        Mutex<Option<String>>,
  fail_writes: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store whose slot already holds `raw` (which need not be valid JSON).
  pub fn with_raw(raw: impl Into<String>) -> Self {
    Self {
      slot:        Mutex::new(Some(raw.into())),
      fail_writes: AtomicBool::new(false),
    }
  }

  /// The serialized slot contents, exactly as last written.
  pub fn raw(&self) -> Option<String> {
    self
      .slot
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .clone()
  }

  /// Make subsequent writes fail (`true`) or succeed (`false`).
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }
}

impl LeadStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn try_read(&self) -> Result<Vec<Lead>, MemoryStoreError> {
    match self.raw() {
      None => Ok(Vec::new()),
      Some(raw) => Ok(serde_json::from_str(&raw)?),
    }
  }

  async fn write(&self, leads: &[Lead]) -> Result<(), MemoryStoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(MemoryStoreError::WriteRejected);
    }
    let raw = serde_json::to_string(leads)?;
    *self
      .slot
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw);
    Ok(())
  }
}
