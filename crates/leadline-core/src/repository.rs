//! [`LeadRepository`]: the shared, observable cache of the lead collection
//! and the only place it is mutated.
//!
//! Every mutation runs the same sequence under a write lock:
//!
//! 1. apply the change to the cached collection and notify subscribers;
//! 2. persist the full collection to the [`LeadStore`];
//! 3. on a failed write, keep the in-memory change, raise the state's `error`
//!    flag, and hand the failure back in the [`Outcome`].
//!
//! The cache therefore never disagrees with what the caller attempted, even
//! when the durable copy lags behind.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use crate::{
  Error, Result,
  lead::{Lead, LeadPatch},
  store::LeadStore,
};

/// State-level error after a failed initial read.
pub const LOAD_FAILED: &str = "Failed to load leads";
/// State-level error after a failed write.
pub const SAVE_FAILED: &str = "Failed to save leads";

// ─── State ───────────────────────────────────────────────────────────────────

/// What subscribers observe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadState {
  /// The lead collection, in insertion order.
  pub items:   Vec<Lead>,
  /// `true` only while the collection is being (re)read from the store.
  pub loading: bool,
  pub error:   Option<String>,
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The result of a mutation that has been applied in memory.
///
/// `persist_error` is set when the durable write failed; the value is still
/// live in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Outcome<T> {
  pub value:         T,
  pub persist_error: Option<String>,
}

impl<T> Outcome<T> {
  pub fn is_durable(&self) -> bool { self.persist_error.is_none() }

  /// Treat a non-durable outcome as [`Error::Persistence`].
  pub fn into_result(self) -> Result<T> {
    match self.persist_error {
      None => Ok(self.value),
      Some(message) => Err(Error::Persistence(message)),
    }
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Owns a [`LeadStore`] and the observable cache mirroring it.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct LeadRepository<S> {
  store:  S,
  state:  watch::Sender<LeadState>,
  writes: Mutex<()>,
}

impl<S: LeadStore> LeadRepository<S> {
  /// Wrap `store` and populate the cache with one read.
  pub async fn open(store: S) -> Self {
    let (state, _) = watch::channel(LeadState {
      loading: true,
      ..LeadState::default()
    });
    let repo = Self {
      store,
      state,
      writes: Mutex::new(()),
    };
    repo.reload().await;
    repo
  }

  /// Replace the cache with the store's current contents.
  ///
  /// A failed read leaves an empty collection and sets [`LOAD_FAILED`].
  pub async fn reload(&self) {
    let _guard = self.writes.lock().await;
    self.state.send_modify(|s| s.loading = true);

    let loaded = self.store.try_read().await;
    if let Err(e) = &loaded {
      tracing::warn!(error = %e, "failed to load leads from store");
    }

    self.state.send_modify(|s| {
      s.loading = false;
      match loaded {
        Ok(items) => {
          s.items = items;
          s.error = None;
        }
        Err(_) => {
          s.items.clear();
          s.error = Some(LOAD_FAILED.to_owned());
        }
      }
    });
  }

  pub fn store(&self) -> &S { &self.store }

  /// Subscribe to state changes. Receivers are notified synchronously with
  /// each mutation, before it is persisted.
  pub fn subscribe(&self) -> watch::Receiver<LeadState> {
    self.state.subscribe()
  }

  pub fn snapshot(&self) -> LeadState { self.state.borrow().clone() }

  /// The full collection, in insertion order.
  pub fn list(&self) -> Vec<Lead> { self.state.borrow().items.clone() }

  /// The collection dashboard views derive from: the cache, or the store
  /// itself when the cache is empty.
  pub async fn dashboard_leads(&self) -> Vec<Lead> {
    let cached = self.list();
    if !cached.is_empty() {
      return cached;
    }
    self.store.read().await
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Append `lead` unchanged. The caller assigns its id and timestamps.
  pub async fn add(&self, lead: Lead) -> Outcome<Lead> {
    let _guard = self.writes.lock().await;

    let mut items = Vec::new();
    self.state.send_modify(|s| {
      s.items.push(lead.clone());
      items = s.items.clone();
    });

    let persist_error = self.persist(&items).await;
    Outcome {
      value: lead,
      persist_error,
    }
  }

  /// Merge `patch` over the lead with `id` and refresh its `updated_at`.
  ///
  /// A missing `id` is [`Error::NotFound`]; the collection is untouched and
  /// nothing is written.
  pub async fn update(&self, id: Uuid, patch: LeadPatch) -> Result<Outcome<Lead>> {
    let _guard = self.writes.lock().await;
    let now = Utc::now();

    let mut updated = None;
    let mut items = Vec::new();
    self.state.send_if_modified(|s| {
      let Some(lead) = s.items.iter_mut().find(|l| l.id == id) else {
        return false;
      };
      lead.apply(patch, now);
      updated = Some(lead.clone());
      items = s.items.clone();
      true
    });

    let Some(lead) = updated else {
      let err = Error::NotFound(id);
      tracing::debug!(%id, "update of unknown lead");
      self.state.send_modify(|s| s.error = Some(err.to_string()));
      return Err(err);
    };

    let persist_error = self.persist(&items).await;
    Ok(Outcome {
      value: lead,
      persist_error,
    })
  }

  /// Remove any lead with `id`. Absent ids are not an error.
  pub async fn delete(&self, id: Uuid) -> Outcome<()> {
    let _guard = self.writes.lock().await;

    let mut items = Vec::new();
    self.state.send_modify(|s| {
      s.items.retain(|l| l.id != id);
      items = s.items.clone();
    });

    let persist_error = self.persist(&items).await;
    Outcome {
      value: (),
      persist_error,
    }
  }

  /// Install `leads` if the collection is empty, returning how many were
  /// added (zero when the collection already had leads).
  pub async fn seed_if_empty(&self, leads: Vec<Lead>) -> Outcome<usize> {
    let _guard = self.writes.lock().await;

    let is_empty = self.state.borrow().items.is_empty();
    if !is_empty || leads.is_empty() {
      return Outcome {
        value:         0,
        persist_error: None,
      };
    }

    let count = leads.len();
    self.state.send_modify(|s| s.items = leads);
    let items = self.list();

    let persist_error = self.persist(&items).await;
    Outcome {
      value: count,
      persist_error,
    }
  }

  /// Write `items` through, reconciling the state's `error` flag.
  async fn persist(&self, items: &[Lead]) -> Option<String> {
    match self.store.write(items).await {
      Ok(()) => {
        self.state.send_if_modified(|s| s.error.take().is_some());
        None
      }
      Err(e) => {
        tracing::error!(error = %e, count = items.len(), "failed to persist leads");
        self
          .state
          .send_modify(|s| s.error = Some(SAVE_FAILED.to_owned()));
        Some(format!("{SAVE_FAILED}: {e}"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{
    demo,
    intake::{self, IntakePayload},
    lead::LeadStatus,
    store::MemoryStore,
  };

  fn new_lead(first: &str) -> Lead {
    intake::submit(
      IntakePayload {
        first_name:      first.into(),
        last_name:       "Tester".into(),
        email:           format!("{}@example.com", first.to_lowercase()),
        country:         "Canada".into(),
        linked_in:       "https://linkedin.com/in/tester".into(),
        visas:           vec!["o1".into()],
        resume:          None,
        additional_info: "n/a".into(),
      },
      Utc::now(),
    )
  }

  async fn repo() -> LeadRepository<MemoryStore> {
    LeadRepository::open(MemoryStore::new()).await
  }

  #[tokio::test]
  async fn open_empty_store_is_idle() {
    let repo = repo().await;
    let state = repo.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);
  }

  #[tokio::test]
  async fn open_corrupt_store_reports_load_failure() {
    let repo = LeadRepository::open(MemoryStore::with_raw("[{]")).await;
    let state = repo.snapshot();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some(LOAD_FAILED));
  }

  #[tokio::test]
  async fn open_reads_existing_collection() {
    let store = MemoryStore::new();
    store.write(&demo::sample_leads()).await.unwrap();
    let repo = LeadRepository::open(store).await;
    assert_eq!(repo.list(), demo::sample_leads());
  }

  #[tokio::test]
  async fn add_appends_once_in_last_position_and_persists() {
    let repo = repo().await;
    repo.add(new_lead("First")).await.into_result().unwrap();
    let lead = new_lead("Second");
    let outcome = repo.add(lead.clone()).await;

    assert!(outcome.is_durable());
    assert_eq!(outcome.value, lead);

    let list = repo.list();
    assert_eq!(list.len(), 2);
    assert_eq!(list.last(), Some(&lead));
    assert_eq!(list.iter().filter(|l| l.id == lead.id).count(), 1);
    assert_eq!(repo.store().read().await, list);
  }

  #[tokio::test]
  async fn status_update_touches_only_status_and_updated_at() {
    let repo = repo().await;
    let lead = new_lead("Jane");
    repo.add(lead.clone()).await.into_result().unwrap();

    let updated = repo
      .update(lead.id, LeadPatch::status(LeadStatus::ReachedOut))
      .await
      .unwrap()
      .into_result()
      .unwrap();

    assert_eq!(updated.status, LeadStatus::ReachedOut);
    assert!(updated.updated_at > lead.updated_at);
    assert_eq!(updated.created_at, lead.created_at);
    assert_eq!(
      Lead {
        status: lead.status,
        updated_at: lead.updated_at,
        ..updated.clone()
      },
      lead
    );
    assert_eq!(repo.store().read().await, vec![updated]);
  }

  #[tokio::test]
  async fn update_unknown_id_changes_nothing() {
    let repo = repo().await;
    repo.add(new_lead("Jane")).await.into_result().unwrap();
    let raw_before = repo.store().raw();
    let items_before = repo.list();

    let missing = Uuid::new_v4();
    let result = repo
      .update(missing, LeadPatch::status(LeadStatus::ReachedOut))
      .await;

    assert!(matches!(result, Err(Error::NotFound(id)) if id == missing));
    assert_eq!(repo.store().raw(), raw_before);
    assert_eq!(repo.list(), items_before);
    assert_eq!(
      repo.snapshot().error,
      Some(format!("Lead with ID {missing} not found"))
    );
  }

  #[tokio::test]
  async fn delete_removes_and_unknown_delete_is_noop() {
    let repo = repo().await;
    let keep = new_lead("Keep");
    let drop = new_lead("Drop");
    repo.add(keep.clone()).await.into_result().unwrap();
    repo.add(drop.clone()).await.into_result().unwrap();

    repo.delete(drop.id).await.into_result().unwrap();
    assert!(repo.list().iter().all(|l| l.id != drop.id));
    assert!(repo.store().read().await.iter().all(|l| l.id != drop.id));

    repo.delete(Uuid::new_v4()).await.into_result().unwrap();
    assert_eq!(repo.list(), vec![keep]);
  }

  #[tokio::test]
  async fn failed_write_keeps_memory_and_surfaces_error() {
    let repo = repo().await;
    repo.store().fail_writes(true);

    let lead = new_lead("Offline");
    let outcome = repo.add(lead.clone()).await;

    assert!(!outcome.is_durable());
    assert!(outcome.persist_error.as_deref().unwrap().starts_with(SAVE_FAILED));
    assert_eq!(repo.list(), vec![lead.clone()]);
    assert_eq!(repo.snapshot().error.as_deref(), Some(SAVE_FAILED));
    assert!(repo.store().read().await.is_empty());
    assert!(matches!(
      outcome.into_result(),
      Err(Error::Persistence(_))
    ));

    // The next successful write carries the whole collection and clears the flag.
    repo.store().fail_writes(false);
    let second = new_lead("Online");
    repo.add(second.clone()).await.into_result().unwrap();
    assert_eq!(repo.snapshot().error, None);
    assert_eq!(repo.store().read().await, vec![lead, second]);
  }

  #[tokio::test]
  async fn subscribers_see_each_mutation() {
    let repo = repo().await;
    let mut rx = repo.subscribe();
    assert!(!rx.has_changed().unwrap());

    let lead = new_lead("Watch");
    repo.add(lead.clone()).await.into_result().unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().items, vec![lead.clone()]);

    repo.delete(lead.id).await.into_result().unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().items.is_empty());
  }

  #[tokio::test]
  async fn dashboard_falls_back_to_store_when_cache_empty() {
    let repo = repo().await;
    // Another writer fills the slot behind the cache's back.
    repo.store().write(&demo::sample_leads()).await.unwrap();
    assert!(repo.list().is_empty());
    assert_eq!(repo.dashboard_leads().await, demo::sample_leads());

    repo.reload().await;
    assert_eq!(repo.list(), demo::sample_leads());
  }

  #[tokio::test]
  async fn seed_only_fills_an_empty_collection() {
    let repo = repo().await;
    let seeded = repo.seed_if_empty(demo::sample_leads()).await;
    assert_eq!(seeded.into_result().unwrap(), 4);
    assert_eq!(repo.store().read().await.len(), 4);

    let again = repo.seed_if_empty(demo::sample_leads()).await;
    assert_eq!(again.into_result().unwrap(), 0);
    assert_eq!(repo.list().len(), 4);
  }
}
