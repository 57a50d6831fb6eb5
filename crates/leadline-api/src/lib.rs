//! JSON REST API for Leadline.
//!
//! Exposes two axum [`Router`]s backed by a shared
//! [`LeadRepository`](leadline_core::repository::LeadRepository): the public
//! intake endpoint, and the staff dashboard endpoints. Authentication, TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let api = leadline_api::intake_router(repo.clone())
//!   .merge(leadline_api::dashboard_router(repo).route_layer(auth));
//! Router::new().nest("/api", api)
//! ```

pub mod dashboard;
pub mod error;
pub mod intake;
pub mod leads;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use leadline_core::{repository::LeadRepository, store::LeadStore};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Response wrapper for intake and mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  /// Set when the change was applied but could not be persisted.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
}

impl<T> Envelope<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success: true,
      data:    Some(data),
      error:   None,
      warning: None,
    }
  }

  /// Success with no payload.
  pub fn done() -> Self {
    Self {
      success: true,
      data:    None,
      error:   None,
      warning: None,
    }
  }

  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      data:    None,
      error:   Some(message.into()),
      warning: None,
    }
  }

  pub fn with_warning(mut self, warning: Option<String>) -> Self {
    self.warning = warning;
    self
  }
}

// ─── Routers ─────────────────────────────────────────────────────────────────

/// Public routes: `POST /lead`.
pub fn intake_router<S>(repo: Arc<LeadRepository<S>>) -> Router<()>
where
  S: LeadStore + 'static,
{
  Router::new()
    .route("/lead", post(intake::submit::<S>))
    .with_state(repo)
}

/// Staff routes: lead management and dashboard views.
pub fn dashboard_router<S>(repo: Arc<LeadRepository<S>>) -> Router<()>
where
  S: LeadStore + 'static,
{
  Router::new()
    // Leads
    .route("/leads", get(leads::list::<S>))
    .route(
      "/leads/{id}",
      get(leads::get_one::<S>)
        .patch(leads::update::<S>)
        .delete(leads::delete_one::<S>),
    )
    // Dashboard
    .route("/dashboard/stats", get(dashboard::stats::<S>))
    .route("/dashboard/recent", get(dashboard::recent::<S>))
    .route("/dashboard/leads", get(dashboard::table::<S>))
    .with_state(repo)
}

// ─── Integration tests ────────────────────────────────────────────────────────
