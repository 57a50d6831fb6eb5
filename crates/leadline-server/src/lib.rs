//! Leadline HTTP server: configuration, staff authentication, and the
//! composed router serving the public intake endpoint and the staff API.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Extension, Json, Router, middleware, routing::get};
use leadline_core::{repository::LeadRepository, store::LeadStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{CredentialVerifier, Identity, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LEADLINE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Name of the slot holding the lead collection.
  #[serde(default = "default_slot")]
  pub slot:               String,
  pub auth_email:         String,
  #[serde(default = "default_auth_name")]
  pub auth_name:          String,
  #[serde(default = "default_auth_role")]
  pub auth_role:          String,
  pub auth_password_hash: String,
  /// Install the demonstration leads when the collection is empty.
  #[serde(default)]
  pub seed_demo_leads:    bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_store_path() -> PathBuf { PathBuf::from("leadline.db") }
fn default_slot() -> String { leadline_core::store::DEFAULT_SLOT.to_string() }
fn default_auth_name() -> String { "Admin User".to_string() }
fn default_auth_role() -> String { "admin".to_string() }

impl ServerConfig {
  pub fn verifier(&self) -> auth::Argon2Verifier {
    auth::Argon2Verifier {
      email:         self.auth_email.clone(),
      password_hash: self.auth_password_hash.clone(),
      name:          self.auth_name.clone(),
      role:          self.auth_role.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs, shared across handlers.
pub struct AppState<S> {
  pub repo: Arc<LeadRepository<S>>,
  pub auth: Arc<dyn CredentialVerifier>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      repo: self.repo.clone(),
      auth: self.auth.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router. Everything lives under `/api`; only
/// `POST /api/lead` is reachable without credentials.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LeadStore + 'static,
{
  let staff = leadline_api::dashboard_router(state.repo.clone())
    .route("/session", get(session))
    .route_layer(middleware::from_fn_with_state(state.auth, require_auth));

  let api = leadline_api::intake_router(state.repo).merge(staff);

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

/// `GET /api/session`: the signed-in staff member.
async fn session(Extension(identity): Extension<Identity>) -> Json<Identity> {
  Json(identity)
}

// ─── Integration tests ────────────────────────────────────────────────────────
