//! Handler for the public intake endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/lead` | Body: [`IntakePayload`]; 201 + `{success, data}`, or 500 + `{success, error}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use leadline_core::{
  intake::{self, IntakePayload},
  repository::LeadRepository,
  store::LeadStore,
};

use crate::{
  Envelope,
  error::{ApiError, INTAKE_FAILED},
};

/// `POST /lead`: validate, assemble, and record a new lead.
///
/// Any failure is answered with 500 and `{success: false, error}`: a body
/// that does not deserialize carries a generic message, one that breaks a
/// form rule carries the rule. In both cases no lead is created.
pub async fn submit<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
  body: Result<Json<IntakePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + 'static,
{
  let Json(payload) = body.map_err(|e| {
    tracing::warn!(error = %e, "malformed intake payload");
    ApiError::Intake(INTAKE_FAILED.to_owned())
  })?;
  payload.validate().map_err(|e| {
    tracing::info!(error = %e, "intake payload rejected");
    ApiError::Intake(e.to_string())
  })?;

  let outcome = repo.add(intake::submit(payload, Utc::now())).await;
  let lead = outcome.value;
  match outcome.persist_error {
    None => tracing::info!(id = %lead.id, "lead submitted"),
    Some(e) => tracing::warn!(id = %lead.id, error = %e, "lead submitted but not persisted"),
  }

  Ok((StatusCode::CREATED, Json(Envelope::ok(lead))))
}
