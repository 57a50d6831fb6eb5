//! Handlers for `/leads` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/leads` | Full collection, insertion order |
//! | `GET`    | `/leads/:id` | 404 if not found |
//! | `PATCH`  | `/leads/:id` | Body: [`LeadPatch`]; 404 if not found |
//! | `DELETE` | `/leads/:id` | 204, also for unknown ids |
//!
//! A malformed id or body is answered with 400 and the usual error envelope.
//!
//! Mutations are applied even when the store rejects the write; the response
//! then carries a `warning`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use leadline_core::{
  lead::{Lead, LeadPatch},
  repository::LeadRepository,
  store::LeadStore,
};
use uuid::Uuid;

use crate::{Envelope, error::ApiError};

/// `GET /leads`
pub async fn list<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
) -> Json<Vec<Lead>>
where
  S: LeadStore + 'static,
{
  Json(repo.list())
}

/// `GET /leads/:id`
pub async fn get_one<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Lead>, ApiError>
where
  S: LeadStore + 'static,
{
  let Path(id) = id?;
  repo
    .list()
    .into_iter()
    .find(|l| l.id == id)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("Lead with ID {id} not found")))
}

/// `PATCH /leads/:id`: merge the body over the lead.
pub async fn update<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
  id: Result<Path<Uuid>, PathRejection>,
  patch: Result<Json<LeadPatch>, JsonRejection>,
) -> Result<Json<Envelope<Lead>>, ApiError>
where
  S: LeadStore + 'static,
{
  let Path(id) = id?;
  let Json(patch) = patch?;
  let outcome = repo.update(id, patch).await?;
  Ok(Json(Envelope::ok(outcome.value).with_warning(outcome.persist_error)))
}

/// `DELETE /leads/:id`
pub async fn delete_one<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError>
where
  S: LeadStore + 'static,
{
  let Path(id) = id?;
  let outcome = repo.delete(id).await;
  Ok(match outcome.persist_error {
    None => StatusCode::NO_CONTENT.into_response(),
    Some(warning) => {
      Json(Envelope::<()>::done().with_warning(Some(warning))).into_response()
    }
  })
}
