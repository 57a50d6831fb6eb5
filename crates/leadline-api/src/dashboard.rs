//! Handlers for `/dashboard` endpoints: derived views over the collection.
//!
//! All three read the repository's cache, falling back to the store when the
//! cache is empty.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::Local;
use leadline_core::{
  lead::Lead,
  repository::LeadRepository,
  store::LeadStore,
  views::{self, LeadStats, RECENT_LIMIT, StatusFilter, TablePage, TableQuery},
};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /dashboard/stats`: "today" is the server's local calendar day.
pub async fn stats<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
) -> Json<LeadStats>
where
  S: LeadStore + 'static,
{
  let leads = repo.dashboard_leads().await;
  Json(LeadStats::compute(&leads, &Local::now()))
}

/// `GET /dashboard/recent`
pub async fn recent<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
) -> Json<Vec<Lead>>
where
  S: LeadStore + 'static,
{
  let leads = repo.dashboard_leads().await;
  Json(views::recent(&leads, RECENT_LIMIT))
}

#[derive(Debug, Deserialize, Default)]
pub struct TableParams {
  /// `all` (default), `PENDING` or `REACHED_OUT`.
  pub status: Option<StatusFilter>,
  pub search: Option<String>,
  /// 1-based; clamped into range.
  pub page:   Option<usize>,
}

/// `GET /dashboard/leads[?status=...][&search=...][&page=...]`
pub async fn table<S>(
  State(repo): State<Arc<LeadRepository<S>>>,
  params: Result<Query<TableParams>, QueryRejection>,
) -> Result<Json<TablePage>, ApiError>
where
  S: LeadStore + 'static,
{
  let Query(params) = params?;
  let query = TableQuery {
    status: params.status.unwrap_or_default(),
    search: params.search.unwrap_or_default(),
  };
  let leads = repo.dashboard_leads().await;
  let filtered = views::filter(&leads, &query);
  Ok(Json(views::paginate(&filtered, params.page.unwrap_or(1))))
}
