//! Async HTTP client wrapping the leadline JSON API.

use anyhow::{Context, Result, anyhow};
use leadline_core::{
  intake::IntakePayload,
  lead::{Lead, LeadPatch},
  views::{LeadStats, StatusFilter, TablePage},
};
use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use uuid::Uuid;

/// Connection settings for the leadline API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// `{success, data, error, warning}` wrapper used by intake and mutations.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
  data:    Option<T>,
  error:   Option<String>,
  warning: Option<String>,
}

impl<T> Envelope<T> {
  /// The payload of a successful mutation, with any persistence warning.
  fn applied(self, what: &str) -> Result<Applied<T>> {
    let value = self
      .data
      .ok_or_else(|| anyhow!("{what} returned no lead"))?;
    Ok(Applied {
      value,
      warning: self.warning,
    })
  }
}

/// A mutation result; `warning` is set when the server could not persist it.
#[derive(Debug)]
pub struct Applied<T> {
  pub value:   T,
  pub warning: Option<String>,
}

/// Async HTTP client for the leadline JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T> {
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(query)
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = check(resp, "GET", path).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising GET {path}"))
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/dashboard/stats`
  pub async fn stats(&self) -> Result<LeadStats> {
    self.get_json("/dashboard/stats", &[]).await
  }

  /// `GET /api/dashboard/recent`
  pub async fn recent(&self) -> Result<Vec<Lead>> {
    self.get_json("/dashboard/recent", &[]).await
  }

  /// `GET /api/dashboard/leads?status=..&search=..&page=..`
  pub async fn table(
    &self,
    status: StatusFilter,
    search: &str,
    page: usize,
  ) -> Result<TablePage> {
    self
      .get_json("/dashboard/leads", &[
        ("status", status.to_string()),
        ("search", search.to_owned()),
        ("page", page.to_string()),
      ])
      .await
  }

  // ── Leads ─────────────────────────────────────────────────────────────────

  /// `GET /api/leads/:id`
  pub async fn get_lead(&self, id: Uuid) -> Result<Lead> {
    self.get_json(&format!("/leads/{id}"), &[]).await
  }

  /// `PATCH /api/leads/:id`
  pub async fn update_lead(&self, id: Uuid, patch: &LeadPatch) -> Result<Applied<Lead>> {
    let path = format!("/leads/{id}");
    let resp = self
      .auth(self.client.patch(self.url(&path)))
      .json(patch)
      .send()
      .await
      .with_context(|| format!("PATCH {path} failed"))?;
    let resp = check(resp, "PATCH", &path).await?;
    let body: Envelope<Lead> = resp.json().await.context("deserialising lead")?;
    body.applied(&format!("PATCH {path}"))
  }

  /// `DELETE /api/leads/:id`
  pub async fn delete_lead(&self, id: Uuid) -> Result<Applied<()>> {
    let path = format!("/leads/{id}");
    let resp = self
      .auth(self.client.delete(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("DELETE {path} failed"))?;
    let resp = check(resp, "DELETE", &path).await?;
    let warning = if resp.status() == reqwest::StatusCode::NO_CONTENT {
      None
    } else {
      resp
        .json::<Envelope<()>>()
        .await
        .context("deserialising delete response")?
        .warning
    };
    Ok(Applied { value: (), warning })
  }

  // ── Intake / session ──────────────────────────────────────────────────────

  /// `POST /api/lead`, public and sent without credentials.
  pub async fn submit(&self, payload: &IntakePayload) -> Result<Lead> {
    let resp = self
      .client
      .post(self.url("/lead"))
      .json(payload)
      .send()
      .await
      .context("POST /lead failed")?;
    let resp = check(resp, "POST", "/lead").await?;
    let body: Envelope<Lead> = resp.json().await.context("deserialising lead")?;
    Ok(body.applied("POST /lead")?.value)
  }

  /// `GET /api/session`
  pub async fn session(&self) -> Result<serde_json::Value> {
    self.get_json("/session", &[]).await
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, method: &str, path: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<Envelope<serde_json::Value>>()
    .await
    .ok()
    .and_then(|e| e.error);
  match message {
    Some(m) => Err(anyhow!("{method} {path} → {status}: {m}")),
    None => Err(anyhow!("{method} {path} → {status}")),
  }
}

#[cfg(test)]
mod tests {
  use leadline_core::{demo, lead::LeadStatus};
  use serde_json::json;

  use super::*;

  #[test]
  fn mutation_envelope_yields_lead_and_warning() {
    let mut lead = demo::sample_leads().remove(0);
    lead.status = LeadStatus::ReachedOut;
    let raw = json!({
      "success": true,
      "data": serde_json::to_value(&lead).unwrap(),
      "warning": "Failed to save leads: write rejected by store"
    });

    let body: Envelope<Lead> = serde_json::from_value(raw).unwrap();
    let applied = body.applied("PATCH /leads/x").unwrap();
    assert_eq!(applied.value, lead);
    assert!(applied.warning.unwrap().starts_with("Failed to save leads"));
  }

  #[test]
  fn envelope_without_data_is_an_error() {
    let body: Envelope<Lead> = serde_json::from_value(json!({ "success": true })).unwrap();
    let err = body.applied("POST /lead").unwrap_err();
    assert_eq!(err.to_string(), "POST /lead returned no lead");
  }

  #[test]
  fn failure_envelope_carries_the_message() {
    let body: Envelope<serde_json::Value> =
      serde_json::from_value(json!({ "success": false, "error": "Failed to create lead" }))
        .unwrap();
    assert_eq!(body.error.as_deref(), Some("Failed to create lead"));
    assert!(body.data.is_none());
  }

  #[test]
  fn delete_warning_envelope_decodes_without_data() {
    let body: Envelope<()> =
      serde_json::from_value(json!({ "success": true, "warning": "not saved" })).unwrap();
    assert_eq!(body.warning.as_deref(), Some("not saved"));
  }

  #[test]
  fn urls_are_rooted_under_api() {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:3000/".into(),
      username: String::new(),
      password: String::new(),
    })
    .unwrap();
    assert_eq!(client.url("/leads"), "http://localhost:3000/api/leads");
  }
}
