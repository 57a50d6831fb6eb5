//! Staff authentication: a credential-verification interface, its argon2
//! implementation, and the HTTP Basic middleware guarding staff routes.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::HeaderMap,
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Error;

// ─── Types ───────────────────────────────────────────────────────────────────

/// A sign-in attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

/// The authenticated staff member. Handlers receive it as a request
/// extension; nothing downstream checks the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub name:  String,
  pub email: String,
  pub role:  String,
}

#[derive(Debug, Error)]
#[error("credentials rejected")]
pub struct Rejected;

/// Checks credentials and names who they belong to.
pub trait CredentialVerifier: Send + Sync {
  fn verify(&self, credentials: &Credentials) -> Result<Identity, Rejected>;
}

// ─── Argon2 verifier ─────────────────────────────────────────────────────────

/// A single staff account whose password is stored as an argon2 PHC string.
#[derive(Clone)]
pub struct Argon2Verifier {
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub name:          String,
  pub role:          String,
}

impl CredentialVerifier for Argon2Verifier {
  fn verify(&self, credentials: &Credentials) -> Result<Identity, Rejected> {
    if !credentials.email.eq_ignore_ascii_case(&self.email) {
      return Err(Rejected);
    }

    let parsed_hash =
      PasswordHash::new(&self.password_hash).map_err(|_| Rejected)?;
    Argon2::default()
      .verify_password(credentials.password.as_bytes(), &parsed_hash)
      .map_err(|_| Rejected)?;

    Ok(Identity {
      name:  self.name.clone(),
      email: self.email.clone(),
      role:  self.role.clone(),
    })
  }
}

// ─── HTTP Basic ──────────────────────────────────────────────────────────────

/// Decode `Authorization: Basic …` into [`Credentials`].
pub fn credentials_from_headers(headers: &HeaderMap) -> Result<Credentials, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok(Credentials {
    email:    email.to_owned(),
    password: password.to_owned(),
  })
}

/// Verify the request's Basic credentials against `verifier`.
pub fn verify_auth(
  headers: &HeaderMap,
  verifier: &dyn CredentialVerifier,
) -> Result<Identity, Error> {
  let credentials = credentials_from_headers(headers)?;
  verifier.verify(&credentials).map_err(|_| {
    tracing::info!(email = %credentials.email, "rejected staff sign-in");
    Error::Unauthorized
  })
}

/// Middleware: reject unauthenticated requests with 401, otherwise attach the
/// [`Identity`] to the request.
pub async fn require_auth(
  State(verifier): State<Arc<dyn CredentialVerifier>>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let identity = verify_auth(req.headers(), verifier.as_ref())?;
  req.extensions_mut().insert(identity);
  Ok(next.run(req).await)
}
