//! Error types for `leadline-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Lead with ID {0} not found")]
  NotFound(Uuid),

  /// The in-memory collection was updated but the durable write failed.
  #[error("persistence failure: {0}")]
  Persistence(String),

  #[error("{0}")]
  Validation(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
