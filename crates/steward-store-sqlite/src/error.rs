//! Error type for `steward-store-sqlite`.

use steward_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The write was rejected; see [`ValidationError`] for the reason.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored role name fell outside the vocabulary.
  #[error("corrupt role row: {0}")]
  CorruptRole(String),
}

impl Error {
  pub fn is_validation(&self) -> bool { matches!(self, Error::Validation(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
