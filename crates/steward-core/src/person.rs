//! Person — the owner of role grants.
//!
//! Steward only needs enough of a person to hang roles off: an id, a unique
//! handle and a creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:  Uuid,
  pub handle:     String,
  pub created_at: DateTime<Utc>,
}

/// Trim a handle and reject it if nothing is left.
pub fn normalize_handle(raw: &str) -> Result<String> {
  let handle = raw.trim();
  if handle.is_empty() {
    return Err(ValidationError::BlankHandle);
  }
  Ok(handle.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn handle_is_trimmed() {
    assert_eq!(normalize_handle("  alice ").unwrap(), "alice");
  }

  #[test]
  fn blank_handle_is_rejected() {
    assert_eq!(normalize_handle("   "), Err(ValidationError::BlankHandle));
    assert_eq!(normalize_handle(""), Err(ValidationError::BlankHandle));
  }
}
