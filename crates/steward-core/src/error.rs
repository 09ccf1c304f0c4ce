//! Error types for `steward-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::role::RoleName;

/// A write was rejected before (or by) the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("role must belong to a person")]
  MissingPerson,

  #[error("role name can't be blank")]
  MissingName,

  #[error("role name {0:?} is not included in the list")]
  UnknownRoleName(String),

  #[error("person {person_id} already has the {name} role")]
  NameTaken { person_id: Uuid, name: RoleName },

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("handle can't be blank")]
  BlankHandle,

  #[error("handle {0:?} has already been taken")]
  HandleTaken(String),
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
