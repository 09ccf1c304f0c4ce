//! Roles — named permission grants scoped to one person.
//!
//! The vocabulary is closed: a role is an admin, a moderator or a spotlight
//! tag, and nothing else. Free-form names are rejected when raw input is
//! validated, so a [`Role`] value always carries a known [`RoleName`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, ValidationError};

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// The name of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
  /// Full privileged access; also counts as a moderator.
  Admin,
  /// A non-privileged tag with no query-level implications.
  Spotlight,
  Moderator,
}

impl RoleName {
  pub const ALL: [RoleName; 3] =
    [RoleName::Admin, RoleName::Spotlight, RoleName::Moderator];

  pub fn as_str(self) -> &'static str {
    match self {
      RoleName::Admin => "admin",
      RoleName::Spotlight => "spotlight",
      RoleName::Moderator => "moderator",
    }
  }

  /// Whether holding this role confers moderation privileges.
  pub fn is_moderator(self) -> bool {
    matches!(self, RoleName::Admin | RoleName::Moderator)
  }
}

impl fmt::Display for RoleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RoleName {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "admin" => Ok(RoleName::Admin),
      "spotlight" => Ok(RoleName::Spotlight),
      "moderator" => Ok(RoleName::Moderator),
      "" => Err(ValidationError::MissingName),
      other => Err(ValidationError::UnknownRoleName(other.to_owned())),
    }
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A persisted role grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
  pub role_id:    Uuid,
  /// Foreign key to the owning [`Person`](crate::person::Person).
  pub person_id:  Uuid,
  pub name:       RoleName,
  pub created_at: DateTime<Utc>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unchecked input for creating a role, as it arrives from a caller that
/// deals in strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRole {
  pub person_id: Option<Uuid>,
  pub name:      Option<String>,
}

/// A role creation request that passed validation. Uniqueness per person is
/// still up to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRole {
  pub person_id: Uuid,
  pub name:      RoleName,
}

impl NewRole {
  pub fn new(person_id: Uuid, name: impl Into<String>) -> Self {
    Self { person_id: Some(person_id), name: Some(name.into()) }
  }

  /// Check presence of the owner and that the name is in the vocabulary.
  pub fn validate(&self) -> Result<ValidRole> {
    let person_id = self.person_id.ok_or(ValidationError::MissingPerson)?;
    let raw = self
      .name
      .as_deref()
      .filter(|n| !n.trim().is_empty())
      .ok_or(ValidationError::MissingName)?;
    // Exact match only; padded names are not in the vocabulary.
    let name = raw.parse::<RoleName>()?;
    Ok(ValidRole { person_id, name })
  }
}

// ─── Scopes ──────────────────────────────────────────────────────────────────

/// Named filters over the whole role collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleScope {
  /// Roles named `admin`.
  Admins,
  /// Roles named `admin` or `moderator`.
  Moderators,
}

impl RoleScope {
  /// The role names this scope selects.
  pub fn names(self) -> &'static [RoleName] {
    match self {
      RoleScope::Admins => &[RoleName::Admin],
      RoleScope::Moderators => &[RoleName::Admin, RoleName::Moderator],
    }
  }

  pub fn matches(self, role: &Role) -> bool { self.names().contains(&role.name) }
}
