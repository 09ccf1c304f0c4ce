//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with nanosecond precision. UUIDs are
//! hyphenated lowercase strings; role names are their vocabulary word.

use chrono::{DateTime, SecondsFormat, Utc};
use steward_core::{
  person::Person,
  role::{Role, RoleName},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Fixed-width so that text ordering matches time ordering.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── RoleName ─────────────────────────────────────────────────────────────────

pub fn encode_role_name(name: RoleName) -> &'static str { name.as_str() }

pub fn decode_role_name(s: &str) -> Result<RoleName> {
  s.parse()
    .map_err(|_| Error::CorruptRole(format!("unknown role name: {s:?}")))
}

/// Render a set of names as a SQL `IN` list, e.g. `('admin', 'moderator')`.
///
/// Only vocabulary words ever reach the query text.
pub fn role_name_list(names: &[RoleName]) -> String {
  let quoted: Vec<String> = names
    .iter()
    .map(|n| format!("'{}'", encode_role_name(*n)))
    .collect();
  format!("({})", quoted.join(", "))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:  String,
  pub handle:     String,
  pub created_at: String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:  row.get(0)?,
      handle:     row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:  decode_uuid(&self.person_id)?,
      handle:     self.handle,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `roles` row.
pub struct RawRole {
  pub role_id:    String,
  pub person_id:  String,
  pub name:       String,
  pub created_at: String,
}

impl RawRole {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      role_id:    row.get(0)?,
      person_id:  row.get(1)?,
      name:       row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_role(self) -> Result<Role> {
    Ok(Role {
      role_id:    decode_uuid(&self.role_id)?,
      person_id:  decode_uuid(&self.person_id)?,
      name:       decode_role_name(&self.name)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn in_list_quotes_each_name() {
    assert_eq!(role_name_list(&[RoleName::Admin]), "('admin')");
    assert_eq!(
      role_name_list(&[RoleName::Admin, RoleName::Moderator]),
      "('admin', 'moderator')"
    );
  }

  #[test]
  fn unknown_stored_name_is_corrupt() {
    assert!(matches!(decode_role_name("owner"), Err(Error::CorruptRole(_))));
  }

  #[test]
  fn timestamps_survive_encoding() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }
}
