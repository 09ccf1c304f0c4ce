//! [`SqliteStore`] — the SQLite implementation of [`RoleStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use steward_core::{
  ValidationError,
  person::{Person, normalize_handle},
  role::{NewRole, Role, RoleName, RoleScope},
  store::RoleStore,
};

use crate::{
  Result,
  encode::{
    RawPerson, RawRole, encode_dt, encode_role_name, encode_uuid,
    role_name_list,
  },
  schema::SCHEMA,
};

const PERSON_COLUMNS: &str = "person_id, handle, created_at";
const ROLE_COLUMNS: &str = "role_id, person_id, name, created_at";

// ─── Constraint handling ─────────────────────────────────────────────────────

/// What happened to a role `INSERT` that may trip a constraint.
enum InsertOutcome {
  Inserted,
  /// `UNIQUE (person_id, name)` rejected the row.
  Duplicate,
  /// The referenced person does not exist.
  NoPerson,
}

/// What happened to an idempotent grant.
enum GrantOutcome {
  Held { inserted: bool, raw: RawRole },
  NoPerson,
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

fn is_foreign_key_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}

fn person_exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM people WHERE person_id = ?1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Steward role store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row `SELECT` against `people`.
  async fn query_person(
    &self,
    where_clause: &'static str,
    param: String,
  ) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM people WHERE {where_clause}");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawPerson::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  /// Insert a role row, translating constraint failures into outcomes.
  async fn insert_role(&self, role: &Role) -> Result<InsertOutcome> {
    let role_id_str   = encode_uuid(role.role_id);
    let person_id_str = encode_uuid(role.person_id);
    let name_str      = encode_role_name(role.name);
    let at_str        = encode_dt(role.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        if !person_exists(conn, &person_id_str)? {
          return Ok(InsertOutcome::NoPerson);
        }

        let res = conn.execute(
          "INSERT INTO roles (role_id, person_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![role_id_str, person_id_str, name_str, at_str],
        );

        match res {
          Ok(_) => Ok(InsertOutcome::Inserted),
          Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
          // Person deleted between the check and the insert.
          Err(e) if is_foreign_key_violation(&e) => Ok(InsertOutcome::NoPerson),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(outcome)
  }
}

// ─── RoleStore impl ──────────────────────────────────────────────────────────

impl RoleStore for SqliteStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, handle: &str) -> Result<Person> {
    let person = Person {
      person_id:  Uuid::new_v4(),
      handle:     normalize_handle(handle)?,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(person.person_id);
    let handle_str = person.handle.clone();
    let at_str     = encode_dt(person.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let res = conn.execute(
          "INSERT INTO people (person_id, handle, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, handle_str, at_str],
        );
        match res {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if !inserted {
      return Err(ValidationError::HandleTaken(person.handle).into());
    }
    tracing::debug!(person_id = %person.person_id, handle = %person.handle, "added person");
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    self.query_person("person_id = ?1", encode_uuid(id)).await
  }

  async fn find_person(&self, handle: &str) -> Result<Option<Person>> {
    self.query_person("handle = ?1", handle.trim().to_owned()).await
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {PERSON_COLUMNS} FROM people ORDER BY created_at, person_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Role writes ───────────────────────────────────────────────────────────

  async fn create_role(&self, input: NewRole) -> Result<Role> {
    let valid = input.validate()?;

    let role = Role {
      role_id:    Uuid::new_v4(),
      person_id:  valid.person_id,
      name:       valid.name,
      created_at: Utc::now(),
    };

    match self.insert_role(&role).await? {
      InsertOutcome::Inserted => {
        tracing::info!(person_id = %role.person_id, role = %role.name, "granted role");
        Ok(role)
      }
      InsertOutcome::Duplicate => Err(
        ValidationError::NameTaken { person_id: role.person_id, name: role.name }
          .into(),
      ),
      InsertOutcome::NoPerson => {
        Err(ValidationError::PersonNotFound(role.person_id).into())
      }
    }
  }

  async fn ensure_role(&self, person_id: Uuid, name: RoleName) -> Result<Role> {
    let role_id_str   = encode_uuid(Uuid::new_v4());
    let person_id_str = encode_uuid(person_id);
    let name_str      = encode_role_name(name);
    let at_str        = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        if !person_exists(conn, &person_id_str)? {
          return Ok(GrantOutcome::NoPerson);
        }

        // A concurrent grant of the same name is absorbed here.
        let inserted = conn.execute(
          "INSERT INTO roles (role_id, person_id, name, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (person_id, name) DO NOTHING",
          rusqlite::params![role_id_str, person_id_str, name_str, at_str],
        );
        let inserted = match inserted {
          Ok(n) => n > 0,
          Err(e) if is_foreign_key_violation(&e) => {
            return Ok(GrantOutcome::NoPerson);
          }
          Err(e) => return Err(e.into()),
        };

        let sql = format!(
          "SELECT {ROLE_COLUMNS} FROM roles WHERE person_id = ?1 AND name = ?2"
        );
        let raw = conn.query_row(
          &sql,
          rusqlite::params![person_id_str, name_str],
          RawRole::from_row,
        )?;
        Ok(GrantOutcome::Held { inserted, raw })
      })
      .await?;

    match outcome {
      GrantOutcome::Held { inserted, raw } => {
        if inserted {
          tracing::info!(person_id = %person_id, role = %name, "granted role");
        } else {
          tracing::debug!(person_id = %person_id, role = %name, "role already held");
        }
        raw.into_role()
      }
      GrantOutcome::NoPerson => {
        Err(ValidationError::PersonNotFound(person_id).into())
      }
    }
  }

  async fn revoke_role(&self, person_id: Uuid, name: RoleName) -> Result<bool> {
    let person_id_str = encode_uuid(person_id);
    let name_str      = encode_role_name(name);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM roles WHERE person_id = ?1 AND name = ?2",
          rusqlite::params![person_id_str, name_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    if deleted {
      tracing::info!(person_id = %person_id, role = %name, "revoked role");
    }
    Ok(deleted)
  }

  // ── Role reads ────────────────────────────────────────────────────────────

  async fn roles_for(&self, person_id: Uuid) -> Result<Vec<Role>> {
    let person_id_str = encode_uuid(person_id);

    let raws: Vec<RawRole> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ROLE_COLUMNS} FROM roles
           WHERE person_id = ?1
           ORDER BY created_at, role_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![person_id_str], RawRole::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRole::into_role).collect()
  }

  async fn scope(&self, scope: RoleScope) -> Result<Vec<Role>> {
    let names = role_name_list(scope.names());

    let raws: Vec<RawRole> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ROLE_COLUMNS} FROM roles
           WHERE name IN {names}
           ORDER BY created_at, role_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawRole::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRole::into_role).collect()
  }

  async fn has_any_role(&self, person_id: Uuid, names: &[RoleName]) -> Result<bool> {
    let person_id_str = encode_uuid(person_id);
    let names         = role_name_list(names);

    let found = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT 1 FROM roles WHERE person_id = ?1 AND name IN {names} LIMIT 1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![person_id_str], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(found)
  }
}
