//! The `RoleStore` trait.
//!
//! Implemented by storage backends (e.g. `steward-store-sqlite`). The binary
//! and any future surface depend on this abstraction, not on a concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  person::Person,
  role::{NewRole, Role, RoleName, RoleScope},
};

/// Abstraction over a Steward role store backend.
///
/// Backends must enforce uniqueness of `(person_id, name)` themselves; the
/// validation in [`NewRole::validate`] cannot see other rows.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait RoleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Create and persist a person. Fails if the handle is blank or taken.
  fn add_person<'a>(
    &'a self,
    handle: &'a str,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Retrieve a person by UUID. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Retrieve a person by handle. Returns `None` if not found.
  fn find_person<'a>(
    &'a self,
    handle: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Role writes ───────────────────────────────────────────────────────

  /// Validate and persist a new role.
  ///
  /// Fails with a validation error if the person or name is missing, the
  /// name is outside the vocabulary, the person does not exist, or the
  /// person already holds a role of that name.
  fn create_role(
    &self,
    input: NewRole,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  /// Make sure `person_id` holds a role named `name`, creating it if absent.
  ///
  /// Never fails because the role already exists, including when another
  /// caller created it concurrently; the existing row is returned instead.
  fn ensure_role(
    &self,
    person_id: Uuid,
    name: RoleName,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_;

  /// Remove the named role from a person. Returns `false` if they did not
  /// hold it.
  fn revoke_role(
    &self,
    person_id: Uuid,
    name: RoleName,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Role reads ────────────────────────────────────────────────────────

  /// All roles owned by a person.
  fn roles_for(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  /// All roles selected by `scope`, oldest first.
  fn scope(
    &self,
    scope: RoleScope,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_;

  /// Whether `person_id` holds any of `names`.
  fn has_any_role<'a>(
    &'a self,
    person_id: Uuid,
    names: &'a [RoleName],
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Provided helpers ──────────────────────────────────────────────────

  fn admins(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_ {
    self.scope(RoleScope::Admins)
  }

  /// Admins and moderators; admin implies moderator.
  fn moderators(
    &self,
  ) -> impl Future<Output = Result<Vec<Role>, Self::Error>> + Send + '_ {
    self.scope(RoleScope::Moderators)
  }

  fn has_role(
    &self,
    person_id: Uuid,
    name: RoleName,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
    let names: &'static [RoleName] = match name {
      RoleName::Admin => &[RoleName::Admin],
      RoleName::Spotlight => &[RoleName::Spotlight],
      RoleName::Moderator => &[RoleName::Moderator],
    };
    self.has_any_role(person_id, names)
  }

  /// False for a person with no roles at all.
  fn is_admin(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
    self.has_any_role(person_id, RoleScope::Admins.names())
  }

  fn is_moderator(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
    self.has_any_role(person_id, RoleScope::Moderators.names())
  }

  fn add_admin(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_ {
    self.ensure_role(person_id, RoleName::Admin)
  }

  fn add_moderator(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_ {
    self.ensure_role(person_id, RoleName::Moderator)
  }

  fn add_spotlight(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Role, Self::Error>> + Send + '_ {
    self.ensure_role(person_id, RoleName::Spotlight)
  }
}
