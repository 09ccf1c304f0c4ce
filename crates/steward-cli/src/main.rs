//! `steward` — manage people and their role grants.
//!
//! Reads `steward.toml` (or the path given with `--config`), overlaid by
//! `STEWARD_*` environment variables, and opens the configured SQLite store.
//! Results are printed to stdout as JSON; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! steward person add alice
//! steward grant alice admin
//! steward is-admin alice
//! steward moderators
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use steward_core::{
  person::Person,
  role::RoleName,
  store::RoleStore,
};
use steward_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::StewardConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "steward", version, about = "Manage role grants")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "steward.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Manage people.
  Person {
    #[command(subcommand)]
    command: PersonCommand,
  },
  /// Grant a role (admin, moderator or spotlight). Granting twice is a no-op.
  Grant { handle: String, role: RoleName },
  /// Revoke a role from a person.
  Revoke { handle: String, role: RoleName },
  /// List the roles a person holds.
  Roles { handle: String },
  /// List every admin role.
  Admins,
  /// List every admin and moderator role.
  Moderators,
  /// Print whether a person holds the admin role.
  IsAdmin { handle: String },
}

#[derive(Subcommand, Debug)]
enum PersonCommand {
  Add { handle: String },
  List,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = StewardConfig::load(&cli.config)?;

  let store_path = cfg.resolved_store_path();
  tracing::debug!(path = %store_path.display(), "opening store");
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  run(&store, cli.command).await
}

async fn run(store: &SqliteStore, command: Command) -> Result<()> {
  match command {
    Command::Person { command: PersonCommand::Add { handle } } => {
      let person = store
        .add_person(&handle)
        .await
        .with_context(|| format!("failed to add {handle:?}"))?;
      print_json(&person)
    }
    Command::Person { command: PersonCommand::List } => {
      print_json(&store.list_people().await?)
    }
    Command::Grant { handle, role } => {
      let person = lookup(store, &handle).await?;
      let role = match role {
        RoleName::Admin => store.add_admin(person.person_id).await?,
        RoleName::Moderator => store.add_moderator(person.person_id).await?,
        RoleName::Spotlight => store.add_spotlight(person.person_id).await?,
      };
      print_json(&role)
    }
    Command::Revoke { handle, role } => {
      let person = lookup(store, &handle).await?;
      let revoked = store.revoke_role(person.person_id, role).await?;
      if !revoked {
        tracing::warn!(%handle, %role, "person did not hold this role");
      }
      print_json(&revoked)
    }
    Command::Roles { handle } => {
      let person = lookup(store, &handle).await?;
      print_json(&store.roles_for(person.person_id).await?)
    }
    Command::Admins => print_json(&store.admins().await?),
    Command::Moderators => print_json(&store.moderators().await?),
    Command::IsAdmin { handle } => {
      let person = lookup(store, &handle).await?;
      print_json(&store.is_admin(person.person_id).await?)
    }
  }
}

async fn lookup(store: &SqliteStore, handle: &str) -> Result<Person> {
  store
    .find_person(handle)
    .await?
    .with_context(|| format!("no person with handle {handle:?}"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grant_parses_role_names() {
    let cli =
      Cli::try_parse_from(["steward", "grant", "alice", "moderator"]).unwrap();
    match cli.command {
      Command::Grant { handle, role } => {
        assert_eq!(handle, "alice");
        assert_eq!(role, RoleName::Moderator);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn grant_rejects_unknown_role() {
    assert!(Cli::try_parse_from(["steward", "grant", "alice", "owner"]).is_err());
  }

  #[tokio::test]
  async fn run_grant_then_query() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let add = PersonCommand::Add { handle: "alice".into() };
    run(&store, Command::Person { command: add }).await.unwrap();
    run(&store, Command::Grant { handle: "alice".into(), role: RoleName::Admin })
      .await
      .unwrap();

    let alice = lookup(&store, "alice").await.unwrap();
    assert!(store.is_admin(alice.person_id).await.unwrap());
  }

  #[tokio::test]
  async fn run_fails_for_unknown_handle() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let res = run(&store, Command::Roles { handle: "ghost".into() }).await;
    assert!(res.is_err());
  }
}
