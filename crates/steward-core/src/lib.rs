//! Core types and trait definitions for the Steward role store.
//!
//! This crate is free of database dependencies. Storage backends implement
//! [`store::RoleStore`]; the binary depends only on that abstraction plus the
//! backend it opens.

pub mod error;
pub mod person;
pub mod role;
pub mod store;

pub use error::{Result, ValidationError};
