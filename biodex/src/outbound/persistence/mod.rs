//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the domain's
//! `ScoreRepository` port backed by a single SQLite database file.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **One connection**: a mutex-guarded `SqliteConnection` shared by clones
//!   of [`DbConnection`].
//! - **Strongly typed errors**: every database error is mapped to
//!   `ScoreRepositoryError`.
//!
//! # Example
//!
//! ```no_run
//! use biodex::outbound::persistence::{ConnectionConfig, DbConnection, DieselScoreRepository};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = DbConnection::open(&ConnectionConfig::new("users.sqlite"))?;
//! let repository = DieselScoreRepository::new(connection);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod connection;
mod diesel_score_repository;
mod models;
mod schema;

pub use connection::{ConnectionConfig, ConnectionError, DbConnection};
pub use diesel_score_repository::DieselScoreRepository;
