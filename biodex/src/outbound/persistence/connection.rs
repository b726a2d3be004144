//! Single shared SQLite connection for the Diesel adapters.
//!
//! BioDex is a single-process, single-writer program, so one connection
//! guarded by a mutex stands in for a pool. Opening the connection applies
//! the embedded migrations, which adopt an existing `users.sqlite` untouched.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const IN_MEMORY_DATABASE: &str = ":memory:";

/// Errors raised while opening or checking out the connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The database file could not be opened.
    #[error("failed to open database: {message}")]
    Open { message: String },

    /// The schema could not be brought up to date.
    #[error("failed to apply migrations: {message}")]
    Migration { message: String },

    /// A previous holder panicked while using the connection.
    #[error("database connection is unusable: {message}")]
    Poisoned { message: String },
}

impl ConnectionError {
    /// Create an open error with the given message.
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
        }
    }

    /// Create a migration error with the given message.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }

    /// Create a poisoned-lock error with the given message.
    pub fn poisoned(message: impl Into<String>) -> Self {
        Self::Poisoned {
            message: message.into(),
        }
    }
}

/// Where the database lives and how long writers wait on a locked file.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use biodex::outbound::persistence::ConnectionConfig;
///
/// let config = ConnectionConfig::new("users.sqlite")
///     .with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "users.sqlite");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    database_url: String,
    busy_timeout: Duration,
}

impl ConnectionConfig {
    /// Configuration for the database file at `path`.
    ///
    /// The busy timeout defaults to five seconds.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: path.as_ref().to_string_lossy().into_owned(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration for a private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_DATABASE)
    }

    /// Set how long a statement waits for another writer's lock.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Get the busy timeout.
    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

/// Shared handle to the migrated SQLite connection.
///
/// Clones share the same underlying connection.
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<Mutex<SqliteConnection>>,
}

impl DbConnection {
    /// Open the database described by `config` and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Open` when the file cannot be opened or
    /// configured, and `ConnectionError::Migration` when the schema cannot be
    /// created.
    pub fn open(config: &ConnectionConfig) -> Result<Self, ConnectionError> {
        let mut connection = SqliteConnection::establish(config.database_url())
            .map_err(|err| ConnectionError::open(err.to_string()))?;

        let busy_timeout_ms = config.busy_timeout().as_millis();
        diesel::sql_query(format!("PRAGMA busy_timeout = {busy_timeout_ms}"))
            .execute(&mut connection)
            .map_err(|err| ConnectionError::open(err.to_string()))?;

        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| ConnectionError::migration(err.to_string()))?;

        info!(
            database = config.database_url(),
            applied_migrations = applied,
            "score database ready"
        );
        Ok(Self {
            inner: Arc::new(Mutex::new(connection)),
        })
    }

    /// Check out the connection for the duration of the returned guard.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Poisoned` if an earlier holder panicked.
    pub fn get(&self) -> Result<MutexGuard<'_, SqliteConnection>, ConnectionError> {
        self.inner
            .lock()
            .map_err(|err| ConnectionError::poisoned(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn in_memory_connection_runs_migrations() {
        let connection = DbConnection::open(&ConnectionConfig::in_memory()).expect("open");
        let mut conn = connection.get().expect("checkout");

        let tables: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('scores', 'entries') ORDER BY name",
        )
        .load::<TableName>(&mut *conn)
        .expect("list tables")
        .into_iter()
        .map(|row| row.name)
        .collect();

        assert_eq!(tables, vec!["entries".to_owned(), "scores".to_owned()]);
    }

    #[rstest]
    fn config_defaults_to_five_second_busy_timeout() {
        let config = ConnectionConfig::new("users.sqlite");
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert_eq!(ConnectionConfig::in_memory().database_url(), ":memory:");
    }

    #[rstest]
    fn unreachable_path_fails_to_open() {
        let config = ConnectionConfig::new("/nonexistent-dir/biodex/users.sqlite");
        let err = DbConnection::open(&config).err().expect("open should fail");
        assert!(matches!(err, ConnectionError::Open { .. }));
    }

    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }
}
