//! SQLite-backed `ScoreRepository` implementation using Diesel ORM.
//!
//! Leaderboard order and positions are computed in SQL: score descending,
//! then `rowid` ascending so that earlier registrations win ties.

use diesel::dsl::{exists, max};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, warn};

use crate::domain::ports::{ScoreRepository, ScoreRepositoryError};
use crate::domain::{
    CaptureEntry, DisplayName, LeaderboardEntry, NewCapture, User, UserId, UserValidationError,
};

use super::connection::{ConnectionError, DbConnection};
use super::models::{EntryRow, NewEntryRow, NewScoreRow, ScoreRow};
use super::schema::{entries, scores};

/// Diesel-backed implementation of the `ScoreRepository` port.
#[derive(Clone)]
pub struct DieselScoreRepository {
    connection: DbConnection,
}

impl DieselScoreRepository {
    /// Create a new repository over the shared connection.
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn with_connection<T>(
        &self,
        operation: impl FnOnce(&mut SqliteConnection) -> QueryResult<T>,
    ) -> Result<T, ScoreRepositoryError> {
        let mut conn = self.connection.get().map_err(map_connection_error)?;
        operation(&mut *conn).map_err(map_diesel_error)
    }
}

/// Map connection errors to domain score repository errors.
fn map_connection_error(error: ConnectionError) -> ScoreRepositoryError {
    match error {
        ConnectionError::Open { message }
        | ConnectionError::Migration { message }
        | ConnectionError::Poisoned { message } => ScoreRepositoryError::connection(message),
    }
}

/// Map Diesel errors to domain score repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ScoreRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => ScoreRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ScoreRepositoryError::query("database query error"),
        DieselError::DeserializationError(_) => {
            ScoreRepositoryError::query("stored row could not be read")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ScoreRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            ScoreRepositoryError::query(format!("database error: {}", info.message()))
        }
        _ => ScoreRepositoryError::query("database error"),
    }
}

fn map_row_validation(error: UserValidationError) -> ScoreRepositoryError {
    ScoreRepositoryError::query(format!("stored user row is invalid: {error}"))
}

fn sql_limit(limit: usize) -> Result<i64, ScoreRepositoryError> {
    i64::try_from(limit).map_err(|_| ScoreRepositoryError::query("limit exceeds storage range"))
}

/// Convert a database row to a domain `User`.
fn row_to_user(row: ScoreRow) -> Result<User, ScoreRepositoryError> {
    let id = UserId::new(&row.id).map_err(map_row_validation)?;
    let display_name = DisplayName::new(row.name).map_err(map_row_validation)?;
    Ok(User::new(id, display_name, row.score))
}

/// Convert a row for display, skipping rows older releases let through
/// (such as an empty name) so one bad row cannot hide the whole board.
fn row_to_leaderboard_entry(row: ScoreRow) -> Option<LeaderboardEntry> {
    let stored_id = row.id.clone();
    match row_to_user(row) {
        Ok(user) => Some(LeaderboardEntry {
            display_name: user.display_name().clone(),
            score: user.score(),
            id: user.id().clone(),
        }),
        Err(error) => {
            warn!(stored_id, %error, "skipping invalid leaderboard row");
            None
        }
    }
}

fn row_to_entry(row: EntryRow) -> Result<CaptureEntry, ScoreRepositoryError> {
    Ok(CaptureEntry {
        submitter: UserId::new(&row.submitter).map_err(map_row_validation)?,
        species: row.species,
        points_awarded: row.points_awarded,
        captured_at: row.time,
    })
}

fn user_exists_query(conn: &mut SqliteConnection, id: &str) -> QueryResult<bool> {
    diesel::select(exists(scores::table.filter(scores::id.eq(id)))).get_result(conn)
}

impl ScoreRepository for DieselScoreRepository {
    fn insert_user_if_absent(&self, user: &User) -> Result<bool, ScoreRepositoryError> {
        let row = NewScoreRow {
            id: user.id().as_ref(),
            name: user.display_name().as_ref(),
            score: user.score(),
        };
        let inserted = self.with_connection(|conn| {
            diesel::insert_or_ignore_into(scores::table)
                .values(&row)
                .execute(conn)
        })?;
        Ok(inserted > 0)
    }

    fn find_user(&self, id: &UserId) -> Result<Option<User>, ScoreRepositoryError> {
        let row = self.with_connection(|conn| {
            scores::table
                .filter(scores::id.eq(id.as_ref()))
                .select(ScoreRow::as_select())
                .first(conn)
                .optional()
        })?;
        row.map(row_to_user).transpose()
    }

    fn user_exists(&self, id: &UserId) -> Result<bool, ScoreRepositoryError> {
        self.with_connection(|conn| user_exists_query(conn, id.as_ref()))
    }

    fn set_score(&self, id: &UserId, score: i64) -> Result<bool, ScoreRepositoryError> {
        let updated = self.with_connection(|conn| {
            diesel::update(scores::table.filter(scores::id.eq(id.as_ref())))
                .set(scores::score.eq(score))
                .execute(conn)
        })?;
        Ok(updated > 0)
    }

    fn add_score(&self, id: &UserId, delta: i64) -> Result<bool, ScoreRepositoryError> {
        let updated = self.with_connection(|conn| {
            diesel::update(scores::table.filter(scores::id.eq(id.as_ref())))
                .set(scores::score.eq(scores::score + delta))
                .execute(conn)
        })?;
        Ok(updated > 0)
    }

    fn record_capture(&self, capture: &NewCapture) -> Result<bool, ScoreRepositoryError> {
        let submitter = capture.submitter.as_ref();
        let row = NewEntryRow {
            submitter,
            species: &capture.species,
            points_awarded: capture.points_awarded,
            time: capture.captured_at,
        };

        self.with_connection(|conn| {
            conn.immediate_transaction(|conn| {
                if !user_exists_query(conn, submitter)? {
                    return Ok(false);
                }

                diesel::insert_into(entries::table)
                    .values(&row)
                    .execute(conn)?;

                if capture.add_to_score {
                    diesel::update(scores::table.filter(scores::id.eq(submitter)))
                        .set(scores::score.eq(scores::score + capture.points_awarded))
                        .execute(conn)?;
                }
                Ok(true)
            })
        })
    }

    fn entries_for(
        &self,
        id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<CaptureEntry>, ScoreRepositoryError> {
        let limit = limit.map(sql_limit).transpose()?;
        let rows: Vec<EntryRow> = self.with_connection(|conn| {
            let query = entries::table
                .filter(entries::submitter.eq(id.as_ref()))
                .order((entries::time.desc(), entries::rowid.desc()))
                .select(EntryRow::as_select());
            match limit {
                Some(limit) => query.limit(limit).load(conn),
                None => query.load(conn),
            }
        })?;
        rows.into_iter().map(row_to_entry).collect()
    }

    fn leaderboard(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>, ScoreRepositoryError> {
        let limit = limit.map(sql_limit).transpose()?;
        let rows: Vec<ScoreRow> = self.with_connection(|conn| {
            let query = scores::table
                .order((scores::score.desc(), scores::rowid.asc()))
                .select(ScoreRow::as_select());
            match limit {
                Some(limit) => query.limit(limit).load(conn),
                None => query.load(conn),
            }
        })?;
        Ok(rows.into_iter().filter_map(row_to_leaderboard_entry).collect())
    }

    fn position_of(&self, id: &UserId) -> Result<Option<usize>, ScoreRepositoryError> {
        let ahead = self.with_connection(|conn| {
            let Some((score, rowid)) = scores::table
                .filter(scores::id.eq(id.as_ref()))
                .select((scores::score, scores::rowid))
                .first::<(i64, i64)>(conn)
                .optional()?
            else {
                return Ok(None);
            };

            scores::table
                .filter(
                    scores::score
                        .gt(score)
                        .or(scores::score.eq(score).and(scores::rowid.lt(rowid))),
                )
                .count()
                .get_result::<i64>(conn)
                .map(Some)
        })?;

        ahead
            .map(|count| {
                usize::try_from(count)
                    .map(|count| count + 1)
                    .map_err(|_| ScoreRepositoryError::query("negative row count"))
            })
            .transpose()
    }

    fn highest_score(&self) -> Result<Option<i64>, ScoreRepositoryError> {
        self.with_connection(|conn| {
            scores::table
                .select(max(scores::score))
                .get_result::<Option<i64>>(conn)
        })
    }
}
