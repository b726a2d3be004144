//! Internal Diesel row structs for the score database.
//!
//! These types never leave the persistence layer; the repository converts
//! them into domain values.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{entries, scores};

/// Row struct for reading from the scores table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ScoreRow {
    pub id: String,
    pub name: String,
    pub score: i64,
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scores)]
pub(crate) struct NewScoreRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub score: i64,
}

/// Row struct for reading from the entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct EntryRow {
    pub submitter: String,
    pub species: String,
    pub points_awarded: i64,
    pub time: NaiveDateTime,
}

/// Insertable struct for appending a capture.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entries)]
pub(crate) struct NewEntryRow<'a> {
    pub submitter: &'a str,
    pub species: &'a str,
    pub points_awarded: i64,
    pub time: NaiveDateTime,
}
