//! Driven port for durable user scores and the capture log.

use crate::domain::{CaptureEntry, LeaderboardEntry, NewCapture, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by score repository adapters.
    pub enum ScoreRepositoryError {
        /// The backing store could not be opened or reached.
        Connection { message: String } => "score store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "score store query failed: {message}",
    }
}

/// Storage contract behind [`crate::domain::ScoreStore`].
///
/// Every mutation is durable once the call returns. Methods touching a single
/// user report whether that user existed instead of failing, leaving the
/// missing-user policy to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait ScoreRepository: Send + Sync {
    /// Insert `user` unless its id is taken. Returns `true` when a row was
    /// written; an existing user is left untouched.
    fn insert_user_if_absent(&self, user: &User) -> Result<bool, ScoreRepositoryError>;

    /// Fetch a user by id.
    fn find_user(&self, id: &UserId) -> Result<Option<User>, ScoreRepositoryError>;

    /// Whether a user with `id` exists.
    fn user_exists(&self, id: &UserId) -> Result<bool, ScoreRepositoryError>;

    /// Overwrite the score. Returns `false` when no such user exists.
    fn set_score(&self, id: &UserId, score: i64) -> Result<bool, ScoreRepositoryError>;

    /// Add `delta` to the score. Returns `false` when no such user exists.
    fn add_score(&self, id: &UserId, delta: i64) -> Result<bool, ScoreRepositoryError>;

    /// Append `capture` and, when requested, bump the score in one transaction.
    ///
    /// Returns `false` without writing anything when the submitter is unknown.
    fn record_capture(&self, capture: &NewCapture) -> Result<bool, ScoreRepositoryError>;

    /// Capture history for `id`, newest first, optionally truncated.
    fn entries_for(
        &self,
        id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<CaptureEntry>, ScoreRepositoryError>;

    /// Users by score descending, ties in registration order.
    fn leaderboard(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<LeaderboardEntry>, ScoreRepositoryError>;

    /// 1-based rank of `id` within the full leaderboard.
    fn position_of(&self, id: &UserId) -> Result<Option<usize>, ScoreRepositoryError>;

    /// Highest score on record, absent for an empty store.
    fn highest_score(&self) -> Result<Option<i64>, ScoreRepositoryError>;
}
